use clap::{Parser, Subcommand};
use enlighten::{BASE_URL, Credentials, Session};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the systems available to the user.
    #[clap(name = "systems")]
    Systems,

    /// Fetch the system summary once.
    #[clap(name = "summary")]
    Summary(SystemArgs),

    /// Keep fetching the system summary until interrupted or until a request fails.
    #[clap(name = "poll")]
    Poll(PollArgs),
}

#[derive(Parser)]
pub struct ConnectionArgs {
    #[clap(long = "api-key", env = "ENLIGHTEN_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[clap(long = "user-id", env = "ENLIGHTEN_USER_ID")]
    pub user_id: String,

    #[clap(long = "base-url", env = "ENLIGHTEN_BASE_URL", default_value = BASE_URL)]
    pub base_url: String,

    /// Deadline for every single request.
    #[clap(long, env = "ENLIGHTEN_TIMEOUT", default_value = "10s")]
    pub timeout: humantime::Duration,
}

impl ConnectionArgs {
    pub fn new_session(&self) -> enlighten::Result<Session> {
        Session::builder()
            .credentials(Credentials::new(&self.api_key, &self.user_id))
            .base_url(&self.base_url)
            .timeout(self.timeout.into())
            .build()
    }
}

#[derive(Parser)]
pub struct SystemArgs {
    /// Exact, case-sensitive system name.
    #[clap(long = "system-name", env = "ENLIGHTEN_SYSTEM_NAME")]
    pub name: String,
}

#[derive(Parser)]
pub struct PollArgs {
    #[clap(flatten)]
    pub system: SystemArgs,

    #[clap(long, env = "POLLING_INTERVAL", default_value = "5min")]
    pub interval: humantime::Duration,
}
