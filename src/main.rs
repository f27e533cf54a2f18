mod cli;
mod tables;

use anyhow::Context;
use clap::{Parser, crate_version};
use enlighten::Session;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    cli::{Args, Command, PollArgs},
    tables::{build_summary_table, build_systems_table},
};

type Result<T = ()> = anyhow::Result<T>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let session = args.connection.new_session()?;

    match args.command {
        Command::Systems => {
            let systems = session.get_systems().await.context("failed to list the systems")?;
            println!("{}", build_systems_table(&systems));
        }
        Command::Summary(args) => {
            let summary = session
                .resolve(&args.name)
                .await
                .context("failed to resolve the system")?
                .get_summary()
                .await
                .context("failed to fetch the summary")?;
            println!("{}", build_summary_table(&summary));
        }
        Command::Poll(args) => {
            poll(session, args).await?;
        }
    }

    info!("done!");
    Ok(())
}

#[instrument(skip_all, fields(system_name = %args.system.name))]
async fn poll(session: Session, args: PollArgs) -> Result {
    let api = session.resolve(&args.system.name).await?;

    let cancellation = CancellationToken::new();
    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupted, stopping…");
                    cancellation.cancel();
                }
                Err(error) => warn!("failed to listen for Ctrl-C: {error:#}"),
            }
        }
    });

    let mut summaries = api.poll_summary(args.interval.into(), &cancellation);
    while let Some(summary) = summaries.next_summary().await {
        info!(
            %summary.current_power,
            %summary.energy_today,
            %summary.energy_lifetime,
            %summary.status,
            "sample"
        );
    }
    summaries.finish().await.context("polling has stopped")
}
