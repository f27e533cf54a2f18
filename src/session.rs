use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

use bon::bon;
use http::StatusCode;
use reqwest::{Client, Response};
use serde::Serialize;

use crate::{
    api::Api,
    error::Endpoint,
    prelude::*,
    system::{System, SystemIndex},
};

pub const BASE_URL: &str = "https://api.enphaseenergy.com/api/v2";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Static API credentials, sent with every request as query parameters.
#[must_use]
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "key")]
    api_key: String,

    #[serde(rename = "user_id")]
    user_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), user_id: user_id.into() }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Authenticated connection to the vendor API, not yet bound to a system.
///
/// Clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

#[bon]
impl Session {
    /// # Errors
    ///
    /// Fails with [`Error::Client`] when the HTTP client cannot be initialised.
    #[builder]
    pub fn new(
        credentials: Credentials,
        #[builder(into, default = BASE_URL.to_owned())] base_url: String,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
        #[builder(into, default = concat!("enlighten/", env!("CARGO_PKG_VERSION")).to_owned())]
        user_agent: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;
        let base_url = base_url.trim_end_matches('/').to_owned();
        Ok(Self { client, base_url, credentials })
    }
}

impl Session {
    /// Fetch all the systems visible to the user, in the vendor's order.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::RequestFailed`] on a transport error, a non-200 status,
    /// or an undecodable body.
    #[instrument(skip_all, fields(user_id = %self.credentials.user_id))]
    pub async fn get_systems(&self) -> Result<Vec<System>> {
        Ok(self.get_index().await?.systems)
    }

    /// Resolve the system named exactly `system_name` and bind this session to it.
    ///
    /// The identifier is resolved once. The returned handle never re-resolves it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] when no system matches, and otherwise as
    /// [`Session::get_systems`] does.
    #[instrument(skip_all, fields(system_name = system_name))]
    pub async fn resolve(self, system_name: &str) -> Result<Api> {
        let system = self
            .get_index()
            .await?
            .find(system_name)
            .ok_or_else(|| Error::NotFound(system_name.to_owned()))?;
        info!(%system.system_id, "resolved");
        Ok(Api::new(self, system))
    }

    async fn get_index(&self) -> Result<SystemIndex> {
        const ENDPOINT: Endpoint = Endpoint::SystemIndex;

        let response = self.get(ENDPOINT, "systems").await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, "system index request failed");
            return Err(Error::status(ENDPOINT, status));
        }
        let body = response.bytes().await.map_err(|error| Error::transport(ENDPOINT, error))?;
        let index: SystemIndex =
            serde_json::from_slice(&body).map_err(|error| Error::decode(ENDPOINT, error))?;
        debug!(n_systems = index.systems.len(), "fetched");
        Ok(index)
    }

    /// Send a `GET` request to `path` under the base URL, with the credentials attached.
    ///
    /// Only a transport error fails the call. The caller handles the status.
    #[instrument(skip_all, level = Level::DEBUG, fields(endpoint = %endpoint, path = path))]
    pub(crate) async fn get(&self, endpoint: Endpoint, path: &str) -> Result<Response> {
        debug!("sending…");
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(&self.credentials)
            .send()
            .await
            .map_err(|error| Error::transport(endpoint, error))?;
        debug!(status = %response.status(), "received");
        Ok(response)
    }
}
