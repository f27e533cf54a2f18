use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    error::Endpoint,
    poll::SummaryStream,
    prelude::*,
    session::{Credentials, Session},
    summary::Summary,
    system::{System, SystemId},
};

/// Client bound to a single resolved system.
///
/// Clones share the HTTP connection pool and may be used concurrently.
#[derive(Clone, Debug)]
pub struct Api {
    session: Session,
    system: System,
}

impl Api {
    pub(crate) fn new(session: Session, system: System) -> Self {
        Self { session, system }
    }

    /// Resolve `system_name` against the vendor's default endpoint.
    ///
    /// # Errors
    ///
    /// See [`Session::builder`] and [`Session::resolve`].
    pub async fn connect(credentials: Credentials, system_name: &str) -> Result<Self> {
        Session::builder().credentials(credentials).build()?.resolve(system_name).await
    }

    #[must_use]
    pub const fn system_id(&self) -> SystemId {
        self.system.system_id
    }

    /// System record as it was listed at resolution time.
    pub const fn system(&self) -> &System {
        &self.system
    }

    /// Fetch the current summary.
    ///
    /// Nothing is cached or retried.
    ///
    /// # Errors
    ///
    /// - [`Error::RequestFailed`] on a transport error, or on a non-200 status with a decodable body.
    /// - [`Error::InvalidResponse`] when the body does not decode, whatever the status.
    #[instrument(skip_all, fields(system_id = %self.system.system_id))]
    pub async fn get_summary(&self) -> Result<Summary> {
        let path = format!("systems/{}/summary", self.system.system_id);
        let response = self.session.get(Endpoint::Summary, &path).await?;
        let status = response.status();
        let body =
            response.bytes().await.map_err(|error| Error::transport(Endpoint::Summary, error))?;
        let summary = Summary::from_response(status, &body)?;
        info!(%summary.current_power, %summary.energy_today, %summary.summary_date, "fetched");
        Ok(summary)
    }

    /// Fetch the summary every `interval` in a background task.
    ///
    /// The stream closes on the first failed fetch or when `cancellation` is cancelled.
    /// The interval is counted from the end of one fetch to the start of the next.
    ///
    /// Must be called within a Tokio runtime.
    pub fn poll_summary(
        &self,
        interval: Duration,
        cancellation: &CancellationToken,
    ) -> SummaryStream {
        SummaryStream::spawn(self.clone(), interval, cancellation.child_token())
    }
}
