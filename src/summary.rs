use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::Endpoint,
    prelude::*,
    quantity::{WattHours, Watts},
    system::SystemId,
};

/// Point-in-time power and energy summary of a single system.
///
/// Absent fields fall back to zero values.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Summary {
    pub current_power: Watts,

    pub energy_lifetime: WattHours,

    pub energy_today: WattHours,

    /// Number of microinverters.
    pub modules: u64,

    /// Unix timestamp of when the system went operational.
    pub operational_at: u64,

    /// Rated system size.
    #[serde(rename = "size_w")]
    pub size: Watts,

    pub source: String,

    pub status: String,

    pub summary_date: String,

    pub system_id: SystemId,
}

impl Summary {
    /// [`Summary::operational_at`] as a date, if it is within the representable range.
    #[must_use]
    pub fn operational_since(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.operational_at).ok()?, 0)
    }

    /// Interpret a summary response.
    ///
    /// The body is decoded before the status is looked at. So an unparseable error
    /// page is an [`Error::InvalidResponse`], while a well-formed body with
    /// a non-200 status is an [`Error::RequestFailed`].
    ///
    /// The body must be a JSON object: serde would otherwise fill a struct from an array.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Result<Self> {
        let summary = serde_json::from_slice::<Map<String, Value>>(body)
            .and_then(|object| serde_json::from_value::<Self>(Value::Object(object)))
            .map_err(Error::InvalidResponse)?;
        if status != StatusCode::OK {
            warn!(%status, "summary request failed");
            return Err(Error::status(Endpoint::Summary, status));
        }
        Ok(summary)
    }
}
