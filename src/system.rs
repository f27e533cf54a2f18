use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Vendor-assigned system identifier.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct SystemId(pub u64);

/// Photovoltaic installation as listed in the system index.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct System {
    pub system_id: SystemId,

    #[serde_as(deserialize_as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    pub system_name: String,

    #[serde(default)]
    pub system_public_name: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub city: Option<String>,
}

/// Missing or `null` list is empty, and entries that do not decode are skipped.
#[serde_as]
#[derive(Deserialize)]
pub(crate) struct SystemIndex {
    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::VecSkipError<_>>")]
    #[serde(default)]
    pub systems: Vec<System>,
}

impl SystemIndex {
    /// Take the first system named exactly `system_name`, in the vendor's order.
    pub fn find(self, system_name: &str) -> Option<System> {
        self.systems.into_iter().find(|system| system.system_name == system_name)
    }
}
