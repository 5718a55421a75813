use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One entry of the `/ocpversions/{location}` payload.
///
/// A missing or `null` version reads as `""` so the rest of the list survives.
#[derive(Debug, Deserialize, Clone)]
pub struct OcpVersion {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Versions reported for a single location.
///
/// A failed lookup leaves its field empty; the record itself is always present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub location: String,
    pub rp_version: String,
    pub ocp_versions: Vec<String>,
}

impl VersionRecord {
    pub fn empty(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}
