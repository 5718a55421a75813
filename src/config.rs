use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://arorpversion.blob.core.windows.net";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const EMBEDDED_LOCATIONS: &str = include_str!("../locations.yaml");

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            show_progress: false,
        }
    }
}

/// YAML sequence of location names.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct Locations(pub Vec<String>);

impl Locations {
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_LOCATIONS).context("Failed to parse embedded location list")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let locations: Locations = serde_yaml::from_str(contents)?;
        Ok(locations)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Picks the locations to query: explicit overrides, then the file, then the
/// embedded list. Duplicates are kept as given.
pub fn resolve_locations(overrides: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    let locations = if !overrides.is_empty() {
        overrides
    } else if let Some(path) = file {
        Locations::from_file(path)?.into_inner()
    } else {
        Locations::embedded()?.into_inner()
    };

    if let Some(pos) = locations.iter().position(|l| l.is_empty()) {
        bail!("Location #{} is empty", pos + 1);
    }

    Ok(locations)
}
