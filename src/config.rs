use std::{path::{Path, PathBuf}, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;
use validator::Validate;


pub(super) const CONFIG_PATH: &str = "config.toml";

const BASE_URL: &str = "https://www.google.com";
const START_URL: &str = "https://www.google.com/about/careers/applications/jobs/results/?location=Zurich%2C%20Switzerland";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";


/// Settings for a crawl.
///
/// Every field has a default, so `config.toml` is optional and may set any subset.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Used to resolve job links when the listing page URL cannot be used.
    #[validate(url)]
    pub(crate) base_url: String,
    /// The search results page that lists the job postings.
    #[validate(url)]
    pub(crate) start_url: String,
    pub(crate) user_agent: String,
    #[validate(range(min = 1))]
    pub(crate) request_timeout_secs: u32,
    /// How many detail pages may be in flight at once.
    #[validate(range(min = 1))]
    pub(crate) concurrent_requests: u32,
    /// Nominatim compatible search endpoint.
    #[validate(url)]
    pub(crate) geocoder_url: String,
    /// Nominatim refuses anonymous clients, so this should identify the operator.
    pub(crate) geocoder_user_agent: String,
    #[validate(range(min = 1))]
    pub(crate) geocoder_timeout_secs: u32,
    /// Minimum time between two geocoding requests. Nominatim allows one request per second.
    pub(crate) geocoder_interval_ms: u64,
    /// Upper bound on the skill phrases kept per posting.
    #[validate(range(min = 1))]
    pub(crate) max_skills: u32,
    /// Where records are written as JSON lines. Stdout when unset.
    pub(crate) output: Option<PathBuf>
}


impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            start_url: START_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            concurrent_requests: 8,
            geocoder_url: NOMINATIM_URL.to_string(),
            geocoder_user_agent: "careers-crawler".to_string(),
            geocoder_timeout_secs: 10,
            geocoder_interval_ms: 1000,
            max_skills: 30,
            output: None
        }
    }
}


impl Config {
    /// Reads `config.toml` from the working directory, falling back to the defaults.
    pub(crate) fn load() -> anyhow::Result<Self> {
        let path = Path::new(CONFIG_PATH);
        if !path.exists() {
            return Self::from_toml("");
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid {}", path.display()))
    }

    pub(crate) fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn start_url(&self) -> anyhow::Result<Url> {
        self.start_url.parse().context("start_url should have been validated")
    }

    pub(crate) fn base_url(&self) -> anyhow::Result<Url> {
        self.base_url.parse().context("base_url should have been validated")
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.into())
    }

    pub(crate) fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs.into())
    }

    pub(crate) fn geocoder_interval(&self) -> Duration {
        Duration::from_millis(self.geocoder_interval_ms)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.start_url, START_URL);
        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.max_skills, 30);
        assert_eq!(config.geocoder_interval(), Duration::from_secs(1));
        assert!(config.output.is_none());
        assert_eq!(config.start_url().unwrap().host_str(), Some("www.google.com"));
    }

    #[test]
    fn partial_file_overrides_only_what_it_sets() {
        let config = Config::from_toml(
            r#"
            concurrent_requests = 2
            output = "jobs.jsonl"
            "#
        ).unwrap();
        assert_eq!(config.concurrent_requests, 2);
        assert_eq!(config.output, Some(PathBuf::from("jobs.jsonl")));
        assert_eq!(config.geocoder_url, NOMINATIM_URL);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Config::from_toml("start_url = \"not a url\"").is_err());
        assert!(Config::from_toml("concurrent_requests = 0").is_err());
        assert!(Config::from_toml("max_skills = 0").is_err());
        assert!(Config::from_toml("unknown_key = 1").is_err());
    }
}
