// ABOUTME: Error types at the orchestration boundary and their process exit codes.
// ABOUTME: PipelineError wraps config, fetch, and sink failures; each maps to a documented exit code.

use thiserror::Error;

use haras_extract::ExtractError;
use haras_sink::SinkError;

/// Process exit codes.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    /// Anything not covered below (log file, local HTML file, JSON output).
    pub const FAILURE: u8 = 1;
    /// Reserved by clap for usage errors.
    pub const USAGE: u8 = 2;
    pub const CONFIG_MISSING: u8 = 3;
    pub const FETCH_FAILED: u8 = 4;
    pub const SINK_UNAVAILABLE: u8 = 5;
}

/// A required setting is absent for the selected mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration: set {env} or pass --{flag}")]
    Missing {
        env: &'static str,
        flag: &'static str,
    },
}

/// Failure that ends a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] ExtractError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Config(_) => exit::CONFIG_MISSING,
            PipelineError::Fetch(_) => exit::FETCH_FAILED,
            PipelineError::Sink(_) => exit::SINK_UNAVAILABLE,
            PipelineError::Other(_) => exit::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_has_its_own_exit_code() {
        let config: PipelineError = ConfigError::Missing {
            env: "URL_CRAWLING",
            flag: "listing-url",
        }
        .into();
        let fetch: PipelineError = ExtractError::status("https://example.com", "Fetch", 500).into();
        let sink: PipelineError = SinkError::Unavailable("record file".to_string()).into();
        let other: PipelineError = anyhow::anyhow!("boom").into();

        assert_eq!(config.exit_code(), exit::CONFIG_MISSING);
        assert_eq!(fetch.exit_code(), exit::FETCH_FAILED);
        assert_eq!(sink.exit_code(), exit::SINK_UNAVAILABLE);
        assert_eq!(other.exit_code(), exit::FAILURE);
    }

    #[test]
    fn config_error_names_env_and_flag() {
        let err = ConfigError::Missing {
            env: "BASE_URL_SCRAPING",
            flag: "base-url",
        };
        assert_eq!(
            err.to_string(),
            "missing configuration: set BASE_URL_SCRAPING or pass --base-url"
        );
    }
}
