//! Load the configuration for body resolution.
//!
//! [`NegotiationConfig`] is the key type in this module.
use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

use crate::body::BodySizeLimit;

static ENV_PREFIX: &str = "CONNEG_";

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure how request bodies are buffered ahead of resolution.
///
/// # Example
///
/// ```rust,no_run
/// use conneg::config::NegotiationConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NegotiationConfig::load(Some("configuration/conneg.yml".as_ref()))?;
/// # Ok(())
/// # }
/// ```
pub struct NegotiationConfig {
    /// The maximum size of incoming request bodies.
    ///
    /// # Default
    ///
    /// 2 megabytes.
    #[serde(default)]
    pub body_size_limit: BodySizeLimit,
}

impl NegotiationConfig {
    /// Load the configuration by merging together two sources:
    ///
    /// 1. Environment variables (`CONNEG_*`, with `__` as the nesting separator,
    ///    e.g. `CONNEG_BODY_SIZE_LIMIT__MODE=disabled`)
    /// 2. A YAML configuration file, if `config_file` is set
    ///
    /// Environment variables take precedence over the configuration file.
    /// Missing fields are set to their default values.
    pub fn load(config_file: Option<&Path>) -> Result<Self, errors::ConfigLoadError> {
        let span = tracing::info_span!(
            "Loading body resolution configuration",
            configuration.file = ?config_file,
        );
        let _guard = span.enter();

        let mut figment = Figment::new();
        if let Some(config_file) = config_file {
            figment = figment.merge(Yaml::file(config_file));
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let configuration: Self = figment
            .extract()
            .context("Failed to load the body resolution configuration")
            .map_err(errors::ConfigLoadError)?;
        Ok(configuration)
    }
}

/// Errors that can occur when loading configuration.
pub mod errors {
    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load configuration")]
    /// The error returned by [`NegotiationConfig::load`](super::NegotiationConfig::load).
    pub struct ConfigLoadError(#[source] pub(super) anyhow::Error);
}
