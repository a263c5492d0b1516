//! Environment-driven configuration for the materialization pipeline

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default base path for generated output directories.
const DEFAULT_OUTPUT_ROOT: &str = "output";
/// Dependency install is expected to finish within tens of seconds.
const DEFAULT_INSTALL_TIMEOUT_SECS: u64 = 60;
/// A full bundle build can take on the order of minutes.
const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 300;

/// Settings shared by the writer, scaffolder and builder.
///
/// Commands are plain shell strings so deployments can substitute `pnpm`,
/// a CI shim, or a no-op without code changes.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base path under which every output directory is created.
    pub output_root: PathBuf,
    /// Command that installs framework-project dependencies.
    pub install_command: String,
    /// Command that produces the preview bundle.
    pub build_command: String,
    pub install_timeout: Duration,
    pub build_timeout: Duration,
}

impl GenerationConfig {
    /// Build a configuration from the environment, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `PAGEFORGE_OUTPUT_ROOT`,
    /// `PAGEFORGE_INSTALL_TIMEOUT_SECS`, `PAGEFORGE_BUILD_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = env::var("PAGEFORGE_OUTPUT_ROOT") {
            config.output_root = PathBuf::from(root);
        }
        if let Some(timeout) = env_secs("PAGEFORGE_INSTALL_TIMEOUT_SECS") {
            config.install_timeout = timeout;
        }
        if let Some(timeout) = env_secs("PAGEFORGE_BUILD_TIMEOUT_SECS") {
            config.build_timeout = timeout;
        }
        config
    }

    /// Replace the output root, keeping everything else.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            install_command: "npm install".to_string(),
            build_command: "npm run build".to_string(),
            install_timeout: Duration::from_secs(DEFAULT_INSTALL_TIMEOUT_SECS),
            build_timeout: Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS),
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    let raw = env::var(key).ok()?;
    match raw.parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable timeout override");
            None
        }
    }
}
