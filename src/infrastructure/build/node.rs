//! Node toolchain builder for scaffolded framework projects
//!
//! Runs dependency install and bundle build as bounded subprocesses and
//! reports the result as data. A failing or timed-out build never
//! propagates as an error: the scaffolded source is independently useful,
//! the bundle is an enhancement.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::generation::{BuildOutcome, OutputDirectory, ProjectBuilder};
use crate::infrastructure::shell::CommandExecutor;

const MANIFEST_FILE: &str = "package.json";
const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Progress of one build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    NotAttempted,
    Installing,
    Building,
    Succeeded,
    Failed,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildState::NotAttempted => "not_attempted",
            BuildState::Installing => "installing",
            BuildState::Building => "building",
            BuildState::Succeeded => "succeeded",
            BuildState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Builder that drives the Node toolchain (`npm` by default) through the
/// [`CommandExecutor`] port.
pub struct NodeProjectBuilder {
    executor: Arc<dyn CommandExecutor>,
    config: Arc<GenerationConfig>,
}

impl NodeProjectBuilder {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: Arc<GenerationConfig>) -> Self {
        Self { executor, config }
    }

    /// Run one command, appending its output (or its failure) to `log`.
    /// Returns whether the step exited zero.
    async fn run_step(
        &self,
        command: &str,
        directory: &Path,
        timeout: std::time::Duration,
        log: &mut String,
    ) -> bool {
        log.push_str(&format!("$ {command}\n"));
        match self.executor.execute(command, directory, timeout).await {
            Ok(result) => {
                let output = result.combined_output();
                if !output.is_empty() {
                    log.push_str(&output);
                    log.push('\n');
                }
                if !result.is_success() {
                    log.push_str(&format!("(exit code {})\n", result.exit_code));
                }
                result.is_success()
            }
            // Timeouts and spawn failures are captured the same way: as a
            // failed step in the log, never as an error to the caller.
            Err(error) => {
                log.push_str(&format!("{error}\n"));
                false
            }
        }
    }
}

#[async_trait]
impl ProjectBuilder for NodeProjectBuilder {
    async fn build(&self, directory: &OutputDirectory) -> BuildOutcome {
        let path = directory.path();
        let mut state = BuildState::NotAttempted;

        let manifest_present = tokio::fs::try_exists(path.join(MANIFEST_FILE))
            .await
            .unwrap_or(false);
        if !manifest_present {
            // Not an error: there is simply nothing to build here.
            tracing::debug!(path = %path.display(), "no manifest, build skipped");
            return BuildOutcome::skipped("no manifest");
        }

        let mut log = String::new();

        let cache_present = tokio::fs::try_exists(path.join(DEPENDENCY_CACHE_DIR))
            .await
            .unwrap_or(false);
        if cache_present {
            log.push_str("dependency cache present, install skipped\n");
        } else {
            state = BuildState::Installing;
            tracing::debug!(path = %path.display(), %state, "installing dependencies");
            let installed = self
                .run_step(
                    &self.config.install_command,
                    path,
                    self.config.install_timeout,
                    &mut log,
                )
                .await;
            if !installed {
                // Keep going: a previously cached environment may still
                // satisfy the build.
                tracing::warn!(path = %path.display(), "dependency install failed");
            }
        }

        state = BuildState::Building;
        tracing::debug!(path = %path.display(), %state, "running build");
        let succeeded = self
            .run_step(
                &self.config.build_command,
                path,
                self.config.build_timeout,
                &mut log,
            )
            .await;

        state = if succeeded {
            BuildState::Succeeded
        } else {
            BuildState::Failed
        };
        tracing::info!(path = %path.display(), %state, "build finished");

        BuildOutcome {
            attempted: true,
            succeeded,
            log,
        }
    }
}
