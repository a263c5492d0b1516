//! Core types for the generation domain

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Caller-supplied stable identifier for the application being generated.
pub type AppId = u64;

/// The closed set of output shapes a generation request can produce.
///
/// Chosen by the caller before generation starts; it determines which
/// parser, writer and scaffolder variants run. There are no other values:
/// untyped kind strings are rejected at the [`FromStr`] boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// One self-contained HTML document.
    SingleFile,
    /// An HTML + CSS + JS triplet.
    MultiFile,
    /// A Vue single-page project, scaffolded rather than parsed.
    FrameworkProject,
}

impl OutputKind {
    /// Directory-name prefix used in the on-disk layout (`{prefix}_{app_id}`).
    pub fn dir_prefix(&self) -> &'static str {
        match self {
            OutputKind::SingleFile => "html",
            OutputKind::MultiFile => "multi_file",
            OutputKind::FrameworkProject => "vue_project",
        }
    }

    /// Get the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputKind::SingleFile => "single HTML file",
            OutputKind::MultiFile => "HTML/CSS/JS files",
            OutputKind::FrameworkProject => "Vue project",
        }
    }

    /// Get all supported kinds
    pub fn all() -> Vec<OutputKind> {
        vec![
            OutputKind::SingleFile,
            OutputKind::MultiFile,
            OutputKind::FrameworkProject,
        ]
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_prefix())
    }
}

impl FromStr for OutputKind {
    type Err = crate::generation::GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "single" | "single_file" => Ok(OutputKind::SingleFile),
            "multi_file" | "multifile" | "multi" => Ok(OutputKind::MultiFile),
            "vue_project" | "vue" | "project" => Ok(OutputKind::FrameworkProject),
            _ => Err(crate::generation::GenerationError::UnsupportedKind(
                s.to_string(),
            )),
        }
    }
}

/// In-memory result of parsing one completed model text.
///
/// Slots the text did not provide stay `None`; the writer skips them
/// entirely rather than creating placeholder files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFileSet {
    pub html: Option<String>,
    pub css: Option<String>,
    pub js: Option<String>,
}

impl ParsedFileSet {
    /// Whether the primary (`html`) slot carries non-blank content.
    pub fn has_primary(&self) -> bool {
        self.html
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// True when no slot carries content.
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.css.is_none() && self.js.is_none()
    }
}

/// A single file to be materialized, path relative to the output directory.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Handle to the on-disk location of one generated application.
///
/// The path is deterministic for a `(kind, app_id)` pair, so re-running
/// generation for the same app overwrites in place instead of creating a
/// new directory. The handle owns no file contents; downstream
/// collaborators get an absolute path and an existence check, nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Resolve the directory for `(kind, app_id)` under `root`.
    pub fn resolve(root: &Path, kind: OutputKind, app_id: AppId) -> Self {
        Self {
            path: root.join(format!("{}_{}", kind.dir_prefix(), app_id)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute form of the path, resolving against the current working
    /// directory when the configured root was relative.
    pub fn absolute_path(&self) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.path))
                .unwrap_or_else(|_| self.path.clone())
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Result of the optional build step.
///
/// A build that was never attempted (non-framework kinds, or no manifest
/// present) is distinct from one that was attempted and failed; neither is
/// fatal to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub attempted: bool,
    pub succeeded: bool,
    pub log: String,
}

impl BuildOutcome {
    /// Outcome for a directory with nothing to build.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            attempted: false,
            succeeded: false,
            log: reason.into(),
        }
    }
}

/// What a completed generation hands back to the caller: the directory
/// handle, plus the build report when a build was in scope.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub directory: OutputDirectory,
    pub build: Option<BuildOutcome>,
}
