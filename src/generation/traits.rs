//! Port interfaces for the generation domain

use async_trait::async_trait;

use crate::generation::{
    AppId, BuildOutcome, GenerationError, OutputDirectory, OutputKind, ParsedFileSet,
};

/// Materializes a parsed file set under the deterministic output directory.
///
/// The step skeleton is fixed for every kind — validate, resolve the
/// directory, write the non-empty slots — and only the per-kind file list
/// varies. Validation runs before any filesystem mutation, so a refused
/// write leaves pre-existing output untouched.
#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(
        &self,
        files: &ParsedFileSet,
        kind: OutputKind,
        app_id: AppId,
    ) -> Result<OutputDirectory, GenerationError>;
}

/// Synthesizes a minimal buildable SPA skeleton for the framework kind.
///
/// Pure file synthesis — no subprocess or network activity. Re-scaffolding
/// the same app overwrites the skeleton in place and leaves unrelated
/// files (such as a prior build's `dist/`) alone.
#[async_trait]
pub trait ProjectScaffolder: Send + Sync {
    /// Scaffold the skeleton for `app_id`; non-empty `notes` are written
    /// as an auxiliary `README.md` next to it.
    async fn scaffold(
        &self,
        app_id: AppId,
        notes: Option<&str>,
    ) -> Result<OutputDirectory, GenerationError>;
}

/// Installs dependencies and builds a materialized framework project.
///
/// Best-effort by contract: the signature is infallible and every failure
/// mode — missing manifest, install error, build error, timeout — comes
/// back as data in the [`BuildOutcome`]. The generated source stays
/// usable even when the build does not.
#[async_trait]
pub trait ProjectBuilder: Send + Sync {
    async fn build(&self, directory: &OutputDirectory) -> BuildOutcome;
}
