//! Filesystem-backed output writer

use async_trait::async_trait;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::GenerationConfig;
use crate::generation::{
    AppId, Artifact, GenerationError, OutputDirectory, OutputKind, OutputWriter, ParsedFileSet,
};

/// Write `artifacts` under `directory`, creating it (and any parents)
/// first. Writes are whole-file UTF-8 overwrites.
pub async fn write_artifacts(
    directory: &OutputDirectory,
    artifacts: &[Artifact],
) -> Result<(), GenerationError> {
    fs::create_dir_all(directory.path()).await?;

    for artifact in artifacts {
        let target = directory.path().join(&artifact.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&target).await?;
        file.write_all(artifact.content.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            path = %target.display(),
            bytes = artifact.content.len(),
            "wrote artifact"
        );
    }

    Ok(())
}

/// Output writer that materializes parsed file sets on the local
/// filesystem under the configured root.
pub struct FileSystemOutputWriter {
    config: Arc<GenerationConfig>,
}

impl FileSystemOutputWriter {
    pub fn new(config: Arc<GenerationConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OutputWriter for FileSystemOutputWriter {
    async fn write(
        &self,
        files: &ParsedFileSet,
        kind: OutputKind,
        app_id: AppId,
    ) -> Result<OutputDirectory, GenerationError> {
        // Validate before touching the filesystem: a refused write must
        // leave any pre-existing directory exactly as it was.
        if matches!(kind, OutputKind::SingleFile | OutputKind::MultiFile) && !files.has_primary() {
            return Err(GenerationError::primary_empty());
        }

        let directory = OutputDirectory::resolve(&self.config.output_root, kind, app_id);
        let artifacts = kind_artifacts(files, kind);
        write_artifacts(&directory, &artifacts).await?;

        tracing::debug!(
            %kind,
            app_id,
            files = artifacts.len(),
            path = %directory.path().display(),
            "output written"
        );
        Ok(directory)
    }
}

/// Fixed filename mapping per kind. Empty slots produce no file at all,
/// not a zero-byte placeholder.
fn kind_artifacts(files: &ParsedFileSet, kind: OutputKind) -> Vec<Artifact> {
    let slots = match kind {
        OutputKind::SingleFile => vec![("index.html", files.html.as_deref())],
        OutputKind::MultiFile => vec![
            ("index.html", files.html.as_deref()),
            ("style.css", files.css.as_deref()),
            ("script.js", files.js.as_deref()),
        ],
        // Framework projects are synthesized by the scaffolder.
        OutputKind::FrameworkProject => vec![],
    };

    slots
        .into_iter()
        .filter_map(|(name, slot)| {
            slot.filter(|content| !content.trim().is_empty())
                .map(|content| Artifact::new(name, content))
        })
        .collect()
}
