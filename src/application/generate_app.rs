//! Use case for materializing one generated application

use futures::Stream;
use std::sync::Arc;

use crate::application::{ApplicationError, GenerateAppRequest, GenerateAppResponse};
use crate::config::GenerationConfig;
use crate::generation::{AppId, GenerationOrchestrator, OutputKind};
use crate::infrastructure::build::NodeProjectBuilder;
use crate::infrastructure::output::FileSystemOutputWriter;
use crate::infrastructure::scaffold::VueScaffolder;
use crate::infrastructure::shell::ShellCommandExecutor;

/// Thin seam between transport layers (CLI today, an API tomorrow) and the
/// generation domain: request validation on the way in, a response DTO on
/// the way out.
pub struct GenerateAppUseCase {
    orchestrator: Arc<GenerationOrchestrator>,
}

impl GenerateAppUseCase {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Wire the default filesystem/shell implementations for `config`.
    pub fn with_config(config: Arc<GenerationConfig>) -> Self {
        let orchestrator = GenerationOrchestrator::new(
            Arc::new(FileSystemOutputWriter::new(Arc::clone(&config))),
            Arc::new(VueScaffolder::new(Arc::clone(&config))),
            Arc::new(NodeProjectBuilder::new(
                Arc::new(ShellCommandExecutor::new()),
                config,
            )),
        );
        Self::new(Arc::new(orchestrator))
    }

    /// Run the synchronous path: one completed model text in, a directory
    /// (and possibly a build report) out.
    pub async fn execute(
        &self,
        request: GenerateAppRequest,
    ) -> Result<GenerateAppResponse, ApplicationError> {
        request.validate()?;

        let outcome = self
            .orchestrator
            .generate_and_save(&request.model_text, request.kind, request.app_id)
            .await?;

        Ok(GenerateAppResponse {
            output_path: outcome.directory.absolute_path(),
            build: outcome.build,
        })
    }

    /// Run the streaming path: chunks are passed through to the returned
    /// stream while the pipeline accumulates and finalizes behind it. The
    /// join handle resolves once the finalize side effect has settled.
    pub fn execute_stream<S>(
        &self,
        chunks: S,
        kind: OutputKind,
        app_id: AppId,
    ) -> Result<
        (impl Stream<Item = String> + Send + Unpin, tokio::task::JoinHandle<()>),
        ApplicationError,
    >
    where
        S: Stream<Item = String> + Send + 'static,
    {
        // Same boundary check as the synchronous path; text-level
        // validation can only happen at finalize time.
        if app_id == 0 {
            return Err(crate::application::ValidationError::InvalidAppId.into());
        }
        Ok(self.orchestrator.stream_with_finalize(chunks, kind, app_id))
    }
}
