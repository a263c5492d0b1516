//! Generation orchestration - coordinates parse, write, scaffold and build
//!
//! The orchestrator is the single entry point callers use. It dispatches on
//! [`OutputKind`]: parsed kinds run parse→write, the framework kind runs
//! scaffold→build. Requests for different `app_id`s are fully independent;
//! concurrent requests for the *same* `app_id` race on one output
//! directory and the last writer wins — callers are expected not to issue
//! those, the pipeline does not serialize them.

use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::generation::{
    AppId, GenerationError, GenerationOutcome, OutputKind, OutputWriter, ProjectBuilder,
    ProjectScaffolder, parser,
};

/// Channel depth for the streaming passthrough tap.
const STREAM_BUFFER: usize = 16;

/// Drives the generation workflow across the writer, scaffolder and
/// builder ports.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    writer: Arc<dyn OutputWriter>,
    scaffolder: Arc<dyn ProjectScaffolder>,
    builder: Arc<dyn ProjectBuilder>,
}

impl GenerationOrchestrator {
    /// Create a new generation orchestrator
    pub fn new(
        writer: Arc<dyn OutputWriter>,
        scaffolder: Arc<dyn ProjectScaffolder>,
        builder: Arc<dyn ProjectBuilder>,
    ) -> Self {
        Self {
            writer,
            scaffolder,
            builder,
        }
    }

    /// Materialize one completed model text for `(kind, app_id)`.
    ///
    /// Parser and writer validation errors, and I/O errors, propagate
    /// unchanged. A failed build never does: the scaffolded source is
    /// still usable, so the failure comes back inside
    /// [`GenerationOutcome::build`].
    pub async fn generate_and_save(
        &self,
        model_text: &str,
        kind: OutputKind,
        app_id: AppId,
    ) -> Result<GenerationOutcome, GenerationError> {
        tracing::debug!(%kind, app_id, "starting generation");

        match kind {
            OutputKind::SingleFile | OutputKind::MultiFile => {
                let files = parser::parse(model_text, kind)?;
                let directory = self.writer.write(&files, kind, app_id).await?;
                tracing::info!(
                    %kind,
                    app_id,
                    path = %directory.path().display(),
                    "materialized generated files"
                );
                Ok(GenerationOutcome {
                    directory,
                    build: None,
                })
            }
            OutputKind::FrameworkProject => {
                let notes = Some(model_text.trim()).filter(|s| !s.is_empty());
                let directory = self.scaffolder.scaffold(app_id, notes).await?;
                let build = self.builder.build(&directory).await;
                if build.attempted && !build.succeeded {
                    tracing::warn!(
                        app_id,
                        path = %directory.path().display(),
                        "project build failed; scaffolded source remains usable"
                    );
                }
                Ok(GenerationOutcome {
                    directory,
                    build: Some(build),
                })
            }
        }
    }

    /// Streaming variant: a passthrough tap over `chunks` with a
    /// finalize-on-complete side effect.
    ///
    /// Every chunk is forwarded to the returned stream in order while
    /// being appended to a call-scoped accumulator. When the source ends,
    /// the accumulated text runs through [`Self::generate_and_save`]
    /// exactly once; any failure there is logged, never surfaced to the
    /// stream consumer, since the chunks have already been delivered. For
    /// the framework kind the scaffold→build work is spawned immediately
    /// (its content does not depend on streamed text) and the accumulated
    /// text is folded in as README notes afterwards.
    pub fn generate_and_save_stream<S>(
        &self,
        chunks: S,
        kind: OutputKind,
        app_id: AppId,
    ) -> impl Stream<Item = String> + Send + Unpin
    where
        S: Stream<Item = String> + Send + 'static,
    {
        self.stream_with_finalize(chunks, kind, app_id).0
    }

    /// Like [`Self::generate_and_save_stream`], but also hands back the
    /// join handle of the finalize task for callers that must not outlive
    /// the side effect (the CLI awaits it before exiting; a server
    /// typically lets it detach).
    pub fn stream_with_finalize<S>(
        &self,
        chunks: S,
        kind: OutputKind,
        app_id: AppId,
    ) -> (impl Stream<Item = String> + Send + Unpin, JoinHandle<()>)
    where
        S: Stream<Item = String> + Send + 'static,
    {
        let (mut tx, rx) = mpsc::channel::<String>(STREAM_BUFFER);
        let pipeline = self.clone();

        let finalize = tokio::spawn(async move {
            // Framework output is synthesized, not parsed: kick it off as
            // soon as the directory can exist instead of waiting for the
            // stream to finish.
            let framework_work: Option<JoinHandle<_>> = (kind == OutputKind::FrameworkProject)
                .then(|| {
                    let pipeline = pipeline.clone();
                    tokio::spawn(
                        async move { pipeline.generate_and_save("", kind, app_id).await },
                    )
                });

            let mut accumulated = String::new();
            let mut consumer_gone = false;
            futures::pin_mut!(chunks);

            while let Some(chunk) = chunks.next().await {
                accumulated.push_str(&chunk);
                if !consumer_gone && tx.send(chunk).await.is_err() {
                    // Consumer dropped the stream; keep draining so the
                    // finalize still sees everything the source produced.
                    tracing::debug!(%kind, app_id, "stream consumer went away before completion");
                    consumer_gone = true;
                }
            }

            // Close the tap first: the consumer's stream completes as soon
            // as the source does, without waiting on file writes or builds.
            drop(tx);

            pipeline
                .finalize_stream(kind, app_id, accumulated, framework_work)
                .await;
        });

        (rx, finalize)
    }

    /// The single finalize step behind [`Self::generate_and_save_stream`].
    async fn finalize_stream(
        &self,
        kind: OutputKind,
        app_id: AppId,
        accumulated: String,
        framework_work: Option<JoinHandle<Result<GenerationOutcome, GenerationError>>>,
    ) {
        match kind {
            OutputKind::SingleFile | OutputKind::MultiFile => {
                match self.generate_and_save(&accumulated, kind, app_id).await {
                    Ok(outcome) => tracing::info!(
                        %kind,
                        app_id,
                        path = %outcome.directory.path().display(),
                        "finalized streamed generation"
                    ),
                    Err(error) => tracing::error!(
                        %kind,
                        app_id,
                        %error,
                        "stream finalize failed; no usable directory was produced"
                    ),
                }
            }
            OutputKind::FrameworkProject => {
                if let Some(work) = framework_work {
                    match work.await {
                        Ok(Ok(outcome)) => {
                            if let Some(build) = &outcome.build {
                                tracing::info!(
                                    app_id,
                                    attempted = build.attempted,
                                    succeeded = build.succeeded,
                                    "framework project build settled"
                                );
                            }
                        }
                        Ok(Err(error)) => tracing::error!(
                            app_id,
                            %error,
                            "framework scaffold failed during streaming generation"
                        ),
                        Err(error) => tracing::error!(
                            app_id,
                            %error,
                            "framework generation task aborted"
                        ),
                    }
                }

                // Whatever text streamed past is documentation, not source;
                // an idempotent re-scaffold folds it in without touching
                // build artifacts.
                let notes = accumulated.trim();
                if !notes.is_empty() {
                    if let Err(error) = self.scaffolder.scaffold(app_id, Some(notes)).await {
                        tracing::error!(app_id, %error, "failed to record streamed project notes");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{BuildOutcome, OutputDirectory, ParsedFileSet};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Writer that records what it was asked to write and pings a notify.
    struct RecordingWriter {
        written: Mutex<Vec<(ParsedFileSet, OutputKind, AppId)>>,
        notify: Notify,
    }

    impl RecordingWriter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                written: Mutex::new(Vec::new()),
                notify: Notify::new(),
            })
        }

        fn calls(&self) -> Vec<(ParsedFileSet, OutputKind, AppId)> {
            self.written.lock().unwrap().clone()
        }

        async fn wait_for_write(&self) {
            tokio::time::timeout(Duration::from_secs(5), self.notify.notified())
                .await
                .expect("writer was never invoked");
        }
    }

    #[async_trait]
    impl OutputWriter for RecordingWriter {
        async fn write(
            &self,
            files: &ParsedFileSet,
            kind: OutputKind,
            app_id: AppId,
        ) -> Result<OutputDirectory, GenerationError> {
            self.written
                .lock()
                .unwrap()
                .push((files.clone(), kind, app_id));
            self.notify.notify_one();
            Ok(OutputDirectory::resolve(Path::new("/tmp/out"), kind, app_id))
        }
    }

    struct RecordingScaffolder {
        notes_seen: Mutex<Vec<Option<String>>>,
    }

    impl RecordingScaffolder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                notes_seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ProjectScaffolder for RecordingScaffolder {
        async fn scaffold(
            &self,
            app_id: AppId,
            notes: Option<&str>,
        ) -> Result<OutputDirectory, GenerationError> {
            self.notes_seen
                .lock()
                .unwrap()
                .push(notes.map(str::to_string));
            Ok(OutputDirectory::resolve(
                Path::new("/tmp/out"),
                OutputKind::FrameworkProject,
                app_id,
            ))
        }
    }

    struct StubBuilder {
        outcome: BuildOutcome,
    }

    #[async_trait]
    impl ProjectBuilder for StubBuilder {
        async fn build(&self, _directory: &OutputDirectory) -> BuildOutcome {
            self.outcome.clone()
        }
    }

    fn orchestrator_with(
        writer: Arc<RecordingWriter>,
        scaffolder: Arc<RecordingScaffolder>,
        build: BuildOutcome,
    ) -> GenerationOrchestrator {
        GenerationOrchestrator::new(writer, scaffolder, Arc::new(StubBuilder { outcome: build }))
    }

    fn failed_build() -> BuildOutcome {
        BuildOutcome {
            attempted: true,
            succeeded: false,
            log: "vite exited with code 1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_file_dispatch_parses_then_writes() {
        let writer = RecordingWriter::new();
        let orchestrator = orchestrator_with(
            Arc::clone(&writer),
            RecordingScaffolder::new(),
            failed_build(),
        );

        let outcome = orchestrator
            .generate_and_save("```html\n<h1>hi</h1>\n```", OutputKind::SingleFile, 7)
            .await
            .unwrap();

        assert!(outcome.build.is_none());
        let calls = writer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.html.as_deref(), Some("<h1>hi</h1>"));
        assert_eq!(calls[0].1, OutputKind::SingleFile);
        assert_eq!(calls[0].2, 7);
    }

    #[tokio::test]
    async fn test_validation_error_propagates_and_writer_is_skipped() {
        let writer = RecordingWriter::new();
        let orchestrator = orchestrator_with(
            Arc::clone(&writer),
            RecordingScaffolder::new(),
            failed_build(),
        );

        let err = orchestrator
            .generate_and_save("   ", OutputKind::SingleFile, 7)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Validation(_)));
        assert!(writer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_framework_build_failure_is_not_fatal() {
        let scaffolder = RecordingScaffolder::new();
        let orchestrator = orchestrator_with(
            RecordingWriter::new(),
            Arc::clone(&scaffolder),
            failed_build(),
        );

        let outcome = orchestrator
            .generate_and_save("a todo list app", OutputKind::FrameworkProject, 9)
            .await
            .unwrap();

        let build = outcome.build.expect("framework kind reports a build");
        assert!(build.attempted);
        assert!(!build.succeeded);
        assert_eq!(
            scaffolder.notes_seen.lock().unwrap().as_slice(),
            &[Some("a todo list app".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stream_passthrough_preserves_chunks_in_order() {
        let writer = RecordingWriter::new();
        let orchestrator = orchestrator_with(
            Arc::clone(&writer),
            RecordingScaffolder::new(),
            failed_build(),
        );

        let chunks = futures::stream::iter(vec![
            "<ht".to_string(),
            "ml>ok</html>".to_string(),
        ]);
        let forwarded: Vec<String> = orchestrator
            .generate_and_save_stream(chunks, OutputKind::SingleFile, 11)
            .collect()
            .await;

        assert_eq!(forwarded, vec!["<ht".to_string(), "ml>ok</html>".to_string()]);

        // Finalize runs after the consumer's stream completes.
        writer.wait_for_write().await;
        let calls = writer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.html.as_deref(), Some("<html>ok</html>"));
        assert_eq!(calls[0].2, 11);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_stream_finalize_failure_is_swallowed() {
        let writer = RecordingWriter::new();
        let orchestrator = orchestrator_with(
            Arc::clone(&writer),
            RecordingScaffolder::new(),
            failed_build(),
        );

        // Whitespace-only accumulation: finalize hits the validation error
        // internally, but the consumer still drains the stream cleanly.
        let chunks = futures::stream::iter(vec!["  ".to_string()]);
        let forwarded: Vec<String> = orchestrator
            .generate_and_save_stream(chunks, OutputKind::SingleFile, 12)
            .collect()
            .await;

        assert_eq!(forwarded, vec!["  ".to_string()]);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(writer.calls().is_empty());
        assert!(logs_contain("stream finalize failed"));
    }

    #[tokio::test]
    async fn test_streamed_framework_text_becomes_notes() {
        let scaffolder = RecordingScaffolder::new();
        let orchestrator = orchestrator_with(
            RecordingWriter::new(),
            Arc::clone(&scaffolder),
            BuildOutcome::skipped("no manifest"),
        );

        let chunks = futures::stream::iter(vec!["design ".to_string(), "notes".to_string()]);
        let forwarded: Vec<String> = orchestrator
            .generate_and_save_stream(chunks, OutputKind::FrameworkProject, 13)
            .collect()
            .await;
        assert_eq!(forwarded.len(), 2);

        // Scaffold happens twice: once immediately, once to fold notes in.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let seen = scaffolder.notes_seen.lock().unwrap().clone();
            if seen.len() == 2 {
                assert_eq!(seen[0], None);
                assert_eq!(seen[1], Some("design notes".to_string()));
                break;
            }
            assert!(tokio::time::Instant::now() < deadline, "scaffold never finalized");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
