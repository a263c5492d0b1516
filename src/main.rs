//! pageforge CLI entrypoint
//! Parses command-line arguments and dispatches into the generation pipeline.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use pageforge::application::{GenerateAppRequest, GenerateAppUseCase};
use pageforge::config::GenerationConfig;
use pageforge::generation::OutputKind;

#[derive(Parser)]
#[command(name = "pageforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Materialize one completed model output into a project on disk
    Generate {
        /// Output kind: html, multi_file or vue_project
        #[arg(long)]
        kind: String,
        /// Application identifier the output directory is keyed by
        #[arg(long)]
        app_id: u64,
        /// File containing the model text; read from stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        /// Base directory for generated output
        #[arg(long)]
        output_root: Option<PathBuf>,
    },
    /// Feed stdin through the streaming pipeline line by line, echoing
    /// each chunk as it passes
    Stream {
        /// Output kind: html, multi_file or vue_project
        #[arg(long)]
        kind: String,
        /// Application identifier the output directory is keyed by
        #[arg(long)]
        app_id: u64,
        /// Base directory for generated output
        #[arg(long)]
        output_root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            kind,
            app_id,
            input,
            output_root,
        } => run_generate(&kind, app_id, input, output_root).await,
        Commands::Stream {
            kind,
            app_id,
            output_root,
        } => run_stream(&kind, app_id, output_root).await,
    }
}

fn build_use_case(output_root: Option<PathBuf>) -> GenerateAppUseCase {
    let mut config = GenerationConfig::from_env();
    if let Some(root) = output_root {
        config = config.with_output_root(root);
    }
    GenerateAppUseCase::with_config(Arc::new(config))
}

async fn run_generate(
    kind: &str,
    app_id: u64,
    input: Option<PathBuf>,
    output_root: Option<PathBuf>,
) -> anyhow::Result<()> {
    let kind = OutputKind::from_str(kind)?;

    let model_text = match &input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            BufReader::new(tokio::io::stdin())
                .read_to_string(&mut buffer)
                .await
                .context("failed to read model text from stdin")?;
            buffer
        }
    };

    let use_case = build_use_case(output_root);
    let response = use_case
        .execute(GenerateAppRequest {
            kind,
            app_id,
            model_text,
        })
        .await?;

    if let Some(build) = &response.build {
        if build.attempted && !build.succeeded {
            warn!("build failed; generated source is still available");
            eprintln!("{}", build.log.trim_end());
        } else {
            info!(attempted = build.attempted, "build step finished");
        }
    }
    println!("{}", response.output_path.display());
    Ok(())
}

async fn run_stream(
    kind: &str,
    app_id: u64,
    output_root: Option<PathBuf>,
) -> anyhow::Result<()> {
    let kind = OutputKind::from_str(kind)?;
    let use_case = build_use_case(output_root);

    // stdin lines become the chunk sequence; each keeps its newline so the
    // accumulated text matches what was typed.
    let (mut tx, chunk_rx) = mpsc::channel::<String>(16);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line + "\n").await.is_err() {
                break;
            }
        }
    });

    let (mut passthrough, finalize) = use_case.execute_stream(chunk_rx, kind, app_id)?;
    while let Some(chunk) = passthrough.next().await {
        print!("{chunk}");
    }

    // Don't exit under the finalize side effect.
    finalize.await.context("finalize task aborted")?;
    reader.await.ok();
    Ok(())
}
