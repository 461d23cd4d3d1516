use crate::prelude::{eprintln, *};
use scribe_core::directive;
use scribe_core::fence::extract_fenced;
use scribe_core::prompt::build_request;
use tokio::io::AsyncReadExt;

use crate::backend::{select_backend, BackendOptions};
use crate::resolver;

#[derive(Debug, clap::Parser)]
#[command(name = "rewrite")]
#[command(about = "One-shot instruction-driven rewrite")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Rewrite a text fragment according to its embedded directives
    #[clap(name = "run")]
    Run(RunOptions),
}

#[derive(Debug, clap::Parser)]
pub struct RunOptions {
    /// File containing the fragment; reads stdin when omitted
    pub file: Option<String>,

    /// Instruction to apply when the fragment has no prompt directive
    #[clap(long)]
    pub prompt: Option<String>,

    /// Model used when the fragment has no model directive
    #[clap(long, env = "SCRIBE_MODEL", default_value = resolver::DEFAULT_MODEL)]
    pub model: String,

    /// Temperature used when the fragment has no temperature directive
    #[clap(long, env = "SCRIBE_TEMPERATURE", default_value = "0.3")]
    pub temperature: f64,

    /// Ollama base URL for non-Anthropic models
    #[clap(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Run(options) => run_rewrite(options, global).await,
    }
}

async fn run_rewrite(options: RunOptions, global: crate::Global) -> Result<()> {
    let input = match &options.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read file '{path}': {e}"))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .map_err(|e| eyre!("Failed to read stdin: {e}"))?;
            buffer
        }
    };

    let mut parsed = directive::parse(&input);
    if parsed.prompt.is_none() {
        parsed.prompt = options.prompt.clone();
    }

    let defaults = resolver::rewrite_defaults(options.model, options.temperature);
    let request = build_request(&parsed, &defaults);

    if global.verbose {
        eprintln!("Model: {}", request.model);
        eprintln!("Temperature: {}", request.temperature);
        eprintln!("Prompt length: {} chars", request.prompt.len());
    }

    let backend = select_backend(
        &request.model,
        &BackendOptions {
            ollama_url: options.ollama_url,
        },
    )?;

    let response = backend.generate(&request).await?;

    // Print the replacement text to stdout
    print!("{}", extract_fenced(&response));

    Ok(())
}
