use crate::resolver;

#[derive(Debug, clap::Parser)]
#[command(name = "lsp")]
#[command(about = "Language server exposing the rewrite code action")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Start the language server on stdio
    #[clap(name = "stdio")]
    Stdio(StdioOptions),
}

#[derive(Debug, clap::Args)]
pub struct StdioOptions {
    /// Model used when a selection has no model directive
    #[clap(long, env = "SCRIBE_MODEL", default_value = resolver::DEFAULT_MODEL)]
    pub model: String,

    /// Temperature used when a selection has no temperature directive
    #[clap(long, env = "SCRIBE_TEMPERATURE", default_value = "0.3")]
    pub temperature: f64,

    /// Ollama base URL for non-Anthropic models
    #[clap(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,
}
