#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod backend;
mod error;
mod lsp;
mod prelude;
mod resolver;
mod rewrite;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rewrite selected code through a text-generation model, driven by directives embedded in comments"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "SCRIBE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Language server exposing the rewrite code action
    Lsp(crate::lsp::App),

    /// One-shot rewrite from the command line
    Rewrite(crate::rewrite::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Lsp(sub_app) => crate::lsp::run(sub_app, app.global).await,
        SubCommands::Rewrite(sub_app) => crate::rewrite::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
