use crate::prelude::*;
use clap::Parser;

mod chat;
mod docs;
mod gemini;
mod generate;
mod mcp;
mod prelude;
mod serve;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Write LEGO SPIKE Prime MicroPython by describing what the robot should do"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Gemini model to generate with (overrides GEMINI_MODEL)
    #[clap(long, global = true)]
    model: Option<String>,

    /// Gemini REST base URL (overrides GEMINI_BASE_URL)
    #[clap(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides GEMINI_TIMEOUT_SECS; none by default)
    #[clap(long, global = true)]
    timeout: Option<u64>,

    /// Whether to display additional information.
    #[clap(
        long,
        env = "SPIKECODER_VERBOSE",
        global = true,
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate one script from an instruction
    Generate(crate::generate::GenerateOptions),

    /// Interactive chat that refines the current script
    Chat(crate::chat::ChatOptions),

    /// Print the bundled SPIKE Prime API reference
    Docs(crate::docs::DocsOptions),

    /// HTTP JSON API for a browser front end
    Serve(crate::serve::ServeOptions),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Chat(options) => crate::chat::run(options, app.global).await,
        SubCommands::Docs(options) => crate::docs::run(options, app.global).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
