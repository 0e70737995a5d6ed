#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod clipboard;
mod debug;
mod error;
mod gemini;
mod generate;
mod prelude;
mod ui;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate and debug SmartPy smart contracts with the Gemini API"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Gemini model identifier
    #[clap(
        long,
        env = "GEMINI_MODEL",
        global = true,
        default_value = crate::gemini::DEFAULT_MODEL
    )]
    model: Option<String>,

    /// Gemini API base URL
    #[clap(long, env = "GEMINI_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "SPTOOLS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

/// SmartPy IDE dialect targeted by generated code.
#[derive(Debug, Clone, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Modern SmartPy IDE conventions (e.g. `sp.address`)
    Modern,
    /// Legacy SmartPy IDE conventions (e.g. `sp.TAddress`)
    Legacy,
}

impl From<Dialect> for sptools_core::types::Dialect {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Modern => sptools_core::types::Dialect::Modern,
            Dialect::Legacy => sptools_core::types::Dialect::Legacy,
        }
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate a SmartPy contract from a natural-language description
    Generate(crate::generate::GenerateOptions),

    /// Explain and correct a failing SmartPy contract
    Debug(crate::debug::DebugOptions),

    /// Interactive terminal interface with generator and debugger tabs
    Ui(crate::ui::UiOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Debug(options) => crate::debug::run(options, app.global).await,
        SubCommands::Ui(options) => crate::ui::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
