mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use c4shop_core::settings::{read_settings, read_settings_from};
use c4shop_core::ExportFormat;

#[derive(Parser)]
#[command(name = "c4shop", version, about = "Build and export the WebShop architecture workspace")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of ~/.c4shop/settings.json
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the workspace as JSON and/or Structurizr DSL
    Export {
        /// Output directory (defaults to the settings' outputDir, then ~/.c4shop)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Export format, repeatable: json, dsl (defaults to the settings' formats)
        #[arg(short, long = "format")]
        formats: Vec<ExportFormat>,
        /// Base file name of the exported documents
        #[arg(long, default_value = "webshop")]
        name: String,
        /// Write JSON without indentation
        #[arg(long)]
        compact: bool,
    },
    /// Print element counts and the contents of each view
    Summary,
    /// Print the JSON Schema of the workspace document
    Schema,
    /// Check a workspace JSON document against the structural rules
    Validate {
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup_tracing(cli.verbose);

    let settings = match &cli.settings {
        Some(path) => read_settings_from(path),
        None => read_settings(),
    };
    tracing::debug!(?settings, "settings loaded");

    match cli.command {
        Command::Export {
            out,
            formats,
            name,
            compact,
        } => commands::export(&settings, out, formats, &name, compact),
        Command::Summary => commands::summary(),
        Command::Schema => commands::schema(),
        Command::Validate { file } => commands::validate(&file),
    }
}
