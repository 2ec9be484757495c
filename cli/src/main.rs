//! DocMaker - compose block documents and export them to PDF and DOCX
//!
//! Local storage (saved documents, recents, templates and settings) lives in
//! a directory chosen with `--data-dir` or `DOCMAKER_DATA_DIR`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use store::ExportFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docmaker", version, about = "Block document composer")]
struct Cli {
    /// Directory of the local document store
    #[arg(long, global = true, env = "DOCMAKER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new document
    New {
        #[arg(long)]
        title: String,
        /// Comma-separated block kinds to start with (e.g. cover,section,text)
        #[arg(long, value_delimiter = ',')]
        blocks: Vec<String>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Add a default block to a document file
    Add {
        file: PathBuf,
        kind: String,
        /// Insert position; appends when omitted
        #[arg(long)]
        position: Option<usize>,
    },

    /// Print the block outline of a document file
    Outline { file: PathBuf },

    /// Export a document file
    Export {
        file: PathBuf,
        #[arg(long)]
        format: ExportFormat,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Save a document file into local storage
    Save { file: PathBuf },

    /// List recently saved documents
    Recent,

    /// Restore a locally saved document
    Open {
        id: String,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Manage templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Change application settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Save a document file's blocks as a template
    Save {
        file: PathBuf,
        #[arg(long)]
        name: String,
    },
    /// List saved templates
    List,
    /// Create a document from a template
    Use {
        id: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Set or clear the default footer logo
    Logo {
        #[arg(required_unless_present = "clear")]
        image: Option<PathBuf>,
        #[arg(long, conflicts_with = "image")]
        clear: bool,
    },
    /// Set the application theme (light or dark)
    Theme { theme: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("erro: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = commands::data_dir(cli.data_dir);
    match cli.command {
        Command::New {
            title,
            blocks,
            output,
        } => commands::new_document(&title, &blocks, &output).await,
        Command::Add {
            file,
            kind,
            position,
        } => commands::add_block(&file, &kind, position).await,
        Command::Outline { file } => commands::print_outline(&file).await,
        Command::Export {
            file,
            format,
            out_dir,
        } => commands::export(&data_dir, &file, format, &out_dir).await,
        Command::Save { file } => commands::save(&data_dir, &file).await,
        Command::Recent => commands::recent(&data_dir),
        Command::Open { id, output } => commands::open(&data_dir, &id, &output).await,
        Command::Template(TemplateCommand::Save { file, name }) => {
            commands::template_save(&data_dir, &file, &name).await
        }
        Command::Template(TemplateCommand::List) => commands::template_list(&data_dir),
        Command::Template(TemplateCommand::Use { id, output }) => {
            commands::template_use(&data_dir, &id, &output).await
        }
        Command::Settings(SettingsCommand::Logo { image, clear }) => {
            let image = if clear { None } else { image };
            commands::set_logo(&data_dir, image.as_deref()).await
        }
        Command::Settings(SettingsCommand::Theme { theme }) => {
            commands::set_theme(&data_dir, &theme)
        }
    }
}
