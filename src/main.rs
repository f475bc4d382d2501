use clap::{Parser, Subcommand, builder::styling};
use entity_source::cli::{self, ExportOptions};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Entity Source: read entities of one type from a repository and feed them to a migration as flat rows
#[derive(Parser)]
#[command(name = "entsrc", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// Repository directory holding types/ and entities/ (default: $ENTSRC_REPOSITORY or .)
    #[arg(short, long, global = true)]
    repository: Option<String>,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the base fields of the migration's entity type
    Fields {
        /// Migration file (.yml, .yaml, .json or .json5)
        migration: PathBuf,
    },

    /// Show the identity keys configured for the migration
    Keys {
        /// Migration file (.yml, .yaml, .json or .json5)
        migration: PathBuf,
    },

    /// Count the rows the migration's source would produce
    Count {
        /// Migration file (.yml, .yaml, .json or .json5)
        migration: PathBuf,
    },

    /// Check that the entity type resolves and every key is one of its fields
    Check {
        /// Migration file (.yml, .yaml, .json or .json5)
        migration: PathBuf,
    },

    /// Export every row of the migration's source as NDJSON
    Export {
        /// Migration file (.yml, .yaml, .json or .json5)
        migration: PathBuf,

        /// NDJSON file to write (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field to drop from every row (repeatable)
        #[arg(short, long)]
        drop: Vec<String>,

        /// Drop revision bookkeeping fields (revision_id, revision_user, changed, ...)
        #[arg(long)]
        drop_revision: bool,

        /// Validate keys against the entity type before exporting
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    if let Err(e) = dotenvy::from_filename(&args.env)
        && !e.not_found()
    {
        return Err(e.into());
    }

    let log_level = match args.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let repository = cli::repository_dir(args.repository.as_deref());
    log::debug!("Using repository {}", repository.display());

    match args.command {
        Commands::Fields { migration } => {
            let fields = cli::describe_fields(&migration, &repository)?;
            for (name, text) in fields.iter() {
                println!("{} {}", name.green(), text.bright_black());
            }
            log::info!("{} field(s)", fields.len());
        }
        Commands::Keys { migration } => {
            let keys = cli::identity_keys(&migration, &repository)?;
            for (name, info) in &keys {
                println!("{} {}", name.green(), info.bright_black());
            }
        }
        Commands::Count { migration } => {
            let count = cli::count_rows(&migration, &repository)?;
            println!("{}", count.cyan());
        }
        Commands::Check { migration } => {
            let label = cli::check(&migration, &repository)?;
            println!("{} {}", "✓".green(), label);
        }
        Commands::Export {
            migration,
            output,
            drop,
            drop_revision,
            strict,
        } => {
            log::info!(
                "Exporting {} from {}",
                migration.display().bright_black(),
                repository.display().bright_black()
            );
            cli::export(
                &migration,
                &repository,
                ExportOptions {
                    output,
                    drop,
                    drop_revision,
                    strict,
                },
            )
            .await?;
        }
    }

    Ok(())
}
