//! studentctl - interactive student records over PostgreSQL
//!
//! Running `studentctl` with no arguments opens the menu-driven shell.
//! Subcommands cover the non-interactive chores:
//! - `schema`: create the students table if it is missing
//! - `export`: dump records as JSON, NDJSON or CSV, optionally filtered by keyword
//! - `completions`: shell completion scripts

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use studentctl_core::{MemoryStore, StudentStore};
use studentctl_db::{load_dotenv, Connector, DbConfig, StudentRepo};
use tracing::{debug, info};

mod console;
mod export;
mod shell;
mod tracing_setup;

use console::{Console, DEFAULT_MAX_ATTEMPTS};
use export::ExportFormat;
use shell::Shell;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "studentctl",
    author,
    version,
    about = "Manage student records stored in PostgreSQL",
    long_about = "Add, list, search, update and delete student records from an interactive \
                  menu. Connection settings come from DATABASE_URL or the STUDENTCTL_DB_* \
                  variables, optionally loaded from .env or ~/.studentctl/.env."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    /// PostgreSQL connection URL (overrides STUDENTCTL_DB_* settings)
    #[arg(
        long,
        global = true,
        env = "DATABASE_URL",
        hide_env_values = true,
        value_name = "URL"
    )]
    database_url: Option<String>,

    /// Keep records in memory only; nothing is persisted
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive menu (the default)
    Shell(ShellArgs),
    /// Create the students table if it does not exist
    Schema,
    /// Print every student record
    Export(ExportArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct ShellArgs {
    /// Create the students table before showing the menu
    #[arg(long)]
    init_schema: bool,

    /// Attempts allowed per numeric field before returning to the menu
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,
}

impl Default for ShellArgs {
    fn default() -> Self {
        Self {
            init_schema: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Only export records with a field containing this keyword (case-insensitive)
    #[arg(long, value_name = "KEYWORD")]
    search: Option<String>,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: ShellKind,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ShellKind {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Before parsing, so DATABASE_URL from .env feeds the clap env fallback
    let dotenv_files = load_dotenv();
    let mut cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    for path in &dotenv_files {
        debug!("Loaded environment from {}", path.display());
    }

    match cli.command.take() {
        None => run_shell(&cli, ShellArgs::default()).await,
        Some(Commands::Shell(args)) => run_shell(&cli, args).await,
        Some(Commands::Schema) => run_schema(&cli).await,
        Some(Commands::Export(args)) => run_export(&cli, args).await,
        Some(Commands::Completions(args)) => run_completions(args.shell),
    }
}

/// Build the store once, before any interaction starts
fn open_store(cli: &Cli) -> Result<Box<dyn StudentStore>> {
    if cli.ephemeral {
        info!("using in-memory store; records are discarded on exit");
        return Ok(Box::new(MemoryStore::new()));
    }

    let mut config = DbConfig::from_env().context("Invalid database configuration")?;
    if let Some(url) = &cli.database_url {
        config = config.with_url(url);
    }

    let connector =
        Connector::from_config(&config).context("Invalid database configuration")?;
    info!(
        db = %config.redacted_target(),
        mode = ?connector.mode(),
        "using postgres store"
    );

    Ok(Box::new(StudentRepo::new(connector)))
}

async fn run_shell(cli: &Cli, args: ShellArgs) -> Result<()> {
    let store = open_store(cli)?;

    if args.init_schema {
        store
            .ensure_schema()
            .await
            .context("Failed to create students table")?;
    }

    let console =
        Console::new(io::stdin().lock(), io::stdout()).with_max_attempts(args.max_attempts);
    let mut shell = Shell::new(store.as_ref(), console);
    shell.run().await.context("Console I/O failed")?;

    Ok(())
}

async fn run_schema(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    store
        .ensure_schema()
        .await
        .context("Failed to create students table")?;

    println!("Schema ready.");
    Ok(())
}

async fn run_export(cli: &Cli, args: ExportArgs) -> Result<()> {
    let store = open_store(cli)?;
    let mut students = store
        .list_all()
        .await
        .context("Failed to list students")?;

    if let Some(keyword) = &args.search {
        students.retain(|student| student.matches(keyword));
    }

    info!(count = students.len(), format = ?args.format, "exporting students");
    export::write_students(&students, args.format, io::stdout().lock())
}

fn run_completions(shell: ShellKind) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match shell {
        ShellKind::Bash => CompletionShell::Bash,
        ShellKind::Zsh => CompletionShell::Zsh,
        ShellKind::Fish => CompletionShell::Fish,
        ShellKind::PowerShell => CompletionShell::PowerShell,
        ShellKind::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
