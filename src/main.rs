use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use family_funds::cli::{
    handle_cancel_command, handle_close_command, handle_export_command, handle_query_command,
    handle_report_command, CliContext, ExportArgs, QueryCommands, ReportCommands,
};
use family_funds::config::{paths::FundsPaths, settings::Settings};
use family_funds::logging::init_tracing;
use family_funds::models::AccrualMode;
use family_funds::storage::{file_io::json_file_valid, init::needs_initialization};

#[derive(Parser)]
#[command(
    name = "funds",
    version,
    about = "Shared family fund accruals and balances",
    long_about = "Computes how much each family owes toward shared collection goals \
                  (gifts, trips, class purchases) from declared participation and \
                  recorded payments, and reports per-family balances."
)]
struct Cli {
    /// Data directory (default: $FAMILY_FUNDS_DATA_DIR or the platform config dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read everything from a single JSON or YAML snapshot file instead
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommands),

    #[command(flatten)]
    Report(ReportCommands),

    /// Close an open goal, freezing the cap of a dynamic goal
    Close {
        /// Goal ID or label
        goal: String,
    },

    /// Cancel an open goal
    Cancel {
        /// Goal ID or label
        goal: String,
    },

    /// Export the whole snapshot
    Export(ExportArgs),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FundsPaths::resolve(cli.data_dir.as_deref())?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter, cli.verbose);

    let context = CliContext::new(paths.clone(), settings.clone(), cli.snapshot);

    match cli.command {
        Some(Commands::Query(cmd)) => handle_query_command(&context, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&context, cmd)?,
        Some(Commands::Close { goal }) => handle_close_command(&context, &goal)?,
        Some(Commands::Cancel { goal }) => handle_cancel_command(&context, &goal)?,
        Some(Commands::Export(args)) => handle_export_command(&context, args)?,
        Some(Commands::Init) => {
            println!("Initializing family-funds at: {}", paths.base_dir().display());
            let created = family_funds::storage::initialize_storage(&paths)?;
            println!("Initialization complete! ({} file(s) created)", created);
            println!();
            println!("Add families, goals, participation, payments and issue records to:");
            println!("  {}", paths.families_file().display());
            println!("  {}", paths.goals_file().display());
            println!("  {}", paths.participation_file().display());
            println!("  {}", paths.payments_file().display());
            println!("  {}", paths.issues_file().display());
        }
        Some(Commands::Config) => {
            println!("family-funds Configuration");
            println!("==========================");
            println!("Config file:    {}", paths.settings_file().display());
            println!("Data directory: {}", paths.data_dir().display());
            for file in [
                paths.families_file(),
                paths.goals_file(),
                paths.participation_file(),
                paths.payments_file(),
                paths.issues_file(),
            ] {
                let state = if !file.exists() {
                    "missing"
                } else if json_file_valid(&file) {
                    "ok"
                } else {
                    "invalid"
                };
                println!("  {:<40} {}", file.display(), state);
            }
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {:?}", settings.currency_symbol);
            println!("  Default status:   {}", settings.default_status_filter);
            println!("  Log filter:       {}", settings.log_filter);
            println!("  Mode aliases:");
            for (alias, canonical) in context.aliases.iter() {
                println!("    {} -> {}", alias, canonical);
            }
            println!();
            let modes: Vec<&str> = AccrualMode::ALL.iter().map(|m| m.as_str()).collect();
            println!("Accrual modes: {}", modes.join(", "));
        }
        None => {
            println!("family-funds - shared family fund accruals");
            println!();
            if needs_initialization(&paths) {
                println!("Run 'funds init' to create the data directory.");
            }
            println!("Run 'funds --help' for usage information.");
        }
    }

    Ok(())
}
