use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use splitledger::core::DateRange;
use splitledger::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct QueryArgs {
    /// Group id to include; repeat for several (default: all configured groups)
    #[arg(short, long = "group")]
    groups: Vec<String>,

    /// Inclusive date range, e.g. 2024-01-01..2024-03-31
    #[arg(short, long)]
    range: Option<DateRange>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl From<QueryArgs> for splitledger::Query {
    fn from(args: QueryArgs) -> Self {
        splitledger::Query {
            groups: args.groups,
            date_range: args.range,
            json: args.json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display a member's totals and transactions
    Summary {
        /// Member name, exactly as it appears in the exports
        #[arg(short, long)]
        member: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Display totals for every member of the selected groups
    Members {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Display a member's expenses by category
    Categories {
        #[arg(short, long)]
        member: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Display a member's expenses by group
    ByGroup {
        #[arg(short, long)]
        member: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Display a member's expenses by month
    Monthly {
        #[arg(short, long)]
        member: String,
        #[command(flatten)]
        query: QueryArgs,
    },
}

impl From<Commands> for splitledger::AppCommand {
    fn from(cmd: Commands) -> splitledger::AppCommand {
        use splitledger::AppCommand;
        match cmd {
            Commands::Summary { member, query } => AppCommand::Summary {
                member,
                query: query.into(),
            },
            Commands::Members { query } => AppCommand::Members {
                query: query.into(),
            },
            Commands::Categories { member, query } => AppCommand::Categories {
                member,
                query: query.into(),
            },
            Commands::ByGroup { member, query } => AppCommand::ByGroup {
                member,
                query: query.into(),
            },
            Commands::Monthly { member, query } => AppCommand::Monthly {
                member,
                query: query.into(),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => splitledger::cli::setup::setup(),
        Some(cmd) => splitledger::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
