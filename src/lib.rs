pub mod cli;
pub mod core;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{AggregatorOptions, DateRange, ExpenseAggregator};
use crate::store::{ConfigGroupDirectory, CsvTransactionStore};
use anyhow::Result;
use tracing::{debug, info};

/// Group selection and output options shared by every report.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Group ids to analyze; empty means every configured group.
    pub groups: Vec<String>,
    pub date_range: Option<DateRange>,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Summary { member: String, query: Query },
    Members { query: Query },
    Categories { member: String, query: Query },
    ByGroup { member: String, query: Query },
    Monthly { member: String, query: Query },
}

impl AppCommand {
    fn query(&self) -> &Query {
        match self {
            AppCommand::Summary { query, .. }
            | AppCommand::Members { query }
            | AppCommand::Categories { query, .. }
            | AppCommand::ByGroup { query, .. }
            | AppCommand::Monthly { query, .. } => query,
        }
    }
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("splitledger starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let directory = ConfigGroupDirectory::new(&config)?;
    let store = CsvTransactionStore::new();
    let aggregator = ExpenseAggregator::new(&directory, &store).with_options(AggregatorOptions {
        strict_member_lookup: config.strict_member_lookup,
    });

    let query = command.query();
    let group_ids = if query.groups.is_empty() {
        config.group_ids()
    } else {
        query.groups.clone()
    };
    let range = query.date_range.as_ref();
    let json = query.json;
    let currency = config.currency_symbol.as_str();

    match &command {
        AppCommand::Summary { member, .. } => {
            cli::summary::run(&aggregator, &group_ids, member, range, json, currency)
        }
        AppCommand::Members { .. } => {
            cli::members::run(&aggregator, &group_ids, range, json, currency)
        }
        AppCommand::Categories { member, .. } => {
            cli::breakdown::run_categories(&aggregator, &group_ids, member, range, json, currency)
        }
        AppCommand::ByGroup { member, .. } => {
            cli::breakdown::run_by_group(&aggregator, &group_ids, member, range, json, currency)
        }
        AppCommand::Monthly { member, .. } => {
            cli::breakdown::run_monthly(&aggregator, &group_ids, member, range, json, currency)
        }
    }
}
