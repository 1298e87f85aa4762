//! Maintenance commands for the directory's order numbers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use migration::MigratorTrait;
use tracing::{error, info};
use uuid::Uuid;

use service::ordering::OrderingPolicy;
use service::{category_service, contact_service, store_service};

#[derive(Parser, Debug)]
#[command(name = "ordering-admin")]
#[command(about = "Migrate the directory schema and renumber ordered tables")]
struct Args {
    /// Emit JSON logs
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations
    Migrate,
    /// Renumber site contacts to 1..N
    ReindexContacts,
    /// Renumber the stores of one category to 1..N
    ReindexCategory { category_id: Uuid },
    /// Renumber categories to 1..N
    ReindexCategories,
}

async fn run(command: Command) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_and_validate()?;
    let policy = OrderingPolicy::from(&cfg.ordering);
    let db = models::db::connect_with_config(&cfg.database).await?;

    match command {
        Command::Migrate => {
            migration::Migrator::up(&db, None).await?;
            info!(event = "migrated", "schema up to date");
        }
        Command::ReindexContacts => {
            let layout = contact_service::reindex_contacts(&db, &policy).await?;
            info!(event = "reindexed", table = "site_contact", rows = layout.len(), "contacts renumbered");
        }
        Command::ReindexCategory { category_id } => {
            let layout = store_service::compact_category_stores(&db, &policy, category_id).await?;
            info!(event = "reindexed", table = "store", %category_id, rows = layout.len(), "stores renumbered");
        }
        Command::ReindexCategories => {
            let layout = category_service::reindex_categories(&db, &policy).await?;
            info!(event = "reindexed", table = "category", rows = layout.len(), "categories renumbered");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    if args.json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(args.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "command_failed", error = %e, "ordering-admin failed");
            ExitCode::FAILURE
        }
    }
}
