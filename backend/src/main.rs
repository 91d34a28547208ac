//! Farm Ledger - command line entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farm_ledger::cli::{App, Cli};
use farm_ledger::store::{demo_data, Store};
use farm_ledger::{AppError, Config};

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let mut config = Config::load().map_err(AppError::from)?;
    let cli = Cli::parse();

    if let Some(data_file) = &cli.data_file {
        config.storage.data_file = data_file.clone();
    }

    tracing::debug!("Environment: {}", config.environment);

    let data_file = config.storage.data_file.clone();
    let initial = if config.storage.seed_demo_data && !data_file.exists() {
        tracing::info!("Seeding demo farm data");
        Some(demo_data(config.auth.bcrypt_cost)?)
    } else {
        None
    };
    let store = Store::open(&data_file, initial)?;

    let app = App::new(config, store);
    match app.run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(err) => {
            let detail = err.detail();
            tracing::error!(code = err.code(), message_pt = %detail.message_pt, "{}", err);
            Err(err.into())
        }
    }
}
