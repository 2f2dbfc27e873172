use clap::Parser;
use tracing::debug;

use cosi_broker::adapter::inbound::cli::command::{Cli, Commands};
use cosi_broker::adapter::inbound::cli::output::{self, OutputMode};
use cosi_broker::adapter::inbound::cli::{list, select, show};
use cosi_broker::error::Result;
use cosi_broker::infrastructure::bootstrap::build_selector;
use cosi_broker::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli.color.apply();
    output::configure(OutputMode::from_flags(cli.json, cli.quiet));

    if let Err(e) = run(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?.with_overrides(cli.broker, cli.broker_type)?;
    config
        .logging
        .clone()
        .with_verbosity(cli.quiet, cli.verbose)
        .init();
    debug!(config = %cli.config.display(), "Configuration loaded");

    let selector = build_selector(&config)?;

    match cli.command {
        Commands::Default(args) => select::execute(&selector, &args.check_types).await,
        Commands::Show(args) => show::execute(selector.cache(), &args.broker_id).await,
        Commands::List => list::execute(selector.cache()).await,
    }
}
