//! Главный исполняемый файл grantplan

use anyhow::Result;
use grantplan::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::init();
    let config = cli.load_config()?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    cli.execute(&config)
}
