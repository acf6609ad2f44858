use clap::{Parser, Subcommand};
use shopfront_app::{config::LoggingConfig, observability};

mod cart;
mod catalog;
mod table;

#[derive(Debug, Parser)]
#[command(name = "shopfront", about = "Shopfront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Cart(cart::CartCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Catalog(command) => catalog::run(command),
            Commands::Cart(command) => cart::run(command).await,
        }
    }
}
