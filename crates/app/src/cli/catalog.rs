use clap::{Args, Subcommand};
use shopfront::catalog::Catalog;
use shopfront_app::config::CatalogConfig;

use crate::cli::table;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    List(ListProductsArgs),
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    #[command(flatten)]
    catalog: CatalogConfig,

    /// Only list products in this category
    #[arg(long)]
    category: Option<String>,
}

pub(crate) fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list(&args),
    }
}

fn list(args: &ListProductsArgs) -> Result<(), String> {
    let catalog = Catalog::load(&args.catalog.catalog).map_err(|error| {
        format!(
            "failed to load catalog {}: {error}",
            args.catalog.catalog.display()
        )
    })?;

    let products = match &args.category {
        Some(category) => catalog.in_category(category),
        None => catalog.products(),
    };

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    let rows = products.into_iter().map(|product| {
        let stock = if product.in_stock() {
            product.total_inventory().to_string()
        } else {
            "sold out".to_string()
        };

        [
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            product.price.to_string(),
            stock,
        ]
    });

    println!(
        "{}",
        table::render(["ID", "Product", "Category", "Price", "Stock"], rows, 3)
    );

    Ok(())
}
