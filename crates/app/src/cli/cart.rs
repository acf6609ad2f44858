use std::sync::Arc;

use clap::{Args, Subcommand};
use rusty_money::Money;
use shopfront::{catalog::Catalog, history::History, ledger::CartLedger};
use shopfront_app::{
    auth::{Credentials, RestAuthProvider},
    config::{BackendConfig, CatalogConfig, SyncConfig},
    persistence::RestPersistence,
    storefront::{Notification, Storefront},
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cli::table;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Sign in and show the mirrored cart
    Show(AccountArgs),

    /// Create an account with an empty mirrored cart
    SignUp(AccountArgs),
}

#[derive(Debug, Args)]
struct AccountArgs {
    #[command(flatten)]
    backend: BackendConfig,

    #[command(flatten)]
    sync: SyncConfig,

    #[command(flatten)]
    catalog: CatalogConfig,

    /// Account email
    #[arg(long, env = "SHOPFRONT_EMAIL")]
    email: String,

    /// Account password
    #[arg(long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show(args).await,
        CartSubcommand::SignUp(args) => sign_up(args).await,
    }
}

fn storefront(args: &AccountArgs) -> Result<(Storefront, UnboundedReceiver<Notification>), String> {
    let catalog = Catalog::load(&args.catalog.catalog).map_err(|error| {
        format!(
            "failed to load catalog {}: {error}",
            args.catalog.catalog.display()
        )
    })?;

    let ledger = catalog
        .ledger(History::with_depth(args.sync.history_depth))
        .map_err(|error| format!("failed to build ledger: {error}"))?;

    Ok(Storefront::new(
        ledger,
        Arc::new(RestAuthProvider::new(&args.backend)),
        Arc::new(RestPersistence::new(&args.backend)),
        args.sync.debounce(),
    ))
}

async fn show(args: AccountArgs) -> Result<(), String> {
    let (mut storefront, mut notifications) = storefront(&args)?;
    let credentials = Credentials::new(args.email, args.password);

    let user = storefront
        .sign_in(&credentials)
        .await
        .map_err(|error| format!("failed to sign in: {error}"))?;

    while let Ok(notification) = notifications.try_recv() {
        match notification {
            Notification::CartRestored { dropped, .. } if !dropped.is_empty() => {
                let ids: Vec<String> = dropped.iter().map(ToString::to_string).collect();
                println!("no longer in stock: {}", ids.join(", "));
            }
            Notification::SyncFailed(error) => println!("could not load saved state: {error}"),
            _ => {}
        }
    }

    println!("signed in as {}", user.email);

    print_ledger(storefront.ledger())?;

    storefront
        .sign_out()
        .await
        .map_err(|error| format!("failed to sign out: {error}"))
}

async fn sign_up(args: AccountArgs) -> Result<(), String> {
    let (mut storefront, _notifications) = storefront(&args)?;
    let credentials = Credentials::new(args.email, args.password);

    let user = storefront
        .sign_up(&credentials)
        .await
        .map_err(|error| format!("failed to sign up: {error}"))?;

    storefront
        .sign_out()
        .await
        .map_err(|error| format!("failed to sign out: {error}"))?;

    println!("user_id: {}", user.id);
    println!("email: {}", user.email);

    Ok(())
}

fn print_ledger(ledger: &CartLedger) -> Result<(), String> {
    if ledger.cart().is_empty() {
        println!("cart is empty");
    } else {
        let rows = ledger.cart().iter().map(|item| {
            let line_total = item
                .line_total_minor()
                .map_or_else(
                    || "overflow".to_string(),
                    |total| Money::from_minor(total, ledger.currency()).to_string(),
                );

            [
                item.product.to_string(),
                item.variant.clone().unwrap_or_default(),
                item.quantity.to_string(),
                item.unit_price.to_string(),
                line_total,
            ]
        });

        println!(
            "{}",
            table::render(["Product", "Variant", "Qty", "Unit", "Total"], rows, 2)
        );

        let subtotal = ledger
            .subtotal()
            .map_err(|error| format!("failed to total cart: {error}"))?;

        println!("subtotal: {subtotal}");
    }

    for saved in ledger.saved_carts() {
        println!(
            "saved cart: {} ({} items, saved {})",
            saved.name,
            saved.items().len(),
            saved.created_at
        );
    }

    for entry in ledger.watch_list().iter() {
        println!("watching: {} ({})", entry.display_name, entry.product);
    }

    println!("orders placed: {}", ledger.orders().len());

    Ok(())
}
