// tableside-client/src/bin/tableside.rs
// Command-line front end: browse the menu, send an order for a table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tableside_client::{ClientConfig, MenuItemId, OrderSession, TableId, logger};

#[derive(Parser, Debug)]
#[command(name = "tableside", about = "Table-side menu and ordering client")]
struct Cli {
    /// API base URL (defaults to TABLESIDE_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List menu items
    Menu {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Build a cart and submit it
    Order {
        #[arg(long)]
        table: String,
        /// Menu item id, once per unit
        #[arg(long = "item", required = true)]
        items: Vec<MenuItemId>,
        /// Line note as ID=TEXT
        #[arg(long = "note", value_parser = parse_note)]
        notes: Vec<(MenuItemId, String)>,
    },
}

fn parse_note(raw: &str) -> Result<(MenuItemId, String), String> {
    let (id, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=TEXT, got {raw:?}"))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid menu item id {id:?}"))?;
    Ok((id, text.to_string()))
}

fn parse_table(raw: &str) -> TableId {
    raw.parse::<i64>()
        .map(TableId::Number)
        .unwrap_or_else(|_| TableId::Name(raw.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(&cli.log_level, cli.json_logs)?;

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    let api = config.build_http_client()?;
    let mut session = OrderSession::new(api, config);

    session
        .load_catalog()
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;

    match cli.command {
        Command::Menu { category } => {
            let items = session
                .select_category(&category)
                .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;
            for item in items {
                println!("{:>4}  {:<28} {:>10}  [{}]", item.id, item.name, item.price, item.category);
            }
        }
        Command::Order { table, items, notes } => {
            for id in items {
                session
                    .add_item_by_id(id)
                    .with_context(|| format!("menu item {id} not found"))?;
            }
            for (id, note) in notes {
                session
                    .set_note(id, note)
                    .with_context(|| format!("no cart line for menu item {id}"))?;
            }
            for line in session.cart().lines() {
                println!("{} x{}  {}", line.name, line.quantity, line.note);
            }
            println!("Total: {}", session.total());

            let receipt = session
                .submit(parse_table(&table))
                .await
                .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;
            println!(
                "Order sent for table {}: {} items, total {}",
                receipt.table_id, receipt.item_count, receipt.total
            );
        }
    }

    Ok(())
}
