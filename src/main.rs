use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use marketcart::cart::{CartItem, CartStore, NewCartItem};
use marketcart::logging::init_tracing;
use marketcart::storage::FileStorage;

#[derive(Parser)]
#[command(name = "marketcart", version, about = "Local persistent shopping cart")]
struct Cli {
    /// Storage directory for the persisted cart.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current cart.
    Show,
    /// Add a product to the cart, or bump its quantity if already present.
    Add {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Increase the quantity of a cart item by one.
    Increment { id: String },
    /// Decrease the quantity of a cart item by one, removing it at zero.
    Decrement { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let root = cli.data_dir.unwrap_or_else(FileStorage::default_root);
    let store = CartStore::open(FileStorage::new(root)).await;

    match cli.command {
        Command::Show => {}
        Command::Add {
            id,
            title,
            price,
            image_url,
        } => {
            store
                .add_to_cart(NewCartItem {
                    id,
                    title,
                    image_url,
                    price,
                })
                .await?;
        }
        Command::Increment { id } => store.increment(id).await?,
        Command::Decrement { id } => store.decrement(id).await?,
    }

    print_cart(&store.products());
    Ok(())
}

fn print_cart(items: &[CartItem]) {
    if items.is_empty() {
        println!("(cart is empty)");
        return;
    }
    for item in items {
        println!("{}", format_line(item));
    }
}

fn format_line(item: &CartItem) -> String {
    format!(
        "{:>3} x {}  @ {:.2}  [{}]",
        item.quantity, item.title, item.price, item.id
    )
}
