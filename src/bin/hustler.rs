//! Hustler ledger CLI

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use hustler_ledger::{config, FileStore, HustlerLedger, LedgerError, Notice, ProductForm};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hustler", about = "Record and list product sales", long_about = None)]
struct Cli {
    /// Directory holding the stored product list
    #[arg(long, global = true, env = config::STORE_DIR_ENV)]
    store_dir: Option<PathBuf>,

    /// Slot the product list is stored under
    #[arg(long, global = true, default_value = config::DEFAULT_SLOT)]
    slot: String,

    /// Largest quantity a single `add` may create
    #[arg(long, global = true, default_value_t = config::DEFAULT_MAX_QUANTITY)]
    max_quantity: u32,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add one or more identical sale records
    Add(AddArgs),
    /// List records, optionally filtered by a search term
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Delete a record by id
    Remove { id: i64 },
    /// Change a record in place
    Edit {
        id: i64,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete every record
    Clear {
        /// Confirm deleting all products
        #[arg(long)]
        yes: bool,
    },
    /// Show the record count and total amount
    Stats,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long)]
    buyer: String,
    #[arg(long, default_value = "1")]
    quantity: String,
    /// Order date as YYYY-MM-DD; defaults to today
    #[arg(long)]
    date: Option<String>,
}

#[derive(Debug, Args)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    buyer: Option<String>,
    #[arg(long)]
    date: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli) {
        eprintln!("{}", Notice::error(error.to_string()));
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("hustler_ledger={default_level},hustler={default_level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), LedgerError> {
    let mut builder = HustlerLedger::builder()
        .slot(cli.slot)
        .max_quantity(cli.max_quantity);
    if let Some(dir) = cli.store_dir {
        builder = builder.store_dir(dir);
    }
    let mut app = builder.build()?;

    if let Some(notice) = app.startup_notice() {
        eprintln!("{notice}");
    }

    match cli.command {
        Commands::Add(args) => {
            let form = ProductForm {
                name: args.name,
                price: args.price,
                category: args.category,
                buyer: args.buyer,
                quantity: args.quantity,
                order_date: args.date.unwrap_or_else(today),
            };
            println!("{}", app.submit(&form)?);
        }
        Commands::List { search } => println!("{}", app.render(&search)),
        Commands::Remove { id } => println!("{}", app.remove(id)),
        Commands::Edit { id, changes } => edit(&mut app, id, changes)?,
        Commands::Clear { yes } => {
            if !yes {
                return Err(LedgerError::InvalidArgument(
                    "refusing to delete all products without --yes".to_string(),
                ));
            }
            println!("{}", app.clear());
        }
        Commands::Stats => println!("{}", app.renderer().stats(&app.stats())),
    }

    Ok(())
}

fn edit(app: &mut HustlerLedger<FileStore>, id: i64, changes: EditArgs) -> Result<(), LedgerError> {
    let current = app
        .find(id)
        .ok_or_else(|| LedgerError::NotFound(format!("product {id}")))?;

    let mut form = ProductForm::from_record(current);
    if let Some(name) = changes.name {
        form.name = name;
    }
    if let Some(price) = changes.price {
        form.price = price;
    }
    if let Some(category) = changes.category {
        form.category = category;
    }
    if let Some(buyer) = changes.buyer {
        form.buyer = buyer;
    }
    if let Some(date) = changes.date {
        form.order_date = date;
    }

    println!("{}", app.update(id, &form)?);
    Ok(())
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
