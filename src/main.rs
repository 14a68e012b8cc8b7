use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, error};
use uuid::Uuid;

use parcelnotes::config::Config;
use parcelnotes::store::{Database, NewParcel};
use parcelnotes::{default_parser, Lexicon, MessageParser};

#[derive(Parser)]
#[command(name = "parcelnotes")]
#[command(about = "Extract pickup codes from courier notifications and keep track of parcels")]
#[command(version = "0.1.0")]
struct Args {
    /// Lexicon file (TOML or JSON), overrides PARCEL_LEXICON_PATH
    #[arg(long, global = true)]
    lexicon: Option<String>,

    /// Check the configuration without connecting
    #[arg(long)]
    check_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a notification and print the result as JSON (no database)
    Parse {
        /// Notification text, read from stdin when omitted
        text: Option<String>,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

#[derive(Subcommand)]
enum StoreCommand {
    /// Parse a notification and store it as a pending parcel
    Add {
        /// Notification text, read from stdin when omitted
        text: Option<String>,
    },
    /// List stored parcels, newest first
    List,
    /// Mark a parcel as collected
    Collect { id: Uuid },
    /// Delete a parcel
    Delete { id: Uuid },
    /// Delete every collected parcel
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load the .env file if present
    dotenv::dotenv().ok();

    let args = Args::parse();

    env_logger::init();

    let mut config = Config::new()?;
    if args.lexicon.is_some() {
        config.lexicon_path = args.lexicon.clone();
    }

    if args.check_config {
        // Only report success once the lexicon file has loaded
        let lexicon = lexicon_summary(config.lexicon_path.as_deref())?;
        println!("✅ Configuration is valid!");
        println!("🗄️  Database: {}@{}:{}/{}",
                 config.database.username, config.database.host,
                 config.database.port, config.database.database);
        println!("📖 Lexicon: {}", lexicon);
        return Ok(());
    }

    let Some(command) = args.command else {
        anyhow::bail!("No command given, see --help");
    };

    let custom_parser;
    let parser: &MessageParser = match &config.lexicon_path {
        Some(path) => {
            custom_parser = MessageParser::new(&Lexicon::from_file(path)?)?;
            &custom_parser
        }
        None => default_parser(),
    };

    let command = match command {
        Command::Parse { text } => {
            let text = read_text(text.as_deref())?;
            let parsed = parser.parse(&text);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            return Ok(());
        }
        Command::Store(command) => command,
    };

    let database = Database::new(&config.database).await
        .context("Unable to initialize database")?;

    let result = run_store_command(&database, parser, command).await;
    if let Err(e) = &result {
        error!("❌ Command failed: {}", e);
    }

    database.close().await?;
    result
}

async fn run_store_command(
    database: &Database,
    parser: &MessageParser,
    command: StoreCommand,
) -> Result<()> {
    match command {
        StoreCommand::Add { text } => {
            let text = read_text(text.as_deref())?;
            let parsed = parser.parse(&text);
            if parsed.is_empty() {
                info!("Nothing recognized in the notification, storing raw text only");
            }
            let id = database.add_parcel(&NewParcel::from(parsed)).await?;
            println!("📦 Parcel stored: {}", id);
        }
        StoreCommand::List => {
            let parcels = database.get_all_parcels().await?;
            if parcels.is_empty() {
                println!("No parcels stored");
            }
            for parcel in parcels {
                println!("{}  [{}]  {}  {}  {}  ({})",
                         parcel.id, parcel.status, parcel.courier, parcel.code,
                         parcel.location, parcel.timestamp.format("%Y-%m-%d %H:%M"));
            }
        }
        StoreCommand::Collect { id } => {
            database.mark_collected(id).await?;
            println!("✅ Parcel {} collected", id);
        }
        StoreCommand::Delete { id } => {
            if database.delete_parcel(id).await? {
                println!("🗑️  Parcel {} deleted", id);
            } else {
                println!("⚠️  No parcel with id {}", id);
            }
        }
        StoreCommand::Purge => {
            let count = database.clear_collected().await?;
            println!("🧹 {} collected parcel(s) deleted", count);
        }
    }
    Ok(())
}

fn lexicon_summary(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            let lexicon = Lexicon::from_file(path)?;
            Ok(format!("{} ({} couriers)", path, lexicon.couriers.len()))
        }
        None => Ok("built-in".to_string()),
    }
}

fn read_text(text: Option<&str>) -> Result<String> {
    match text {
        Some(text) => Ok(text.to_string()),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Unable to read notification from stdin")?;
            Ok(buffer)
        }
    }
}
