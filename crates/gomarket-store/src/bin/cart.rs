//! # Cart CLI
//!
//! Inspects and edits the persisted cart for development.
//!
//! ## Usage
//! ```bash
//! # Show the stored cart
//! cargo run -p gomarket-store --bin cart -- list
//!
//! # Add one unit of a product
//! cargo run -p gomarket-store --bin cart -- add a1 "Sneaker" https://img/a1.png 199.9
//!
//! # Change quantities
//! cargo run -p gomarket-store --bin cart -- inc a1
//! cargo run -p gomarket-store --bin cart -- dec a1
//!
//! # Use another database or config file
//! cargo run -p gomarket-store --bin cart -- --db ./dev.db list
//! cargo run -p gomarket-store --bin cart -- --config ./cart.toml list
//!
//! # Write the effective configuration to the config file
//! cargo run -p gomarket-store --bin cart -- --db ./dev.db init
//! ```
//!
//! Cart commands print the resulting cart as JSON on stdout. Logs go to
//! stderr (`RUST_LOG` to adjust).

use std::env;
use std::path::PathBuf;

use gomarket_core::ProductInput;
use gomarket_store::logging::init_tracing;
use gomarket_store::{CartConfig, CartProvider};

/// A parsed cart command.
#[derive(Debug, PartialEq)]
enum Command {
    List,
    Add(ProductInput),
    Inc(String),
    Dec(String),
    /// Write the effective configuration to the config file.
    Init,
}

/// Everything given on the command line.
#[derive(Debug, PartialEq)]
struct Options {
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    command: Command,
}

fn print_usage() {
    println!("GoMarket Cart");
    println!();
    println!("Usage: cart [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  list                           Show the cart");
    println!("  add <ID> <TITLE> <IMAGE_URL> <PRICE>");
    println!("                                 Add one unit of a product");
    println!("  inc <ID>                       Add one unit of an item in the cart");
    println!("  dec <ID>                       Remove one unit of an item in the cart");
    println!("  init                           Write the effective config to the config file");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>        Database file path (overrides config)");
    println!("  -c, --config <PATH>    Config file path (default: platform config dir)");
    println!("  -h, --help             Show this help message");
}

fn parse_command(words: &[String]) -> Result<Command, String> {
    match words {
        [cmd] if cmd == "list" => Ok(Command::List),
        [cmd] if cmd == "init" => Ok(Command::Init),
        [cmd, id, title, image_url, price] if cmd == "add" => {
            let price: f64 = price
                .parse()
                .map_err(|_| format!("invalid price '{}'", price))?;
            Ok(Command::Add(ProductInput::new(
                id.as_str(),
                title.as_str(),
                image_url.as_str(),
                price,
            )))
        }
        [cmd, id] if cmd == "inc" => Ok(Command::Inc(id.clone())),
        [cmd, id] if cmd == "dec" => Ok(Command::Dec(id.clone())),
        [] => Err("missing command".to_string()),
        _ => Err(format!("unrecognized command: {}", words.join(" "))),
    }
}

/// Parses arguments (without the program name). `Ok(None)` means help.
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut words = Vec::new();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                let value = args.next().ok_or_else(|| format!("{} needs a path", arg))?;
                db_path = Some(PathBuf::from(value));
            }
            "--config" | "-c" => {
                let value = args.next().ok_or_else(|| format!("{} needs a path", arg))?;
                config_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Ok(None),
            word => words.push(word.to_string()),
        }
    }

    Ok(Some(Options {
        db_path,
        config_path,
        command: parse_command(&words)?,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let mut config = CartConfig::load(options.config_path.clone())?;
    if let Some(path) = options.db_path {
        config.storage.database_path = path;
    }

    if options.command == Command::Init {
        config.save(options.config_path)?;
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let provider = CartProvider::open(&config).await?;
    let cart = provider.handle();

    let items = match options.command {
        Command::List | Command::Init => cart.products(),
        Command::Add(product) => cart.add_to_cart(product),
        Command::Inc(id) => cart.increment(&id),
        Command::Dec(id) => cart.decrement(&id),
    };

    provider.unmount().await?;

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_list_with_options() {
        let options = parse_args(&args("--db ./dev.db -c ./cart.toml list"))
            .unwrap()
            .unwrap();

        assert_eq!(options.db_path, Some(PathBuf::from("./dev.db")));
        assert_eq!(options.config_path, Some(PathBuf::from("./cart.toml")));
        assert_eq!(options.command, Command::List);
    }

    #[test]
    fn test_parse_add() {
        let options = parse_args(&args("add a1 Sneaker https://img/a1.png 199.9"))
            .unwrap()
            .unwrap();

        assert_eq!(
            options.command,
            Command::Add(ProductInput::new("a1", "Sneaker", "https://img/a1.png", 199.9))
        );
    }

    #[test]
    fn test_parse_inc_dec_init() {
        assert_eq!(
            parse_command(&args("inc a")).unwrap(),
            Command::Inc("a".into())
        );
        assert_eq!(
            parse_command(&args("dec a")).unwrap(),
            Command::Dec("a".into())
        );
        assert_eq!(parse_command(&args("init")).unwrap(), Command::Init);
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_args(&args("list --help")).unwrap(), None);
    }

    #[test]
    fn test_option_without_value_is_an_error() {
        assert!(parse_args(&args("list --db")).unwrap_err().contains("--db"));
        assert!(parse_args(&args("list -c")).unwrap_err().contains("-c"));
    }

    #[test]
    fn test_bad_commands() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_command(&args("add a1 Sneaker img cheap"))
            .unwrap_err()
            .contains("invalid price"));
        assert!(parse_command(&args("inc")).is_err());
        assert!(parse_command(&args("remove a")).is_err());
    }
}
