use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use strata_core::{Config, SkipList};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Skip list playground")]
struct Cli {
    /// JSON file with `max_level`, `probability` and `seed`; missing fields use defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for level generation; omit for a random seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true)]
    max_level: Option<usize>,

    #[arg(long, global = true)]
    probability: Option<f64>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Repl,

    Demo {
        #[arg(short, long, default_value_t = 1000)]
        count: usize,

        #[arg(short, long, value_enum, default_value_t = Order::Shuffled)]
        order: Order,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
    Ascending,
    Descending,
    Shuffled,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = build_config(&cli)?;
    let list = SkipList::with_config(config.clone()).context("Failed to build skip list")?;
    info!(?config, "skip list ready");

    match cli.command {
        Commands::Repl => run_repl(list),
        Commands::Demo { count, order } => run_demo(list, count, order, config.seed),
    }
}

fn build_config(cli: &Cli) -> Result<Config> {
    let base = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    Ok(apply_overrides(base, cli.seed, cli.max_level, cli.probability))
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn parse_config(text: &str) -> Result<Config> {
    Ok(serde_json::from_str(text)?)
}

/// Command-line flags win over the config file.
fn apply_overrides(
    mut config: Config,
    seed: Option<u64>,
    max_level: Option<usize>,
    probability: Option<f64>,
) -> Config {
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(max_level) = max_level {
        config = config.with_max_level(max_level);
    }
    if let Some(probability) = probability {
        config = config.with_probability(probability);
    }
    config
}

fn run_repl(mut list: SkipList) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Strata REPL");
    println!("Commands: insert <key> <value>, search <key>, delete <key>, show, stats [--json], check, len, clear, quit");
    println!();

    loop {
        let readline = rl.readline("strata> ");

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                if line == "quit" || line == "exit" {
                    break;
                }

                if let Err(e) = handle_command(&mut list, line) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    println!("Goodbye");
    Ok(())
}

fn handle_command(list: &mut SkipList, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(());
    }

    match parts[0] {
        "insert" | "put" => {
            if parts.len() < 3 {
                anyhow::bail!("Usage: insert <key> <value>");
            }

            let value = parts[2..].join(" ");
            match list.insert(parts[1], value) {
                Some(old) => println!("OK (replaced {})", old),
                None => println!("OK"),
            }
        }

        "search" | "get" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: search <key>");
            }

            println!("{}", list.search(parts[1])?);
        }

        "delete" | "del" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: delete <key>");
            }

            let value = list.delete(parts[1])?;
            println!("OK (was {})", value);
        }

        "show" => {
            print!("{}", list);
        }

        "stats" => match parts.get(1) {
            None => print!("{}", list.stats()),
            Some(&"--json") => println!("{}", serde_json::to_string_pretty(&list.stats())?),
            Some(_) => anyhow::bail!("Usage: stats [--json]"),
        },

        "check" => match list.check_invariants() {
            Ok(()) => println!("OK"),
            Err(msg) => anyhow::bail!("Invariant violated: {}", msg),
        },

        "len" => {
            println!("{}", list.len());
        }

        "clear" => {
            list.clear();
            println!("OK");
        }

        _ => {
            anyhow::bail!("Unknown command: {}", parts[0]);
        }
    }

    Ok(())
}

fn run_demo(mut list: SkipList, count: usize, order: Order, seed: Option<u64>) -> Result<()> {
    let mut keys: Vec<String> = (0..count).map(|i| i.to_string()).collect();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match order {
        Order::Ascending => {}
        Order::Descending => keys.reverse(),
        Order::Shuffled => keys.shuffle(&mut rng),
    }

    println!("Inserting {} keys ({:?})", count, order);
    let start = Instant::now();
    for key in &keys {
        list.insert(key.as_str(), key.as_str());
    }
    println!("  done in {:?}", start.elapsed());
    print!("{}", list.stats());

    println!("Searching every key");
    let start = Instant::now();
    for key in &keys {
        let value = list
            .search(key)
            .with_context(|| format!("Lost key {} after insert", key))?;
        if value != key {
            anyhow::bail!("Key {} maps to {}", key, value);
        }
    }
    println!("  done in {:?}", start.elapsed());

    list.check_invariants()
        .map_err(|msg| anyhow::anyhow!("Invariant violated: {}", msg))?;

    println!("Deleting every key");
    keys.shuffle(&mut rng);
    let start = Instant::now();
    for key in &keys {
        list.delete(key)
            .with_context(|| format!("Failed to delete {}", key))?;
    }
    println!("  done in {:?}", start.elapsed());

    if !list.is_empty() {
        anyhow::bail!("List still holds {} entries", list.len());
    }
    println!("List is empty again ({} level)", list.num_levels());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> SkipList {
        SkipList::with_seed(1)
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config = parse_config(r#"{ "probability": 0.5 }"#).unwrap();
        assert_eq!(config, Config::new().with_probability(0.5));
    }

    #[test]
    fn test_malformed_config_rejected() {
        assert!(parse_config("max_level = 4").is_err());
        assert!(parse_config(r#"{ "max_level": "four" }"#).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = parse_config(r#"{ "max_level": 8, "seed": 1 }"#).unwrap();
        let config = apply_overrides(file, Some(2), None, Some(0.5));
        assert_eq!(
            config,
            Config::new().with_max_level(8).with_seed(2).with_probability(0.5)
        );
    }

    #[test]
    fn test_repl_commands() {
        let mut list = list();
        handle_command(&mut list, "insert a hello world").unwrap();
        assert_eq!(list.search("a"), Ok("hello world"));

        handle_command(&mut list, "put a again").unwrap();
        assert_eq!(list.search("a"), Ok("again"));

        assert!(handle_command(&mut list, "search missing").is_err());
        assert!(handle_command(&mut list, "delete missing").is_err());
        handle_command(&mut list, "stats --json").unwrap();
        assert!(handle_command(&mut list, "stats --yaml").is_err());
        handle_command(&mut list, "check").unwrap();

        handle_command(&mut list, "clear").unwrap();
        assert!(list.is_empty());
        assert!(handle_command(&mut list, "frobnicate").is_err());
    }

    #[test]
    fn test_demo_empties_list() {
        let list = SkipList::with_config(Config::new().with_seed(4)).unwrap();
        run_demo(list, 200, Order::Shuffled, Some(4)).unwrap();
    }
}
