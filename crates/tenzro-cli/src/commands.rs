use anyhow::{bail, Context};
use colored::Colorize;
use tenzro_store::{Document, Store, StoreConfig};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = open_store(&cli)?;
    match cli.command {
        Command::Put(args) => cmd_put(&store, args),
        Command::Get(args) => cmd_get(&store, args, cli.format),
        Command::List => cmd_list(&store, cli.format),
        Command::Replicate(args) => cmd_replicate(&store, args, cli.format),
        Command::Clear => cmd_clear(&store),
    }
}

fn open_store(cli: &Cli) -> anyhow::Result<Store> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            StoreConfig::from_toml_str(&text)?
        }
        None => StoreConfig::default(),
    };
    debug!(
        dir = %cli.dir.display(),
        node_id = %cli.node,
        suffix = %config.suffix,
        "opening store"
    );
    Store::open_with_config(&cli.dir, cli.node.clone(), config)
        .with_context(|| format!("opening store in {}", cli.dir.display()))
}

fn cmd_put(store: &Store, args: PutArgs) -> anyhow::Result<()> {
    let document: Document =
        serde_json::from_str(&args.document).context("document is not valid JSON")?;
    let key = store.put(args.key, &document)?;
    println!("{} Stored {}", "✓".green().bold(), key.yellow());
    Ok(())
}

fn cmd_get(store: &Store, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let Some(document) = store.get(&args.key) else {
        bail!("key not found: {}", args.key);
    };
    let rendered = match format {
        OutputFormat::Text => serde_json::to_string_pretty(&document)?,
        OutputFormat::Json => serde_json::to_string(&document)?,
    };
    println!("{rendered}");
    Ok(())
}

fn cmd_list(store: &Store, format: OutputFormat) -> anyhow::Result<()> {
    let keys = store.keys();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&keys)?),
        OutputFormat::Text => {
            for key in &keys {
                println!("  {key}");
            }
            println!(
                "{} entries on node {}",
                keys.len().to_string().bold(),
                store.node_id().cyan()
            );
        }
    }
    Ok(())
}

fn cmd_replicate(store: &Store, args: ReplicateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = store
        .replicate_to(&args.target)
        .with_context(|| format!("replication to {} incomplete", args.target.display()))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Text => println!(
            "{} Replicated {} entries to {}",
            "✓".green().bold(),
            report.entries_written.to_string().bold(),
            report.target.display()
        ),
    }
    Ok(())
}

fn cmd_clear(store: &Store) -> anyhow::Result<()> {
    let removed = store.clear()?;
    println!("{} Removed {} entries", "✓".green().bold(), removed.to_string().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::path::Path;

    fn run(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
        let dir = dir.to_str().unwrap();
        let mut argv = vec!["tenzro", "--dir", dir];
        argv.extend_from_slice(args);
        run_command(Cli::parse_from(argv))
    }

    #[test]
    fn put_get_replicate_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("ledger_data");
        let follower = tmp.path().join("follower_data");

        run(&base, &["put", "tx_123", r#"{"payload":{"amount":100}}"#]).unwrap();
        run(&base, &["get", "tx_123"]).unwrap();
        run(&base, &["list", "--format", "json"]).unwrap();
        run(&base, &["replicate", follower.to_str().unwrap()]).unwrap();

        let store = Store::open(&follower, "follower").unwrap();
        assert_eq!(store.get("tx_123"), Some(json!({"payload": {"amount": 100}})));

        run(&base, &["clear"]).unwrap();
        assert!(run(&base, &["get", "tx_123"]).is_err());
    }

    #[test]
    fn put_rejects_invalid_json() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run(tmp.path(), &["put", "k", "{oops"]).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn config_file_selects_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("store.toml");
        std::fs::write(&config, "suffix = \".ledger\"\n").unwrap();
        let base = tmp.path().join("data");

        run(&base, &["--config", config.to_str().unwrap(), "put", "k", "1"]).unwrap();
        assert!(base.join("k.ledger").is_file());
    }
}
