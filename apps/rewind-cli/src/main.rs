use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rewind_common::Snapshot;
use rewind_diff::Diff;
use rewind_record::Versioned;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rewind-cli", about = "CLI tool for versioned records")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version info
    Info,
    /// Apply a script of operations to a record and print the result
    Run {
        /// Initial value as a JSON object
        #[arg(short, long, default_value = "{}")]
        initial: String,
        /// Operations: `set:key=<json>`, `del:key`, `undo[:n]`, `redo[:n]`
        ops: Vec<String>,
    },
    /// Print the diff between two JSON objects
    Diff {
        /// Object before the change
        before: String,
        /// Object after the change
        after: String,
    },
}

/// One scripted operation for `run`.
#[derive(Debug, PartialEq)]
enum Op {
    Set(String, Value),
    Del(String),
    Undo(usize),
    Redo(usize),
}

fn parse_op(raw: &str) -> anyhow::Result<Op> {
    let (verb, arg) = raw.split_once(':').unwrap_or((raw, ""));
    match verb {
        "set" => {
            let Some((key, value)) = arg.split_once('=') else {
                bail!("expected `set:key=<json>`, got `{raw}`");
            };
            let value: Value = serde_json::from_str(value)
                .with_context(|| format!("invalid JSON value in `{raw}`"))?;
            Ok(Op::Set(key.to_string(), value))
        }
        "del" if !arg.is_empty() => Ok(Op::Del(arg.to_string())),
        "undo" => Ok(Op::Undo(parse_steps(arg)?)),
        "redo" => Ok(Op::Redo(parse_steps(arg)?)),
        _ => bail!("unknown operation `{raw}`"),
    }
}

fn parse_steps(arg: &str) -> anyhow::Result<usize> {
    if arg.is_empty() {
        return Ok(1);
    }
    arg.parse().with_context(|| format!("invalid step count `{arg}`"))
}

fn parse_object(raw: &str) -> anyhow::Result<Snapshot> {
    match serde_json::from_str::<Value>(raw).with_context(|| format!("invalid JSON `{raw}`"))? {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, got `{other}`"),
    }
}

fn run(initial: &str, ops: &[String]) -> anyhow::Result<Versioned> {
    let value: Value = serde_json::from_str(initial).context("invalid initial JSON")?;
    let mut record = Versioned::new(value)?;

    for raw in ops {
        match parse_op(raw)? {
            Op::Set(key, value) => {
                record.set(key, value)?;
            }
            Op::Del(key) => {
                record.remove(&key)?;
            }
            Op::Undo(n) => {
                let moved = record.undo(n);
                tracing::info!(requested = n, moved, "undo");
            }
            Op::Redo(n) => {
                let moved = record.redo(n);
                tracing::info!(requested = n, moved, "redo");
            }
        }
    }
    Ok(record)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("rewind-cli v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Run { initial, ops } => {
            let record = run(&initial, &ops)?;
            println!("index: {} of {}", record.index(), record.len() - 1);
            println!(
                "current: {}",
                serde_json::to_string(&Value::Object(record.snapshot().clone()))?
            );
            println!("history:");
            for (i, snapshot) in record.history(None).into_iter().enumerate() {
                let marker = if i == record.index() { "*" } else { " " };
                println!(
                    "{marker} {i:>3} {}",
                    serde_json::to_string(&Value::Object(snapshot))?
                );
            }
        }
        Commands::Diff { before, after } => {
            let diff = Diff::compute(&parse_object(&before)?, &parse_object(&after)?);
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_operations() {
        assert_eq!(
            parse_op("set:value=\"Hello Sam\"").unwrap(),
            Op::Set("value".into(), json!("Hello Sam"))
        );
        assert_eq!(
            parse_op("set:b={\"c\":2}").unwrap(),
            Op::Set("b".into(), json!({ "c": 2 }))
        );
        assert_eq!(parse_op("del:b").unwrap(), Op::Del("b".into()));
        assert_eq!(parse_op("undo").unwrap(), Op::Undo(1));
        assert_eq!(parse_op("redo:3").unwrap(), Op::Redo(3));
    }

    #[test]
    fn rejects_bad_operations() {
        assert!(parse_op("set:novalue").is_err());
        assert!(parse_op("set:a=not json").is_err());
        assert!(parse_op("undo:x").is_err());
        assert!(parse_op("del").is_err());
        assert!(parse_op("jump:2").is_err());
    }

    #[test]
    fn run_applies_script() {
        let ops: Vec<String> = ["set:value=\"Sam\"", "set:value=\"David\"", "undo", "set:x=1"]
            .into_iter()
            .map(String::from)
            .collect();
        let record = run(r#"{"value":"Hello"}"#, &ops).unwrap();
        assert_eq!(record.index(), 2);
        assert_eq!(record.get("value"), Some(&json!("Sam")));
        assert_eq!(record.get("x"), Some(&json!(1)));
    }

    #[test]
    fn run_rejects_non_object_initial() {
        assert!(run("[1, 2]", &[]).is_err());
    }

    #[test]
    fn run_rejects_reserved_initial_key() {
        assert!(run(r#"{"$$index": 7}"#, &[]).is_err());
    }
}
