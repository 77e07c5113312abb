//! `invx config`: inspect and edit the JSON settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use invx_core::models::config::InvxConfig;

use super::{build_parser, default_config_path};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective settings as JSON
    Show,

    /// Write a settings file filled with defaults
    Init(InitArgs),

    /// Print one setting by dotted key
    Get {
        /// Dotted key such as `batch.jobs`
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Dotted key
        key: String,
        /// New value (JSON, or a bare string)
        value: String,
    },

    /// Print where the settings file lives
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Write here instead of the settings path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<InvxConfig> {
    if path.exists() {
        Ok(InvxConfig::from_file(path)?)
    } else {
        Ok(InvxConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!("{} {} not found, using defaults", style("ℹ").blue(), path.display());
    }

    let config = read_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, default_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| default_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!("{} exists; pass --force to replace it", output_path.display());
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    InvxConfig::default().save(&output_path)?;

    println!("{} Wrote defaults to {}", style("✓").green(), output_path.display());

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_or_default(path)?)?;

    let value = key
        .split('.')
        .try_fold(&json, |current, part| current.get(part))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut json = serde_json::to_value(read_or_default(path)?)?;
    let parsed = parse_value(value);

    set_key(&mut json, key, parsed.clone())?;

    let config: InvxConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    // Refuse to save rules that would not compile
    build_parser(&config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        println!("{}", path.display());
    } else {
        println!(
            "{} {}",
            path.display(),
            style("(missing, `invx config init` creates it)").yellow()
        );
    }

    Ok(())
}

/// Interpret a command-line value as JSON, falling back to a plain string.
fn parse_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Set a dotted key inside a JSON object tree.
fn set_key(root: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = root;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    match current.as_object_mut() {
        Some(obj) => {
            obj.insert(last.to_string(), value);
            Ok(())
        }
        None => anyhow::bail!("Cannot set value at non-object path"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("8"), Value::from(8));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("out.csv"), Value::String("out.csv".to_string()));
    }

    #[test]
    fn test_set_key_nested() {
        let mut json = serde_json::to_value(InvxConfig::default()).unwrap();
        set_key(&mut json, "batch.jobs", Value::from(8)).unwrap();

        let config: InvxConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.batch.jobs, 8);
    }

    #[test]
    fn test_set_key_unknown_path() {
        let mut json = serde_json::to_value(InvxConfig::default()).unwrap();
        assert!(set_key(&mut json, "nope.jobs", Value::from(1)).is_err());
    }

    #[test]
    fn test_set_config_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        set_config(&path, "output.file_name", "out.csv").unwrap();

        let config = InvxConfig::from_file(&path).unwrap();
        assert_eq!(config.output.file_name, "out.csv");
        assert_eq!(config.batch.jobs, 4);
    }
}
