//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use invx_core::models::config::InvxConfig;
use invx_core::TemplateParser;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invx")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvxConfig> {
    if let Some(path) = config_path {
        return Ok(InvxConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(InvxConfig::from_file(&default_path)?)
    } else {
        Ok(InvxConfig::default())
    }
}

/// Build the field parser described by the configuration.
pub fn build_parser(config: &InvxConfig) -> anyhow::Result<TemplateParser> {
    Ok(TemplateParser::from_config(&config.extraction)?)
}

/// Drive `future` to completion on a fresh multi-threaded runtime.
///
/// Shutdown does not wait for blocking tasks. An extraction that outlived its
/// timeout is left behind and ends with the process.
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(future);
    runtime.shutdown_background();

    Ok(output)
}
