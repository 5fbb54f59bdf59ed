//! Runtime configuration.
//!
//! Layered lowest to highest: the optional TOML file, `STOREPULSE_*`
//! environment variables, then command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use storepulse_core::InflationPolicy;

/// Deserialised from `storepulse.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database holding the sales table.
  pub store_path:       PathBuf,
  /// CSV export to load; may also be given per command.
  #[serde(default)]
  pub input_file:       Option<PathBuf>,
  /// Also write log events to this file.
  #[serde(default)]
  pub log_file:         Option<PathBuf>,
  #[serde(default)]
  pub inflation_policy: InflationPolicy,
}

/// Build [`Settings`] from `config_path`, the environment and an optional
/// store path given on the command line.
pub fn load(config_path: &Path, store_override: Option<&Path>) -> anyhow::Result<Settings> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("STOREPULSE"))
    .set_override_option(
      "store_path",
      store_override.map(|p| p.to_string_lossy().into_owned()),
    )
    .context("invalid store path override")?
    .build()
    .with_context(|| format!("failed to read config file {}", config_path.display()))?;

  let mut settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings (is store_path set?)")?;

  settings.store_path = expand_tilde(&settings.store_path);
  settings.input_file = settings.input_file.as_deref().map(expand_tilde);
  settings.log_file = settings.log_file.as_deref().map(expand_tilde);
  Ok(settings)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
