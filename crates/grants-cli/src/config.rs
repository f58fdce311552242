// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use grants_data::GrantSource;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub browser: Browser,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            browser: Browser::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Browser {
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("GRANTS_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set GRANTS_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(grants_data::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no `version`; add `version = 1` and put values under [data], [browser], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(data_path) = &self.data.path {
            grants_data::validate_data_path(data_path)
                .with_context(|| format!("invalid data.path in {}", path.display()))?;
        }

        if let Some(command) = &self.browser.command
            && command.trim().is_empty()
        {
            bail!(
                "browser.command in {} is empty; remove it to use the system opener",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level {level:?} in {} is not a valid filter; use error, warn, info, debug, or trace",
                    path.display()
                )
            })?;
        }

        if let Some(file) = &self.log.file
            && file.trim().is_empty()
        {
            bail!("log.file in {} must not be empty", path.display());
        }

        Ok(())
    }

    /// Dataset location from `[data].path`, then `GRANTS_DATA_PATH`, then the
    /// bundled copy.
    pub fn data_source(&self) -> Result<GrantSource> {
        if let Some(path) = &self.data.path {
            return Ok(GrantSource::File(PathBuf::from(path)));
        }

        if let Some(path) = grants_data::env_dataset_path() {
            let raw = path.to_string_lossy();
            grants_data::validate_data_path(&raw).context("invalid GRANTS_DATA_PATH")?;
            return Ok(GrantSource::File(path));
        }

        Ok(GrantSource::Bundled)
    }

    pub fn browser_command(&self) -> Option<&str> {
        self.browser.command.as_deref().map(str::trim)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(file) => Ok(PathBuf::from(file)),
            None => grants_data::default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# grants config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. Default is the dataset built into the binary.\n# path = \"/absolute/path/to/grants.toml\"\n\n[browser]\n# Optional. Default tries xdg-open, then open.\n# command = \"firefox\"\n\n[log]\nlevel = \"{}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/grants/grants.log)\n# file = \"/absolute/path/to/grants.log\"\n",
            path.display(),
            DEFAULT_LOG_LEVEL,
        )
    }
}
