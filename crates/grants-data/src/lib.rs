// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use grants_app::{Grant, GrantStatus, NewGrant, Requirement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "grants";
pub const DATASET_VERSION: i64 = 1;

const BUNDLED_DATASET: &str = include_str!("../data/grants.toml");
const BUNDLED_ORIGIN: &str = "bundled dataset";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatasetFile {
    version: i64,
    #[serde(default)]
    grants: Vec<GrantRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GrantRecord {
    name: String,
    #[serde(default)]
    application_link: String,
    status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    open_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    close_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requires_employee: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requires_501c3: Option<bool>,
}

impl GrantRecord {
    fn into_grant(self, index: usize, origin: &str) -> Result<Grant> {
        let status = GrantStatus::parse(&self.status).ok_or_else(|| {
            anyhow!(
                "grant #{} ({:?}) in {origin} has unknown status {:?}; use Open, Closed, or Unsure",
                index + 1,
                self.name,
                self.status
            )
        })?;

        Grant::new(NewGrant {
            name: self.name,
            application_link: self.application_link,
            status,
            open_date: self.open_date,
            close_date: self.close_date,
            requires_employee: Requirement::from(self.requires_employee),
            requires_501c3: Requirement::from(self.requires_501c3),
        })
        .with_context(|| format!("grant #{} in {origin}", index + 1))
    }

    fn from_grant(grant: &Grant) -> Self {
        Self {
            name: grant.name().to_owned(),
            application_link: grant.application_link().to_owned(),
            status: grant.status().display_name().to_owned(),
            open_date: grant.open_date().map(str::to_owned),
            close_date: grant.close_date().map(str::to_owned),
            requires_employee: grant.requires_employee().as_option(),
            requires_501c3: grant.requires_501c3().as_option(),
        }
    }
}

/// Where the grant list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantSource {
    Bundled,
    File(PathBuf),
}

impl GrantSource {
    pub fn load(&self) -> Result<Vec<Grant>> {
        match self {
            Self::Bundled => bundled_grants(),
            Self::File(path) => load_dataset(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => BUNDLED_ORIGIN.to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn bundled_grants() -> Result<Vec<Grant>> {
    parse_dataset(BUNDLED_DATASET, BUNDLED_ORIGIN)
}

pub fn load_dataset(path: &Path) -> Result<Vec<Grant>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read grant dataset {}", path.display()))?;
    parse_dataset(&raw, &path.display().to_string())
}

pub fn parse_dataset(raw: &str, origin: &str) -> Result<Vec<Grant>> {
    let value: toml::Value =
        toml::from_str(raw).with_context(|| format!("parse TOML dataset {origin}"))?;

    let version = value
        .get("version")
        .and_then(toml::Value::as_integer)
        .ok_or_else(|| {
            anyhow!("dataset {origin} has no `version`; add `version = {DATASET_VERSION}` at the top")
        })?;
    if version != DATASET_VERSION {
        bail!(
            "unsupported dataset version {version} in {origin}; expected version = {DATASET_VERSION}"
        );
    }

    let file: DatasetFile = value
        .try_into()
        .with_context(|| format!("decode dataset {origin}"))?;

    let mut seen = BTreeSet::new();
    let mut grants = Vec::with_capacity(file.grants.len());
    for (index, record) in file.grants.into_iter().enumerate() {
        let grant = record.into_grant(index, origin)?;
        if !seen.insert(grant.name().to_owned()) {
            tracing::warn!(name = grant.name(), origin, "duplicate grant name in dataset");
        }
        grants.push(grant);
    }

    tracing::debug!(origin, count = grants.len(), "loaded grant dataset");
    Ok(grants)
}

pub fn render_dataset(grants: &[Grant]) -> Result<String> {
    let file = DatasetFile {
        version: DATASET_VERSION,
        grants: grants.iter().map(GrantRecord::from_grant).collect(),
    };
    toml::to_string(&file).context("serialize grant dataset")
}

/// Dataset path from `GRANTS_DATA_PATH`, if set.
pub fn env_dataset_path() -> Option<PathBuf> {
    env::var_os("GRANTS_DATA_PATH").map(PathBuf::from)
}

pub fn default_data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [log].file in the config to a writable path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("grants.log"))
}

/// Rejects values that point at a remote source rather than a local file.
pub fn validate_data_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("dataset path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "dataset path {path:?} looks like a URI ({scheme}://); grants are only loaded from local files"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("dataset path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{bundled_grants, parse_dataset};
    use anyhow::Result;
    use grants_app::{GrantStatus, Requirement};

    #[test]
    fn bundled_dataset_parses() -> Result<()> {
        let grants = bundled_grants()?;
        assert_eq!(grants.len(), 78);
        assert_eq!(grants[0].name(), "AiAA");
        Ok(())
    }

    #[test]
    fn bundled_dataset_keeps_tri_state_fields() -> Result<()> {
        let grants = bundled_grants()?;
        let att = grants
            .iter()
            .find(|grant| grant.name() == "AT&T")
            .expect("AT&T present");
        assert_eq!(att.status(), GrantStatus::Unsure);
        assert_eq!(att.requires_employee(), Requirement::Required);
        assert_eq!(att.requires_501c3(), Requirement::Unknown);

        let bae = grants
            .iter()
            .find(|grant| grant.name() == "BAE Grant")
            .expect("BAE present");
        assert_eq!(bae.date_text(), "Closes: September 13");
        Ok(())
    }

    #[test]
    fn missing_optional_keys_default_to_unknown() -> Result<()> {
        let grants = parse_dataset(
            "version = 1\n[[grants]]\nname = \"Coca-Cola\"\nstatus = \"Unsure\"\n",
            "inline",
        )?;
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].application_link(), "");
        assert_eq!(grants[0].open_date(), None);
        assert_eq!(grants[0].requires_employee(), Requirement::Unknown);
        Ok(())
    }

    #[test]
    fn empty_grant_list_is_allowed() -> Result<()> {
        assert!(parse_dataset("version = 1\n", "inline")?.is_empty());
        Ok(())
    }
}
