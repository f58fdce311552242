// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use grants_app::Grant;
use grants_data::GrantSource;
use std::io;
use std::process::{Child, Command, Stdio};
use std::thread;
use url::Url;

const SYSTEM_OPENERS: [&str; 2] = ["xdg-open", "open"];

pub struct GrantsRuntime {
    source: GrantSource,
    browser_command: Option<String>,
}

impl GrantsRuntime {
    pub fn new(source: GrantSource, browser_command: Option<String>) -> Self {
        Self {
            source,
            browser_command,
        }
    }
}

impl grants_tui::AppRuntime for GrantsRuntime {
    fn load_grants(&mut self) -> Result<Vec<Grant>> {
        let grants = self
            .source
            .load()
            .with_context(|| format!("load grants from {}", self.source.describe()))?;
        tracing::info!(
            source = %self.source.describe(),
            count = grants.len(),
            "grants loaded"
        );
        Ok(grants)
    }

    fn open_link(&mut self, url: &Url) -> Result<()> {
        let child = match self.browser_command.as_deref() {
            Some(command) => spawn_command(command, url)?,
            None => spawn_system_opener(url)?,
        };
        reap(child);
        Ok(())
    }
}

/// `command` may carry its own arguments; the URL is appended last.
fn spawn_command(command: &str, url: &Url) -> Result<Child> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("browser command is empty; set [browser].command or remove it");
    };
    let args = parts.collect::<Vec<_>>();
    spawn_detached(program, &args, url)
        .with_context(|| format!("run browser command {command:?}"))
}

fn spawn_system_opener(url: &Url) -> Result<Child> {
    let mut last_error = None;
    for program in SYSTEM_OPENERS {
        match spawn_detached(program, &[], url) {
            Ok(child) => return Ok(child),
            Err(error) => {
                tracing::debug!(program, error = %error, "link opener unavailable");
                last_error = Some(error);
            }
        }
    }

    let detail = last_error.map_or_else(String::new, |error| format!(" ({error})"));
    bail!(
        "no link opener found; tried {}{detail}. Set [browser].command in the config",
        SYSTEM_OPENERS.join(", ")
    )
}

fn spawn_detached(program: &str, args: &[&str], url: &Url) -> io::Result<Child> {
    Command::new(program)
        .args(args)
        .arg(url.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

fn reap(mut child: Child) {
    thread::spawn(move || {
        if let Err(error) = child.wait() {
            tracing::debug!(error = %error, "link opener did not exit cleanly");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::GrantsRuntime;
    use anyhow::Result;
    use grants_app::GrantStatus;
    use grants_data::GrantSource;
    use grants_testkit::{GrantFaker, grant, write_dataset};
    use grants_tui::AppRuntime;
    use url::Url;

    #[test]
    fn load_grants_reads_file_source() -> Result<()> {
        let grants = GrantFaker::new(5).grants(12);
        let (_dir, path) = write_dataset(&grants)?;

        let mut runtime = GrantsRuntime::new(GrantSource::File(path), None);
        assert_eq!(runtime.load_grants()?, grants);
        Ok(())
    }

    #[test]
    fn load_grants_picks_up_file_changes() -> Result<()> {
        let (_dir, path) = write_dataset(&[grant("AiAA", GrantStatus::Closed)])?;
        let mut runtime = GrantsRuntime::new(GrantSource::File(path.clone()), None);
        assert_eq!(runtime.load_grants()?.len(), 1);

        std::fs::write(
            &path,
            grants_testkit::dataset_toml(&[
                grant("AiAA", GrantStatus::Closed),
                grant("BMW", GrantStatus::Open),
            ]),
        )?;
        assert_eq!(runtime.load_grants()?.len(), 2);
        Ok(())
    }

    #[test]
    fn load_grants_error_names_source() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("absent.toml");
        let mut runtime = GrantsRuntime::new(GrantSource::File(path.clone()), None);

        let error = runtime
            .load_grants()
            .expect_err("missing dataset should fail");
        assert!(error.to_string().contains(&path.display().to_string()));
        Ok(())
    }

    #[test]
    fn bundled_source_loads_every_grant() -> Result<()> {
        let mut runtime = GrantsRuntime::new(GrantSource::Bundled, None);
        assert_eq!(runtime.load_grants()?.len(), 78);
        Ok(())
    }

    #[test]
    fn missing_browser_command_is_an_error() -> Result<()> {
        let url = Url::parse("https://example.com/apply")?;
        let mut runtime = GrantsRuntime::new(
            GrantSource::Bundled,
            Some("grants-test-no-such-browser --new-tab".to_owned()),
        );

        let error = runtime.open_link(&url).expect_err("unknown program should fail");
        assert!(error.to_string().contains("grants-test-no-such-browser"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn configured_browser_command_is_spawned() -> Result<()> {
        let url = Url::parse("https://example.com/apply")?;
        let mut runtime = GrantsRuntime::new(GrantSource::Bundled, Some("true".to_owned()));
        runtime.open_link(&url)?;
        Ok(())
    }
}
