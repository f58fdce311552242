// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use grants_app::{Grant, GrantStatus, NewGrant, Requirement};
use std::fmt::Write as _;
use std::path::PathBuf;

const SPONSORS: [&str; 16] = [
    "Apex",
    "Summit",
    "Harbor",
    "Frontier",
    "Evergreen",
    "Pioneer",
    "Lakeside",
    "Northwind",
    "Granite",
    "Beacon",
    "Redwood",
    "Meridian",
    "Keystone",
    "Silverline",
    "Cobalt",
    "Heritage",
];

const SPONSOR_KINDS: [&str; 8] = [
    "Foundation",
    "Robotics Fund",
    "STEM Grant",
    "Community Giving",
    "Education Trust",
    "Team Grant",
    "Outreach Award",
    "Classroom Grant",
];

const DATE_TOKENS: [&str; 10] = [
    "January 17",
    "March 1",
    "May 31",
    "June 30",
    "Late August",
    "September 13",
    "October 1",
    "December 31",
    "No",
    "Unsure",
];

const REQUIREMENTS: [Requirement; 3] = [
    Requirement::Required,
    Requirement::NotRequired,
    Requirement::Unknown,
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for grant lists; the same seed always yields the same
/// grants.
#[derive(Debug, Clone)]
pub struct GrantFaker {
    rng: DeterministicRng,
    counter: usize,
}

impl GrantFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            counter: 0,
        }
    }

    pub fn grant(&mut self) -> Grant {
        self.counter += 1;
        let sponsor = self.pick(&SPONSORS);
        let kind = self.pick(&SPONSOR_KINDS);
        let name = format!("{sponsor} {kind} {}", self.counter);
        let slug = name.to_ascii_lowercase().replace(' ', "-");

        let status = GrantStatus::ALL[self.rng.int_n(GrantStatus::ALL.len())];
        let application_link = if self.rng.int_n(10) == 0 {
            String::new()
        } else {
            format!("https://grants.example.org/{slug}")
        };

        Grant::new(NewGrant {
            name,
            application_link,
            status,
            open_date: self.maybe_date(),
            close_date: self.maybe_date(),
            requires_employee: REQUIREMENTS[self.rng.int_n(REQUIREMENTS.len())],
            requires_501c3: REQUIREMENTS[self.rng.int_n(REQUIREMENTS.len())],
        })
        .expect("faker names are never blank")
    }

    pub fn grants(&mut self, count: usize) -> Vec<Grant> {
        (0..count).map(|_| self.grant()).collect()
    }

    fn maybe_date(&mut self) -> Option<String> {
        if self.rng.bool() {
            Some(self.pick(&DATE_TOKENS).to_owned())
        } else {
            None
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// Bare grant with only a name and status set.
pub fn grant(name: &str, status: GrantStatus) -> Grant {
    Grant::new(NewGrant::new(name, status)).expect("fixture grant name is not blank")
}

pub fn grant_with_link(name: &str, status: GrantStatus, link: &str) -> Grant {
    Grant::new(NewGrant {
        application_link: link.to_owned(),
        ..NewGrant::new(name, status)
    })
    .expect("fixture grant name is not blank")
}

/// Renders grants in the dataset file format without going through the
/// loader under test.
pub fn dataset_toml(grants: &[Grant]) -> String {
    let mut out = String::from("version = 1\n");
    for grant in grants {
        out.push_str("\n[[grants]]\n");
        push_string(&mut out, "name", grant.name());
        push_string(&mut out, "application_link", grant.application_link());
        push_string(&mut out, "status", grant.status().display_name());
        if let Some(date) = grant.open_date() {
            push_string(&mut out, "open_date", date);
        }
        if let Some(date) = grant.close_date() {
            push_string(&mut out, "close_date", date);
        }
        if let Some(flag) = grant.requires_employee().as_option() {
            let _ = writeln!(out, "requires_employee = {flag}");
        }
        if let Some(flag) = grant.requires_501c3().as_option() {
            let _ = writeln!(out, "requires_501c3 = {flag}");
        }
    }
    out
}

pub fn write_dataset(grants: &[Grant]) -> Result<(tempfile::TempDir, PathBuf)> {
    let (dir, path) = temp_dataset_path()?;
    std::fs::write(&path, dataset_toml(grants))
        .with_context(|| format!("write dataset {}", path.display()))?;
    Ok((dir, path))
}

pub fn temp_dataset_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("grants.toml");
    Ok((dir, path))
}

fn push_string(out: &mut String, key: &str, value: &str) {
    let quoted = toml::Value::String(value.to_owned()).to_string();
    let _ = writeln!(out, "{key} = {quoted}");
}
