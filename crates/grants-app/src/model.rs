// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::Serialize;
use url::Url;

/// Date tokens that mean "no usable date" in the grant table.
const DATE_SENTINELS: [&str; 2] = ["No", "Unsure"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantStatus {
    Open,
    Closed,
    Unsure,
}

impl GrantStatus {
    pub const ALL: [Self; 3] = [Self::Open, Self::Closed, Self::Unsure];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Unsure => "Unsure",
        }
    }

    pub const fn color(self) -> StatusColor {
        match self {
            Self::Open => StatusColor::Green,
            Self::Closed => StatusColor::Red,
            Self::Unsure => StatusColor::Orange,
        }
    }

    /// Accepts the display name in any letter case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "unsure" => Some(Self::Unsure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Green,
    Red,
    Orange,
}

/// Eligibility requirement as recorded in the grant table. `Unknown` means the
/// source left the field blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Requirement {
    Required,
    NotRequired,
    #[default]
    Unknown,
}

impl Requirement {
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }

    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Required => Some(true),
            Self::NotRequired => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<Option<bool>> for Requirement {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Required,
            Some(false) => Self::NotRequired,
            None => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrant {
    pub name: String,
    pub application_link: String,
    pub status: GrantStatus,
    pub open_date: Option<String>,
    pub close_date: Option<String>,
    pub requires_employee: Requirement,
    pub requires_501c3: Requirement,
}

impl NewGrant {
    pub fn new(name: impl Into<String>, status: GrantStatus) -> Self {
        Self {
            name: name.into(),
            application_link: String::new(),
            status,
            open_date: None,
            close_date: None,
            requires_employee: Requirement::Unknown,
            requires_501c3: Requirement::Unknown,
        }
    }
}

/// One funding opportunity. Fields are private so a constructed grant never
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    name: String,
    application_link: String,
    status: GrantStatus,
    open_date: Option<String>,
    close_date: Option<String>,
    requires_employee: Requirement,
    requires_501c3: Requirement,
}

impl Grant {
    /// Keeps every field as given; only a blank name is rejected.
    pub fn new(input: NewGrant) -> Result<Self> {
        if input.name.trim().is_empty() {
            bail!("grant name is required");
        }

        Ok(Self {
            name: input.name,
            application_link: input.application_link,
            status: input.status,
            open_date: input.open_date,
            close_date: input.close_date,
            requires_employee: input.requires_employee,
            requires_501c3: input.requires_501c3,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn application_link(&self) -> &str {
        &self.application_link
    }

    pub const fn status(&self) -> GrantStatus {
        self.status
    }

    pub fn open_date(&self) -> Option<&str> {
        self.open_date.as_deref()
    }

    pub fn close_date(&self) -> Option<&str> {
        self.close_date.as_deref()
    }

    pub const fn requires_employee(&self) -> Requirement {
        self.requires_employee
    }

    pub const fn requires_501c3(&self) -> Requirement {
        self.requires_501c3
    }

    pub const fn has_employee_requirement(&self) -> bool {
        self.requires_employee.is_required()
    }

    pub const fn has_501c3_requirement(&self) -> bool {
        self.requires_501c3.is_required()
    }

    pub fn requirements_text(&self) -> String {
        let mut requirements = Vec::with_capacity(2);
        if self.has_employee_requirement() {
            requirements.push("Employee Required");
        }
        if self.has_501c3_requirement() {
            requirements.push("501(c)(3) Required");
        }

        if requirements.is_empty() {
            return "No Special Requirements".to_owned();
        }
        requirements.join(", ")
    }

    /// Close date wins over open date; sentinel tokens count as absent.
    pub fn date_text(&self) -> String {
        if let Some(close) = usable_date(self.close_date()) {
            return format!("Closes: {close}");
        }
        if let Some(open) = usable_date(self.open_date()) {
            return format!("Opens: {open}");
        }
        "No Date Available".to_owned()
    }

    /// `None` unless the link is a whitespace-free absolute URL.
    pub fn application_url(&self) -> Option<Url> {
        if self.application_link.is_empty()
            || self.application_link.chars().any(char::is_whitespace)
        {
            return None;
        }
        Url::parse(&self.application_link).ok()
    }
}

fn usable_date(value: Option<&str>) -> Option<&str> {
    value.filter(|date| !DATE_SENTINELS.contains(date))
}
