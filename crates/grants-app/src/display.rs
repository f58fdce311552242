// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::{Grant, StatusColor};

/// Display strings for one list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantRow {
    pub name: String,
    pub status_label: &'static str,
    pub status_color: StatusColor,
    pub date_text: String,
    pub requirements_text: String,
}

impl From<&Grant> for GrantRow {
    fn from(grant: &Grant) -> Self {
        let status = grant.status();
        Self {
            name: grant.name().to_owned(),
            status_label: status.display_name(),
            status_color: status.color(),
            date_text: grant.date_text(),
            requirements_text: grant.requirements_text(),
        }
    }
}
