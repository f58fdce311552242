// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FilterCriteria, Grant, GrantRow, filter_grants};

/// The list host: owns the full dataset, the criteria in force, and the
/// filtered view derived from both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GrantBrowser {
    all: Vec<Grant>,
    visible: Vec<Grant>,
    criteria: FilterCriteria,
}

impl GrantBrowser {
    pub fn new(grants: Vec<Grant>) -> Self {
        Self {
            visible: grants.clone(),
            all: grants,
            criteria: FilterCriteria::default(),
        }
    }

    pub fn apply(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.visible = filter_grants(&self.all, &self.criteria);
    }

    /// Swaps in a fresh dataset and re-runs the active criteria over it.
    pub fn replace_grants(&mut self, grants: Vec<Grant>) {
        self.all = grants;
        self.visible = filter_grants(&self.all, &self.criteria);
    }

    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn visible(&self) -> &[Grant] {
        &self.visible
    }

    pub fn rows(&self) -> Vec<GrantRow> {
        self.visible.iter().map(GrantRow::from).collect()
    }

    pub fn grant_at(&self, index: usize) -> Option<&Grant> {
        self.visible.get(index)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }
}
