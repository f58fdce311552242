// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FilterCriteria, FilterSection, FilterSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browse,
    Filter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_filters: FilterCriteria,
    pub sheet: Option<FilterSheet>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Browse,
            active_filters: FilterCriteria::default(),
            sheet: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenFilters,
    SelectFilterOption {
        section: FilterSection,
        index: usize,
    },
    ApplyFilters,
    CancelFilters,
    ClearFilters,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    FilterDraftChanged(FilterCriteria),
    FiltersApplied(FilterCriteria),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenFilters => {
                self.sheet = Some(FilterSheet::new(self.active_filters));
                self.mode = AppMode::Filter;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SelectFilterOption { section, index } => {
                let Some(sheet) = self.sheet.as_mut() else {
                    return Vec::new();
                };
                if sheet.select(section, index) {
                    vec![AppEvent::FilterDraftChanged(*sheet.draft())]
                } else {
                    Vec::new()
                }
            }
            AppCommand::ApplyFilters => {
                let Some(sheet) = self.sheet.take() else {
                    return Vec::new();
                };
                self.active_filters = sheet.confirm();
                self.mode = AppMode::Browse;
                vec![
                    AppEvent::FiltersApplied(self.active_filters),
                    AppEvent::ModeChanged(self.mode),
                    self.set_status("filters applied"),
                ]
            }
            AppCommand::CancelFilters => {
                if self.sheet.take().is_none() {
                    return Vec::new();
                }
                self.mode = AppMode::Browse;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ClearFilters => {
                if self.active_filters.is_empty() {
                    return vec![self.set_status("no filters active")];
                }
                self.active_filters = FilterCriteria::default();
                vec![
                    AppEvent::FiltersApplied(self.active_filters),
                    self.set_status("filters cleared"),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
