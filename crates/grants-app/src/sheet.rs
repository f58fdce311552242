// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FilterCriteria, GrantStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSection {
    Status,
    Employee,
    Nonprofit,
}

impl FilterSection {
    pub const ALL: [Self; 3] = [Self::Status, Self::Employee, Self::Nonprofit];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Employee => "Employee Requirement",
            Self::Nonprofit => "501(c)(3) Requirement",
        }
    }

    pub const fn option_count(self) -> usize {
        match self {
            Self::Status => GrantStatus::ALL.len() + 1,
            Self::Employee | Self::Nonprofit => RequirementChoice::ALL.len(),
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|section| *section == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|section| *section == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementChoice {
    All,
    Required,
    NotRequired,
}

impl RequirementChoice {
    pub const ALL: [Self; 3] = [Self::All, Self::Required, Self::NotRequired];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Required => "Required",
            Self::NotRequired => "Not Required",
        }
    }

    pub const fn value(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Required => Some(true),
            Self::NotRequired => Some(false),
        }
    }

    pub const fn from_value(value: Option<bool>) -> Self {
        match value {
            None => Self::All,
            Some(true) => Self::Required,
            Some(false) => Self::NotRequired,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: &'static str,
    pub checked: bool,
}

/// Draft criteria edited inside the filter sub-screen. The host's active
/// criteria only change through [`FilterSheet::confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSheet {
    draft: FilterCriteria,
}

impl FilterSheet {
    pub const fn new(current: FilterCriteria) -> Self {
        Self { draft: current }
    }

    pub const fn draft(&self) -> &FilterCriteria {
        &self.draft
    }

    pub fn options(&self, section: FilterSection) -> Vec<FilterOption> {
        match section {
            FilterSection::Status => {
                let mut options = vec![FilterOption {
                    label: "All",
                    checked: self.draft.status.is_none(),
                }];
                options.extend(GrantStatus::ALL.iter().map(|status| FilterOption {
                    label: status.display_name(),
                    checked: self.draft.status == Some(*status),
                }));
                options
            }
            FilterSection::Employee => requirement_options(self.draft.requires_employee),
            FilterSection::Nonprofit => requirement_options(self.draft.requires_501c3),
        }
    }

    /// Sets one section from its option index. Returns `false` and leaves the
    /// draft alone when the index is out of range.
    pub fn select(&mut self, section: FilterSection, index: usize) -> bool {
        match section {
            FilterSection::Status => {
                let status = match index {
                    0 => None,
                    _ => match GrantStatus::ALL.get(index - 1) {
                        Some(status) => Some(*status),
                        None => return false,
                    },
                };
                self.draft.status = status;
            }
            FilterSection::Employee | FilterSection::Nonprofit => {
                let Some(choice) = RequirementChoice::ALL.get(index) else {
                    return false;
                };
                if section == FilterSection::Employee {
                    self.draft.requires_employee = choice.value();
                } else {
                    self.draft.requires_501c3 = choice.value();
                }
            }
        }
        true
    }

    pub fn selected_index(&self, section: FilterSection) -> usize {
        let options = self.options(section);
        options.iter().position(|option| option.checked).unwrap_or(0)
    }

    pub const fn confirm(self) -> FilterCriteria {
        self.draft
    }
}

fn requirement_options(value: Option<bool>) -> Vec<FilterOption> {
    let selected = RequirementChoice::from_value(value);
    RequirementChoice::ALL
        .iter()
        .map(|choice| FilterOption {
            label: choice.label(),
            checked: *choice == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FilterSection, FilterSheet, RequirementChoice};
    use crate::{FilterCriteria, GrantStatus};

    fn labels_checked(sheet: &FilterSheet, section: FilterSection) -> Vec<(&'static str, bool)> {
        sheet
            .options(section)
            .into_iter()
            .map(|option| (option.label, option.checked))
            .collect()
    }

    #[test]
    fn sheet_is_seeded_from_current_criteria() {
        let current = FilterCriteria {
            status: Some(GrantStatus::Closed),
            requires_employee: Some(false),
            requires_501c3: None,
        };
        let sheet = FilterSheet::new(current);

        assert_eq!(
            labels_checked(&sheet, FilterSection::Status),
            vec![("All", false), ("Open", false), ("Closed", true), ("Unsure", false)]
        );
        assert_eq!(
            labels_checked(&sheet, FilterSection::Employee),
            vec![("All", false), ("Required", false), ("Not Required", true)]
        );
        assert_eq!(sheet.selected_index(FilterSection::Nonprofit), 0);
    }

    #[test]
    fn selecting_one_section_leaves_others_untouched() {
        let current = FilterCriteria {
            status: Some(GrantStatus::Open),
            requires_employee: Some(true),
            requires_501c3: Some(false),
        };
        let mut sheet = FilterSheet::new(current);

        assert!(sheet.select(FilterSection::Employee, 0));
        assert_eq!(
            sheet.confirm(),
            FilterCriteria {
                requires_employee: None,
                ..current
            }
        );
    }

    #[test]
    fn status_options_map_to_statuses() {
        let mut sheet = FilterSheet::new(FilterCriteria::default());
        for (index, status) in GrantStatus::ALL.iter().enumerate() {
            assert!(sheet.select(FilterSection::Status, index + 1));
            assert_eq!(sheet.draft().status, Some(*status));
        }
        assert!(sheet.select(FilterSection::Status, 0));
        assert_eq!(sheet.draft().status, None);
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut sheet = FilterSheet::new(FilterCriteria::default());
        assert!(!sheet.select(FilterSection::Status, 4));
        assert!(!sheet.select(FilterSection::Nonprofit, 3));
        assert_eq!(sheet.confirm(), FilterCriteria::default());
    }

    #[test]
    fn requirement_choices_round_trip_values() {
        for choice in RequirementChoice::ALL {
            assert_eq!(RequirementChoice::from_value(choice.value()), choice);
        }
    }

    #[test]
    fn section_cycling_wraps() {
        assert_eq!(FilterSection::Nonprofit.next(), FilterSection::Status);
        assert_eq!(FilterSection::Status.prev(), FilterSection::Nonprofit);
        assert_eq!(FilterSection::Status.option_count(), 4);
        assert_eq!(FilterSection::Employee.option_count(), 3);
    }
}
