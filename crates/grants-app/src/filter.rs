// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Grant, GrantStatus, Requirement};

/// Active filter selections. `None` in any field means "any".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub status: Option<GrantStatus>,
    pub requires_employee: Option<bool>,
    pub requires_501c3: Option<bool>,
}

impl FilterCriteria {
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.requires_employee.is_none() && self.requires_501c3.is_none()
    }

    pub fn matches(&self, grant: &Grant) -> bool {
        if let Some(status) = self.status
            && grant.status() != status
        {
            return false;
        }

        requirement_matches(grant.requires_employee(), self.requires_employee)
            && requirement_matches(grant.requires_501c3(), self.requires_501c3)
    }

    pub fn summary(&self) -> String {
        let status = self
            .status
            .map_or("any", |status| status.display_name())
            .to_ascii_lowercase();
        format!(
            "status: {status} | employee: {} | 501(c)(3): {}",
            requirement_filter_label(self.requires_employee),
            requirement_filter_label(self.requires_501c3),
        )
    }
}

pub fn matches(grant: &Grant, criteria: &FilterCriteria) -> bool {
    criteria.matches(grant)
}

/// Keeps the grants that pass `criteria`, in input order.
pub fn filter_grants(grants: &[Grant], criteria: &FilterCriteria) -> Vec<Grant> {
    grants
        .iter()
        .filter(|grant| criteria.matches(grant))
        .cloned()
        .collect()
}

fn requirement_matches(actual: Requirement, wanted: Option<bool>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(true), Requirement::Required) => true,
        (Some(true), Requirement::NotRequired | Requirement::Unknown) => false,
        (Some(false), Requirement::Required) => false,
        // An unrecorded requirement reads as "not required".
        (Some(false), Requirement::NotRequired | Requirement::Unknown) => true,
    }
}

fn requirement_filter_label(wanted: Option<bool>) -> &'static str {
    match wanted {
        None => "any",
        Some(true) => "required",
        Some(false) => "not required",
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterCriteria, filter_grants, matches};
    use crate::{Grant, GrantStatus, NewGrant, Requirement};
    use anyhow::Result;

    fn grant(
        name: &str,
        status: GrantStatus,
        employee: Requirement,
        nonprofit: Requirement,
    ) -> Result<Grant> {
        Grant::new(NewGrant {
            requires_employee: employee,
            requires_501c3: nonprofit,
            ..NewGrant::new(name, status)
        })
    }

    fn names(grants: &[Grant]) -> Vec<&str> {
        grants.iter().map(Grant::name).collect()
    }

    fn mixed_dataset() -> Result<Vec<Grant>> {
        use GrantStatus::{Closed, Open, Unsure};
        use Requirement::{NotRequired, Required, Unknown};
        Ok(vec![
            grant("AiAA", Closed, NotRequired, NotRequired)?,
            grant("AT&T", Unsure, Required, Unknown)?,
            grant("BMW", Open, NotRequired, Required)?,
            grant("Boeing", Closed, Required, Unknown)?,
            grant("Bloomingdales", Open, Unknown, Unknown)?,
            grant("DoDStem", Closed, Required, NotRequired)?,
        ])
    }

    #[test]
    fn empty_criteria_returns_input_unchanged() -> Result<()> {
        let grants = mixed_dataset()?;
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filter_grants(&grants, &criteria), grants);
        Ok(())
    }

    #[test]
    fn status_filter_keeps_input_order() -> Result<()> {
        let grants = vec![
            grant("First", GrantStatus::Open, Requirement::Unknown, Requirement::Unknown)?,
            grant("Second", GrantStatus::Closed, Requirement::Unknown, Requirement::Unknown)?,
            grant("Third", GrantStatus::Open, Requirement::Unknown, Requirement::Unknown)?,
        ];
        let criteria = FilterCriteria {
            status: Some(GrantStatus::Open),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&filter_grants(&grants, &criteria)), vec!["First", "Third"]);
        Ok(())
    }

    #[test]
    fn unknown_requirement_counts_as_not_required() -> Result<()> {
        let unknown = grant(
            "Coca-Cola",
            GrantStatus::Unsure,
            Requirement::Unknown,
            Requirement::Unknown,
        )?;
        let not_required = FilterCriteria {
            requires_employee: Some(false),
            requires_501c3: Some(false),
            ..FilterCriteria::default()
        };
        assert!(matches(&unknown, &not_required));

        let required = FilterCriteria {
            requires_employee: Some(true),
            ..FilterCriteria::default()
        };
        assert!(!matches(&unknown, &required));
        Ok(())
    }

    #[test]
    fn every_component_must_pass() -> Result<()> {
        let grants = mixed_dataset()?;
        let criteria = FilterCriteria {
            status: Some(GrantStatus::Closed),
            requires_employee: Some(true),
            requires_501c3: Some(false),
        };
        assert_eq!(names(&filter_grants(&grants, &criteria)), vec!["Boeing", "DoDStem"]);

        for grant in &grants {
            let expected = grant.status() == GrantStatus::Closed
                && grant.has_employee_requirement()
                && !grant.has_501c3_requirement();
            assert_eq!(matches(grant, &criteria), expected, "grant {}", grant.name());
        }
        Ok(())
    }

    #[test]
    fn filtering_is_idempotent() -> Result<()> {
        let grants = mixed_dataset()?;
        let statuses = [
            None,
            Some(GrantStatus::Open),
            Some(GrantStatus::Closed),
            Some(GrantStatus::Unsure),
        ];
        let flags = [None, Some(true), Some(false)];
        for status in statuses {
            for requires_employee in flags {
                for requires_501c3 in flags {
                    let criteria = FilterCriteria {
                        status,
                        requires_employee,
                        requires_501c3,
                    };
                    let once = filter_grants(&grants, &criteria);
                    let twice = filter_grants(&once, &criteria);
                    assert_eq!(once, twice, "criteria {criteria:?}");
                }
            }
        }
        Ok(())
    }

    #[test]
    fn summary_describes_each_selector() {
        assert_eq!(
            FilterCriteria::default().summary(),
            "status: any | employee: any | 501(c)(3): any"
        );
        let criteria = FilterCriteria {
            status: Some(GrantStatus::Unsure),
            requires_employee: Some(true),
            requires_501c3: Some(false),
        };
        assert_eq!(
            criteria.summary(),
            "status: unsure | employee: required | 501(c)(3): not required"
        );
    }
}
