// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use grants_app::{FilterCriteria, GrantStatus, filter_grants};
use grants_data::{
    GrantSource, bundled_grants, load_dataset, parse_dataset, render_dataset, validate_data_path,
};
use grants_testkit::{GrantFaker, grant, temp_dataset_path, write_dataset};

#[test]
fn validate_data_path_rejects_uri_forms() {
    assert!(validate_data_path("https://example.com/grants.toml").is_err());
    assert!(validate_data_path("file:grants.toml").is_err());
    assert!(validate_data_path("").is_err());
    assert!(validate_data_path("/tmp/grants.toml").is_ok());
    assert!(validate_data_path("C:\\grants\\grants.toml").is_ok());
}

#[test]
fn load_dataset_preserves_file_order() -> Result<()> {
    let grants = GrantFaker::new(11).grants(25);
    let (_dir, path) = write_dataset(&grants)?;

    let loaded = load_dataset(&path)?;
    assert_eq!(loaded, grants);
    Ok(())
}

#[test]
fn file_source_loads_from_path() -> Result<()> {
    let grants = vec![
        grant("First", GrantStatus::Open),
        grant("Second", GrantStatus::Closed),
    ];
    let (_dir, path) = write_dataset(&grants)?;

    let source = GrantSource::File(path.clone());
    assert_eq!(source.load()?, grants);
    assert_eq!(source.describe(), path.display().to_string());
    Ok(())
}

#[test]
fn bundled_source_describes_itself() -> Result<()> {
    let source = GrantSource::Bundled;
    assert_eq!(source.describe(), "bundled dataset");
    assert_eq!(source.load()?.len(), bundled_grants()?.len());
    Ok(())
}

#[test]
fn missing_file_reports_path() -> Result<()> {
    let (_dir, path) = temp_dataset_path()?;
    let error = load_dataset(&path).expect_err("missing dataset should fail");
    assert!(error.to_string().contains("read grant dataset"));
    Ok(())
}

#[test]
fn unversioned_dataset_is_rejected() {
    let error = parse_dataset("[[grants]]\nname = \"AiAA\"\nstatus = \"Closed\"\n", "inline")
        .expect_err("missing version should fail");
    assert!(error.to_string().contains("version = 1"));
}

#[test]
fn unsupported_version_is_rejected() {
    let error = parse_dataset("version = 2\n", "inline").expect_err("v2 should fail");
    assert!(error.to_string().contains("unsupported dataset version 2"));
}

#[test]
fn unknown_status_names_the_entry() {
    let error = parse_dataset(
        "version = 1\n[[grants]]\nname = \"Dow\"\nstatus = \"Pending\"\n",
        "inline",
    )
    .expect_err("unknown status should fail");
    let message = error.to_string();
    assert!(message.contains("grant #1"), "unexpected message: {message}");
    assert!(message.contains("Pending"), "unexpected message: {message}");
}

#[test]
fn blank_name_is_rejected() {
    let error = parse_dataset(
        "version = 1\n[[grants]]\nname = \"  \"\nstatus = \"Open\"\n",
        "inline",
    )
    .expect_err("blank name should fail");
    assert!(format!("{error:#}").contains("name is required"));
}

#[test]
fn malformed_toml_returns_parse_error() {
    let error = parse_dataset("{{not toml", "inline").expect_err("malformed toml should fail");
    assert!(error.to_string().contains("parse TOML dataset"));
}

#[test]
fn duplicate_names_are_kept() -> Result<()> {
    let grants = vec![
        grant("Costco", GrantStatus::Open),
        grant("Costco", GrantStatus::Closed),
    ];
    let loaded = parse_dataset(&grants_testkit::dataset_toml(&grants), "inline")?;
    assert_eq!(loaded.len(), 2);
    Ok(())
}

#[test]
fn rendered_dataset_loads_back() -> Result<()> {
    let grants = bundled_grants()?;
    let text = render_dataset(&grants)?;
    assert_eq!(parse_dataset(&text, "rendered")?, grants);
    Ok(())
}

#[test]
fn bundled_dataset_filters_by_status() -> Result<()> {
    let grants = bundled_grants()?;
    let mut total = 0;
    for status in GrantStatus::ALL {
        let criteria = FilterCriteria {
            status: Some(status),
            ..FilterCriteria::default()
        };
        let filtered = filter_grants(&grants, &criteria);
        assert!(filtered.iter().all(|grant| grant.status() == status));
        total += filtered.len();
    }
    assert_eq!(total, grants.len());
    Ok(())
}

#[test]
fn bundled_dataset_has_one_unlinked_grant() -> Result<()> {
    let unlinked = bundled_grants()?
        .into_iter()
        .filter(|grant| grant.application_url().is_none())
        .map(|grant| grant.name().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(unlinked, vec!["GM".to_owned()]);
    Ok(())
}
