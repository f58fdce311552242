// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use grants_app::{AppState, FilterCriteria, Grant, GrantRow, GrantStatus, filter_grants};
use grants_data::GrantSource;
use grants_tui::AppRuntime;
use runtime::GrantsRuntime;
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        tracing::error!(error = %format!("{error:#}"), "grants failed");
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `grants --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    logging::init_logging(config.log_level(), &config.log_path()?);

    let source = match &options.data_path {
        Some(path) => GrantSource::File(path.clone()),
        None => config.data_source()?,
    };
    let origin = source.describe();
    tracing::info!(source = %origin, "grants starting");

    let mut runtime = GrantsRuntime::new(source, config.browser_command().map(str::to_owned));

    if options.check_only {
        let grants = runtime.load_grants().with_context(|| {
            format!("check dataset {origin} -- fix the entry named above or point --data elsewhere")
        })?;
        println!("{origin}: {} grants", grants.len());
        return Ok(());
    }

    if options.print_dataset {
        let grants = runtime.load_grants()?;
        print!("{}", grants_data::render_dataset(&grants)?);
        return Ok(());
    }

    if options.list {
        let grants = runtime.load_grants()?;
        let mut stdout = io::stdout().lock();
        let written = write_listing(&mut stdout, &grants, &options.filters)?;
        tracing::info!(
            filters = %options.filters.summary(),
            written,
            "listed grants"
        );
        return Ok(());
    }

    let mut state = AppState::default();
    let result = grants_tui::run_app(&mut state, &mut runtime);
    tracing::info!("grants exited");
    result
}

#[derive(Debug, Serialize)]
struct ListedGrant<'a> {
    #[serde(flatten)]
    row: GrantRow,
    application_link: &'a str,
}

/// One JSON object per matching grant, in dataset order.
fn write_listing<W: Write>(
    out: &mut W,
    grants: &[Grant],
    criteria: &FilterCriteria,
) -> Result<usize> {
    let filtered = filter_grants(grants, criteria);
    for grant in &filtered {
        let listed = ListedGrant {
            row: GrantRow::from(grant),
            application_link: grant.application_link(),
        };
        serde_json::to_writer(&mut *out, &listed).context("encode grant listing")?;
        writeln!(out).context("write grant listing")?;
    }
    out.flush().context("flush grant listing")?;
    Ok(filtered.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    print_dataset: bool,
    check_only: bool,
    list: bool,
    filters: FilterCriteria,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_path: None,
        print_config_path: false,
        print_example: false,
        print_dataset: false,
        check_only: false,
        list: false,
        filters: FilterCriteria::default(),
        show_help: false,
    };
    let mut filter_flag_seen = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--data requires a dataset file path"))?;
                grants_data::validate_data_path(value.as_ref())?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--print-dataset" => {
                options.print_dataset = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--list" => {
                options.list = true;
            }
            "--status" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("--status requires one of: open, closed, unsure, all")
                })?;
                options.filters.status = parse_status_filter(value.as_ref())?;
                filter_flag_seen = true;
            }
            flag @ ("--employee" | "--501c3") => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("{flag} requires one of: required, not-required, all")
                })?;
                let parsed = parse_requirement_filter(flag, value.as_ref())?;
                if flag == "--employee" {
                    options.filters.requires_employee = parsed;
                } else {
                    options.filters.requires_501c3 = parsed;
                }
                filter_flag_seen = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    if filter_flag_seen && !options.list {
        bail!("--status, --employee and --501c3 only apply to --list output; add --list");
    }

    Ok(options)
}

fn parse_status_filter(value: &str) -> Result<Option<GrantStatus>> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    GrantStatus::parse(value).map(Some).ok_or_else(|| {
        anyhow!("unknown status {value:?} for --status; use open, closed, unsure, or all")
    })
}

fn parse_requirement_filter(flag: &str, value: &str) -> Result<Option<bool>> {
    match value.to_ascii_lowercase().as_str() {
        "required" => Ok(Some(true)),
        "not-required" => Ok(Some(false)),
        "all" => Ok(None),
        _ => bail!("unknown value {value:?} for {flag}; use required, not-required, or all"),
    }
}

fn print_help() {
    println!("grants: browse grant opportunities");
    println!("  --config <path>          Use a specific config path");
    println!("  --data <path>            Load grants from a dataset file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --print-dataset          Print the resolved dataset as TOML");
    println!("  --check                  Validate config and dataset, then exit");
    println!("  --list                   Print matching grants as JSON lines");
    println!("  --status <value>         With --list: open, closed, unsure, or all");
    println!("  --employee <value>       With --list: required, not-required, or all");
    println!("  --501c3 <value>          With --list: required, not-required, or all");
    println!("  --help                   Show this help");
}
