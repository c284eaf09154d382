// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use homecert_app::{AppState, HealthWeights, HomeId, ScoreTier, build_report};
use homecert_data::Catalog;
use homecert_export::Exporter;
use runtime::CatalogRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
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
            "load config {}; run `homecert --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let log_path = logging::init(&config)?;
    tracing::info!(
        config = %options.config_path.display(),
        log = %log_path.display(),
        "starting homecert"
    );

    let catalog = Catalog::generate(config.home_count(), config.current_year())
        .with_context(|| {
            format!(
                "generate sample homes; check [data] in {}",
                options.config_path.display()
            )
        })?;
    let weights = config.weights();
    if options.check_only {
        return Ok(());
    }

    if options.list {
        for line in catalog_listing(&catalog, &weights) {
            println!("{line}");
        }
        return Ok(());
    }

    let exporter = Exporter::new(config.export_dir());
    if let Some(id) = options.export_id {
        let home = catalog.require(id)?;
        let report = build_report(home, &weights, catalog.current_year());
        let outcome = exporter.export(&report)?;
        println!("{}", outcome.path.display());
        if outcome.degraded {
            eprintln!(
                "report layout failed; wrote a placeholder instead (details in {})",
                log_path.display()
            );
        }
        return Ok(());
    }

    let mut state = AppState::new(catalog.year_bounds());
    let mut runtime = CatalogRuntime::new(catalog, weights, exporter);
    let result = homecert_tui::run_app(&mut state, &mut runtime);
    tracing::info!(ok = result.is_ok(), "ui closed");
    result
}

fn catalog_listing(catalog: &Catalog, weights: &HealthWeights) -> Vec<String> {
    catalog
        .homes()
        .iter()
        .map(|home| {
            let score = catalog.score(home, weights);
            format!(
                "{:>3}  {:>3} {:<4}  built {}  solar {:<3}  {}",
                home.id.get(),
                score,
                ScoreTier::for_score(score).as_str(),
                home.year_built,
                if home.systems.has_solar() { "yes" } else { "no" },
                home.address
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    list: bool,
    export_id: Option<HomeId>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        list: false,
        export_id: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--list" => {
                options.list = true;
            }
            "--export" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("--export requires a home id; run `homecert --list` to see ids")
                })?;
                let value = value.as_ref();
                let id = value.parse::<i64>().with_context(|| {
                    format!("--export expects a numeric home id, got {value:?}")
                })?;
                options.export_id = Some(HomeId::new(id));
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("homecert");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + sample data, then exit");
    println!("  --list                   Print the sample homes with their HealthIndex");
    println!("  --export <home-id>       Write the PDF report for one home and print its path");
    println!("  --help                   Show this help");
}
