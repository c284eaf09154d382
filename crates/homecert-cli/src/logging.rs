// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const LOG_ENV: &str = "HOMECERT_LOG";

/// Sends `tracing` output to the log file; the terminal belongs to the UI.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = config.log_path()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| {
            format!(
                "open log file {}; set [log].file or HOMECERT_LOG_PATH to a writable path",
                path.display()
            )
        })?;

    let directives = filter_directives(env::var(LOG_ENV).ok(), config.log_level());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?}; check {LOG_ENV}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("install log subscriber")?;
    Ok(path)
}

fn filter_directives(env_value: Option<String>, config_level: &str) -> String {
    env_value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config_level.to_owned())
}
