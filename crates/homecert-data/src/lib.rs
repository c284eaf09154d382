// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod generator;

pub use generator::{DEFAULT_HOME_COUNT, QualityTier, generate_home, generate_homes};

use anyhow::{Context, Result, anyhow, bail};
use homecert_app::{
    FilterState, HealthWeights, Home, HomeId, compute_health_score, filter_homes, year_bounds,
};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "homecert";
pub const MAX_HOME_COUNT: usize = 500;

/// Immutable home collection for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    homes: Vec<Home>,
    current_year: i32,
    year_bounds: (i32, i32),
}

impl Catalog {
    /// Generates the sample collection.
    pub fn generate(count: usize, current_year: i32) -> Result<Self> {
        if count == 0 || count > MAX_HOME_COUNT {
            bail!("home count must be between 1 and {MAX_HOME_COUNT}, got {count}");
        }
        let catalog = Self::from_homes(generate_homes(count, current_year), current_year)?;
        tracing::info!(
            homes = catalog.homes.len(),
            current_year,
            "generated sample catalog"
        );
        Ok(catalog)
    }

    pub fn from_homes(homes: Vec<Home>, current_year: i32) -> Result<Self> {
        let bounds = year_bounds(&homes)
            .ok_or_else(|| anyhow!("catalog must contain at least one home"))?;

        let mut seen = BTreeSet::new();
        for home in &homes {
            if !seen.insert(home.id) {
                bail!("duplicate home id {} in catalog", home.id);
            }
            if home.address.trim().is_empty() {
                bail!("home {} has an empty address", home.id);
            }
        }

        Ok(Self {
            homes,
            current_year,
            year_bounds: bounds,
        })
    }

    pub fn homes(&self) -> &[Home] {
        &self.homes
    }

    pub fn len(&self) -> usize {
        self.homes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.homes.is_empty()
    }

    pub fn get(&self, id: HomeId) -> Option<&Home> {
        self.homes.iter().find(|home| home.id == id)
    }

    pub fn require(&self, id: HomeId) -> Result<&Home> {
        self.get(id)
            .with_context(|| format!("home {id} not found; run `homecert --list` to see ids"))
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Oldest and newest `year_built`, the default filter range.
    pub fn year_bounds(&self) -> (i32, i32) {
        self.year_bounds
    }

    pub fn score(&self, home: &Home, weights: &HealthWeights) -> u8 {
        compute_health_score(home, weights, self.current_year)
    }

    pub fn filter(&self, filter: &FilterState, weights: &HealthWeights) -> Vec<&Home> {
        filter_homes(&self.homes, filter, weights, self.current_year)
    }
}

pub fn default_log_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("HOMECERT_LOG_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set HOMECERT_LOG_PATH to a writable log file")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("homecert.log"))
}
