// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{HealthWeights, Home, SolarFilter, compute_health_score};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub min_score: u8,
    pub year_min: i32,
    pub year_max: i32,
    pub solar: SolarFilter,
}

impl FilterState {
    /// Unfiltered state spanning the given year-built bounds.
    pub fn new((year_min, year_max): (i32, i32)) -> Self {
        Self {
            query: String::new(),
            min_score: 0,
            year_min,
            year_max,
            solar: SolarFilter::Any,
        }
    }

    pub fn matches_query(&self, home: &Home) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        home.address.to_lowercase().contains(&needle)
            || home.city.to_lowercase().contains(&needle)
            || home.zip.to_string().contains(&self.query)
    }

    pub fn matches_year(&self, home: &Home) -> bool {
        self.year_min <= home.year_built && home.year_built <= self.year_max
    }

    pub fn matches_solar(&self, home: &Home) -> bool {
        self.solar.matches(home.systems.has_solar())
    }

    pub fn matches(&self, home: &Home, weights: &HealthWeights, current_year: i32) -> bool {
        self.matches_query(home)
            && compute_health_score(home, weights, current_year) >= self.min_score
            && self.matches_solar(home)
            && self.matches_year(home)
    }

    pub fn is_default_for(&self, bounds: (i32, i32)) -> bool {
        *self == Self::new(bounds)
    }
}

/// Homes satisfying every predicate of `filter`, in catalog order.
pub fn filter_homes<'a>(
    homes: &'a [Home],
    filter: &FilterState,
    weights: &HealthWeights,
    current_year: i32,
) -> Vec<&'a Home> {
    homes
        .iter()
        .filter(|home| filter.matches(home, weights, current_year))
        .collect()
}

/// Min and max `year_built` across `homes`, or `None` for an empty slice.
pub fn year_bounds(homes: &[Home]) -> Option<(i32, i32)> {
    let min = homes.iter().map(|home| home.year_built).min()?;
    let max = homes.iter().map(|home| home.year_built).max()?;
    Some((min, max))
}
