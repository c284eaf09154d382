// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{Home, SystemKind};

/// Sub-score used for a weighted non-solar system with no known year.
pub const NEUTRAL_SUBSCORE: f64 = 60.0;

/// Per-system weights for the HealthIndex. Weights are normalised by their
/// sum at scoring time, so they do not need to add up to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    entries: Vec<(SystemKind, f64)>,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            entries: vec![
                (SystemKind::Roof, 0.20),
                (SystemKind::Hvac, 0.20),
                (SystemKind::Plumbing, 0.15),
                (SystemKind::Electrical, 0.15),
                (SystemKind::WaterHeater, 0.10),
                (SystemKind::Solar, 0.20),
            ],
        }
    }
}

impl HealthWeights {
    pub fn new(entries: Vec<(SystemKind, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(SystemKind, f64)] {
        &self.entries
    }

    pub fn get(&self, kind: SystemKind) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry_kind, _)| *entry_kind == kind)
            .map(|(_, weight)| *weight)
    }

    /// Replaces the weight for `kind`, appending it when not yet weighted.
    pub fn set(&mut self, kind: SystemKind, weight: f64) {
        match self.entries.iter_mut().find(|(entry_kind, _)| *entry_kind == kind) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((kind, weight)),
        }
    }
}

/// Age band score for every system except solar.
pub const fn age_to_score(age: i32) -> u8 {
    match age {
        i32::MIN..=2 => 100,
        3..=5 => 90,
        6..=8 => 80,
        9..=12 => 65,
        13..=18 => 50,
        19..=25 => 35,
        _ => 20,
    }
}

/// Sub-score for one weighted system.
///
/// Solar is scored linearly (newer is better) and an absent array scores
/// zero; every other missing system falls back to [`NEUTRAL_SUBSCORE`].
pub fn system_subscore(home: &Home, kind: SystemKind, current_year: i32) -> f64 {
    let age = home
        .systems
        .get(kind)
        .and_then(|record| record.age(current_year));

    match (kind, age) {
        (SystemKind::Solar, Some(age)) => f64::from((100 - age).max(0)),
        (SystemKind::Solar, None) => 0.0,
        (_, Some(age)) => f64::from(age_to_score(age)),
        (_, None) => NEUTRAL_SUBSCORE,
    }
}

/// HomeCert HealthIndex in `0..=100`.
pub fn compute_health_score(home: &Home, weights: &HealthWeights, current_year: i32) -> u8 {
    let mut total = 0.0;
    let mut sum = 0.0;
    for (kind, weight) in weights.entries() {
        total += system_subscore(home, *kind, current_year) * weight;
        sum += weight;
    }

    let divisor = if sum == 0.0 { 1.0 } else { sum };
    (total / divisor).round().clamp(0.0, 100.0) as u8
}

/// HealthIndex using the default weights.
pub fn health_score(home: &Home, current_year: i32) -> u8 {
    compute_health_score(home, &HealthWeights::default(), current_year)
}

/// Demo valuation shown on the report, in whole dollars.
pub const fn estimated_retail_value(score: u8) -> i64 {
    400_000 + score as i64 * 2_000
}

/// Formats whole dollars with thousands separators, e.g. `$570,000`.
pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
