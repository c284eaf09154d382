// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Home;

const MAX_INSIGHTS: usize = 3;

/// Rule-based advisory lines for the report, at most three.
pub fn risk_insights(home: &Home, score: u8) -> Vec<String> {
    let systems = &home.systems;
    let mut out = Vec::new();

    match score {
        85.. => out.push("Strong overall condition. Low short-term CapEx exposure."),
        70..=84 => out.push("Mid-life systems. Budget for targeted refresh over 3–5 yrs."),
        _ => out.push("Aging systems detected. Prioritize roof/HVAC and water heater."),
    }
    if systems.has_solar() {
        out.push("Solar present. Expect reduced utility costs; verify inverter age.");
    }
    if has_text(&systems.water_heater.last_flush) {
        out.push("Water heater maintenance recorded—keep annual flush cadence.");
    }
    if has_text(&systems.roof.last_repair) {
        out.push("Roof repairs on file—inspect flashing and underlayment.");
    }

    out.into_iter()
        .take(MAX_INSIGHTS)
        .map(str::to_owned)
        .collect()
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|value| !value.is_empty())
}
