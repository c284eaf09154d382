// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::{Home, TimelineKind};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(19|20)\d{2}").expect("static year regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: i32,
    pub label: String,
    pub kind: TimelineKind,
}

/// First 1900-2099 year found in free text, e.g. `"03/2019"` -> 2019.
pub fn year_from_text(value: &str) -> Option<i32> {
    YEAR_PATTERN
        .find(value)
        .and_then(|found| found.as_str().parse().ok())
}

pub fn year_from_number(value: i32) -> Option<i32> {
    (1900..=2099).contains(&value).then_some(value)
}

/// Dated facts about a home, oldest first. Facts without a usable year are
/// skipped; events in the same year keep their emission order.
pub fn build_timeline(home: &Home) -> Vec<TimelineEvent> {
    let systems = &home.systems;
    let mut events = Vec::new();
    let mut push = |year: Option<i32>, label: &str, kind: TimelineKind| {
        if let Some(year) = year {
            events.push(TimelineEvent {
                year,
                label: label.to_owned(),
                kind,
            });
        }
    };
    let numeric = |year: Option<i32>| year.and_then(year_from_number);
    let text = |value: &Option<String>| value.as_deref().and_then(year_from_text);

    push(year_from_number(home.year_built), "Built", TimelineKind::Built);
    push(numeric(systems.roof.year), "Roof installed", TimelineKind::Roof);
    push(text(&systems.roof.last_repair), "Roof repaired", TimelineKind::Roof);
    push(numeric(systems.hvac.year), "HVAC installed", TimelineKind::Hvac);
    push(numeric(systems.plumbing.year), "Plumbing updated", TimelineKind::Plumbing);
    push(numeric(systems.electrical.year), "Electrical panel", TimelineKind::Electrical);
    push(
        numeric(systems.water_heater.year),
        "Water heater installed",
        TimelineKind::Water,
    );
    push(
        text(&systems.water_heater.last_flush),
        "Water heater flush",
        TimelineKind::Water,
    );
    push(numeric(systems.windows.year), "Windows replaced", TimelineKind::Windows);
    push(
        numeric(systems.garage_door.year),
        "Garage door installed",
        TimelineKind::Garage,
    );
    push(
        text(&systems.garage_door.last_repair),
        "Garage door repair",
        TimelineKind::Garage,
    );
    if let Some(remodel) = &systems.bathroom_remodel {
        let label = remodel
            .remodel_type
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or("Bathroom remodel");
        push(numeric(remodel.year), label, TimelineKind::Bath);
    }
    if let Some(solar) = &systems.solar {
        push(numeric(solar.year), "Solar installed", TimelineKind::Solar);
    }

    events.sort_by_key(|event| event.year);
    events
}
