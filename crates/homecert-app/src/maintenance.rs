// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{HomeSystems, LifeBand, SystemKind, SystemRecord};

/// Order in which suggestions are listed; solar and bathroom remodel only
/// appear when the home has a record for them.
const SUGGESTION_ORDER: [SystemKind; 9] = [
    SystemKind::Roof,
    SystemKind::Hvac,
    SystemKind::WaterHeater,
    SystemKind::Plumbing,
    SystemKind::Electrical,
    SystemKind::Windows,
    SystemKind::GarageDoor,
    SystemKind::Solar,
    SystemKind::BathroomRemodel,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSuggestion {
    pub kind: SystemKind,
    pub text: String,
    pub band: LifeBand,
}

/// Years of service left, floored at zero. `None` when the install year
/// is unknown.
pub fn remaining_life(installed_year: Option<i32>, typical: i32, current_year: i32) -> Option<i32> {
    let installed_year = installed_year?;
    let age = (current_year - installed_year).max(0);
    Some((typical - age).max(0))
}

pub fn maintenance_suggestions(
    systems: &HomeSystems,
    current_year: i32,
) -> Vec<MaintenanceSuggestion> {
    SUGGESTION_ORDER
        .iter()
        .filter_map(|kind| {
            systems
                .get(*kind)
                .map(|record| suggestion_for(*kind, record, current_year))
        })
        .collect()
}

fn suggestion_for(kind: SystemKind, record: &SystemRecord, current_year: i32) -> MaintenanceSuggestion {
    let remaining = remaining_life(record.year, kind.typical_life_years(), current_year);
    let age = match record.age(current_year) {
        Some(age) => format!("{age} yrs old"),
        None => "age unknown".to_owned(),
    };
    let remaining_text = remaining
        .map(|years| format!(", ~{years} yrs remaining"))
        .unwrap_or_default();
    let detail = extra_detail(kind, record)
        .map(|detail| format!(" — {detail}"))
        .unwrap_or_default();

    MaintenanceSuggestion {
        kind,
        text: format!("{}: {age}{remaining_text}{detail}", kind.label()),
        band: LifeBand::for_remaining(remaining),
    }
}

fn extra_detail(kind: SystemKind, record: &SystemRecord) -> Option<String> {
    match kind {
        SystemKind::Roof | SystemKind::GarageDoor => record
            .last_repair
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| format!("last repair {value}")),
        SystemKind::WaterHeater => record
            .last_flush
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| format!("last flush {value}")),
        SystemKind::BathroomRemodel => record
            .remodel_type
            .clone()
            .filter(|value| !value.is_empty()),
        SystemKind::Hvac
        | SystemKind::Plumbing
        | SystemKind::Electrical
        | SystemKind::Windows
        | SystemKind::Solar => None,
    }
}
