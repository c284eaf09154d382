// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

/// Calendar year used for every age computation in a session.
pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    Roof,
    Hvac,
    Plumbing,
    Electrical,
    WaterHeater,
    Windows,
    GarageDoor,
    Solar,
    BathroomRemodel,
}

impl SystemKind {
    pub const ALL: [Self; 9] = [
        Self::Roof,
        Self::Hvac,
        Self::Plumbing,
        Self::Electrical,
        Self::WaterHeater,
        Self::Windows,
        Self::GarageDoor,
        Self::Solar,
        Self::BathroomRemodel,
    ];

    /// Systems every home carries a record for.
    pub const REQUIRED: [Self; 7] = [
        Self::Roof,
        Self::Hvac,
        Self::Plumbing,
        Self::Electrical,
        Self::WaterHeater,
        Self::Windows,
        Self::GarageDoor,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roof => "roof",
            Self::Hvac => "hvac",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::WaterHeater => "waterHeater",
            Self::Windows => "windows",
            Self::GarageDoor => "garageDoor",
            Self::Solar => "solar",
            Self::BathroomRemodel => "bathroomRemodel",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "roof" => Some(Self::Roof),
            "hvac" => Some(Self::Hvac),
            "plumbing" => Some(Self::Plumbing),
            "electrical" => Some(Self::Electrical),
            "waterHeater" | "water_heater" => Some(Self::WaterHeater),
            "windows" => Some(Self::Windows),
            "garageDoor" | "garage_door" => Some(Self::GarageDoor),
            "solar" => Some(Self::Solar),
            "bathroomRemodel" | "bathroom_remodel" => Some(Self::BathroomRemodel),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Roof => "Roof",
            Self::Hvac => "HVAC",
            Self::Plumbing => "Plumbing (supply)",
            Self::Electrical => "Electrical (panel)",
            Self::WaterHeater => "Water Heater",
            Self::Windows => "Windows",
            Self::GarageDoor => "Garage Door",
            Self::Solar => "Solar Array",
            Self::BathroomRemodel => "Bathroom Remodel",
        }
    }

    /// Typical service life in years.
    pub const fn typical_life_years(self) -> i32 {
        match self {
            Self::Roof => 25,
            Self::Hvac => 15,
            Self::Plumbing => 50,
            Self::Electrical => 35,
            Self::WaterHeater => 12,
            Self::Windows => 25,
            Self::GarageDoor => 18,
            Self::Solar => 30,
            Self::BathroomRemodel => 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemRecord {
    pub year: Option<i32>,
    pub vendor: Option<String>,
    pub last_repair: Option<String>,
    pub last_flush: Option<String>,
    pub remodel_type: Option<String>,
}

impl SystemRecord {
    pub fn installed(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_last_repair(mut self, value: impl Into<String>) -> Self {
        self.last_repair = Some(value.into());
        self
    }

    pub fn with_last_flush(mut self, value: impl Into<String>) -> Self {
        self.last_flush = Some(value.into());
        self
    }

    pub fn with_remodel_type(mut self, value: impl Into<String>) -> Self {
        self.remodel_type = Some(value.into());
        self
    }

    /// Years since install, relative to `current_year`.
    pub fn age(&self, current_year: i32) -> Option<i32> {
        self.year.map(|year| current_year - year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSystems {
    pub roof: SystemRecord,
    pub hvac: SystemRecord,
    pub plumbing: SystemRecord,
    pub electrical: SystemRecord,
    pub water_heater: SystemRecord,
    pub windows: SystemRecord,
    pub garage_door: SystemRecord,
    pub solar: Option<SystemRecord>,
    pub bathroom_remodel: Option<SystemRecord>,
}

impl HomeSystems {
    pub fn get(&self, kind: SystemKind) -> Option<&SystemRecord> {
        match kind {
            SystemKind::Roof => Some(&self.roof),
            SystemKind::Hvac => Some(&self.hvac),
            SystemKind::Plumbing => Some(&self.plumbing),
            SystemKind::Electrical => Some(&self.electrical),
            SystemKind::WaterHeater => Some(&self.water_heater),
            SystemKind::Windows => Some(&self.windows),
            SystemKind::GarageDoor => Some(&self.garage_door),
            SystemKind::Solar => self.solar.as_ref(),
            SystemKind::BathroomRemodel => self.bathroom_remodel.as_ref(),
        }
    }

    pub fn has_solar(&self) -> bool {
        self.solar.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: u32,
    pub year_built: i32,
    pub sq_ft: i32,
    pub beds: i32,
    pub baths: i32,
    pub systems: HomeSystems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    Good,
    Fair,
    Poor,
}

impl ScoreTier {
    pub const fn for_score(score: u8) -> Self {
        if score >= 85 {
            Self::Good
        } else if score >= 70 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Good => (0x16, 0xa3, 0x4a),
            Self::Fair => (0xea, 0xb3, 0x08),
            Self::Poor => (0xdc, 0x26, 0x26),
        }
    }
}

/// Remaining-life colour band for a maintenance suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeBand {
    Neutral,
    Ok,
    Warning,
    Critical,
}

impl LifeBand {
    pub const fn for_remaining(remaining: Option<i32>) -> Self {
        match remaining {
            None => Self::Neutral,
            Some(years) if years <= 2 => Self::Critical,
            Some(years) if years <= 5 => Self::Warning,
            Some(_) => Self::Ok,
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Neutral => (0x4b, 0x55, 0x63),
            Self::Ok => (0x16, 0xa3, 0x4a),
            Self::Warning => (0xca, 0x8a, 0x04),
            Self::Critical => (0xdc, 0x26, 0x26),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineKind {
    Built,
    Roof,
    Hvac,
    Plumbing,
    Electrical,
    Water,
    Windows,
    Garage,
    Bath,
    Solar,
}

impl TimelineKind {
    pub const ALL: [Self; 10] = [
        Self::Built,
        Self::Roof,
        Self::Hvac,
        Self::Plumbing,
        Self::Electrical,
        Self::Water,
        Self::Windows,
        Self::Garage,
        Self::Bath,
        Self::Solar,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Roof => "roof",
            Self::Hvac => "hvac",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::Water => "water",
            Self::Windows => "windows",
            Self::Garage => "garage",
            Self::Bath => "bath",
            Self::Solar => "solar",
        }
    }

    /// Legend colour as RGB.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Built => (0x11, 0x18, 0x27),
            Self::Roof => (0xdc, 0x26, 0x26),
            Self::Hvac => (0x25, 0x63, 0xeb),
            Self::Plumbing => (0x0e, 0xa5, 0xe9),
            Self::Electrical => (0xf5, 0x9e, 0x0b),
            Self::Water => (0x14, 0xb8, 0xa6),
            Self::Windows => (0x8b, 0x5c, 0xf6),
            Self::Garage => (0x6b, 0x72, 0x80),
            Self::Bath => (0xec, 0x48, 0x99),
            Self::Solar => (0x16, 0xa3, 0x4a),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolarFilter {
    #[default]
    Any,
    Yes,
    No,
}

impl SolarFilter {
    pub const ALL: [Self; 3] = [Self::Any, Self::Yes, Self::No];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub const fn matches(self, has_solar: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Yes => has_solar,
            Self::No => !has_solar,
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|mode| *mode == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|mode| *mode == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterField {
    Query,
    MinScore,
    Solar,
    YearMin,
    YearMax,
}

impl FilterField {
    pub const ALL: [Self; 5] = [
        Self::Query,
        Self::MinScore,
        Self::Solar,
        Self::YearMin,
        Self::YearMax,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Query => "address / city / zip",
            Self::MinScore => "min HealthIndex",
            Self::Solar => "has solar",
            Self::YearMin => "year built (min)",
            Self::YearMax => "year built (max)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Browse,
    Filter(FilterField),
    Report(HomeId),
}

#[cfg(test)]
mod tests {
    use super::{LifeBand, ScoreTier, SolarFilter, SystemKind, SystemRecord};

    #[test]
    fn system_kind_keys_parse_back() {
        for kind in SystemKind::ALL {
            assert_eq!(SystemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SystemKind::parse("water_heater"), Some(SystemKind::WaterHeater));
        assert_eq!(SystemKind::parse("attic"), None);
    }

    #[test]
    fn life_band_thresholds() {
        assert_eq!(LifeBand::for_remaining(None), LifeBand::Neutral);
        assert_eq!(LifeBand::for_remaining(Some(0)), LifeBand::Critical);
        assert_eq!(LifeBand::for_remaining(Some(2)), LifeBand::Critical);
        assert_eq!(LifeBand::for_remaining(Some(3)), LifeBand::Warning);
        assert_eq!(LifeBand::for_remaining(Some(5)), LifeBand::Warning);
        assert_eq!(LifeBand::for_remaining(Some(6)), LifeBand::Ok);
    }

    #[test]
    fn score_tier_thresholds() {
        assert_eq!(ScoreTier::for_score(100), ScoreTier::Good);
        assert_eq!(ScoreTier::for_score(85), ScoreTier::Good);
        assert_eq!(ScoreTier::for_score(84), ScoreTier::Fair);
        assert_eq!(ScoreTier::for_score(70), ScoreTier::Fair);
        assert_eq!(ScoreTier::for_score(69), ScoreTier::Poor);
    }

    #[test]
    fn solar_filter_cycles_through_all_modes() {
        assert_eq!(SolarFilter::Any.next(), SolarFilter::Yes);
        assert_eq!(SolarFilter::Yes.next(), SolarFilter::No);
        assert_eq!(SolarFilter::No.next(), SolarFilter::Any);
        assert_eq!(SolarFilter::Any.prev(), SolarFilter::No);
        assert!(SolarFilter::Any.matches(false));
        assert!(SolarFilter::Yes.matches(true));
        assert!(!SolarFilter::Yes.matches(false));
        assert!(SolarFilter::No.matches(false));
    }

    #[test]
    fn record_age_is_relative_to_current_year() {
        assert_eq!(SystemRecord::installed(2010).age(2026), Some(16));
        assert_eq!(SystemRecord::default().age(2026), None);
    }
}
