// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use homecert_app::{Home, HomeId, HomeSystems, SystemKind, SystemRecord};
use tempfile::TempDir;

/// Year every fixture is aged against, so expectations never drift.
pub const FIXTURE_YEAR: i32 = 2026;

/// Builds homes with explicit system ages relative to a fixed year.
#[derive(Debug, Clone)]
pub struct HomeBuilder {
    home: Home,
    current_year: i32,
}

impl HomeBuilder {
    /// Home with every required system installed `age` years ago and no
    /// optional systems.
    pub fn aged(id: i64, age: i32) -> Self {
        Self::aged_at(id, age, FIXTURE_YEAR)
    }

    pub fn aged_at(id: i64, age: i32, current_year: i32) -> Self {
        let record = SystemRecord::installed(current_year - age);
        Self {
            home: Home {
                id: HomeId::new(id),
                address: format!("{} Fixture St, Austin, TX 78701", 100 + id),
                city: "Austin".to_owned(),
                state: "TX".to_owned(),
                zip: 78701,
                year_built: 1990,
                sq_ft: 1800,
                beds: 3,
                baths: 2,
                systems: HomeSystems {
                    roof: record.clone(),
                    hvac: record.clone(),
                    plumbing: record.clone(),
                    electrical: record.clone(),
                    water_heater: record.clone(),
                    windows: record.clone(),
                    garage_door: record,
                    solar: None,
                    bathroom_remodel: None,
                },
            },
            current_year,
        }
    }

    pub fn address(mut self, address: &str, city: &str, zip: u32) -> Self {
        self.home.address = address.to_owned();
        self.home.city = city.to_owned();
        self.home.zip = zip;
        self
    }

    pub fn year_built(mut self, year: i32) -> Self {
        self.home.year_built = year;
        self
    }

    /// Sets the age of `kind`, adding the record for optional systems.
    pub fn system_age(mut self, kind: SystemKind, age: i32) -> Self {
        let year = self.current_year - age;
        self.record_mut(kind).year = Some(year);
        self
    }

    pub fn unknown_year(mut self, kind: SystemKind) -> Self {
        self.record_mut(kind).year = None;
        self
    }

    pub fn solar_age(self, age: i32) -> Self {
        self.system_age(SystemKind::Solar, age)
    }

    pub fn remodel(mut self, age: i32, remodel_type: &str) -> Self {
        let year = self.current_year - age;
        self.home.systems.bathroom_remodel =
            Some(SystemRecord::installed(year).with_remodel_type(remodel_type));
        self
    }

    pub fn last_repair(mut self, kind: SystemKind, value: &str) -> Self {
        self.record_mut(kind).last_repair = Some(value.to_owned());
        self
    }

    pub fn last_flush(mut self, value: &str) -> Self {
        self.home.systems.water_heater.last_flush = Some(value.to_owned());
        self
    }

    pub fn build(self) -> Home {
        self.home
    }

    fn record_mut(&mut self, kind: SystemKind) -> &mut SystemRecord {
        let systems = &mut self.home.systems;
        match kind {
            SystemKind::Roof => &mut systems.roof,
            SystemKind::Hvac => &mut systems.hvac,
            SystemKind::Plumbing => &mut systems.plumbing,
            SystemKind::Electrical => &mut systems.electrical,
            SystemKind::WaterHeater => &mut systems.water_heater,
            SystemKind::Windows => &mut systems.windows,
            SystemKind::GarageDoor => &mut systems.garage_door,
            SystemKind::Solar => systems.solar.get_or_insert_with(SystemRecord::default),
            SystemKind::BathroomRemodel => systems
                .bathroom_remodel
                .get_or_insert_with(SystemRecord::default),
        }
    }
}

/// A small mixed neighbourhood: new, mid-life with solar, and old homes.
pub fn sample_homes() -> Vec<Home> {
    vec![
        HomeBuilder::aged(1, 1)
            .address("101 Oak St, Dallas, TX 75204", "Dallas", 75204)
            .year_built(1981)
            .last_repair(SystemKind::Roof, "2025")
            .build(),
        HomeBuilder::aged(2, 10)
            .address("102 Pine St, Austin, TX 78703", "Austin", 78703)
            .year_built(1982)
            .solar_age(8)
            .remodel(9, "Tub to Walk-in Shower")
            .build(),
        HomeBuilder::aged(3, 30)
            .address("103 Cedar St, Dallas, TX 75206", "Dallas", 75206)
            .year_built(1983)
            .last_flush("2016")
            .build(),
    ]
}

pub fn temp_output_dir() -> Result<TempDir> {
    tempfile::tempdir().context("create temp output dir")
}
