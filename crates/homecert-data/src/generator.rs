// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use homecert_app::{Home, HomeId, HomeSystems, SystemRecord};

pub const DEFAULT_HOME_COUNT: usize = 30;

const STREETS: [&str; 10] = [
    "Maple", "Oak", "Pine", "Cedar", "Elm", "Willow", "Birch", "Walnut", "Chestnut", "Sycamore",
];
const AUSTIN_ZIPS: [u32; 10] = [
    78701, 78702, 78703, 78704, 78705, 78723, 78727, 78731, 78741, 78745,
];
const DALLAS_ZIPS: [u32; 10] = [
    75201, 75204, 75205, 75206, 75208, 75214, 75219, 75225, 75230, 75248,
];

const ROOF_VENDOR: &str = "Ace Roofing Co.";
const HVAC_VENDOR: &str = "HVAC Heroes";
const PLUMBING_VENDOR: &str = "PipeMasters Inc.";
const SOLAR_VENDOR: &str = "BrightSolar LLC";
const WINDOW_VENDOR: &str = "WindowWorld";
const GARAGE_VENDOR: &str = "GaragePros";
const BATH_VENDOR: &str = "BathRemodelers";
const REMODEL_TYPE: &str = "Tub to Walk-in Shower";

/// Condition tier a generated home is drawn from; cycles with the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    Green,
    Yellow,
    Red,
}

impl QualityTier {
    pub const fn for_index(index: i32) -> Self {
        match (index - 1).rem_euclid(3) {
            0 => Self::Green,
            1 => Self::Yellow,
            _ => Self::Red,
        }
    }
}

/// Deterministic sample homes numbered `1..=count`.
pub fn generate_homes(count: usize, current_year: i32) -> Vec<Home> {
    (1..=count as i32)
        .map(|index| generate_home(index, current_year))
        .collect()
}

pub fn generate_home(index: i32, current_year: i32) -> Home {
    let i = index;
    let systems = match QualityTier::for_index(i) {
        QualityTier::Green => green_systems(i, current_year),
        QualityTier::Yellow => yellow_systems(i),
        QualityTier::Red => red_systems(i),
    };

    let slot = i.rem_euclid(10) as usize;
    let (city, zip) = if i % 2 == 0 {
        ("Austin", AUSTIN_ZIPS[slot])
    } else {
        ("Dallas", DALLAS_ZIPS[slot])
    };
    let street = STREETS[slot];

    Home {
        id: HomeId::new(i64::from(i)),
        address: format!("{} {street} St, {city}, TX {zip}", 100 + i),
        city: city.to_owned(),
        state: "TX".to_owned(),
        zip,
        year_built: 1980 + i % 40,
        sq_ft: 1500 + (i % 10) * 100,
        beds: i % 5 + 2,
        baths: i % 3 + 1,
        systems,
    }
}

fn green_systems(i: i32, y: i32) -> HomeSystems {
    HomeSystems {
        roof: SystemRecord::installed(y - (1 + i % 2))
            .with_vendor(ROOF_VENDOR)
            .with_last_repair((y - 1).to_string()),
        hvac: SystemRecord::installed(y - (2 + i % 3)).with_vendor(HVAC_VENDOR),
        plumbing: SystemRecord::installed(y - (3 + i % 3)).with_vendor(PLUMBING_VENDOR),
        electrical: SystemRecord::installed(y - (2 + i % 4)),
        water_heater: SystemRecord::installed(y - (1 + i % 2))
            .with_vendor(PLUMBING_VENDOR)
            .with_last_flush(y.to_string()),
        windows: SystemRecord::installed(y - (2 + i % 3)).with_vendor(WINDOW_VENDOR),
        garage_door: SystemRecord::installed(y - (1 + i % 3))
            .with_vendor(GARAGE_VENDOR)
            .with_last_repair((y - 1).to_string()),
        bathroom_remodel: Some(bath_remodel(y - (2 + i % 2))),
        solar: (i % 2 == 0).then(|| SystemRecord::installed(y - (1 + i % 2)).with_vendor(SOLAR_VENDOR)),
    }
}

fn yellow_systems(i: i32) -> HomeSystems {
    HomeSystems {
        roof: SystemRecord::installed(2013 + i % 5)
            .with_vendor(ROOF_VENDOR)
            .with_last_repair((2018 + i % 3).to_string()),
        hvac: SystemRecord::installed(2014 + i % 5).with_vendor(HVAC_VENDOR),
        plumbing: SystemRecord::installed(2010 + i % 6).with_vendor(PLUMBING_VENDOR),
        electrical: SystemRecord::installed(2008 + i % 8),
        water_heater: SystemRecord::installed(2013 + i % 4)
            .with_vendor(PLUMBING_VENDOR)
            .with_last_flush((2020 + i % 2).to_string()),
        windows: SystemRecord::installed(2015 + i % 3).with_vendor(WINDOW_VENDOR),
        garage_door: SystemRecord::installed(2014 + i % 4)
            .with_vendor(GARAGE_VENDOR)
            .with_last_repair((2019 + i % 2).to_string()),
        bathroom_remodel: Some(bath_remodel(2016 + i % 3)),
        solar: (i % 4 == 0).then(|| SystemRecord::installed(2016 + i % 3).with_vendor(SOLAR_VENDOR)),
    }
}

fn red_systems(i: i32) -> HomeSystems {
    HomeSystems {
        roof: SystemRecord::installed(2000 + i % 5)
            .with_vendor(ROOF_VENDOR)
            .with_last_repair((2009 + i % 5).to_string()),
        hvac: SystemRecord::installed(2002 + i % 6).with_vendor(HVAC_VENDOR),
        plumbing: SystemRecord::installed(1995 + i % 8).with_vendor(PLUMBING_VENDOR),
        electrical: SystemRecord::installed(1990 + i % 10),
        water_heater: SystemRecord::installed(2005 + i % 6)
            .with_vendor(PLUMBING_VENDOR)
            .with_last_flush((2015 + i % 3).to_string()),
        windows: SystemRecord::installed(2006 + i % 4).with_vendor(WINDOW_VENDOR),
        garage_door: SystemRecord::installed(2008 + i % 5)
            .with_vendor(GARAGE_VENDOR)
            .with_last_repair((2013 + i % 3).to_string()),
        bathroom_remodel: Some(bath_remodel(2010 + i % 4)),
        solar: None,
    }
}

fn bath_remodel(year: i32) -> SystemRecord {
    SystemRecord::installed(year)
        .with_vendor(BATH_VENDOR)
        .with_remodel_type(REMODEL_TYPE)
}

#[cfg(test)]
mod tests {
    use super::{QualityTier, generate_home, generate_homes};

    const YEAR: i32 = 2026;

    #[test]
    fn tiers_cycle_by_index() {
        assert_eq!(QualityTier::for_index(1), QualityTier::Green);
        assert_eq!(QualityTier::for_index(2), QualityTier::Yellow);
        assert_eq!(QualityTier::for_index(3), QualityTier::Red);
        assert_eq!(QualityTier::for_index(4), QualityTier::Green);
    }

    #[test]
    fn address_fields_follow_index() {
        let home = generate_home(1, YEAR);
        assert_eq!(home.address, "101 Oak St, Dallas, TX 75204");
        assert_eq!(home.city, "Dallas");
        assert_eq!(home.zip, 75204);
        assert_eq!(home.year_built, 1981);
        assert_eq!(home.sq_ft, 1600);
        assert_eq!(home.beds, 3);
        assert_eq!(home.baths, 2);

        let home = generate_home(10, YEAR);
        assert_eq!(home.address, "110 Maple St, Austin, TX 78701");
    }

    #[test]
    fn green_home_systems_are_recent() {
        let home = generate_home(4, YEAR);
        assert_eq!(home.systems.roof.year, Some(YEAR - 1));
        assert_eq!(home.systems.roof.last_repair.as_deref(), Some("2025"));
        assert_eq!(home.systems.water_heater.last_flush.as_deref(), Some("2026"));
        assert_eq!(home.systems.solar.as_ref().and_then(|s| s.year), Some(YEAR - 1));
        assert_eq!(home.systems.electrical.vendor, None);
    }

    #[test]
    fn red_homes_never_have_solar() {
        let homes = generate_homes(30, YEAR);
        assert_eq!(homes.len(), 30);
        for home in homes.iter().filter(|home| home.id.get() % 3 == 0) {
            assert!(home.systems.solar.is_none(), "home {} has solar", home.id);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_homes(12, YEAR), generate_homes(12, YEAR));
    }
}
