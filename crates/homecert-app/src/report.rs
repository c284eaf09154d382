// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{
    HealthWeights, Home, HomeId, HomeSystems, LifeBand, MaintenanceSuggestion, ScoreTier,
    SystemKind, TimelineEvent, TimelineKind, build_timeline, compute_health_score,
    estimated_retail_value, format_dollars, maintenance_suggestions, risk_insights,
};

pub const REPORT_TITLE: &str = "HomeCert Property History Report";
pub const TIMELINE_HEADING: &str = "Maintenance Timeline";

/// How far back the timeline axis reaches when every event is recent.
const TIMELINE_MIN_SPAN_YEARS: i32 = 20;

pub const GLOSSARY: [(&str, &str); 9] = [
    (
        "Roof Replacement",
        "Full replacement of roof covering and materials, typically every 20–30 years.",
    ),
    (
        "HVAC Service",
        "Inspection or replacement of heating, ventilation, and air conditioning systems; lifespan ~15 years.",
    ),
    (
        "Water Heater Flush",
        "Routine maintenance to remove sediment; lifespan ~12 years.",
    ),
    (
        "Plumbing (Supply)",
        "Replacement or maintenance of supply pipes and fixtures; lifespan ~50 years depending on material.",
    ),
    (
        "Electrical (Panel)",
        "Replacement or upgrade of electrical service panel; lifespan ~35 years.",
    ),
    (
        "Windows",
        "Replacement of window units and seals; lifespan ~25 years.",
    ),
    (
        "Garage Door",
        "Repairs or replacement of door, tracks, and opener; lifespan ~18 years.",
    ),
    (
        "Solar Array",
        "Installation of rooftop solar panels; lifespan ~30 years, may require inverter replacement sooner.",
    ),
    (
        "Bathroom Remodel",
        "Renovation such as tub-to-shower conversion; recommended updates every 20 years.",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTone {
    Plain,
    Muted,
    Score(ScoreTier),
    Band(LifeBand),
    Timeline(TimelineKind),
}

impl LineTone {
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Plain => (0x11, 0x18, 0x27),
            Self::Muted => (0x4b, 0x55, 0x63),
            Self::Score(tier) => tier.rgb(),
            Self::Band(band) => band.rgb(),
            Self::Timeline(kind) => kind.rgb(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub text: String,
    pub tone: LineTone,
}

impl ReportLine {
    fn new(text: impl Into<String>, tone: LineTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// A colour key shown above a section's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub tone: LineTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub legend: Vec<LegendEntry>,
    pub lines: Vec<ReportLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeReport {
    pub home_id: HomeId,
    pub title: String,
    pub address: String,
    pub score: u8,
    pub tier: ScoreTier,
    pub estimated_value: i64,
    pub current_year: i32,
    pub timeline: Vec<TimelineEvent>,
    pub records: Vec<String>,
    pub suggestions: Vec<MaintenanceSuggestion>,
    pub insights: Vec<String>,
}

/// Composes everything shown for one home. Recomputed on every view.
pub fn build_report(home: &Home, weights: &HealthWeights, current_year: i32) -> HomeReport {
    let score = compute_health_score(home, weights, current_year);
    HomeReport {
        home_id: home.id,
        title: REPORT_TITLE.to_owned(),
        address: home.address.clone(),
        score,
        tier: ScoreTier::for_score(score),
        estimated_value: estimated_retail_value(score),
        current_year,
        timeline: build_timeline(home),
        records: system_record_lines(&home.systems),
        suggestions: maintenance_suggestions(&home.systems, current_year),
        insights: risk_insights(home, score),
    }
}

/// One line per recorded system, listing whatever details are known.
pub fn system_record_lines(systems: &HomeSystems) -> Vec<String> {
    const ORDER: [SystemKind; 9] = [
        SystemKind::Roof,
        SystemKind::Hvac,
        SystemKind::Plumbing,
        SystemKind::Electrical,
        SystemKind::WaterHeater,
        SystemKind::Windows,
        SystemKind::GarageDoor,
        SystemKind::BathroomRemodel,
        SystemKind::Solar,
    ];

    ORDER
        .iter()
        .filter_map(|kind| {
            let record = systems.get(*kind)?;
            let mut parts = vec![
                record
                    .year
                    .map(|year| year.to_string())
                    .unwrap_or_else(|| "unknown".to_owned()),
            ];
            if let Some(remodel_type) = &record.remodel_type {
                parts.push(remodel_type.clone());
            }
            if let Some(vendor) = &record.vendor {
                parts.push(format!("Vendor: {vendor}"));
            }
            if let Some(last_repair) = &record.last_repair {
                parts.push(format!("Last Repair: {last_repair}"));
            }
            if let Some(last_flush) = &record.last_flush {
                parts.push(format!("Last Flush: {last_flush}"));
            }
            Some(format!("{}: {}", record_label(*kind), parts.join(", ")))
        })
        .collect()
}

/// One entry per timeline kind, in the kind's marker colour.
pub fn timeline_legend() -> Vec<LegendEntry> {
    TimelineKind::ALL
        .into_iter()
        .map(|kind| LegendEntry {
            label: kind.as_str().to_owned(),
            tone: LineTone::Timeline(kind),
        })
        .collect()
}

fn record_label(kind: SystemKind) -> &'static str {
    match kind {
        SystemKind::Plumbing => "Plumbing",
        SystemKind::Electrical => "Electrical",
        SystemKind::Solar => "Solar",
        other => other.label(),
    }
}

impl HomeReport {
    pub fn estimated_value_display(&self) -> String {
        format_dollars(self.estimated_value)
    }

    /// Year range for drawing the timeline axis.
    pub fn timeline_span(&self) -> Option<(i32, i32)> {
        let first = self.timeline.first()?.year;
        let start = first.min(self.current_year - TIMELINE_MIN_SPAN_YEARS);
        Some((start, self.current_year.max(start + 1)))
    }

    /// Report content as titled sections, in display order.
    pub fn sections(&self) -> Vec<ReportSection> {
        let summary = vec![
            ReportLine::new(self.address.clone(), LineTone::Muted),
            ReportLine::new(
                format!("HomeCert HealthIndex {}", self.score),
                LineTone::Score(self.tier),
            ),
        ];
        let value = vec![ReportLine::new(
            format!(
                "Estimated HomeCert Retail Value: {}",
                self.estimated_value_display()
            ),
            LineTone::Plain,
        )];
        let timeline = self
            .timeline
            .iter()
            .map(|event| {
                ReportLine::new(
                    format!("{} · {}", event.year, event.label),
                    LineTone::Timeline(event.kind),
                )
            })
            .collect();
        let records = self
            .records
            .iter()
            .map(|line| ReportLine::new(line.clone(), LineTone::Plain))
            .collect();
        let suggestions = self
            .suggestions
            .iter()
            .map(|suggestion| ReportLine::new(suggestion.text.clone(), LineTone::Band(suggestion.band)))
            .collect();
        let insights = self
            .insights
            .iter()
            .map(|line| ReportLine::new(line.clone(), LineTone::Plain))
            .collect();
        let glossary = GLOSSARY
            .iter()
            .map(|(term, definition)| ReportLine::new(format!("{term}: {definition}"), LineTone::Muted))
            .collect();

        [
            ("Summary", Vec::new(), summary),
            ("History-Based Value Report", Vec::new(), value),
            (TIMELINE_HEADING, timeline_legend(), timeline),
            ("System & Maintenance Records", Vec::new(), records),
            ("Predictive Maintenance & Remaining Life", Vec::new(), suggestions),
            ("Insights", Vec::new(), insights),
            ("Glossary of Terms", Vec::new(), glossary),
        ]
        .into_iter()
        .map(|(heading, legend, lines)| ReportSection {
            heading: heading.to_owned(),
            legend,
            lines,
        })
        .collect()
    }
}
