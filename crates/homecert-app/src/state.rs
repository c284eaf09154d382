// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, FilterField, FilterState, HomeId, SolarFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub filter: FilterState,
    pub selected: Option<HomeId>,
    pub status_line: Option<String>,
    year_bounds: (i32, i32),
}

impl AppState {
    pub fn new(year_bounds: (i32, i32)) -> Self {
        Self {
            mode: AppMode::Browse,
            filter: FilterState::new(year_bounds),
            selected: None,
            status_line: None,
            year_bounds,
        }
    }

    pub fn year_bounds(&self) -> (i32, i32) {
        self.year_bounds
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SetQuery(String),
    SetMinScore(u8),
    SetYearMin(i32),
    SetYearMax(i32),
    SetSolar(SolarFilter),
    /// Steps the solar filter forward (`true`) or backward.
    CycleSolar(bool),
    ResetFilters,
    FocusFilter(FilterField),
    NextFilterField,
    PrevFilterField,
    ExitToBrowse,
    OpenReport(HomeId),
    CloseReport,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    FilterChanged,
    ReportOpened(HomeId),
    ReportClosed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SetQuery(query) => {
                if self.filter.query == query {
                    return Vec::new();
                }
                self.filter.query = query;
                vec![AppEvent::FilterChanged]
            }
            AppCommand::SetMinScore(score) => {
                let score = score.min(100);
                self.update_filter(|filter| filter.min_score = score)
            }
            AppCommand::SetYearMin(year) => {
                let (floor, _) = self.year_bounds;
                let year = year.max(floor).min(self.filter.year_max);
                self.update_filter(|filter| filter.year_min = year)
            }
            AppCommand::SetYearMax(year) => {
                let (_, ceiling) = self.year_bounds;
                let year = year.min(ceiling).max(self.filter.year_min);
                self.update_filter(|filter| filter.year_max = year)
            }
            AppCommand::SetSolar(mode) => self.update_filter(|filter| filter.solar = mode),
            AppCommand::CycleSolar(forward) => self.update_filter(|filter| {
                filter.solar = if forward {
                    filter.solar.next()
                } else {
                    filter.solar.prev()
                };
            }),
            AppCommand::ResetFilters => {
                let reset = FilterState::new(self.year_bounds);
                let mut events = self.update_filter(|filter| *filter = reset);
                events.push(self.set_status("filters reset"));
                events
            }
            AppCommand::FocusFilter(field) => self.set_mode(AppMode::Filter(field)),
            AppCommand::NextFilterField => self.rotate_filter_field(1),
            AppCommand::PrevFilterField => self.rotate_filter_field(-1),
            AppCommand::ExitToBrowse => self.set_mode(AppMode::Browse),
            AppCommand::OpenReport(id) => {
                self.selected = Some(id);
                self.mode = AppMode::Report(id);
                vec![AppEvent::ModeChanged(self.mode), AppEvent::ReportOpened(id)]
            }
            AppCommand::CloseReport => {
                if !matches!(self.mode, AppMode::Report(_)) {
                    return Vec::new();
                }
                self.mode = AppMode::Browse;
                vec![AppEvent::ModeChanged(self.mode), AppEvent::ReportClosed]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn update_filter(&mut self, apply: impl FnOnce(&mut FilterState)) -> Vec<AppEvent> {
        let before = self.filter.clone();
        apply(&mut self.filter);
        if self.filter == before {
            Vec::new()
        } else {
            vec![AppEvent::FilterChanged]
        }
    }

    fn set_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }

    fn rotate_filter_field(&mut self, delta: isize) -> Vec<AppEvent> {
        let fields = FilterField::ALL;
        let current = match self.mode {
            AppMode::Filter(field) => fields.iter().position(|f| *f == field).unwrap_or(0) as isize,
            _ if delta > 0 => -1,
            _ => 0,
        };
        let len = fields.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.set_mode(AppMode::Filter(fields[next]))
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
