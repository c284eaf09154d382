// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use homecert_app::{HealthWeights, SystemKind};
use homecert_data::{DEFAULT_HOME_COUNT, MAX_HOME_COUNT};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2099;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    /// Per-system HealthIndex weights keyed like `roof` or `waterHeater`.
    #[serde(default)]
    pub scoring: BTreeMap<String, f64>,
    #[serde(default)]
    pub export: Export,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            scoring: BTreeMap::new(),
            export: Export::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub home_count: Option<usize>,
    pub current_year: Option<i32>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            home_count: Some(DEFAULT_HOME_COUNT),
            current_year: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HOMECERT_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set HOMECERT_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(homecert_data::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(count) = self.data.home_count
            && !(1..=MAX_HOME_COUNT).contains(&count)
        {
            bail!(
                "data.home_count in {} must be between 1 and {MAX_HOME_COUNT}, got {count}",
                path.display()
            );
        }

        if let Some(year) = self.data.current_year
            && !(MIN_YEAR..=MAX_YEAR).contains(&year)
        {
            bail!(
                "data.current_year in {} must be between {MIN_YEAR} and {MAX_YEAR}, got {year}",
                path.display()
            );
        }

        for (key, weight) in &self.scoring {
            if SystemKind::parse(key).is_none() {
                let known = SystemKind::ALL
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                bail!(
                    "unknown scoring key {key:?} in {}; use one of: {known}",
                    path.display()
                );
            }
            if !weight.is_finite() || *weight < 0.0 {
                bail!(
                    "scoring.{key} in {} must be a finite non-negative number, got {weight}",
                    path.display()
                );
            }
        }

        if let Some(dir) = &self.export.dir
            && dir.trim().is_empty()
        {
            bail!(
                "export.dir in {} is empty; remove it to use the download directory",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn home_count(&self) -> usize {
        self.data.home_count.unwrap_or(DEFAULT_HOME_COUNT)
    }

    pub fn current_year(&self) -> i32 {
        self.data
            .current_year
            .unwrap_or_else(homecert_app::current_year)
    }

    /// Default weights with any configured overrides applied.
    pub fn weights(&self) -> HealthWeights {
        let mut weights = HealthWeights::default();
        for (key, weight) in &self.scoring {
            if let Some(kind) = SystemKind::parse(key) {
                weights.set(kind, *weight);
            }
        }
        weights
    }

    pub fn export_dir(&self) -> PathBuf {
        match &self.export.dir {
            Some(dir) => PathBuf::from(dir),
            None => homecert_export::default_export_dir(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(file) => Ok(PathBuf::from(file)),
            None => homecert_data::default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# homecert config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Number of generated sample homes (1-{MAX_HOME_COUNT}).\nhome_count = {DEFAULT_HOME_COUNT}\n# Optional. Pin the year used for ages; defaults to the calendar year.\n# current_year = 2026\n\n[scoring]\n# Optional per-system HealthIndex weights; normalised by their sum.\n# roof = 0.2\n# hvac = 0.2\n# plumbing = 0.15\n# electrical = 0.15\n# waterHeater = 0.1\n# solar = 0.2\n\n[export]\n# Optional. Default is the platform download directory.\n# dir = \"/absolute/path/to/reports\"\n\n[log]\n# One of: {}. HOMECERT_LOG overrides with a full filter.\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/homecert/homecert.log)\n# file = \"/absolute/path/to/homecert.log\"\n",
            path.display(),
            LOG_LEVELS.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use homecert_app::SystemKind;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.home_count(), 30);
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.weights(), homecert_app::HealthWeights::default());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[data]\nhome_count = 10\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("add `version = 1`"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn v1_config_parses_every_section() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\nhome_count = 12\ncurrent_year = 2030\n[scoring]\nroof = 0.5\nwindows = 0.1\n[export]\ndir = \"/tmp/reports\"\n[log]\nlevel = \"debug\"\nfile = \"/tmp/homecert.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.home_count(), 12);
        assert_eq!(config.current_year(), 2030);
        let weights = config.weights();
        assert_eq!(weights.get(SystemKind::Roof), Some(0.5));
        assert_eq!(weights.get(SystemKind::Windows), Some(0.1));
        assert_eq!(weights.get(SystemKind::Hvac), Some(0.2));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/reports"));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_path()?, PathBuf::from("/tmp/homecert.log"));
        Ok(())
    }

    #[test]
    fn snake_case_scoring_keys_are_accepted() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[scoring]\nwater_heater = 0.3\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.weights().get(SystemKind::WaterHeater), Some(0.3));
        Ok(())
    }

    #[test]
    fn home_count_is_bounded() -> Result<()> {
        for count in [0, 501] {
            let (_temp, path) = write_config(&format!("version = 1\n[data]\nhome_count = {count}\n"))?;
            let error = Config::load(&path).expect_err("out of range count should fail");
            assert!(error.to_string().contains("between 1 and 500"));
        }
        Ok(())
    }

    #[test]
    fn current_year_is_bounded() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[data]\ncurrent_year = 1850\n")?;
        let error = Config::load(&path).expect_err("old year should fail");
        assert!(error.to_string().contains("data.current_year"));
        Ok(())
    }

    #[test]
    fn unknown_scoring_key_lists_valid_keys() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[scoring]\npool = 0.1\n")?;
        let error = Config::load(&path).expect_err("unknown key should fail");
        let message = error.to_string();
        assert!(message.contains("unknown scoring key \"pool\""));
        assert!(message.contains("waterHeater"));
        Ok(())
    }

    #[test]
    fn negative_weight_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[scoring]\nroof = -0.2\n")?;
        let error = Config::load(&path).expect_err("negative weight should fail");
        assert!(error.to_string().contains("scoring.roof"));
        Ok(())
    }

    #[test]
    fn non_finite_weight_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[scoring]\nsolar = nan\n")?;
        let error = Config::load(&path).expect_err("nan weight should fail");
        assert!(error.to_string().contains("finite"));
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("bad level should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn empty_export_dir_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[export]\ndir = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank dir should fail");
        assert!(error.to_string().contains("export.dir"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.home_count(), 30);
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("HOMECERT_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("HOMECERT_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("HOMECERT_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("homecert/config.toml"));
        Ok(())
    }

    #[test]
    fn log_path_falls_back_to_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("HOMECERT_LOG_PATH", "/from/env.log");
        }
        let resolved = Config::load(&path)?.log_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("HOMECERT_LOG_PATH");
        }
        assert_eq!(resolved?, PathBuf::from("/from/env.log"));
        Ok(())
    }
}
