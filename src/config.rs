/*
 *  config.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Configuration - defaults, YAML file and command line, in that order
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::facility::{Facility, StaticDatabase};
use crate::pages::ScreenSplit;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TICK_MS: u64 = 250;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration; every group optional so files can be partial
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub tick_ms: Option<u64>,          // display refresh cadence
    pub display: Option<DisplayConfig>,
    pub interface: Option<InterfaceConfig>,
    /// navigation database; the built-in demo set when absent
    pub facilities: Option<Vec<Facility>>,
    /// waypoint idents per plan, plan 0 is the active one
    pub flight_plans: Option<Vec<Vec<String>>>,
    pub messages: Option<Vec<String>>,
    /// event script fed to the binary instead of stdin
    pub script: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Device-interface flags; they prune the page catalog at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InterfaceConfig {
    #[serde(default)]
    pub fuel_management: bool,
    #[serde(default)]
    pub air_data: bool,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "duonav", about = "DuoNav page navigator", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub tick_ms: Option<u64>,
    #[arg(long)]
    pub display_width: Option<u32>,
    #[arg(long)]
    pub display_height: Option<u32>,
    #[arg(long, action = ArgAction::Set)]
    pub fuel_management: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub air_data: Option<bool>,
    /// Read input events from a file, one per line
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub script: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.unwrap_or(DEFAULT_TICK_MS))
    }

    pub fn split(&self) -> ScreenSplit {
        let mut split = ScreenSplit::default();
        if let Some(display) = self.display.as_ref() {
            split.width = display.width.unwrap_or(split.width);
            split.height = display.height.unwrap_or(split.height);
        }
        split
    }

    pub fn interface(&self) -> InterfaceConfig {
        self.interface.unwrap_or_default()
    }

    pub fn database(&self) -> StaticDatabase {
        match self.facilities.as_ref() {
            Some(facilities) if !facilities.is_empty() => StaticDatabase::new(facilities.clone()),
            _ => StaticDatabase::demo(),
        }
    }

    pub fn flight_plans(&self) -> Vec<Vec<String>> {
        self.flight_plans.clone().unwrap_or_else(demo_flight_plans)
    }

    pub fn messages(&self) -> &[String] {
        self.messages.as_deref().unwrap_or_default()
    }
}

fn demo_flight_plans() -> Vec<Vec<String>> {
    [
        &["KSEA", "SEA", "JAWBN", "KPAE"][..],
        &["KBFI", "OLM", "KOLM"][..],
        &["KPAE", "HOME"][..],
    ]
    .iter()
    .map(|plan| plan.iter().map(|s| s.to_string()).collect())
    .collect()
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and an already parsed command line
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/duonav/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/duonav/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/duonav.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["duonav.yaml", "config/duonav.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.tick_ms.is_some()        { dst.tick_ms = src.tick_ms; }
    if src.interface.is_some()      { dst.interface = src.interface; }
    if src.facilities.is_some()     { dst.facilities = src.facilities; }
    if src.flight_plans.is_some()   { dst.flight_plans = src.flight_plans; }
    if src.messages.is_some()       { dst.messages = src.messages; }
    if src.script.is_some()         { dst.script = src.script; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.tick_ms.is_some()         { cfg.tick_ms = cli.tick_ms; }
    if cli.script.is_some()          { cfg.script = cli.script.clone(); }

    if cli.display_width.is_some() || cli.display_height.is_some() {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.display_width.is_some()   { display.width = cli.display_width; }
        if cli.display_height.is_some()  { display.height = cli.display_height; }
    }

    if cli.fuel_management.is_some() || cli.air_data.is_some() {
        let interface = cfg.interface.get_or_insert_with(InterfaceConfig::default);
        if let Some(on) = cli.fuel_management  { interface.fuel_management = on; }
        if let Some(on) = cli.air_data         { interface.air_data = on; }
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if display.width == Some(0) || display.height == Some(0) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
        if display.width.is_some_and(|w| w % 2 != 0) {
            return Err(ConfigError::Validation("display width must be even to split in two".into()));
        }
    }
    if cfg.tick_ms == Some(0) {
        return Err(ConfigError::Validation("tick_ms must be > 0".into()));
    }
    if let Some(plans) = cfg.flight_plans.as_ref() {
        if plans.iter().flatten().any(|ident| ident.trim().is_empty()) {
            return Err(ConfigError::Validation("flight plan idents must not be blank".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.tick(), Duration::from_millis(250));
        assert_eq!(cfg.split(), ScreenSplit::new(256, 64));
        assert_eq!(cfg.interface(), InterfaceConfig::default());
        assert_eq!(cfg.flight_plans().len(), 3);
        assert!(!cfg.database().is_empty());
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let yaml = "
log_level: debug
tick_ms: 100
display:
  width: 128
interface:
  fuel_management: true
flight_plans:
  - [KSEA, KBFI]
";
        let mut cfg = Config::default();
        merge(&mut cfg, serde_yaml::from_str(yaml).unwrap());
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.split(), ScreenSplit::new(128, 64));
        assert!(cfg.interface().fuel_management);
        assert!(!cfg.interface().air_data);

        let cli = Cli::try_parse_from(["duonav", "--tick-ms", "50", "--air-data", "true"]).unwrap();
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.tick(), Duration::from_millis(50));
        assert!(cfg.interface().air_data);
        assert!(cfg.interface().fuel_management);
        assert_eq!(cfg.flight_plans(), vec![vec!["KSEA".to_string(), "KBFI".to_string()]]);
    }

    #[test]
    fn test_validation() {
        let mut cfg = Config::default();
        assert!(validate(&cfg).is_ok());

        cfg.display = Some(DisplayConfig { width: Some(255), height: None });
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));

        cfg.display = Some(DisplayConfig { width: Some(0), height: Some(64) });
        assert!(validate(&cfg).is_err());

        cfg.display = None;
        cfg.tick_ms = Some(0);
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/duonav.yaml")),
            ..Cli::default()
        };
        assert!(matches!(load_with(&cli), Err(ConfigError::Validation(_))));
    }
}
