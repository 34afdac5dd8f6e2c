use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::DEFAULT_FB_DEVICE;
use crate::display::Palette;
use crate::settings::ClockPosition;

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

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,      // e.g., "info" | "debug"
    /// where display settings are persisted
    pub settings_path: Option<PathBuf>,
    pub surface: Option<SurfaceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SurfaceConfig {
    pub kind: Option<SurfaceKind>,
    pub device: Option<PathBuf>,        // e.g. "/dev/fb0"
    pub backlight: Option<PathBuf>,     // e.g. "/sys/class/backlight/rpi_backlight"
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub density: Option<f32>,           // pixels per dp
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Framebuffer,
    Snapshot,
    #[default]
    Headless,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "nightclock", version, about = "A quiet clock for the nightstand")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long, value_enum)]
    pub surface: Option<SurfaceKind>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub fb_device: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot_path: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub settings: Option<PathBuf>,
    /// persist the clock position before starting (left | right)
    #[arg(long)]
    pub position: Option<ClockPosition>,
    /// persist the background color before starting (black | dark-gray | dark-blue | dark-red)
    #[arg(long)]
    pub background: Option<Palette>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    /// Effective log level: config value, else "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn surface(&self) -> SurfaceConfig {
        self.surface.clone().unwrap_or_default()
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;
    Ok((cfg, cli))
}

/// Layer defaults, the YAML file and `cli`, then validate.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
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

    // 4) fill what validation relies on, then validate
    apply_surface_defaults(&mut cfg);
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of effective config (nice for debugging)
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/nightclock/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/nightclock/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/nightclock.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["nightclock.yaml", "config/nightclock.yaml"] {
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
    if src.settings_path.is_some()  { dst.settings_path = src.settings_path; }
    match (&mut dst.surface, src.surface) {
        (None, Some(c)) => dst.surface = Some(c),
        (Some(d), Some(s)) => merge_surface(d, s),
        _ => {}
    }
}

fn merge_surface(dst: &mut SurfaceConfig, src: SurfaceConfig) {
    if src.kind.is_some()           { dst.kind = src.kind; }
    if src.device.is_some()         { dst.device = src.device; }
    if src.backlight.is_some()      { dst.backlight = src.backlight; }
    if src.width.is_some()          { dst.width = src.width; }
    if src.height.is_some()         { dst.height = src.height; }
    if src.density.is_some()        { dst.density = src.density; }
    if src.snapshot_path.is_some()  { dst.snapshot_path = src.snapshot_path; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.debug {
        cfg.log_level = Some("debug".to_string());
    } else if cli.log_level.is_some() {
        cfg.log_level = cli.log_level.clone();
    }
    if cli.settings.is_some() { cfg.settings_path = cli.settings.clone(); }

    let any_surface = cli.surface.is_some() || cli.fb_device.is_some() || cli.snapshot_path.is_some();
    if any_surface && cfg.surface.is_none() {
        cfg.surface = Some(SurfaceConfig::default());
    }
    if let Some(surface) = cfg.surface.as_mut() {
        if cli.surface.is_some()        { surface.kind = cli.surface; }
        if cli.fb_device.is_some()      { surface.device = cli.fb_device.clone(); }
        if cli.snapshot_path.is_some()  { surface.snapshot_path = cli.snapshot_path.clone(); }
    }
}

fn apply_surface_defaults(cfg: &mut Config) {
    if let Some(surface) = cfg.surface.as_mut() {
        if surface.kind == Some(SurfaceKind::Framebuffer) && surface.device.is_none() {
            surface.device = Some(PathBuf::from(DEFAULT_FB_DEVICE));
        }
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(surface) = cfg.surface.as_ref() {
        if surface.width == Some(0) || surface.height == Some(0) {
            return Err(ConfigError::Validation("surface width/height must be > 0".into()));
        }
        if let Some(d) = surface.density {
            if d <= 0.0 || !d.is_finite() {
                return Err(ConfigError::Validation("surface density must be > 0".into()));
            }
        }
        if surface.kind == Some(SurfaceKind::Framebuffer) && surface.device.is_none() {
            return Err(ConfigError::Validation("framebuffer surface requires a device".into()));
        }
    }
    if let Some(level) = cfg.log_level.as_deref() {
        if level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Validation(format!("unknown log_level '{}'", level)));
        }
    }
    Ok(())
}
