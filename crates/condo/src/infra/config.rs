//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::slots::SlotSchedule;
use crate::domain::model::Role;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".condo/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub reservations: Reservations,
    #[serde(default)]
    pub panic: Panic,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub mock: Mock,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub role: Role,
    #[serde(default = "Defaults::default_unit")]
    pub unit: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Defaults {
    fn default_unit() -> String {
        "A-101".to_owned()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            role: Role::default(),
            unit: Self::default_unit(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservations {
    #[serde(default)]
    opening_hour: Option<u8>,
    #[serde(default)]
    closing_hour: Option<u8>,
    #[serde(default)]
    booking_window_days: Option<u8>,
}

impl Reservations {
    pub fn opening_hour(&self) -> u8 {
        self.opening_hour.unwrap_or(9)
    }

    pub fn closing_hour(&self) -> u8 {
        self.closing_hour.unwrap_or(21)
    }

    /// Number of bookable days starting today; never less than one.
    pub fn booking_window_days(&self) -> u8 {
        self.booking_window_days.unwrap_or(7).max(1)
    }

    pub fn schedule(&self) -> SlotSchedule {
        SlotSchedule::new(self.opening_hour(), self.closing_hour())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panic {
    #[serde(default)]
    hold_ms: Option<u64>,
    #[serde(default)]
    release_grace_ms: Option<u64>,
}

impl Panic {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms.unwrap_or(3_000))
    }

    pub fn release_grace(&self) -> Duration {
        Duration::from_millis(self.release_grace_ms.unwrap_or(250))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    #[serde(default)]
    refresh_secs: Option<u64>,
}

impl Access {
    pub fn refresh(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.unwrap_or(30).max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mock {
    #[serde(default)]
    latency_ms: Option<u64>,
}

impl Mock {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms.unwrap_or(600))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Logging {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    role: Option<String>,
    unit: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            role: env::var("CONDO_ROLE").ok(),
            unit: env::var("CONDO_UNIT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(role: &str, unit: &str) -> Self {
        Self {
            role: Some(role.to_owned()),
            unit: Some(unit.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            reservations: Reservations {
                opening_hour: other.reservations.opening_hour.or(self.reservations.opening_hour),
                closing_hour: other.reservations.closing_hour.or(self.reservations.closing_hour),
                booking_window_days: other
                    .reservations
                    .booking_window_days
                    .or(self.reservations.booking_window_days),
            },
            panic: Panic {
                hold_ms: other.panic.hold_ms.or(self.panic.hold_ms),
                release_grace_ms: other.panic.release_grace_ms.or(self.panic.release_grace_ms),
            },
            access: Access {
                refresh_secs: other.access.refresh_secs.or(self.access.refresh_secs),
            },
            mock: Mock {
                latency_ms: other.mock.latency_ms.or(self.mock.latency_ms),
            },
            logging: Logging {
                level: other.logging.level.or(self.logging.level),
                file: other.logging.file.or(self.logging.file),
            },
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        role: if overlay.role != Role::default() {
            overlay.role
        } else {
            base.role
        },
        unit: if overlay.unit != Defaults::default_unit() {
            overlay.unit
        } else {
            base.unit
        },
        name: overlay.name.or(base.name),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("condo/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(role) = env.role {
        config.defaults.role = role
            .parse()
            .map_err(anyhow::Error::msg)
            .context("invalid CONDO_ROLE")?;
    }
    if let Some(unit) = env.unit.filter(|unit| !unit.trim().is_empty()) {
        config.defaults.unit = unit.trim().to_owned();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.defaults.role, Role::Resident);
        assert_eq!(config.defaults.unit, "A-101");
        assert_eq!(config.reservations.schedule().len(), 12);
        assert_eq!(config.panic.hold(), Duration::from_secs(3));
        assert_eq!(config.logging.level(), "info");
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
unit = "B-204"
[reservations]
opening_hour = 8
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".condo"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".condo/config.toml"),
            r#"
[defaults]
role = "admin"
[mock]
latency_ms = 0
"#,
        )?;

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".condo/config.toml")),
            EnvOverrides::default(),
        )?;

        assert_eq!(config.defaults.unit, "B-204");
        assert_eq!(config.defaults.role, Role::Admin);
        assert_eq!(config.reservations.opening_hour(), 8);
        assert_eq!(config.reservations.closing_hour(), 21);
        assert_eq!(config.mock.latency(), Duration::ZERO);

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("admin", "C-301");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.defaults.role, Role::Admin);
        assert_eq!(config.defaults.unit, "C-301");
        Ok(())
    }

    #[test]
    fn invalid_role_override_is_an_error() {
        let overrides = EnvOverrides::for_tests("janitor", "C-301");
        assert!(Config::load_with_layers(None, None, overrides).is_err());
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
