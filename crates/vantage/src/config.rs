use bearing::dial::{DEFAULT_LABEL_OFFSET, DEFAULT_RADIUS, InteractionMode};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DialConfig {
    pub radius: f64,
    pub label_offset: f64,
    pub mode: InteractionMode,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            label_offset: DEFAULT_LABEL_OFFSET,
            mode: InteractionMode::default(),
        }
    }
}

impl DialConfig {
    /// Replaces unusable geometry with defaults.
    pub fn sanitized(self) -> Self {
        let radius = if self.radius.is_finite() && self.radius > 0.0 {
            self.radius
        } else {
            log::warn!(
                "Ignoring dial radius {}, using {}",
                self.radius,
                DEFAULT_RADIUS
            );
            DEFAULT_RADIUS
        };
        let label_offset = if self.label_offset.is_finite() && self.label_offset >= 0.0 {
            self.label_offset
        } else {
            log::warn!(
                "Ignoring label offset {}, using {}",
                self.label_offset,
                DEFAULT_LABEL_OFFSET
            );
            DEFAULT_LABEL_OFFSET
        };
        Self {
            radius,
            label_offset,
            mode: self.mode,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SessionConfig {
    pub trials: Option<PathBuf>,
    pub responses: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dial: DialConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "vantage", "vantage")
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = project_dirs().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn environment() -> config::Environment {
    config::Environment::with_prefix("VANTAGE")
        .separator("__")
        .try_parsing(true)
}

fn build(builder: Builder) -> Result<Config, ConfigError> {
    let mut config: Config = builder.build()?.try_deserialize()?;
    config.dial = config.dial.sanitized();
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;
    let file = config::File::from(config_path).required(false);
    build(
        config::Config::builder()
            .add_source(file)
            .add_source(environment()),
    )
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", ConfigError::from(e));
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
