use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_TILE_SIZE, MAX_HISTORY_SIZE};
use crate::error::DocumentResult;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Editor configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfigData {
    /// Number of undo steps kept by the command history
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    /// Size of maps created through "new map"
    #[serde(default = "default_map_width")]
    pub default_map_width: i32,

    #[serde(default = "default_map_height")]
    pub default_map_height: i32,

    #[serde(default = "default_tile_size")]
    pub default_tile_size: i32,

    /// Last opened or saved map file (remembered, not auto-loaded)
    #[serde(default)]
    pub last_map_path: Option<PathBuf>,
}

fn default_max_history_size() -> usize {
    MAX_HISTORY_SIZE
}

fn default_map_width() -> i32 {
    DEFAULT_MAP_WIDTH
}

fn default_map_height() -> i32 {
    DEFAULT_MAP_HEIGHT
}

fn default_tile_size() -> i32 {
    DEFAULT_TILE_SIZE
}

impl Default for EditorConfigData {
    fn default() -> Self {
        Self {
            max_history_size: MAX_HISTORY_SIZE,
            default_map_width: DEFAULT_MAP_WIDTH,
            default_map_height: DEFAULT_MAP_HEIGHT,
            default_tile_size: DEFAULT_TILE_SIZE,
            last_map_path: None,
        }
    }
}

impl EditorConfigData {
    /// Replaces values the document model would reject with their defaults
    pub fn sanitized(mut self) -> Self {
        if self.max_history_size == 0 {
            warn!("max_history_size must be positive, using {}", MAX_HISTORY_SIZE);
            self.max_history_size = MAX_HISTORY_SIZE;
        }
        if self.default_map_width <= 0 || self.default_map_height <= 0 {
            warn!(
                "Invalid default map size {}x{}, using {}x{}",
                self.default_map_width, self.default_map_height, DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT
            );
            self.default_map_width = DEFAULT_MAP_WIDTH;
            self.default_map_height = DEFAULT_MAP_HEIGHT;
        }
        if self.default_tile_size <= 0 {
            warn!("Invalid default tile size {}, using {}", self.default_tile_size, DEFAULT_TILE_SIZE);
            self.default_tile_size = DEFAULT_TILE_SIZE;
        }
        self
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct EditorConfig {
    /// The persisted configuration data
    pub data: EditorConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data: EditorConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify the user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to update the last map path in config
#[derive(Message)]
pub struct UpdateLastMapPathRequest {
    pub path: PathBuf,
}

/// Result of loading config from disk
pub struct LoadConfigResult {
    pub config: EditorConfig,
    /// Error message if config was reset to defaults due to an error
    pub reset_reason: Option<String>,
}

/// Load configuration from `config_path`. A missing file yields defaults silently.
pub fn load_config(config_path: &Path) -> LoadConfigResult {
    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(json) => match serde_json::from_str::<EditorConfigData>(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    (data.sanitized(), None)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    (
                        EditorConfigData::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    EditorConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (EditorConfigData::default(), None)
    };

    LoadConfigResult {
        config: EditorConfig {
            data,
            config_path: config_path.to_path_buf(),
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to its config path
pub fn save_config(config: &EditorConfig) -> DocumentResult<()> {
    let json = serde_json::to_string_pretty(&config.data).inspect_err(|e| {
        error!("Failed to serialize config: {}", e);
    })?;
    std::fs::write(&config.config_path, json).inspect_err(|e| {
        error!("Failed to save config: {}", e);
    })?;
    info!("Config saved to {:?}", config.config_path);
    Ok(())
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<EditorConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.config.data;
    config.dirty = false;

    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<EditorConfig>,
) {
    for _ in events.read() {
        if config.dirty && save_config(&config).is_ok() {
            config.dirty = false;
        }
    }
}

/// System to update last map path
fn update_last_map_path_system(
    mut events: MessageReader<UpdateLastMapPathRequest>,
    mut config: ResMut<EditorConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.last_map_path.as_ref() == Some(&event.path) {
            continue;
        }
        config.data.last_map_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastMapPathRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    update_last_map_path_system.run_if(on_message::<UpdateLastMapPathRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
