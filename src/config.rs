//! Foot probe and scene configuration parsing from scene.toml files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::game::constants::{character as character_consts, probe as probe_consts};

/// Independent toggles for debug visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugFlags {
    /// Text overlay with both foot offsets and the pelvis value
    pub show_text: bool,
    /// Point markers at both foot sockets and the character position
    pub show_points: bool,
    /// Line markers along both probe segments
    pub show_lines: bool,
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self {
            show_text: false,
            show_points: true,
            show_lines: true,
        }
    }
}

impl DebugFlags {
    pub fn any(&self) -> bool {
        self.show_text || self.show_points || self.show_lines
    }
}

/// Foot probing configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FootPrintConfig {
    /// When false, probes are still cast but offsets keep their last values
    pub enabled: bool,
    /// Distance above and below the reference plane covered by each probe
    pub probe_half_length: f32,
    pub right_socket: String,
    pub left_socket: String,
    pub debug: DebugFlags,
}

impl Default for FootPrintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probe_half_length: probe_consts::DEFAULT_HALF_LENGTH,
            right_socket: probe_consts::RIGHT_SOCKET.to_string(),
            left_socket: probe_consts::LEFT_SOCKET.to_string(),
            debug: DebugFlags::default(),
        }
    }
}

impl FootPrintConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.probe_half_length.is_finite() || self.probe_half_length <= 0.0 {
            return Err(ConfigError::InvalidProbeHalfLength(self.probe_half_length));
        }
        if self.right_socket.is_empty() || self.left_socket.is_empty() {
            return Err(ConfigError::EmptySocketName);
        }
        Ok(())
    }
}

/// Character capsule and foot socket layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Spawn position of the capsule center
    pub position: [f32; 3],
    pub radius: f32,
    /// Capsule half-height including the caps
    pub half_height: f32,
    /// Right foot socket, relative to the capsule center
    pub right_foot: [f32; 3],
    /// Left foot socket, relative to the capsule center
    pub left_foot: [f32; 3],
}

impl Default for CharacterConfig {
    fn default() -> Self {
        let foot_z = -character_consts::CAPSULE_HALF_HEIGHT + character_consts::FOOT_HEIGHT;
        Self {
            position: [0.0, 0.0, character_consts::CAPSULE_HALF_HEIGHT],
            radius: character_consts::CAPSULE_RADIUS,
            half_height: character_consts::CAPSULE_HALF_HEIGHT,
            right_foot: [0.0, character_consts::FOOT_SPREAD, foot_z],
            left_foot: [0.0, -character_consts::FOOT_SPREAD, foot_z],
        }
    }
}

fn all_finite(v: &[f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}

impl CharacterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (what, v) in [
            ("position", &self.position),
            ("right_foot", &self.right_foot),
            ("left_foot", &self.left_foot),
        ] {
            if !all_finite(v) {
                return Err(ConfigError::InvalidCharacter(format!(
                    "{} must be finite, got {:?}",
                    what, v
                )));
            }
        }
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(ConfigError::InvalidCharacter(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if !(self.half_height >= self.radius) || !self.half_height.is_finite() {
            return Err(ConfigError::InvalidCharacter(format!(
                "half_height {} must be at least the radius {}",
                self.half_height, self.radius
            )));
        }
        Ok(())
    }
}

/// Static axis-aligned box, used for ground and sensor volumes
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GroundBox {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

impl GroundBox {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !all_finite(&self.center) {
            return Err(ConfigError::InvalidGround(format!(
                "center must be finite, got {:?}",
                self.center
            )));
        }
        if !self.half_extents.iter().all(|e| e.is_finite() && *e > 0.0) {
            return Err(ConfigError::InvalidGround(format!(
                "half_extents must be positive and finite, got {:?}",
                self.half_extents
            )));
        }
        Ok(())
    }
}

/// Scripted walk followed by the character
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathConfig {
    /// Capsule center waypoints, visited in order
    pub waypoints: Vec<[f32; 3]>,
    /// Distance covered per tick
    pub step: f32,
    /// Turn the character to face its direction of travel
    pub face_travel: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            step: character_consts::WALK_STEP,
            face_travel: false,
        }
    }
}

/// Scene configuration from scene.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Display name of the scene
    pub name: String,
    #[serde(default)]
    pub footprint: FootPrintConfig,
    #[serde(default)]
    pub character: CharacterConfig,
    #[serde(default)]
    pub ground: Vec<GroundBox>,
    /// Trigger volumes; present in the world but ignored by foot probes
    #[serde(default)]
    pub sensors: Vec<GroundBox>,
    #[serde(default)]
    pub path: PathConfig,
}

impl SceneConfig {
    /// Load scene configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config: SceneConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.footprint.validate()?;
        self.character.validate()?;
        for ground in self.ground.iter().chain(&self.sensors) {
            ground.validate()?;
        }
        if !(self.path.step > 0.0) || !self.path.step.is_finite() {
            return Err(ConfigError::InvalidPath(format!(
                "step must be positive, got {}",
                self.path.step
            )));
        }
        if let Some(w) = self.path.waypoints.iter().find(|w| !all_finite(w)) {
            return Err(ConfigError::InvalidPath(format!(
                "waypoints must be finite, got {:?}",
                w
            )));
        }
        Ok(())
    }

    /// Sample scene written by `footprint init`: flat floor with a raised step
    pub fn sample() -> Self {
        Self {
            name: "Step Up".to_string(),
            footprint: FootPrintConfig {
                debug: DebugFlags {
                    show_text: true,
                    ..DebugFlags::default()
                },
                ..FootPrintConfig::default()
            },
            character: CharacterConfig::default(),
            ground: vec![
                GroundBox {
                    center: [0.0, 0.0, -10.0],
                    half_extents: [500.0, 500.0, 10.0],
                },
                GroundBox {
                    center: [0.0, 150.0, 10.0],
                    half_extents: [500.0, 140.0, 10.0],
                },
            ],
            sensors: vec![GroundBox {
                center: [0.0, 0.0, 50.0],
                half_extents: [100.0, 20.0, 50.0],
            }],
            path: PathConfig {
                waypoints: vec![
                    [0.0, -100.0, character_consts::CAPSULE_HALF_HEIGHT],
                    [0.0, 100.0, character_consts::CAPSULE_HALF_HEIGHT],
                ],
                step: character_consts::WALK_STEP,
                face_travel: false,
            },
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("probe_half_length must be positive and finite, got {0}")]
    InvalidProbeHalfLength(f32),
    #[error("foot socket names must not be empty")]
    EmptySocketName,
    #[error("invalid character: {0}")]
    InvalidCharacter(String),
    #[error("invalid ground box: {0}")]
    InvalidGround(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
