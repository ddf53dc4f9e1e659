//! Per-tick foot/ground contact estimation.
//!
//! Two vertical line probes are cast through the character's feet reference
//! plane, one under each foot socket. Hits become per-foot vertical offsets,
//! and when both feet are grounded the lower foot's offset is moved into a
//! single pelvis value for the animation layer.

use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FootPrintConfig;

/// Resolves named skeletal sockets to world-space positions.
pub trait SocketLocator {
    fn socket_location(&self, name: &str) -> Option<Point3<f32>>;
}

/// Character pose capability: body placement plus its sockets.
pub trait PoseSource: SocketLocator {
    fn world_position(&self) -> Point3<f32>;
    fn capsule_half_height(&self) -> f32;
}

/// Synchronous nearest-hit line query against ground that blocks pawns.
pub trait GroundProbe {
    fn line_trace(&self, segment: &ProbeSegment) -> Option<GroundHit>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FootProbeError {
    #[error("socket '{0}' could not be resolved")]
    MissingSocket(String),
    #[error("character {0} does not exist")]
    MissingCharacter(u64),
}

/// Blocking hit returned by a ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub impact_point: Point3<f32>,
    /// Distance from the segment start to the impact point
    pub distance: f32,
}

/// Read-only pose captured at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    pub character_position: Point3<f32>,
    pub capsule_half_height: f32,
    pub foot_right: Point3<f32>,
    pub foot_left: Point3<f32>,
}

impl PoseSnapshot {
    pub fn capture(
        source: &impl PoseSource,
        config: &FootPrintConfig,
    ) -> Result<Self, FootProbeError> {
        let locate = |name: &str| {
            source.socket_location(name).ok_or_else(|| {
                warn!(socket = name, "foot socket not found");
                FootProbeError::MissingSocket(name.to_string())
            })
        };

        Ok(Self {
            character_position: source.world_position(),
            capsule_half_height: source.capsule_half_height(),
            foot_right: locate(&config.right_socket)?,
            foot_left: locate(&config.left_socket)?,
        })
    }

    /// Z of the plane the capsule stands on.
    pub fn reference_z(&self) -> f32 {
        self.character_position.z - self.capsule_half_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSegment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

impl ProbeSegment {
    /// Vertical segment through `(x, y, center_z)`, from above to below.
    pub fn vertical(x: f32, y: f32, center_z: f32, half_length: f32) -> Self {
        Self {
            start: Point3::new(x, y, center_z + half_length),
            end: Point3::new(x, y, center_z - half_length),
        }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }
}

/// Both probe segments for a tick, centered on the reference plane rather than
/// on the (possibly lifted) socket heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootProbeSegments {
    pub reference_z: f32,
    pub right: ProbeSegment,
    pub left: ProbeSegment,
}

impl FootProbeSegments {
    pub fn from_pose(pose: &PoseSnapshot, half_length: f32) -> Self {
        let reference_z = pose.reference_z();
        Self {
            reference_z,
            right: ProbeSegment::vertical(pose.foot_right.x, pose.foot_right.y, reference_z, half_length),
            left: ProbeSegment::vertical(pose.foot_left.x, pose.foot_left.y, reference_z, half_length),
        }
    }

    pub fn cast(&self, probe: &impl GroundProbe) -> FootProbeResults {
        FootProbeResults {
            right: probe.line_trace(&self.right),
            left: probe.line_trace(&self.left),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FootProbeResults {
    pub right: Option<GroundHit>,
    pub left: Option<GroundHit>,
}

/// Foot offsets and pelvis drop, persistent across ticks.
///
/// X and Y of both offsets are always zero. When both feet are grounded at
/// most one offset Z is nonzero: the lower foot's value lives in
/// `pelvis_offset` instead.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FootPrintState {
    pub foot_offset_right: Vector3<f32>,
    pub foot_offset_left: Vector3<f32>,
    pub pelvis_offset: f32,
}

impl FootPrintState {
    /// Next state from this tick's probe results.
    pub fn update(&self, reference_z: f32, results: &FootProbeResults) -> FootPrintState {
        let local_right = results.right.map(|hit| hit.impact_point.z - reference_z);
        let local_left = results.left.map(|hit| hit.impact_point.z - reference_z);

        let mut right_z = local_right.unwrap_or(0.0);
        let mut left_z = local_left.unwrap_or(0.0);
        let mut pelvis_offset = self.pelvis_offset;

        if let (Some(r), Some(l)) = (local_right, local_left) {
            // Right stands higher: pelvis follows the left foot.
            if r > l {
                pelvis_offset = l;
                left_z = 0.0;
            } else {
                pelvis_offset = r;
                right_z = 0.0;
            }
        }

        FootPrintState {
            foot_offset_right: Vector3::new(0.0, 0.0, right_z),
            foot_offset_left: Vector3::new(0.0, 0.0, left_z),
            pelvis_offset,
        }
    }
}

/// Geometry and raw results of one tick, for observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootTick {
    pub segments: FootProbeSegments,
    pub results: FootProbeResults,
    /// False when probing was disabled and the state was left untouched
    pub applied: bool,
}

/// Foot contact estimator owned by a single character.
#[derive(Debug, Clone)]
pub struct FootGroundProbe {
    config: FootPrintConfig,
    state: FootPrintState,
}

impl FootGroundProbe {
    pub fn new(config: FootPrintConfig) -> Self {
        Self {
            config,
            state: FootPrintState::default(),
        }
    }

    pub fn config(&self) -> &FootPrintConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Casts both probes and, if probing is enabled, replaces the state.
    pub fn tick(&mut self, pose: &PoseSnapshot, probe: &impl GroundProbe) -> FootTick {
        let segments = FootProbeSegments::from_pose(pose, self.config.probe_half_length);
        let results = segments.cast(probe);

        if self.config.enabled {
            self.state = self.state.update(segments.reference_z, &results);
            debug!(
                right = self.state.foot_offset_right.z,
                left = self.state.foot_offset_left.z,
                pelvis = self.state.pelvis_offset,
                "foot print updated"
            );
        }

        FootTick {
            segments,
            results,
            applied: self.config.enabled,
        }
    }

    /// Captures the pose from `source` and ticks.
    pub fn tick_with(
        &mut self,
        source: &impl PoseSource,
        probe: &impl GroundProbe,
    ) -> Result<(PoseSnapshot, FootTick), FootProbeError> {
        let pose = PoseSnapshot::capture(source, &self.config)?;
        let tick = self.tick(&pose, probe);
        Ok((pose, tick))
    }

    pub fn state(&self) -> &FootPrintState {
        &self.state
    }

    pub fn foot_offset_right(&self) -> Vector3<f32> {
        self.state.foot_offset_right
    }

    pub fn foot_offset_left(&self) -> Vector3<f32> {
        self.state.foot_offset_left
    }

    pub fn pelvis(&self) -> f32 {
        self.state.pelvis_offset
    }
}
