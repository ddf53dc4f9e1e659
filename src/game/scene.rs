//! Scripted scene: static ground, one probing character and a walk path.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::character::{CharacterTick, FootCharacter};
use super::constants::character::MAX_SCENE_TICKS;
use super::debug_draw::DebugSink;
use super::foot_probe::FootProbeError;
use super::physics::PhysicsWorld;
use crate::config::SceneConfig;

const CHARACTER_ID: u64 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("tick count {requested} exceeds the limit of {limit}")]
    TooManyTicks { requested: u64, limit: u64 },
    #[error(transparent)]
    Probe(#[from] FootProbeError),
}

/// Per-tick summary, serialized by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub position: [f32; 3],
    pub reference_z: f32,
    pub right_grounded: bool,
    pub left_grounded: bool,
    pub foot_offset_right: [f32; 3],
    pub foot_offset_left: [f32; 3],
    pub pelvis: f32,
}

impl TickReport {
    fn new(tick: u64, result: &CharacterTick) -> Self {
        let p = result.pose.character_position;
        let r = result.state.foot_offset_right;
        let l = result.state.foot_offset_left;
        Self {
            tick,
            position: [p.x, p.y, p.z],
            reference_z: result.foot.segments.reference_z,
            right_grounded: result.foot.results.right.is_some(),
            left_grounded: result.foot.results.left.is_some(),
            foot_offset_right: [r.x, r.y, r.z],
            foot_offset_left: [l.x, l.y, l.z],
            pelvis: result.state.pelvis_offset,
        }
    }
}

/// Piecewise-linear walk over capsule center waypoints.
#[derive(Debug, Clone)]
pub struct WalkPath {
    waypoints: Vec<[f32; 3]>,
    step: f32,
}

impl WalkPath {
    pub fn new(waypoints: Vec<[f32; 3]>, step: f32) -> Self {
        Self { waypoints, step }
    }

    /// Position after `tick` steps; holds at the last waypoint once reached.
    pub fn position_at(&self, tick: u64) -> Option<[f32; 3]> {
        let first = *self.waypoints.first()?;
        let mut remaining = self.step * tick as f32;
        let mut current = first;

        for next in self.waypoints.iter().skip(1) {
            let delta = [next[0] - current[0], next[1] - current[1], next[2] - current[2]];
            let len = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
            if remaining <= len {
                if len <= f32::EPSILON {
                    return Some(*next);
                }
                let t = remaining / len;
                return Some([
                    current[0] + delta[0] * t,
                    current[1] + delta[1] * t,
                    current[2] + delta[2] * t,
                ]);
            }
            remaining -= len;
            current = *next;
        }
        Some(current)
    }

    /// Yaw about Z facing the direction of travel at `tick`, if moving.
    pub fn heading_at(&self, tick: u64) -> Option<f32> {
        let here = self.position_at(tick)?;
        let next = self.position_at(tick + 1)?;
        let (dx, dy) = (next[0] - here[0], next[1] - here[1]);
        if dx.abs() <= f32::EPSILON && dy.abs() <= f32::EPSILON {
            return None;
        }
        Some(dy.atan2(dx))
    }

    /// Ticks needed to reach the last waypoint.
    pub fn total_ticks(&self) -> u64 {
        let length: f32 = self
            .waypoints
            .windows(2)
            .map(|w| {
                let d = [w[1][0] - w[0][0], w[1][1] - w[0][1], w[1][2] - w[0][2]];
                (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
            })
            .sum();
        (length / self.step).ceil() as u64
    }
}

pub struct Scene {
    pub name: String,
    pub world: PhysicsWorld,
    pub character: FootCharacter,
    pub path: WalkPath,
    pub face_travel: bool,
}

impl Scene {
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut world = PhysicsWorld::new();
        for (i, ground) in config.ground.iter().enumerate() {
            world.add_ground_box(i as u64 + 100, ground.center, ground.half_extents);
        }
        for sensor in &config.sensors {
            world.add_sensor_box(sensor.center, sensor.half_extents);
        }

        let character = FootCharacter::spawn(
            &mut world,
            CHARACTER_ID,
            &config.character,
            &config.footprint,
        );
        world.update_queries();

        info!(
            scene = %config.name,
            ground = config.ground.len(),
            sensors = config.sensors.len(),
            waypoints = config.path.waypoints.len(),
            "scene loaded"
        );

        Self {
            name: config.name.clone(),
            world,
            character,
            path: WalkPath::new(config.path.waypoints.clone(), config.path.step),
            face_travel: config.path.face_travel,
        }
    }

    /// Moves the character along the path and probes once per tick.
    /// Without waypoints the character stays at its spawn position.
    pub fn run(
        &mut self,
        ticks: u64,
        sink: &mut impl DebugSink,
    ) -> Result<Vec<TickReport>, SceneError> {
        if ticks > MAX_SCENE_TICKS {
            return Err(SceneError::TooManyTicks {
                requested: ticks,
                limit: MAX_SCENE_TICKS,
            });
        }

        let mut reports = Vec::new();
        for tick in 0..ticks {
            if let Some(position) = self.path.position_at(tick) {
                self.world.set_character_position(self.character.id, position);
                if self.face_travel {
                    if let Some(yaw) = self.path.heading_at(tick) {
                        self.world.set_character_yaw(self.character.id, yaw);
                    }
                }
                self.world.update_queries();
            }

            let result = self.character.tick(&self.world, sink)?;
            let report = TickReport::new(tick, &result);
            debug!(tick, pelvis = report.pelvis, "scene tick");
            reports.push(report);
        }
        Ok(reports)
    }
}
