use nalgebra::{Isometry3, Point3, Vector3};
use std::collections::HashMap;

use super::foot_probe::{PoseSource, SocketLocator};
use super::physics::PhysicsWorld;
use crate::config::{CharacterConfig, FootPrintConfig};

/// Named sockets stored relative to the character body.
#[derive(Debug, Clone, Default)]
pub struct FootRig {
    sockets: HashMap<String, Vector3<f32>>,
}

impl FootRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rig with the configured right/left foot sockets.
    pub fn from_config(character: &CharacterConfig, footprint: &FootPrintConfig) -> Self {
        let mut rig = Self::new();
        rig.set_socket(&footprint.right_socket, character.right_foot);
        rig.set_socket(&footprint.left_socket, character.left_foot);
        rig
    }

    pub fn set_socket(&mut self, name: &str, local: [f32; 3]) {
        self.sockets
            .insert(name.to_string(), Vector3::new(local[0], local[1], local[2]));
    }

    pub fn local_socket(&self, name: &str) -> Option<Vector3<f32>> {
        self.sockets.get(name).copied()
    }
}

/// Pose source for one character, with its body placement read once from
/// the physics world. Only constructible for a character that exists.
pub struct CharacterRigView<'a> {
    rig: &'a FootRig,
    isometry: Isometry3<f32>,
    half_height: f32,
}

impl<'a> CharacterRigView<'a> {
    /// Returns `None` when `character_id` has no body in `world`.
    pub fn new(world: &PhysicsWorld, character_id: u64, rig: &'a FootRig) -> Option<Self> {
        let body = world.character(character_id)?;
        let isometry = world.character_isometry(character_id)?;
        Some(Self {
            rig,
            isometry,
            half_height: body.half_height,
        })
    }
}

impl SocketLocator for CharacterRigView<'_> {
    fn socket_location(&self, name: &str) -> Option<Point3<f32>> {
        let local = self.rig.local_socket(name)?;
        Some(self.isometry * Point3::from(local))
    }
}

impl PoseSource for CharacterRigView<'_> {
    fn world_position(&self) -> Point3<f32> {
        Point3::from(self.isometry.translation.vector)
    }

    fn capsule_half_height(&self) -> f32 {
        self.half_height
    }
}
