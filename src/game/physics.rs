use rapier3d::prelude::*;
use std::collections::HashMap;
use tracing::debug;

use super::foot_probe::{GroundHit, GroundProbe, ProbeSegment};

// Foot probes run on the pawn channel: they see static ground only, never
// other characters or sensors.
const GROUP_STATIC: Group = Group::GROUP_1;    // Floors, steps, ramps
const GROUP_CHARACTER: Group = Group::GROUP_2; // Character capsules

/// Rapier handles for a character capsule
#[derive(Debug, Clone, Copy)]
pub struct CharacterBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    /// Capsule half-height including the caps
    pub half_height: f32,
}

/// Wrapper around Rapier3D collision geometry used for foot probing.
/// Z is up; no dynamics are simulated, only scene queries.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
    pub island_manager: IslandManager,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,

    /// Maps scene ID to ground rigid body handle
    pub ground_bodies: HashMap<u64, RigidBodyHandle>,
    /// Character capsules by scene ID
    pub characters: HashMap<u64, CharacterBody>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            island_manager: IslandManager::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ground_bodies: HashMap::new(),
            characters: HashMap::new(),
        }
    }

    /// Adds a fixed axis-aligned box of ground geometry
    pub fn add_ground_box(
        &mut self,
        id: u64,
        center: [f32; 3],
        half_extents: [f32; 3],
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center[0], center[1], center[2]])
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            .collision_groups(InteractionGroups::new(GROUP_STATIC, Group::ALL))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.ground_bodies.insert(id, handle);
        handle
    }

    /// Adds a non-blocking trigger volume (never hit by foot probes)
    pub fn add_sensor_box(&mut self, center: [f32; 3], half_extents: [f32; 3]) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            .translation(vector![center[0], center[1], center[2]])
            .sensor(true)
            .collision_groups(InteractionGroups::new(GROUP_STATIC, Group::ALL))
            .build();
        self.collider_set.insert(collider)
    }

    pub fn remove_ground(&mut self, id: u64) -> bool {
        let Some(handle) = self.ground_bodies.remove(&id) else {
            return false;
        };
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        true
    }

    /// Adds a kinematic Z-up capsule for a character.
    /// `half_height` is measured from the center to the bottom of the lower cap.
    pub fn add_character(
        &mut self,
        id: u64,
        position: [f32; 3],
        radius: f32,
        half_height: f32,
    ) -> CharacterBody {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position[0], position[1], position[2]])
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        let half_segment = (half_height - radius).max(0.0);
        let collider = ColliderBuilder::capsule_z(half_segment, radius)
            .collision_groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC))
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        let character = CharacterBody {
            body_handle,
            collider_handle,
            half_height,
        };
        self.characters.insert(id, character);
        debug!(id, ?position, radius, half_height, "character added");
        character
    }

    pub fn character(&self, id: u64) -> Option<&CharacterBody> {
        self.characters.get(&id)
    }

    /// Teleports a character capsule
    pub fn set_character_position(&mut self, id: u64, position: [f32; 3]) -> bool {
        let Some(character) = self.characters.get(&id) else {
            return false;
        };
        let Some(body) = self.rigid_body_set.get_mut(character.body_handle) else {
            return false;
        };
        body.set_translation(vector![position[0], position[1], position[2]], true);
        true
    }

    /// Rotates a character about the Z axis
    pub fn set_character_yaw(&mut self, id: u64, yaw: f32) -> bool {
        let Some(character) = self.characters.get(&id) else {
            return false;
        };
        let Some(body) = self.rigid_body_set.get_mut(character.body_handle) else {
            return false;
        };
        let rot = nalgebra::UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        body.set_rotation(rot, true);
        true
    }

    pub fn character_isometry(&self, id: u64) -> Option<Isometry<Real>> {
        let character = self.characters.get(&id)?;
        self.rigid_body_set
            .get(character.body_handle)
            .map(|body| *body.position())
    }

    /// Propagates body placements to colliders and rebuilds the query structure.
    /// Must run after moving bodies and before probing.
    pub fn update_queries(&mut self) {
        for (_, collider) in self.collider_set.iter_mut() {
            if let Some(parent) = collider.parent() {
                if let Some(body) = self.rigid_body_set.get(parent) {
                    let local = collider
                        .position_wrt_parent()
                        .copied()
                        .unwrap_or_else(Isometry::identity);
                    collider.set_position(body.position() * local);
                }
            }
        }
        self.query_pipeline.update(&self.collider_set);
    }

    /// Casts a ray along `segment` on the pawn channel.
    /// Returns the nearest blocking hit, skipping `exclude_body` and sensors.
    pub fn line_trace(
        &self,
        segment: &ProbeSegment,
        exclude_body: Option<RigidBodyHandle>,
    ) -> Option<GroundHit> {
        let delta = segment.end - segment.start;
        let max_dist = segment.length();

        if max_dist < 0.001 {
            return None; // Degenerate segment
        }

        let ray = Ray::new(segment.start, delta / max_dist);

        let mut filter = QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC));
        if let Some(body_handle) = exclude_body {
            filter = filter.exclude_rigid_body(body_handle);
        }

        let (_, toi) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_dist,
            true, // solid
            filter,
        )?;

        Some(GroundHit {
            impact_point: ray.point_at(toi),
            distance: toi,
        })
    }

    /// Ground probe that ignores the given character's own capsule
    pub fn ground_probe_for(&self, id: u64) -> CharacterGroundProbe<'_> {
        CharacterGroundProbe {
            world: self,
            exclude_body: self.characters.get(&id).map(|c| c.body_handle),
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of the world probing on behalf of one character.
pub struct CharacterGroundProbe<'a> {
    world: &'a PhysicsWorld,
    exclude_body: Option<RigidBodyHandle>,
}

impl GroundProbe for CharacterGroundProbe<'_> {
    fn line_trace(&self, segment: &ProbeSegment) -> Option<GroundHit> {
        self.world.line_trace(segment, self.exclude_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn floor_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        // Floor top at Z=0
        world.add_ground_box(1, [0.0, 0.0, -10.0], [500.0, 500.0, 10.0]);
        world.update_queries();
        world
    }

    #[test]
    fn test_line_trace_hits_floor_top() {
        let world = floor_world();
        let segment = ProbeSegment::vertical(0.0, 0.0, 0.0, 40.0);

        let hit = world.line_trace(&segment, None).expect("should hit floor");
        assert!((hit.impact_point.z - 0.0).abs() < 1e-3, "got {:?}", hit);
        assert!((hit.distance - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_line_trace_misses_out_of_range_ground() {
        let mut world = PhysicsWorld::new();
        // Floor top at Z=-50, below a probe reaching Z=-40
        world.add_ground_box(1, [0.0, 0.0, -60.0], [500.0, 500.0, 10.0]);
        world.update_queries();

        let segment = ProbeSegment::vertical(0.0, 0.0, 0.0, 40.0);
        assert!(world.line_trace(&segment, None).is_none());
    }

    #[test]
    fn test_line_trace_ignores_own_capsule_and_sensors() {
        let mut world = PhysicsWorld::new();
        world.add_ground_box(1, [0.0, 0.0, -10.0], [500.0, 500.0, 10.0]);
        world.add_sensor_box([0.0, 0.0, 20.0], [50.0, 50.0, 5.0]);
        world.add_character(7, [0.0, 0.0, 96.0], 10.0, 96.0);
        world.update_queries();

        let segment = ProbeSegment::vertical(0.0, 0.0, 30.0, 40.0);
        let hit = world
            .ground_probe_for(7)
            .line_trace(&segment)
            .expect("should reach the floor");
        assert!(hit.impact_point.z.abs() < 1e-3, "got {:?}", hit);
    }

    #[test]
    fn test_line_trace_does_not_hit_other_characters() {
        let mut world = floor_world();
        world.add_character(7, [0.0, 0.0, 96.0], 10.0, 96.0);
        world.add_character(8, [0.0, 0.0, 20.0], 34.0, 40.0);
        world.update_queries();

        let segment = ProbeSegment::vertical(0.0, 0.0, 0.0, 40.0);
        let hit = world.ground_probe_for(7).line_trace(&segment).unwrap();
        assert!(hit.impact_point.z.abs() < 1e-3);
    }

    #[test]
    fn test_replaced_ground_is_probed_after_update() {
        let mut world = floor_world();
        world.remove_ground(1);
        world.add_ground_box(2, [0.0, 0.0, 5.0], [500.0, 500.0, 5.0]);
        world.update_queries();

        let segment = ProbeSegment::vertical(0.0, 0.0, 0.0, 40.0);
        let hit = world.line_trace(&segment, None).unwrap();
        assert!((hit.impact_point.z - 10.0).abs() < 1e-3, "got {:?}", hit);
    }

    #[test]
    fn test_character_position_round_trip() {
        let mut world = PhysicsWorld::new();
        world.add_character(3, [1.0, 2.0, 96.0], 10.0, 96.0);
        assert!(world.set_character_position(3, [10.0, -4.0, 90.0]));
        let t = world.character_isometry(3).unwrap().translation.vector;
        assert_eq!([t.x, t.y, t.z], [10.0, -4.0, 90.0]);
        assert!(!world.set_character_position(99, [0.0; 3]));
        assert_eq!(world.character(3).map(|c| c.half_height), Some(96.0));
    }

    #[test]
    fn test_ray_starts_at_segment_start() {
        let world = floor_world();
        let segment = ProbeSegment {
            start: Point3::new(3.0, 4.0, 30.0),
            end: Point3::new(3.0, 4.0, -30.0),
        };
        let hit = world.line_trace(&segment, None).unwrap();
        assert!((hit.impact_point.x - 3.0).abs() < 1e-4);
        assert!((hit.impact_point.y - 4.0).abs() < 1e-4);
        assert!((hit.distance - 30.0).abs() < 1e-3);
    }
}
