use super::debug_draw::{draw_foot_debug, DebugSink};
use super::foot_probe::{FootGroundProbe, FootProbeError, FootPrintState, FootTick, PoseSnapshot};
use super::physics::PhysicsWorld;
use super::rig::{CharacterRigView, FootRig};
use crate::config::{CharacterConfig, FootPrintConfig};

/// Result of one character tick, kept for reporting.
#[derive(Debug, Clone, Copy)]
pub struct CharacterTick {
    pub pose: PoseSnapshot,
    pub foot: FootTick,
    pub state: FootPrintState,
}

/// A character with foot probing: physics body id, socket rig and probe state.
pub struct FootCharacter {
    pub id: u64,
    pub rig: FootRig,
    pub probe: FootGroundProbe,
}

impl FootCharacter {
    /// Creates the capsule in `world` and a probe with all-zero state.
    pub fn spawn(
        world: &mut PhysicsWorld,
        id: u64,
        character: &CharacterConfig,
        footprint: &FootPrintConfig,
    ) -> Self {
        world.add_character(id, character.position, character.radius, character.half_height);
        Self {
            id,
            rig: FootRig::from_config(character, footprint),
            probe: FootGroundProbe::new(footprint.clone()),
        }
    }

    /// Probes both feet against `world` and draws debug output into `sink`.
    /// The world's query structure must be up to date.
    pub fn tick(
        &mut self,
        world: &PhysicsWorld,
        sink: &mut impl DebugSink,
    ) -> Result<CharacterTick, FootProbeError> {
        let view = CharacterRigView::new(world, self.id, &self.rig)
            .ok_or(FootProbeError::MissingCharacter(self.id))?;
        let ground = world.ground_probe_for(self.id);
        let (pose, foot) = self.probe.tick_with(&view, &ground)?;
        let state = *self.probe.state();

        let flags = &self.probe.config().debug;
        if flags.any() {
            draw_foot_debug(flags, &pose, &foot, &state, sink);
        }

        Ok(CharacterTick { pose, foot, state })
    }

    pub fn state(&self) -> &FootPrintState {
        self.probe.state()
    }
}
