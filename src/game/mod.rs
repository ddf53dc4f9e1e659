//! Foot ground probing for bipedal characters.
//!
//! `foot_probe` is the engine-independent core. `physics` and `rig` supply its
//! collision and pose capabilities over rapier3d, and `scene` drives whole
//! runs for the CLI.

pub mod character;
pub mod constants;
pub mod debug_draw;
pub mod foot_probe;
pub mod physics;
pub mod rig;
pub mod scene;

pub use character::{CharacterTick, FootCharacter};
pub use debug_draw::{draw_foot_debug, DebugRecorder, DebugSink, TracingDebugSink};
pub use foot_probe::{
    FootGroundProbe, FootPrintState, FootProbeError, GroundHit, GroundProbe, PoseSnapshot,
    PoseSource, ProbeSegment, SocketLocator,
};
pub use physics::PhysicsWorld;
pub use scene::{Scene, SceneError, TickReport};
