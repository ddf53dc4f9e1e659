//! Foot probing, rig and debug constants.
//! Centralizing these keeps config defaults and tests in agreement.

/// Foot probe defaults
pub mod probe {
    /// Half-length of each foot line probe, centered on the reference plane
    pub const DEFAULT_HALF_LENGTH: f32 = 40.0;

    /// Default right foot socket name
    pub const RIGHT_SOCKET: &str = "foot_r";

    /// Default left foot socket name
    pub const LEFT_SOCKET: &str = "foot_l";
}

/// Character capsule defaults (Z up, engine units)
pub mod character {
    /// Capsule radius
    pub const CAPSULE_RADIUS: f32 = 10.0;

    /// Capsule half-height, including the hemispherical caps
    pub const CAPSULE_HALF_HEIGHT: f32 = 96.0;

    /// Lateral distance of each foot socket from the capsule axis
    pub const FOOT_SPREAD: f32 = 12.0;

    /// Height of the foot sockets above the capsule bottom
    pub const FOOT_HEIGHT: f32 = 10.0;

    /// Default walk speed in units/tick for scripted scenes
    pub const WALK_STEP: f32 = 5.0;

    /// Upper bound on ticks for a single scene run
    pub const MAX_SCENE_TICKS: u64 = 1_000_000;
}

/// Debug visualization
pub mod debug {
    /// On-screen text lifetime in seconds
    pub const TEXT_DURATION: f32 = 0.5;

    /// Point marker size
    pub const POINT_SIZE: f32 = 10.0;

    /// Point marker lifetime in seconds
    pub const POINT_DURATION: f32 = 0.25;

    /// Probe line thickness
    pub const LINE_THICKNESS: f32 = 2.0;
}
