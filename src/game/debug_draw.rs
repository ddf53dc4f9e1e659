//! Debug visualization of a completed foot probe tick.
//!
//! Drawing reads the tick and the resulting state and never writes back, so a
//! renderer can be swapped in or out without changing any offsets.

use nalgebra::Point3;
use serde::Serialize;
use tracing::info;

use super::constants::debug as debug_consts;
use super::foot_probe::{FootPrintState, FootTick, PoseSnapshot};
use crate::config::DebugFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebugColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DebugColor {
    pub const RED: DebugColor = DebugColor { r: 255, g: 0, b: 0 };
    pub const BLUE: DebugColor = DebugColor { r: 0, g: 0, b: 255 };
    pub const MAGENTA: DebugColor = DebugColor { r: 255, g: 0, b: 255 };
    pub const PURPLE: DebugColor = DebugColor { r: 169, g: 7, b: 228 };
}

/// Receives draw calls; implemented by whatever owns a renderer.
pub trait DebugSink {
    fn text(&mut self, color: DebugColor, duration: f32, message: String);
    fn point(&mut self, position: Point3<f32>, size: f32, color: DebugColor, duration: f32);
    fn line(&mut self, start: Point3<f32>, end: Point3<f32>, color: DebugColor, thickness: f32);
}

/// Sink that drops everything.
impl DebugSink for () {
    fn text(&mut self, _: DebugColor, _: f32, _: String) {}
    fn point(&mut self, _: Point3<f32>, _: f32, _: DebugColor, _: f32) {}
    fn line(&mut self, _: Point3<f32>, _: Point3<f32>, _: DebugColor, _: f32) {}
}

/// Emits debug primitives as tracing events.
#[derive(Debug, Default)]
pub struct TracingDebugSink;

impl DebugSink for TracingDebugSink {
    fn text(&mut self, color: DebugColor, duration: f32, message: String) {
        info!(target: "footprint::debug", ?color, duration, "{}", message);
    }

    fn point(&mut self, position: Point3<f32>, size: f32, color: DebugColor, duration: f32) {
        info!(
            target: "footprint::debug",
            x = position.x, y = position.y, z = position.z, size, ?color, duration,
            "point"
        );
    }

    fn line(&mut self, start: Point3<f32>, end: Point3<f32>, color: DebugColor, thickness: f32) {
        info!(
            target: "footprint::debug",
            from = ?[start.x, start.y, start.z],
            to = ?[end.x, end.y, end.z],
            ?color,
            thickness,
            "line"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebugPrimitive {
    Text {
        color: DebugColor,
        duration: f32,
        message: String,
    },
    Point {
        position: [f32; 3],
        size: f32,
        color: DebugColor,
        duration: f32,
    },
    Line {
        start: [f32; 3],
        end: [f32; 3],
        color: DebugColor,
        thickness: f32,
    },
}

/// Collects primitives for later inspection or serialization.
#[derive(Debug, Default)]
pub struct DebugRecorder {
    pub primitives: Vec<DebugPrimitive>,
}

impl DebugSink for DebugRecorder {
    fn text(&mut self, color: DebugColor, duration: f32, message: String) {
        self.primitives.push(DebugPrimitive::Text {
            color,
            duration,
            message,
        });
    }

    fn point(&mut self, position: Point3<f32>, size: f32, color: DebugColor, duration: f32) {
        self.primitives.push(DebugPrimitive::Point {
            position: [position.x, position.y, position.z],
            size,
            color,
            duration,
        });
    }

    fn line(&mut self, start: Point3<f32>, end: Point3<f32>, color: DebugColor, thickness: f32) {
        self.primitives.push(DebugPrimitive::Line {
            start: [start.x, start.y, start.z],
            end: [end.x, end.y, end.z],
            color,
            thickness,
        });
    }
}

/// Draws the enabled debug layers for one tick.
pub fn draw_foot_debug(
    flags: &DebugFlags,
    pose: &PoseSnapshot,
    tick: &FootTick,
    state: &FootPrintState,
    sink: &mut impl DebugSink,
) {
    if flags.show_text {
        let r = state.foot_offset_right;
        let l = state.foot_offset_left;
        sink.text(
            DebugColor::RED,
            debug_consts::TEXT_DURATION,
            format!("ImpactPoint R ? x : {:.6}, y : {:.6}, z : {:.6}", r.x, r.y, r.z),
        );
        sink.text(
            DebugColor::BLUE,
            debug_consts::TEXT_DURATION,
            format!("ImpactPoint L ? x : {:.6}, y : {:.6}, z : {:.6}", l.x, l.y, l.z),
        );
        sink.text(
            DebugColor::PURPLE,
            debug_consts::TEXT_DURATION,
            format!("pelvis? {:.6}", state.pelvis_offset),
        );
    }

    if flags.show_points {
        let size = debug_consts::POINT_SIZE;
        let duration = debug_consts::POINT_DURATION;
        sink.point(pose.foot_right, size, DebugColor::RED, duration);
        sink.point(pose.foot_left, size, DebugColor::BLUE, duration);
        sink.point(pose.character_position, size, DebugColor::MAGENTA, duration);
    }

    if flags.show_lines {
        let segments = &tick.segments;
        let thickness = debug_consts::LINE_THICKNESS;
        sink.line(segments.right.start, segments.right.end, DebugColor::RED, thickness);
        sink.line(segments.left.start, segments.left.end, DebugColor::BLUE, thickness);
    }
}
