//! Test utilities for MbICP alignment tests.
//!
//! Scans are ray-cast against line-segment worlds so that the reference and
//! current scans sample the same geometry from different sensor poses.

#![allow(dead_code)]

use std::f64::consts::PI;

use mbicp::{Point2D, Pose2D, RangeScan};

/// Range reported for beams that hit nothing.
pub const NO_RETURN: f64 = 100.0;

/// A wall segment.
pub type Wall = (Point2D, Point2D);

/// Axis-aligned rectangle as four walls.
pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Wall> {
    let corners = [
        Point2D::new(x0, y0),
        Point2D::new(x1, y0),
        Point2D::new(x1, y1),
        Point2D::new(x0, y1),
    ];
    (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect()
}

/// 6m × 4m room with a square pillar, sensor roughly in the middle.
pub fn room() -> Vec<Wall> {
    let mut walls = rectangle(-2.5, -1.8, 3.5, 2.2);
    walls.extend(rectangle(1.0, 0.8, 1.4, 1.2));
    walls
}

/// A single 2m wall 2m in front of the origin.
pub fn single_wall() -> Vec<Wall> {
    vec![(Point2D::new(2.0, -1.0), Point2D::new(2.0, 1.0))]
}

/// Distance along the ray from `origin` at `angle` to the nearest wall.
pub fn ray_cast(origin: Point2D, angle: f64, walls: &[Wall]) -> Option<f64> {
    let dir = Point2D::from_polar(1.0, angle);
    let mut best: Option<f64> = None;

    for &(a, b) in walls {
        let edge = b - a;
        let denom = dir.cross(edge);
        if denom.abs() < 1e-12 {
            continue;
        }
        let to_start = a - origin;
        let t = to_start.cross(edge) / denom;
        let s = to_start.cross(dir) / denom;
        if t > 0.0 && (0.0..=1.0).contains(&s) && best.is_none_or(|d| t < d) {
            best = Some(t);
        }
    }
    best
}

/// Scan `walls` from `pose` with `num_beams` beams evenly spread over `fov`.
pub fn cast_scan(walls: &[Wall], pose: Pose2D, num_beams: usize, fov: f64) -> RangeScan {
    let step = fov / (num_beams - 1) as f64;
    let mut ranges = Vec::with_capacity(num_beams);
    let mut bearings = Vec::with_capacity(num_beams);

    for i in 0..num_beams {
        let bearing = -fov / 2.0 + i as f64 * step;
        let range = ray_cast(pose.position(), pose.theta + bearing, walls).unwrap_or(NO_RETURN);
        ranges.push(range);
        bearings.push(bearing);
    }

    RangeScan::from_ranges(&ranges, &bearings)
}

/// 271-beam, 270° scan of [`room`] from `pose`.
pub fn room_scan(pose: Pose2D) -> RangeScan {
    cast_scan(&room(), pose, 271, 1.5 * PI)
}

/// 360-beam full-turn scan of [`room`] from `pose`, bearings `start + i°`.
///
/// `start = -π` gives bearings in [-π, π), `start = 0` gives [0, 2π).
pub fn full_room_scan(pose: Pose2D, start: f64) -> RangeScan {
    let num_beams = 360;
    let step = 2.0 * PI / num_beams as f64;
    let walls = room();
    let mut ranges = Vec::with_capacity(num_beams);
    let mut bearings = Vec::with_capacity(num_beams);

    for i in 0..num_beams {
        let bearing = start + i as f64 * step;
        let range = ray_cast(pose.position(), pose.theta + bearing, &walls).unwrap_or(NO_RETURN);
        ranges.push(range);
        bearings.push(bearing);
    }

    RangeScan::from_ranges(&ranges, &bearings)
}

/// Copy of `scan` tagged with `unit_factor`; its projected points are scaled by it.
pub fn with_unit_factor(scan: &RangeScan, unit_factor: f64) -> RangeScan {
    let mut scaled = scan.clone();
    scaled.unit_factor = unit_factor;
    scaled
}
