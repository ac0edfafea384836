//! Dial geometry in screen space.
//!
//! Angles are degrees, counter-clockwise from east. Screen `y` grows downward,
//! so it is flipped before `atan2` and again when projecting back to pixels.

use serde::{Deserialize, Serialize};

pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Direction of `cursor` as seen from `center`. The center itself maps to 0.
pub fn pointer_angle(center: Point, cursor: Point) -> f64 {
    let (dx, dy) = (cursor.x - center.x, center.y - cursor.y);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    normalize(dy.atan2(dx).to_degrees())
}

/// Inverse of [`pointer_angle`]: the pixel `distance` away from `center` along `degrees`.
pub fn point_at(center: Point, degrees: f64, distance: f64) -> Point {
    let rad = degrees.to_radians();
    Point::new(
        center.x + distance * rad.cos(),
        center.y - distance * rad.sin(),
    )
}

/// Nearest whole degree, wrapped so that 359.5 and above becomes 0.
pub fn round_degrees(degrees: f64) -> u16 {
    (degrees.round() as i64).rem_euclid(FULL_TURN as i64) as u16
}
