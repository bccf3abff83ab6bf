//! Angle and scale math shared by the gesture engine.

use kurbo::{Point, Vec2};

/// Smallest scale any overlay may take.
pub const MIN_SCALE: f64 = 0.2;
/// Largest scale any overlay may take.
pub const MAX_SCALE: f64 = 3.0;
/// Pointer travel (px) that changes the scale by a factor of one.
pub const RESIZE_DISTANCE: f64 = 200.0;
/// Font size of a text label at scale 1.
pub const BASE_FONT_SIZE: f64 = 32.0;
/// Rendered edge length of the mascot image.
pub const STICKER_SIZE: f64 = 128.0;
/// Offset from a sticker's position to its rotation pivot.
///
/// This approximates the centre of a [`STICKER_SIZE`] square and is not
/// derived from it; the two drift apart if the render size changes.
pub const STICKER_PIVOT_OFFSET: Vec2 = Vec2::new(50.0, 50.0);

/// Angle in degrees of the ray from `pivot` to `point`, in (-180, 180].
pub fn angle_between(pivot: Point, point: Point) -> f64 {
    let degrees = (point - pivot).atan2().to_degrees();
    if degrees <= -180.0 { degrees + 360.0 } else { degrees }
}

/// Scale multiplier for a resize handle dragged by `(delta_x, delta_y)`.
///
/// The magnitude comes from the full drag distance but the sign only from the
/// horizontal component: moving right grows, anything else shrinks.
pub fn scale_factor_from_delta(delta_x: f64, delta_y: f64) -> f64 {
    let distance = (delta_x * delta_x + delta_y * delta_y).sqrt();
    if delta_x > 0.0 {
        1.0 + distance / RESIZE_DISTANCE
    } else {
        1.0 - distance / RESIZE_DISTANCE
    }
}

/// Clamp a scale into [`MIN_SCALE`, `MAX_SCALE`].
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// New scale after a resize step of `delta`.
pub fn apply_resize(scale: f64, delta: Vec2) -> f64 {
    clamp_scale(scale * scale_factor_from_delta(delta.x, delta.y))
}

/// Rotation pivot of a sticker placed at `position`.
pub fn sticker_pivot(position: Point) -> Point {
    position + STICKER_PIVOT_OFFSET
}

/// Display font size of a text label at `scale`.
pub fn derived_font_size(scale: f64) -> f64 {
    (BASE_FONT_SIZE * scale).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_between_axes() {
        let pivot = Point::new(10.0, 10.0);
        assert!((angle_between(pivot, Point::new(20.0, 10.0))).abs() < 1e-9);
        assert!((angle_between(pivot, Point::new(10.0, 20.0)) - 90.0).abs() < 1e-9);
        assert!((angle_between(pivot, Point::new(10.0, 0.0)) + 90.0).abs() < 1e-9);
        assert!((angle_between(pivot, Point::new(0.0, 10.0)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_never_minus_180() {
        let angle = angle_between(Point::new(0.0, 0.0), Point::new(-5.0, -0.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_factor_grows_rightward() {
        assert!((scale_factor_from_delta(100.0, 0.0) - 1.5).abs() < f64::EPSILON);
        // Vertical travel adds to the magnitude, not the sign.
        let factor = scale_factor_from_delta(30.0, 40.0);
        assert!((factor - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_scale_factor_shrinks_otherwise() {
        assert!((scale_factor_from_delta(-100.0, 0.0) - 0.5).abs() < f64::EPSILON);
        assert!((scale_factor_from_delta(0.0, 100.0) - 0.5).abs() < f64::EPSILON);
        assert!((scale_factor_from_delta(-400.0, 0.0) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_resize_clamps() {
        assert!((apply_resize(1.5, Vec2::new(-400.0, 0.0)) - MIN_SCALE).abs() < f64::EPSILON);
        assert!((apply_resize(2.5, Vec2::new(400.0, 0.0)) - MAX_SCALE).abs() < f64::EPSILON);
        assert!((apply_resize(1.0, Vec2::new(100.0, 0.0)) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_scale_nan() {
        assert!((clamp_scale(f64::NAN) - MIN_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sticker_pivot_offset() {
        let pivot = sticker_pivot(Point::new(100.0, 100.0));
        assert_eq!(pivot, Point::new(150.0, 150.0));
    }

    #[test]
    fn test_derived_font_size_rounds() {
        assert!((derived_font_size(1.0) - 32.0).abs() < f64::EPSILON);
        assert!((derived_font_size(1.5) - 48.0).abs() < f64::EPSILON);
        assert!((derived_font_size(0.33) - 11.0).abs() < f64::EPSILON);
    }
}
