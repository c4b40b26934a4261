//! 2D vector helpers.
//!
//! All simulation geometry uses [`glam::Vec2`]. This module adds the handful
//! of operations the physics step leans on, with the degenerate cases pinned
//! down: normalizing a zero-length vector yields [`Vec2::ZERO`] instead of
//! NaN.

use glam::Vec2;

/// Vector from `from` to `to`.
#[inline]
pub fn between(from: Vec2, to: Vec2) -> Vec2 {
    to - from
}

/// Unit vector in the direction of `v`, or zero when `v` has no length.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Unit vector pointing from `from` towards `to`.
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    normalize(between(from, to))
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    distance(p, a + ab * t)
}

/// Random vector with both components in `[-half, half)`.
pub fn jitter<R: rand::Rng + ?Sized>(rng: &mut R, half: f32) -> Vec2 {
    if half <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(direction(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0)), Vec2::ZERO);
    }

    #[test]
    fn normalize_has_unit_length() {
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        // Past the end clamps to the endpoint
        assert!((distance_to_segment(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-6);
        // Degenerate segment
        assert!((distance_to_segment(Vec2::new(0.0, 2.0), a, a) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_jitter_is_zero() {
        let mut rng = rand::thread_rng();
        assert_eq!(jitter(&mut rng, 0.0), Vec2::ZERO);
    }
}
