// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compass heading and match confidence.

use geo::Coord;
use nalgebra::Vector2;

/// Round to 2 decimal places, halves away from zero.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compass bearing in degrees from `sample` toward `target`.
///
/// 0° is north (+y), measured clockwise, so east (+x) is 90°. The angle to
/// north comes from `acos` in `[0°, 180°]`; the sign of the east-west
/// component folds it into the full circle. A zero-length vector has heading
/// 0°. The result is rounded to 2 decimals and always lies in `[0, 360)`.
pub fn heading(sample: Coord<f64>, target: Coord<f64>) -> f64 {
    let v = Vector2::new(target.x - sample.x, target.y - sample.y);
    let norm = v.norm();
    if norm == 0.0 {
        return 0.0;
    }

    let cos_theta = (v.dot(&Vector2::y()) / norm).clamp(-1.0, 1.0);
    let theta = cos_theta.acos().to_degrees();
    let bearing = if v.x >= 0.0 { theta } else { 360.0 - theta };

    // A bearing a hair west of north rounds up to 360.00
    let rounded = round2(bearing);
    if rounded >= 360.0 {
        0.0
    } else {
        rounded
    }
}

/// Linear distance score: 100 at the road, 0 at 100 units and beyond.
#[inline]
pub fn confidence(distance: f64) -> f64 {
    round2((100.0 - distance).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    #[test]
    fn test_cardinal_and_intercardinal_headings() {
        let radius = 25.0;
        let expected = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

        for (step, want) in expected.iter().enumerate() {
            // Compass angle -> math angle: east of north, clockwise
            let compass = (step as f64 * 45.0).to_radians();
            let target = Coord {
                x: radius * compass.sin(),
                y: radius * compass.cos(),
            };
            assert_abs_diff_eq!(heading(ORIGIN, target), *want, epsilon = 0.01);
        }
    }

    #[test]
    fn test_heading_is_translation_invariant() {
        let sample = Coord { x: 551_234.5, y: 4_182_000.25 };
        let target = Coord { x: sample.x - 3.0, y: sample.y - 3.0 };
        assert_abs_diff_eq!(heading(sample, target), 225.0, epsilon = 0.01);
    }

    #[test]
    fn test_zero_length_heading_is_north() {
        let p = Coord { x: 4.0, y: -2.0 };
        assert_eq!(heading(p, p), 0.0);
    }

    #[test]
    fn test_heading_never_reaches_360() {
        // Just west of due north: 360 - tiny angle rounds to 360.00
        let target = Coord { x: -1e-7, y: 100.0 };
        let h = heading(ORIGIN, target);
        assert!((0.0..360.0).contains(&h));
        assert_eq!(h, 0.0);
    }

    #[test]
    fn test_heading_is_rounded() {
        let h = heading(ORIGIN, Coord { x: 1.0, y: 2.0 });
        // atan2(1, 2) = 26.565...
        assert_eq!(h, 26.57);
    }

    #[test]
    fn test_confidence() {
        assert_eq!(confidence(0.0), 100.0);
        assert_eq!(confidence(5.0), 95.0);
        assert_eq!(confidence(37.25), 62.75);
        assert_eq!(confidence(100.0), 0.0);
        assert_eq!(confidence(250.0), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(12.346), 12.35);
        assert_eq!(round2(-0.004), -0.0);
    }
}
