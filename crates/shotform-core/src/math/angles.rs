use nalgebra::Vector2;

const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Returns the angle in degrees at `vertex` between the segments towards `a` and `b`.
///
/// Uses `cos(θ) = (va · vb) / (|va| |vb|)`. Returns `None` when either segment
/// is degenerate, so callers can treat the joint as unmeasurable instead of
/// scoring a meaningless angle.
pub fn joint_angle_deg(a: Vector2<f64>, vertex: Vector2<f64>, b: Vector2<f64>) -> Option<f64> {
    let va = a - vertex;
    let vb = b - vertex;
    let norms = va.norm() * vb.norm();
    if norms < MIN_SEGMENT_LENGTH {
        return None;
    }
    let cos_angle = (va.dot(&vb) / norms).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Linear-falloff confidence of `measured` against `ideal`.
///
/// 1.0 inside the tolerance band, decaying linearly to 0.0 one further
/// tolerance width outside it.
pub fn tolerance_confidence(measured: f64, ideal: f64, tolerance: f64) -> f64 {
    let difference = (measured - ideal).abs();
    if difference > tolerance {
        (1.0 - (difference - tolerance) / tolerance).max(0.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_joint_is_180_degrees() {
        let angle = joint_angle_deg(
            Vector2::new(0.0, 0.0),
            Vector2::new(0.5, 0.0),
            Vector2::new(1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(angle, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn right_angle_joint() {
        let angle = joint_angle_deg(
            Vector2::new(0.3, 0.6),
            Vector2::new(0.45, 0.6),
            Vector2::new(0.45, 0.4),
        )
        .unwrap();
        assert_relative_eq!(angle, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_segment_has_no_angle() {
        let p = Vector2::new(0.2, 0.2);
        assert!(joint_angle_deg(p, p, Vector2::new(0.5, 0.5)).is_none());
    }

    #[test]
    fn tolerance_confidence_falls_off_linearly() {
        assert_relative_eq!(tolerance_confidence(0.1, 0.0, 0.25), 1.0);
        assert_relative_eq!(tolerance_confidence(0.375, 0.0, 0.25), 0.5, epsilon = 1e-12);
        assert_relative_eq!(tolerance_confidence(-2.0, 0.0, 0.25), 0.0);
    }
}
