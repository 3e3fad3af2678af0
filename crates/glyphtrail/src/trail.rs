//! Follow-chain trail state: a spring-eased head and lerping followers.

use glam::Vec3;

/// Fraction of the gap to its predecessor a follower closes every update.
pub const FOLLOW_LERP: f32 = 0.9;

/// One mouse-following line: `points[0]` chases the pointer through a damped
/// spring, every other point eases toward the point in front of it.
///
/// The point count is fixed at construction.
#[derive(Debug, Clone)]
pub struct Trail {
    points: Vec<Vec3>,
    pub spring: f32,
    pub friction: f32,
    pub mouse_offset: Vec3,
    velocity: Vec3,
    /// Ribbon width parameter in CSS pixels, consumed by the ribbon shader.
    pub thickness: f32,
}

impl Trail {
    /// Creates a trail of `count` points (at least one) all sitting at `origin`.
    pub fn new(count: usize, origin: Vec3, spring: f32, friction: f32, mouse_offset: Vec3) -> Self {
        Self {
            points: vec![origin; count.max(1)],
            spring,
            friction,
            mouse_offset,
            velocity: Vec3::ZERO,
            thickness: 1.0,
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn head(&self) -> Vec3 {
        self.points[0]
    }

    /// Advances the chain one frame toward `pointer`.
    ///
    /// Walks from the tail to the head, so every follower reads its
    /// predecessor's value from the previous frame: each link lags one frame
    /// behind the one in front of it.
    pub fn update(&mut self, pointer: Vec3) {
        for i in (0..self.points.len()).rev() {
            if i == 0 {
                let target = pointer + self.mouse_offset;
                let delta = (target - self.points[0]) * self.spring;
                self.velocity = (self.velocity + delta) * self.friction;
                self.points[0] += self.velocity;
            } else {
                let pred = self.points[i - 1];
                self.points[i] = self.points[i].lerp(pred, FOLLOW_LERP);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn lag_cascade_scenario() {
        let mut trail = Trail::new(3, Vec3::new(1.0, 1.0, 0.0), 0.2, 0.8, Vec3::ZERO);
        trail.update(Vec3::ZERO);

        assert!(close(trail.velocity(), Vec3::new(-0.16, -0.16, 0.0)));
        assert!(close(trail.points()[0], Vec3::new(0.84, 0.84, 0.0)));
        // Followers chased the pre-update head, which was where they already were.
        assert!(close(trail.points()[1], Vec3::new(1.0, 1.0, 0.0)));
        assert!(close(trail.points()[2], Vec3::new(1.0, 1.0, 0.0)));

        trail.update(Vec3::ZERO);
        let expected = Vec3::new(1.0, 1.0, 0.0).lerp(Vec3::new(0.84, 0.84, 0.0), FOLLOW_LERP);
        assert!(close(trail.points()[1], expected));
        assert!(close(trail.points()[2], Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn head_never_moves_away_from_target_from_rest() {
        let targets = [
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        for spring in [0.02, 0.3, 0.79] {
            for friction in [0.7, 0.85, 0.95] {
                for target in targets {
                    let offset = Vec3::splat(0.03);
                    let mut trail = Trail::new(4, Vec3::new(0.2, 0.9, 0.0), spring, friction, offset);
                    let before = (trail.head() - (target + offset)).length();
                    trail.update(target);
                    let after = (trail.head() - (target + offset)).length();
                    assert!(after <= before, "spring={spring} friction={friction}");
                }
            }
        }
    }

    #[test]
    fn followers_close_ninety_percent_of_gap_to_stale_predecessor() {
        let mut trail = Trail::new(5, Vec3::ZERO, 0.5, 0.9, Vec3::ZERO);
        for _ in 0..7 {
            trail.update(Vec3::new(0.7, -0.3, 0.0));
        }
        let before = trail.points().to_vec();
        trail.update(Vec3::new(-0.4, 0.6, 0.0));
        for i in 1..before.len() {
            let expected = before[i] + (before[i - 1] - before[i]) * FOLLOW_LERP;
            assert!(close(trail.points()[i], expected), "point {i}");
        }
    }

    #[test]
    fn point_count_is_fixed_and_at_least_one() {
        let mut trail = Trail::new(0, Vec3::ZERO, 0.5, 0.5, Vec3::ZERO);
        assert_eq!(trail.len(), 1);
        trail.update(Vec3::ONE);
        assert_eq!(trail.len(), 1);
        assert!(trail.head().x > 0.0);
    }
}
