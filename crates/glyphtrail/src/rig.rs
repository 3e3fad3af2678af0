//! Pointer-driven model orientation.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How the pointer drives the model's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RigPolicy {
    /// Eases toward `(-pointer.y * 2, pointer.x * 2, 0) + correction`, with
    /// the z axis pinned to `pinned_z`.
    Spring {
        ease: f32,
        correction: Vec3,
        pinned_z: f32,
    },
    /// Steps each axis by `±sensitivity` per frame, signed by the pointer
    /// (a zero coordinate counts as positive). The x axis is clamped to
    /// `[-clamp_x, clamp_x]` radians, without wrapping. The rig's velocity
    /// holds this frame's step, not a running sum; the rotation is what
    /// accumulates.
    Incremental { sensitivity: f32, clamp_x: f32 },
    /// Constant spin about y, ignoring the pointer.
    Spin { rate: f32 },
}

impl RigPolicy {
    pub fn spring() -> Self {
        Self::Spring {
            ease: 0.006,
            correction: Vec3::ZERO,
            pinned_z: 0.0,
        }
    }

    pub fn incremental() -> Self {
        Self::Incremental {
            sensitivity: 0.01,
            clamp_x: 10.0,
        }
    }

    pub fn spin() -> Self {
        Self::Spin { rate: 0.01 }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Spring { .. } => "spring",
            Self::Incremental { .. } => "incremental",
            Self::Spin { .. } => "spin",
        }
    }
}

/// Rotation state of the loaded model. Only built once a mesh exists.
#[derive(Debug, Clone)]
pub struct ModelRig {
    policy: RigPolicy,
    /// Euler angles (XYZ order) in radians.
    rotation: Vec3,
    velocity: Vec3,
    /// Fixed orientation applied underneath the rig rotation.
    base: Quat,
}

impl ModelRig {
    pub fn new(policy: RigPolicy, base_euler: Vec3) -> Self {
        let rotation = match policy {
            RigPolicy::Spring { pinned_z, .. } => Vec3::new(0.0, 0.0, pinned_z),
            _ => Vec3::ZERO,
        };
        Self {
            policy,
            rotation,
            velocity: Vec3::ZERO,
            base: Quat::from_euler(EulerRot::XYZ, base_euler.x, base_euler.y, base_euler.z),
        }
    }

    pub fn policy(&self) -> &RigPolicy {
        &self.policy
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// The step applied by the last update.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Advances one frame. Call after the frame's pointer value is final.
    pub fn update(&mut self, pointer: Vec2) {
        match self.policy {
            RigPolicy::Spring {
                ease,
                correction,
                pinned_z,
            } => {
                let target = Vec3::new(-pointer.y * 2.0, pointer.x * 2.0, 0.0) + correction;
                self.rotation = self.rotation.lerp(target, ease);
                self.rotation.z = pinned_z;
            }
            RigPolicy::Incremental {
                sensitivity,
                clamp_x,
            } => {
                let step = |v: f32| if v >= 0.0 { sensitivity } else { -sensitivity };
                self.velocity = Vec3::new(step(pointer.y), step(pointer.x), 0.0);
                self.rotation += self.velocity;
                self.rotation.x = self.rotation.x.clamp(-clamp_x, clamp_x);
            }
            RigPolicy::Spin { rate } => {
                self.velocity = Vec3::new(0.0, rate, 0.0);
                self.rotation += self.velocity;
            }
        }
    }

    /// Model matrix under `parent` (the scene root transform).
    pub fn model_matrix(&self, parent: Mat4) -> Mat4 {
        let r = self.rotation;
        let local = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z) * self.base;
        parent * Mat4::from_quat(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spring_eases_toward_scaled_pointer_and_pins_z() {
        let mut rig = ModelRig::new(
            RigPolicy::Spring {
                ease: 0.5,
                correction: Vec3::new(0.1, 0.0, 3.0),
                pinned_z: 0.25,
            },
            Vec3::ZERO,
        );
        rig.update(Vec2::new(0.5, 0.5));
        // target = (-1 + 0.1, 1, 3)
        assert!((rig.rotation().x - (-0.45)).abs() < 1e-6);
        assert!((rig.rotation().y - 0.5).abs() < 1e-6);
        assert_eq!(rig.rotation().z, 0.25);

        for _ in 0..64 {
            rig.update(Vec2::new(0.5, 0.5));
        }
        assert!((rig.rotation().x - (-0.9)).abs() < 1e-4);
        assert!((rig.rotation().y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn incremental_steps_by_sign_with_zero_counting_positive() {
        let mut rig = ModelRig::new(RigPolicy::incremental(), Vec3::ZERO);
        rig.update(Vec2::new(0.0, -0.3));
        assert!((rig.rotation().x + 0.01).abs() < 1e-6);
        assert!((rig.rotation().y - 0.01).abs() < 1e-6);
        assert_eq!(rig.velocity(), Vec3::new(-0.01, 0.01, 0.0));
    }

    #[test]
    fn incremental_velocity_is_the_current_step() {
        let mut rig = ModelRig::new(RigPolicy::incremental(), Vec3::ZERO);
        for _ in 0..5 {
            rig.update(Vec2::new(0.4, 0.4));
        }
        assert_eq!(rig.velocity(), Vec3::new(0.01, 0.01, 0.0));
        assert!((rig.rotation() - Vec3::new(0.05, 0.05, 0.0)).length() < 1e-6);

        rig.update(Vec2::new(-0.4, 0.4));
        assert_eq!(rig.velocity(), Vec3::new(0.01, -0.01, 0.0));
        assert!((rig.rotation() - Vec3::new(0.06, 0.04, 0.0)).length() < 1e-6);
    }

    #[test]
    fn incremental_clamps_x_without_wrapping() {
        let mut rig = ModelRig::new(
            RigPolicy::Incremental {
                sensitivity: 1.5,
                clamp_x: 10.0,
            },
            Vec3::ZERO,
        );
        for _ in 0..20 {
            rig.update(Vec2::new(1.0, 1.0));
        }
        assert_eq!(rig.rotation().x, 10.0);
        // y is unclamped.
        assert!((rig.rotation().y - 30.0).abs() < 1e-3);
        for _ in 0..20 {
            rig.update(Vec2::new(1.0, -1.0));
        }
        assert_eq!(rig.rotation().x, -10.0);
    }

    #[test]
    fn spin_ignores_pointer() {
        let mut rig = ModelRig::new(RigPolicy::spin(), Vec3::ZERO);
        rig.update(Vec2::new(-1.0, 1.0));
        rig.update(Vec2::new(1.0, -1.0));
        assert!((rig.rotation() - Vec3::new(0.0, 0.02, 0.0)).length() < 1e-6);
    }

    #[test]
    fn model_matrix_composes_parent() {
        let rig = ModelRig::new(RigPolicy::spin(), Vec3::ZERO);
        let parent = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let m = rig.model_matrix(parent);
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }
}
