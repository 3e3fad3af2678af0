//! Per-frame scene state, built once at startup and passed to whoever needs it.

use glam::{Mat4, Vec2};
use glyphtrail::{ModelRig, PointerSignal, RibbonMesh, SceneConfig, Trail};

/// A trail with the strip that mirrors its points.
pub struct TrailInstance {
    pub trail: Trail,
    pub mesh: RibbonMesh,
}

impl TrailInstance {
    pub fn new(trail: Trail) -> Self {
        let mesh = RibbonMesh::from_points(trail.points());
        Self { trail, mesh }
    }
}

pub struct SceneContext {
    pub config: SceneConfig,
    pub pointer: PointerSignal,
    pub trails: Vec<TrailInstance>,
    /// Present once the model has loaded.
    pub rig: Option<ModelRig>,
    /// Scene root transform the model hangs off.
    pub root: Mat4,
    /// Drawing-buffer size in physical pixels.
    pub resolution: Vec2,
    pub dpr: f32,
}

impl SceneContext {
    pub fn new(config: SceneConfig, pointer: PointerSignal, resolution: Vec2, dpr: f32) -> Self {
        let trails: Vec<_> = config.trails.spawn().into_iter().map(TrailInstance::new).collect();
        log::info!(
            "Scene ready: {} trails of {} points",
            trails.len(),
            config.trails.points
        );
        Self {
            config,
            pointer,
            trails,
            rig: None,
            root: Mat4::IDENTITY,
            resolution,
            dpr,
        }
    }

    pub fn attach_rig(&mut self) {
        self.rig = Some(ModelRig::new(self.config.rig, self.config.model_base_euler));
    }

    /// One frame: read the pointer once, advance every trail and rewrite its
    /// strip, then turn the model.
    pub fn tick(&mut self) {
        let pointer = self.pointer.read();
        let pointer3 = pointer.extend(0.0);

        for instance in &mut self.trails {
            instance.trail.update(pointer3);
            instance.mesh.rebuild(instance.trail.points());
        }

        if let Some(rig) = &mut self.rig {
            rig.update(pointer);
        }
    }

    /// Caches the new drawing-buffer size. Topology is untouched.
    pub fn resize(&mut self, resolution: Vec2, dpr: f32) {
        self.resolution = resolution;
        self.dpr = dpr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> SceneContext {
        let mut config = SceneConfig::default();
        config.trails.seed = Some(7);
        SceneContext::new(config, PointerSignal::new(), Vec2::new(800.0, 600.0), 1.0)
    }

    #[test]
    fn spawns_configured_trails() {
        let scene = scene();
        assert_eq!(scene.trails.len(), 5);
        for t in &scene.trails {
            assert_eq!(t.trail.len(), 40);
            assert_eq!(t.mesh.point_count(), 40);
        }
        assert!(scene.rig.is_none());
    }

    #[test]
    fn tick_moves_heads_and_keeps_strip_in_sync() {
        let mut scene = scene();
        scene.pointer.write(Vec2::new(0.5, -0.5));
        let counts: Vec<_> = scene
            .trails
            .iter()
            .map(|t| (t.mesh.vertices().len(), t.mesh.indices().len()))
            .collect();

        for _ in 0..10 {
            scene.tick();
        }

        for (t, counts) in scene.trails.iter().zip(counts) {
            assert_ne!(t.trail.head(), glam::Vec3::ZERO);
            let head = t.mesh.vertices()[0].position;
            assert_eq!(head, t.trail.head().to_array());
            assert_eq!((t.mesh.vertices().len(), t.mesh.indices().len()), counts);
        }
    }

    #[test]
    fn rig_turns_only_after_attach() {
        let mut scene = scene();
        scene.tick();
        assert!(scene.rig.is_none());

        scene.attach_rig();
        scene.tick();
        let rig = scene.rig.as_ref().map(|r| r.rotation());
        assert!(matches!(rig, Some(r) if r.y > 0.0));
    }

    #[test]
    fn resize_only_touches_cached_size() {
        let mut scene = scene();
        let before = scene.trails[0].mesh.indices().to_vec();
        scene.resize(Vec2::new(1920.0, 1080.0), 2.0);
        scene.resize(Vec2::new(1920.0, 1080.0), 2.0);
        assert_eq!(scene.resolution, Vec2::new(1920.0, 1080.0));
        assert_eq!(scene.dpr, 2.0);
        assert_eq!(scene.trails[0].mesh.indices(), before.as_slice());
    }
}
