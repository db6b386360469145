//! Procedural particle animation engine.
//!
//! An [`AnimatorSession`] owns a fixed 100-slot particle pool and drives a
//! per-frame update/draw cycle from one immutable scene description:
//! - fading-trail overlay, then a pulsing central glow
//! - per-particle kinematics branched on animation style and mood bucket
//! - in-place replacement of expired or out-of-bounds particles
//!
//! The loop is pull-driven: each `frame` call performs one step and asks the
//! injected [`FrameScheduler`] for its own re-invocation, so it runs until
//! `stop()` or a superseding `start()`.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::render::particle::Particle;
use crate::render::{FrameScheduler, Surface};
use crate::scene::{AnimationKind, MoodBucket, SceneDescription};

/// Fixed particle pool size for the life of a run.
pub const POOL_SIZE: usize = 100;

/// Trail overlay: very dark blue/purple at low alpha, so each frame fades
/// the previous one instead of clearing it.
const TRAIL_COLOR: [f32; 4] = [21.0 / 255.0, 0.0, 61.0 / 255.0, 0.15];

/// Angular speed per frame for the rotational branches, by mood bucket.
const SWIRL_SPEED_ANXIOUS: f32 = 0.05;
const SWIRL_SPEED_CALM: f32 = 0.01;

/// Fraction of the center offset a Vortex particle loses each frame.
const VORTEX_PULL: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
}

/// One animation run: scene, pool, dimensions, and the RNG that respawns
/// particles. Owned by the caller; no ambient globals.
pub struct AnimatorSession {
    state: State,
    scene: Option<SceneDescription>,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl AnimatorSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: State::Idle,
            scene: None,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            rng,
        }
    }

    /// Begin an indefinite animation run for `scene` on a surface of the
    /// given size. Starting while already running supersedes the previous
    /// run: the pool is rebuilt and the old run can never draw again.
    pub fn start(&mut self, scene: SceneDescription, width: f32, height: f32) {
        log::info!(
            "Starting visualization \"{}\" ({}, {})",
            scene.scene_title,
            scene.animation_type,
            scene.dominant_mood
        );
        self.width = width;
        self.height = height;
        self.scene = Some(scene);
        self.rebuild_pool();
        self.state = State::Running;
    }

    /// Halt the run. The next `frame` call draws nothing and does not
    /// reschedule. The scene stays readable for display.
    pub fn stop(&mut self) {
        if self.state == State::Running {
            log::debug!("Animation stopped");
        }
        self.state = State::Idle;
        self.particles.clear();
    }

    /// Adopt new surface dimensions. While running, the pool is rebuilt at
    /// the new size with the same scene (equivalent to stop + start); while
    /// idle, the dimensions are just recorded.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if self.state == State::Running {
            self.rebuild_pool();
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Scene of the current (or last) run.
    pub fn scene(&self) -> Option<&SceneDescription> {
        self.scene.as_ref()
    }

    fn rebuild_pool(&mut self) {
        self.particles.clear();
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        for _ in 0..POOL_SIZE {
            self.particles
                .push(Particle::spawn(self.width, self.height, scene, &mut self.rng));
        }
    }

    /// Perform one frame step at monotonic timestamp `t_ms` and request the
    /// next one. A stopped session returns immediately without drawing or
    /// rescheduling.
    pub fn frame(
        &mut self,
        surface: &mut dyn Surface,
        scheduler: &mut dyn FrameScheduler,
        t_ms: f64,
    ) {
        if self.state != State::Running {
            return;
        }
        let Some(scene) = self.scene.as_ref() else {
            return;
        };

        let (w, h) = (self.width, self.height);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let kind = scene.animation_kind();
        let mood = scene.mood_bucket();
        let color = scene.color();

        // Fading trail instead of a hard clear.
        surface.fill_rect(0.0, 0.0, w, h, TRAIL_COLOR);

        // Central glow: size pulses with time and shrinks for anxious moods.
        let glow_radius = 40.0 * scene.mood_factor() + 10.0 * (t_ms * 0.002).sin() as f32;
        let glow_alpha = 0.5 + 0.1 * (t_ms * 0.001).sin() as f32;
        surface.fill_circle(cx, cy, glow_radius, [color[0], color[1], color[2], glow_alpha]);

        for i in 0..self.particles.len() {
            self.particles[i].life -= 1.0;
            if self.particles[i].life <= 0.0 {
                self.particles[i] = Particle::spawn(w, h, scene, &mut self.rng);
                continue;
            }

            {
                let p = &mut self.particles[i];
                match kind {
                    AnimationKind::Swirl | AnimationKind::Vortex => {
                        let dx = p.x - cx;
                        let dy = p.y - cy;
                        let dist = (dx * dx + dy * dy).sqrt();
                        let angle = dy.atan2(dx);

                        let speed = if mood == MoodBucket::Anxious {
                            SWIRL_SPEED_ANXIOUS
                        } else {
                            SWIRL_SPEED_CALM
                        };
                        p.x = cx + (angle + speed).cos() * dist;
                        p.y = cy + (angle + speed).sin() * dist;

                        // Vortex spirals inward.
                        if kind == AnimationKind::Vortex {
                            p.x -= dx * VORTEX_PULL;
                            p.y -= dy * VORTEX_PULL;
                        }
                    }
                    AnimationKind::Comet => {
                        // Fly upward with a slight sine wobble.
                        p.y -= 2.0 + p.size / 2.0;
                        p.x += (p.y * 0.01).sin() * 0.5;
                    }
                    AnimationKind::Mist | AnimationKind::Particles => {
                        let scale = if mood == MoodBucket::Anxious { 2.0 } else { 1.0 };
                        p.x += p.vx * scale;
                        p.y += p.vy * scale;
                    }
                }
            }

            // Escaped particles are replaced, not clamped or wrapped.
            if !self.particles[i].in_bounds(w, h) {
                self.particles[i] = Particle::spawn(w, h, scene, &mut self.rng);
                continue;
            }

            let p = &self.particles[i];
            surface.fill_circle(p.x, p.y, p.size, [p.color[0], p.color[1], p.color[2], p.opacity()]);
        }

        scheduler.request_frame();
    }
}

impl Default for AnimatorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(mood: &str, kind: &str, color: &str) -> SceneDescription {
        SceneDescription {
            scene_title: "Test Dream".into(),
            dominant_mood: mood.into(),
            primary_object: "o".into(),
            primary_color: color.into(),
            animation_type: kind.into(),
        }
    }

    struct RecordingSurface {
        w: f32,
        h: f32,
        rects: Vec<[f32; 4]>,
        circles: Vec<(f32, f32, f32, [f32; 4])>,
    }

    impl RecordingSurface {
        fn new(w: f32, h: f32) -> Self {
            Self {
                w,
                h,
                rects: Vec::new(),
                circles: Vec::new(),
            }
        }
        fn clear(&mut self) {
            self.rects.clear();
            self.circles.clear();
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f32 {
            self.w
        }
        fn height(&self) -> f32 {
            self.h
        }
        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _color: [f32; 4]) {
            self.rects.push([x, y, w, h]);
        }
        fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: [f32; 4]) {
            self.circles.push((x, y, radius, color));
        }
    }

    struct CountingScheduler {
        requests: u32,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn harness(w: f32, h: f32) -> (RecordingSurface, CountingScheduler) {
        (RecordingSurface::new(w, h), CountingScheduler { requests: 0 })
    }

    fn assert_all_in_bounds(session: &AnimatorSession, w: f32, h: f32) {
        for (i, p) in session.particles.iter().enumerate() {
            assert!(
                p.in_bounds(w, h),
                "particle {} out of bounds at ({}, {})",
                i,
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn pool_size_is_invariant() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        for kind in ["Particles", "Swirl", "Mist", "Comet", "Vortex"] {
            for mood in ["Anxious", "Calm", "Joyful"] {
                let mut session = AnimatorSession::with_seed(42);
                session.start(scene(mood, kind, "#E0BBFF"), 400.0, 300.0);
                assert_eq!(session.particles.len(), POOL_SIZE);

                for t in 0..250 {
                    session.frame(&mut surface, &mut sched, t as f64 * 16.0);
                    assert_eq!(session.particles.len(), POOL_SIZE);
                    assert_all_in_bounds(&session, 400.0, 300.0);
                }
                surface.clear();
            }
        }
    }

    #[test]
    fn anxious_vortex_stays_in_bounds_for_1000_frames() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(7);
        session.start(scene("Anxious", "Vortex", "#FF0000"), 400.0, 300.0);

        for t in 0..1000 {
            session.frame(&mut surface, &mut sched, t as f64 * 16.0);
            assert_all_in_bounds(&session, 400.0, 300.0);
        }
        assert_eq!(session.particles.len(), POOL_SIZE);
    }

    #[test]
    fn swirl_advances_angle_by_mood_speed() {
        // Particle placed due east of center at distance 100: one anxious
        // frame rotates it by exactly 0.05 rad.
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(1);
        session.start(scene("Anxious", "Swirl", "#FF0000"), 400.0, 300.0);
        session.particles[0].x = 300.0;
        session.particles[0].y = 150.0;
        session.particles[0].life = 100.0;

        session.frame(&mut surface, &mut sched, 0.0);

        let p = &session.particles[0];
        assert!((p.x - (200.0 + 0.05_f32.cos() * 100.0)).abs() < 1e-3);
        assert!((p.y - (150.0 + 0.05_f32.sin() * 100.0)).abs() < 1e-3);
    }

    #[test]
    fn calm_swirl_is_slower() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(1);
        session.start(scene("Calm", "Swirl", "#FF0000"), 400.0, 300.0);
        session.particles[0].x = 300.0;
        session.particles[0].y = 150.0;
        session.particles[0].life = 100.0;

        session.frame(&mut surface, &mut sched, 0.0);

        let p = &session.particles[0];
        assert!((p.x - (200.0 + 0.01_f32.cos() * 100.0)).abs() < 1e-3);
        assert!((p.y - (150.0 + 0.01_f32.sin() * 100.0)).abs() < 1e-3);
    }

    #[test]
    fn vortex_pulls_toward_center() {
        // Same setup as the swirl test, plus the 0.1% inward pull on the
        // pre-rotation offset (dx = 100, dy = 0).
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(1);
        session.start(scene("Anxious", "Vortex", "#FF0000"), 400.0, 300.0);
        session.particles[0].x = 300.0;
        session.particles[0].y = 150.0;
        session.particles[0].life = 100.0;

        session.frame(&mut surface, &mut sched, 0.0);

        let p = &session.particles[0];
        assert!((p.x - (200.0 + 0.05_f32.cos() * 100.0 - 0.1)).abs() < 1e-3);
        assert!((p.y - (150.0 + 0.05_f32.sin() * 100.0)).abs() < 1e-3);
    }

    #[test]
    fn comet_rises_with_wobble() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(1);
        session.start(scene("Calm", "Comet", "#FF0000"), 400.0, 300.0);
        session.particles[0].x = 200.0;
        session.particles[0].y = 200.0;
        session.particles[0].size = 2.0;
        session.particles[0].life = 100.0;

        session.frame(&mut surface, &mut sched, 0.0);

        let p = &session.particles[0];
        let expected_y = 200.0 - 3.0; // 2 + size/2
        assert!((p.y - expected_y).abs() < 1e-3);
        assert!((p.x - (200.0 + (expected_y * 0.01_f32).sin() * 0.5)).abs() < 1e-3);
    }

    #[test]
    fn drift_doubles_when_anxious() {
        let (mut surface, mut sched) = harness(400.0, 300.0);

        let mut calm = AnimatorSession::with_seed(1);
        calm.start(scene("Calm", "Mist", "#FF0000"), 400.0, 300.0);
        calm.particles[0].x = 200.0;
        calm.particles[0].y = 150.0;
        calm.particles[0].vx = 0.1;
        calm.particles[0].vy = 0.0;
        calm.particles[0].life = 100.0;
        calm.frame(&mut surface, &mut sched, 0.0);
        assert!((calm.particles[0].x - 200.1).abs() < 1e-4);

        let mut anxious = AnimatorSession::with_seed(1);
        anxious.start(scene("Anxious", "Mist", "#FF0000"), 400.0, 300.0);
        anxious.particles[0].x = 200.0;
        anxious.particles[0].y = 150.0;
        anxious.particles[0].vx = 0.1;
        anxious.particles[0].vy = 0.0;
        anxious.particles[0].life = 100.0;
        anxious.frame(&mut surface, &mut sched, 0.0);
        assert!((anxious.particles[0].x - 200.2).abs() < 1e-4);
    }

    #[test]
    fn expired_particle_is_replaced_in_place() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(9);
        session.start(scene("Calm", "Particles", "#FF0000"), 400.0, 300.0);
        session.particles[5].life = 1.0;

        session.frame(&mut surface, &mut sched, 0.0);

        let p = &session.particles[5];
        assert!(p.life >= 49.0, "slot 5 was not respawned (life {})", p.life);
        assert!(p.in_bounds(400.0, 300.0));
        assert_eq!(session.particles.len(), POOL_SIZE);
    }

    #[test]
    fn escaped_particle_is_replaced_in_place() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(9);
        session.start(scene("Calm", "Mist", "#FF0000"), 400.0, 300.0);
        session.particles[3].x = 399.0;
        session.particles[3].vx = 500.0;
        session.particles[3].life = 100.0;

        session.frame(&mut surface, &mut sched, 0.0);

        let p = &session.particles[3];
        assert!(p.in_bounds(400.0, 300.0));
        assert!(p.vx.abs() <= 0.25); // fresh spawn, not the escaping one
    }

    #[test]
    fn stop_prevents_the_next_frame() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(2);
        session.start(scene("Calm", "Particles", "#FF0000"), 400.0, 300.0);
        session.frame(&mut surface, &mut sched, 0.0);
        assert_eq!(sched.requests, 1);

        session.stop();
        surface.clear();
        session.frame(&mut surface, &mut sched, 16.0);

        assert!(surface.rects.is_empty());
        assert!(surface.circles.is_empty());
        assert_eq!(sched.requests, 1); // no reschedule after stop
        assert!(!session.is_running());
    }

    #[test]
    fn idle_session_never_draws() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(2);
        session.frame(&mut surface, &mut sched, 0.0);
        assert!(surface.circles.is_empty());
        assert_eq!(sched.requests, 0);
    }

    #[test]
    fn resize_keeps_scene_and_rebuilds_pool() {
        let (mut surface, mut sched) = harness(800.0, 600.0);
        let mut session = AnimatorSession::with_seed(4);
        session.start(scene("Mysterious", "Swirl", "#301E67"), 400.0, 300.0);

        session.resize(800.0, 600.0);

        let s = session.scene().unwrap();
        assert_eq!(s.dominant_mood, "Mysterious");
        assert_eq!(s.animation_type, "Swirl");
        assert_eq!(s.primary_color, "#301E67");
        assert_eq!(session.particles.len(), POOL_SIZE);
        assert!(session.is_running());
        assert_all_in_bounds(&session, 800.0, 600.0);

        // Still animating at the new size.
        session.frame(&mut surface, &mut sched, 0.0);
        assert_eq!(sched.requests, 1);
    }

    #[test]
    fn start_supersedes_a_running_session() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(4);
        session.start(scene("Calm", "Mist", "#FF0000"), 400.0, 300.0);
        session.frame(&mut surface, &mut sched, 0.0);

        session.start(scene("Joyful", "Comet", "#00FF00"), 400.0, 300.0);
        assert_eq!(session.scene().unwrap().animation_type, "Comet");
        assert_eq!(session.particles.len(), POOL_SIZE);

        // Every particle now carries the new scene's color.
        for p in &session.particles {
            assert_eq!(p.color, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn glow_radius_follows_mood_factor() {
        // At t = 0 the pulse terms are zero: radius is exactly 40 * factor
        // and alpha 0.5. The glow is the first circle drawn.
        let (mut surface, mut sched) = harness(400.0, 300.0);

        for (mood, factor) in [("Joyful", 1.0_f32), ("Anxious", 0.5), ("Odd", 0.75)] {
            let mut session = AnimatorSession::with_seed(4);
            session.start(scene(mood, "Particles", "#E0BBFF"), 400.0, 300.0);
            session.frame(&mut surface, &mut sched, 0.0);

            let (x, y, radius, color) = surface.circles[0];
            assert_eq!((x, y), (200.0, 150.0));
            assert!((radius - 40.0 * factor).abs() < 1e-4);
            assert!((color[3] - 0.5).abs() < 1e-4);
            surface.clear();
        }
    }

    #[test]
    fn frame_draws_trail_glow_and_particles() {
        let (mut surface, mut sched) = harness(400.0, 300.0);
        let mut session = AnimatorSession::with_seed(6);
        session.start(scene("Calm", "Particles", "#FF0000"), 400.0, 300.0);
        session.frame(&mut surface, &mut sched, 0.0);

        assert_eq!(surface.rects.len(), 1);
        assert_eq!(surface.rects[0], [0.0, 0.0, 400.0, 300.0]);
        // Glow plus one circle per surviving particle.
        let survivors = session.particles.len();
        assert!(surface.circles.len() <= survivors + 1);
        assert!(surface.circles.len() > 1);
    }
}
