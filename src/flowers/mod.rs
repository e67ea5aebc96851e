//! Ambient flower field.
//!
//! Flowers sprout on the grass, sit as buds until the cat brushes past,
//! bloom, age, and get knocked off by the next touch. A removed flower is
//! not replaced on the spot: the spawn timer tops the field back up.

pub mod components;
pub mod lifecycle;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{Viewport, WorldConfig};
use crate::particles::{BurstKind, ParticleSystem};
use crate::render::{gray, Instance, Kind};
use crate::util::random::Random;
use components::{Petals, Position, Shadow};
use lifecycle::{Outcome, Phase, Stage};

/// Shadow alpha below which nothing is drawn.
const SHADOW_VISIBLE: f64 = 0.001;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    /// Population cap.
    pub max_count: usize,
    /// Ticks between spawns while below the cap.
    pub spawn_interval: u32,
    /// Draw size range in px.
    pub draw_size: [f64; 2],
    /// Per-phase duration range in ticks (inclusive).
    pub phase_ticks: [u32; 2],
    /// Largest start twist in degrees.
    pub max_rotation: f64,
    /// Extra reach around the flower that counts as a cat touch (px).
    pub overlap_radius: f64,
    pub opacity_bud: f64,
    pub opacity_bloomed: f64,
    pub opacity_aged: f64,
    /// Ticks a bloomed flower keeps growing before it can be knocked off.
    pub aging_ticks: u32,
    /// Extra scale gained while aging (0.5 = 50%).
    pub aged_growth: f64,
    /// Spin range in degrees/tick once bloomed.
    pub aged_rotation_speed: [f64; 2],
    /// Brightness at the horizon and at the bottom edge.
    pub depth_tint: [f64; 2],
    pub shadow_max_alpha: f64,
    /// Lure distance (px) at which the shadow disappears.
    pub shadow_distance: f64,
    pub shadow_smoothing: f64,
    /// px/tick² while falling.
    pub gravity: f64,
    /// Initial vertical speed range when knocked off (negative is up).
    pub jump_speed: [f64; 2],
    /// Horizontal speed magnitude range when knocked off.
    pub horizontal_speed: [f64; 2],
    pub sheet_cols: u32,
    pub sheet_rows: u32,
    /// Source px of one sheet cell.
    pub cell_size: f64,
    /// Ticks a fully aged, untouched flower lasts before wilting. `None`
    /// keeps it until the cat comes by.
    pub wilt_ticks: Option<u32>,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            max_count: 50,
            spawn_interval: 2 * crate::config::FPS,
            draw_size: [25.0, 40.0],
            phase_ticks: [20, 50],
            max_rotation: 120.0,
            overlap_radius: 40.0,
            opacity_bud: 0.65,
            opacity_bloomed: 0.85,
            opacity_aged: 1.0,
            aging_ticks: crate::config::FPS,
            aged_growth: 0.5,
            aged_rotation_speed: [-1.0, 1.0],
            depth_tint: [0.75, 1.0],
            shadow_max_alpha: 0.3,
            shadow_distance: 200.0,
            shadow_smoothing: 0.1,
            gravity: 0.75,
            jump_speed: [-12.0, -8.0],
            horizontal_speed: [1.0, 4.0],
            sheet_cols: 6,
            sheet_rows: 6,
            cell_size: 85.0,
            wilt_ticks: None,
        }
    }
}

/// Read-only snapshot of one flower with its derived visuals.
#[derive(Debug, Clone, Copy)]
pub struct FlowerView {
    pub entity: hecs::Entity,
    pub center: DVec2,
    pub stage: Stage,
    pub draw_size: f64,
    pub cell: u32,
    /// Lifecycle scale relative to `draw_size`.
    pub scale: f64,
    /// Perspective multiplier at the flower's current y.
    pub depth_scale: f64,
    pub rotation: f64,
    pub opacity: f64,
    /// Brightness in [0, 1], darker toward the horizon.
    pub tint: f64,
    pub shadow_alpha: f64,
    pub size_factor: f64,
}

pub struct FlowerField {
    world: hecs::World,
    spawn_tick: u32,
    config: FlowerConfig,
    world_config: WorldConfig,
    /// Flowers finished this tick; reused between ticks.
    gone: Vec<hecs::Entity>,
}

impl FlowerField {
    pub fn new(config: FlowerConfig, world_config: WorldConfig) -> Self {
        Self {
            world: hecs::World::new(),
            // First flower sprouts on the first tick.
            spawn_tick: config.spawn_interval,
            config,
            world_config,
            gone: Vec::new(),
        }
    }

    /// Number of live flowers.
    pub fn count(&self) -> usize {
        self.world.len() as usize
    }

    /// Plant a flower at `center`, starting to bud.
    pub fn spawn(&mut self, center: DVec2, petals: Petals) -> hecs::Entity {
        log::trace!(
            "flower sprouts at ({:.0}, {:.0}), size {:.0}",
            center.x,
            center.y,
            petals.draw_size
        );
        self.world.spawn((
            Position(center),
            Stage::Budding(Phase::new(petals.durations.budding)),
            petals,
            Shadow::default(),
        ))
    }

    /// Plant a random flower somewhere on the grass of `viewport`.
    pub fn spawn_random(&mut self, viewport: &Viewport, rng: &mut impl Random) -> hecs::Entity {
        let petals = Petals::roll(&self.config, rng);
        let size = petals.draw_size;
        let margin = self.config.draw_size[1];
        let grass = viewport.grass_top(&self.world_config);
        let span_x = (viewport.width - size - margin * 2.0).max(0.0);
        let span_y = (viewport.height - grass - size - margin * 2.0).max(0.0);
        let corner = DVec2::new(
            margin + rng.f32() as f64 * span_x,
            grass + margin + rng.f32() as f64 * span_y,
        );
        self.spawn(corner + DVec2::splat(size / 2.0), petals)
    }

    /// One tick. `cat` and `lure` are last tick's positions.
    pub fn update(
        &mut self,
        cat: DVec2,
        lure: DVec2,
        viewport: &Viewport,
        particles: &mut ParticleSystem,
        rng: &mut impl Random,
    ) {
        if self.count() < self.config.max_count {
            self.spawn_tick += 1;
            if self.spawn_tick >= self.config.spawn_interval {
                self.spawn_random(viewport, rng);
                self.spawn_tick = 0;
            }
        }

        let cfg = &self.config;
        for (entity, (pos, stage, petals, shadow)) in self
            .world
            .query_mut::<(&mut Position, &mut Stage, &Petals, &mut Shadow)>()
        {
            let touched = pos.0.distance(cat) < petals.reach(cfg);
            match stage.step(&mut pos.0, petals, touched, cfg, rng) {
                Outcome::Gone => {
                    self.gone.push(entity);
                    continue;
                }
                Outcome::Fell => {
                    log::debug!("flower knocked off at ({:.0}, {:.0})", pos.0.x, pos.0.y);
                    particles.burst(pos.0, BurstKind::Ring, rng);
                }
                Outcome::Alive => {}
            }
            shadow.track(pos.0.distance(lure), stage.size_factor(), cfg);
        }

        for entity in self.gone.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }

    fn view(
        &self,
        viewport: &Viewport,
        entity: hecs::Entity,
        pos: &Position,
        stage: &Stage,
        petals: &Petals,
        shadow: &Shadow,
    ) -> FlowerView {
        let cfg = &self.config;
        let [tint_far, tint_near] = cfg.depth_tint;
        let depth_t = viewport.depth_t(&self.world_config, pos.0.y);
        FlowerView {
            entity,
            center: pos.0,
            stage: *stage,
            draw_size: petals.draw_size,
            cell: petals.cell,
            scale: stage.scale(cfg),
            depth_scale: viewport.depth_scale(&self.world_config, pos.0.y),
            rotation: stage.rotation(petals),
            opacity: stage.opacity(cfg),
            tint: tint_far + depth_t * (tint_near - tint_far),
            shadow_alpha: shadow.alpha,
            size_factor: stage.size_factor(),
        }
    }

    /// Snapshot of one flower, if it is still alive.
    pub fn get(&self, viewport: &Viewport, entity: hecs::Entity) -> Option<FlowerView> {
        let mut query = self
            .world
            .query_one::<(&Position, &Stage, &Petals, &Shadow)>(entity)
            .ok()?;
        let view = query
            .get()
            .map(|(pos, stage, petals, shadow)| self.view(viewport, entity, pos, stage, petals, shadow));
        view
    }

    /// Snapshot of every live flower.
    pub fn views(&self, viewport: &Viewport) -> Vec<FlowerView> {
        let mut out = Vec::with_capacity(self.count());
        for (entity, (pos, stage, petals, shadow)) in self
            .world
            .query::<(&Position, &Stage, &Petals, &Shadow)>()
            .iter()
        {
            out.push(self.view(viewport, entity, pos, stage, petals, shadow));
        }
        out
    }

    /// Shadows first so every flower draws over every shadow.
    pub fn build_instances(&self, viewport: &Viewport, buf: &mut Vec<Instance>) {
        let views = self.views(viewport);
        for v in &views {
            if v.shadow_alpha <= SHADOW_VISIBLE {
                continue;
            }
            let display = v.draw_size * v.size_factor * v.depth_scale;
            let mut inst = Instance::new(
                Kind::FlowerShadow,
                v.center + DVec2::new(0.0, display * 0.45),
            )
            .faded(v.shadow_alpha)
            .colored(0x000000);
            // Ellipse radii in px.
            inst.scale = [(display * 0.5) as f32, (display * 0.14) as f32];
            buf.push(inst);
        }
        let cell_size = self.config.cell_size.max(1.0);
        for v in &views {
            let mut inst = Instance::new(Kind::Flower, v.center)
                .scaled(v.scale * (v.draw_size / cell_size) * v.depth_scale)
                .rotated(v.rotation)
                .faded(v.opacity)
                .colored(gray(v.tint));
            inst.variant = v.cell;
            buf.push(inst);
        }
    }
}
