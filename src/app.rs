use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use instant::Instant;

use starcat::config::{SimConfig, Viewport, FPS};
use starcat::render::Instance;
use starcat::Scene;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / FPS as f64;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// Ticks between scene summaries.
const STATS_INTERVAL: u64 = 300;
/// How often to log tick timing (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

/// Headless star-and-cat scene driven by a scripted pointer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticks to simulate
    #[arg(long, default_value_t = 1800)]
    ticks: u64,
    /// Seed for every random roll in the scene
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    #[arg(long, default_value_t = 720.0)]
    height: f64,
    /// JSON file overriding any tunable
    #[arg(long)]
    config: Option<PathBuf>,
    /// Click (toggle the lure) every N ticks; 0 never clicks
    #[arg(long, default_value_t = 0)]
    click_every: u64,
    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Print the final frame's instances as JSON on stdout
    #[arg(long)]
    dump: bool,
}

// ---------------------------------------------------------------------------
// Tick timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_tick(&mut self, dt: f64) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            self.flush(elapsed);
        }
    }

    fn flush(&mut self, elapsed: f64) {
        if self.frames_since_log == 0 {
            return;
        }
        let avg_us = (self.frame_time_sum / self.frames_since_log as f64) * 1e6;
        log::info!(
            "TPS: {:.0} | avg: {:.1}us | min: {:.1}us | max: {:.1}us | total ticks: {}",
            self.frames_since_log as f64 / elapsed.max(f64::EPSILON),
            avg_us,
            self.frame_time_min * 1e6,
            self.frame_time_max * 1e6,
            self.frame_count,
        );
        self.last_log_time = Instant::now();
        self.frame_time_sum = 0.0;
        self.frame_time_min = f64::MAX;
        self.frame_time_max = 0.0;
        self.frames_since_log = 0;
    }
}

/// Lissajous sweep over the viewport, sampled once per tick.
fn pointer_at(viewport: &Viewport, tick: u64) -> (f64, f64) {
    let t = tick as f64 * TICK_RATE;
    let (cx, cy) = (viewport.width / 2.0, viewport.height / 2.0);
    (
        cx + cx * 0.8 * (t * 0.7).sin(),
        cy + cy * 0.8 * (t * 1.1 + 0.5).sin(),
    )
}

fn log_summary(scene: &Scene, buf: &mut Vec<Instance>) {
    buf.clear();
    scene.build_instances(buf);
    let cat = scene.cat();
    log::info!(
        "tick {} | lure {} at ({:.0}, {:.0}) | cat {} at ({:.0}, {:.0}) | flowers {} | particles {} | stars {} | instances {}",
        scene.tick_count(),
        if scene.lure().is_active() { "active" } else { "passive" },
        scene.lure().position().x,
        scene.lure().position().y,
        cat.sprite().label(),
        cat.position().x,
        cat.position().y,
        scene.flowers().count(),
        scene.particles().count(),
        scene.sky().count(),
        buf.len(),
    );
}

fn step(scene: &mut Scene, args: &Args, stats: &mut FrameStats) {
    let tick = scene.tick_count();
    let (x, y) = pointer_at(scene.viewport(), tick);
    scene.set_pointer(x, y);
    if args.click_every > 0 && tick > 0 && tick % args.click_every == 0 {
        scene.toggle_lure();
    }

    let start = Instant::now();
    scene.tick();
    stats.record_tick(start.elapsed().as_secs_f64());
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            SimConfig::load(path)?
        }
        None => SimConfig::default(),
    };
    config.validate()?;

    let viewport = Viewport::new(args.width, args.height);
    log::info!(
        "simulating {} ticks on {}x{} (seed {})",
        args.ticks,
        viewport.width,
        viewport.height,
        args.seed
    );

    let mut scene = Scene::new(config, viewport, args.seed);
    let mut stats = FrameStats::new();
    let mut instance_buf = Vec::new();

    if args.realtime {
        let mut last = Instant::now();
        let mut accumulator = 0.0;
        while scene.tick_count() < args.ticks {
            let now = Instant::now();
            accumulator = (accumulator + now.duration_since(last).as_secs_f64()).min(MAX_ACCUMULATOR);
            last = now;
            while accumulator >= TICK_RATE && scene.tick_count() < args.ticks {
                step(&mut scene, &args, &mut stats);
                accumulator -= TICK_RATE;
                if scene.tick_count() % STATS_INTERVAL == 0 {
                    log_summary(&scene, &mut instance_buf);
                }
            }
            std::thread::sleep(Duration::from_secs_f64((TICK_RATE - accumulator).max(0.0)));
        }
    } else {
        while scene.tick_count() < args.ticks {
            step(&mut scene, &args, &mut stats);
            if scene.tick_count() % STATS_INTERVAL == 0 {
                log_summary(&scene, &mut instance_buf);
            }
        }
    }
    stats.flush(stats.last_log_time.elapsed().as_secs_f64());

    if args.dump {
        instance_buf.clear();
        scene.build_instances(&mut instance_buf);
        println!("{}", serde_json::to_string_pretty(&instance_buf)?);
    }

    log::info!("done after {} ticks", scene.tick_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_path_stays_on_screen() {
        let vp = Viewport::new(800.0, 600.0);
        for tick in 0..10_000 {
            let (x, y) = pointer_at(&vp, tick);
            assert!((0.0..=800.0).contains(&x));
            assert!((0.0..=600.0).contains(&y));
        }
    }

    #[test]
    fn args_parse_defaults_and_flags() {
        let args = Args::parse_from(["starcat", "--ticks", "60", "--click-every", "20", "--dump"]);
        assert_eq!(args.ticks, 60);
        assert_eq!(args.click_every, 20);
        assert!(args.dump);
        assert!(!args.realtime);
        assert_eq!(args.seed, 1);
        assert!(args.config.is_none());
    }

    #[test]
    fn clicks_land_on_schedule() {
        let args = Args::parse_from(["starcat", "--click-every", "10"]);
        let mut scene = Scene::new(SimConfig::default(), Viewport::new(640.0, 480.0), 3);
        let mut stats = FrameStats::new();
        for _ in 0..10 {
            step(&mut scene, &args, &mut stats);
        }
        assert!(scene.lure().is_active());
        step(&mut scene, &args, &mut stats);
        assert!(!scene.lure().is_active());
    }
}
