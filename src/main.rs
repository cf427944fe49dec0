use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;

use pepse::{App, Controls, GameConfig};

/// Headless runner for the streaming world
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config; missing keys fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<i32>,

    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Input pattern driving the avatar
    #[arg(long, value_enum, default_value_t = Script::Right)]
    script: Script,

    /// Teleport the avatar to this x before the run
    #[arg(long)]
    warp: Option<f32>,

    /// Log stats every N frames (0 = only at the end)
    #[arg(long, default_value_t = 600)]
    report_every: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Script {
    Idle,
    /// Walk right, flying in short bursts to clear trunks.
    Right,
    Left,
    /// Alternate direction every 10 seconds and fire now and then.
    Patrol,
}

impl Script {
    fn controls(self, frame: u64, dt: f32) -> Controls {
        let hop = frame % 120 < 30;
        let walk = |right: bool| Controls {
            right,
            left: !right,
            jump: hop,
            fly: hop,
            ..Controls::default()
        };
        match self {
            Script::Idle => Controls::default(),
            Script::Right => walk(true),
            Script::Left => walk(false),
            Script::Patrol => {
                let t = frame as f32 * dt;
                let going_right = (t / 10.0) as u64 % 2 == 0;
                Controls {
                    fire: frame % 90 == 0,
                    ..walk(going_right)
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if !(args.dt > 0.0) {
        return Err(format!("--dt must be positive, got {}", args.dt).into());
    }

    let mut app = App::new(cfg)?;
    if let Some(x) = args.warp {
        app.warp_avatar(x);
    }
    for frame in 0..args.frames {
        app.step(args.dt, args.script.controls(frame, args.dt));
        if args.report_every > 0 && (frame + 1) % args.report_every == 0 {
            info!("{:?}", app.stats());
        }
    }
    let s = app.stats();
    info!(
        "done: {} frames, {:.1}s, avatar x={:.0}, {} objects, {} columns, {} trees, {} leaves, {} cached tree columns, {} pending tasks, high score {}",
        s.frame,
        s.time,
        s.avatar_x,
        s.objects,
        s.columns,
        s.trees,
        s.leaves,
        s.cached_tree_columns,
        s.pending_tasks,
        s.high_score.max(s.destroyed)
    );
    Ok(())
}
