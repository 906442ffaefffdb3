use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tabmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a tab bar indicator and print one JSON line per frame.
    Simulate(SimulateArgs),
    /// Parse and validate a tab bar or visibility config.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input tab bar JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target tab index.
    #[arg(long)]
    to: usize,

    /// Frames per second of the simulated host clock.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Print exactly this many frames instead of stopping when the animation finishes.
    #[arg(long)]
    frames: Option<u64>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

// Upper bound when running until the animation settles.
const MAX_FRAMES: u64 = 60 * 60;

#[derive(serde::Serialize)]
struct FrameLine {
    frame: u64,
    time_ms: f64,
    position: f64,
    offset: f64,
    extent: f64,
    color: String,
    labels: Vec<String>,
    state: tabmotion::RunState,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read config '{}'", path.display()))
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let json = read(&args.in_path)?;
    let cfg = tabmotion::config::parse_tab_bar(&json)
        .with_context(|| format!("load tab bar '{}'", args.in_path.display()))?;
    let fps = tabmotion::Fps::new(args.fps, 1)?;

    let mut tab = tabmotion::TabIndicator::new(cfg.route_colors())?;
    tab.position().set(cfg.initial_index as f64)?;
    for m in &cfg.measurements {
        tab.report(m.index, m.offset, m.extent)?;
    }
    if tab.interpolators().is_none() {
        anyhow::bail!(
            "tab bar '{}' measures {} of {} routes",
            args.in_path.display(),
            tab.registry().len(),
            tab.route_count()
        );
    }

    let labels = (0..tab.route_count())
        .map(|i| {
            tabmotion::tab_label_color(tab.position(), i, cfg.active_color, cfg.inactive_color)
        })
        .collect::<tabmotion::MotionResult<Vec<_>>>()?;

    let timeline = tabmotion::Timeline::new();
    let animation = tab.animate_to(args.to, &timeline, &cfg.transition)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let last = args.frames.unwrap_or(MAX_FRAMES);
    for frame in 0..=last {
        let now = fps.frame_time(frame);
        timeline.tick(now);
        let Some(sample) = tab.frame() else {
            anyhow::bail!("indicator lost its interpolators at frame {frame}");
        };
        let line = FrameLine {
            frame,
            time_ms: now.as_secs_f64() * 1000.0,
            position: sample.position,
            offset: sample.offset,
            extent: sample.extent,
            color: sample.color.to_hex(),
            labels: labels.iter().map(|l| l.current_output().to_hex()).collect(),
            state: animation.state(),
        };
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
        if args.frames.is_none() && !animation.is_running() {
            break;
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let json = read(&args.in_path)?;
    match tabmotion::config::parse_tab_bar(&json) {
        Ok(cfg) => {
            println!(
                "ok: tab bar with {} routes and {} measurements",
                cfg.routes.len(),
                cfg.measurements.len()
            );
            Ok(())
        }
        Err(tab_err) => match tabmotion::config::parse_visibility(&json) {
            Ok(cfg) => {
                println!("ok: visibility config over {} drives", cfg.drives.len());
                Ok(())
            }
            Err(vis_err) => Err(anyhow::anyhow!(
                "'{}' is neither a valid tab bar ({tab_err}) nor a valid visibility config ({vis_err})",
                args.in_path.display()
            )),
        },
    }
}
