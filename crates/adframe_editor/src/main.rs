// SPDX-License-Identifier: MIT OR Apache-2.0
//! `adframe` - inspect and simulate banner animation projects.

use adframe_editor::{EditorConfig, EditorError, EditorSession};
use adframe_link::{AdSizeId, Project};
use adframe_timeline::{PlaybackEvent, PlaybackMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "adframe", version, about = "Inspect and simulate banner animation projects")]
struct Cli {
    /// Project JSON file.
    #[arg(long)]
    project: PathBuf,

    /// Editor config (RON). Defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print ad sizes, layers and GIF frames.
    Summary,
    /// Print link groups and their members.
    LinkReport,
    /// Print the export plan of an ad size as JSON.
    ExportPlan {
        /// Ad size id, e.g. `frame-1`.
        ad_size: String,

        /// Plan the GIF frame sequence instead of the animation.
        #[arg(long)]
        gif: bool,
    },
    /// Play an ad size's GIF frames for a while and print frame changes.
    SimulateGif {
        /// Ad size id, e.g. `frame-1`.
        ad_size: String,

        /// Seconds of playback to simulate.
        seconds: f32,

        /// Tick length in seconds.
        #[arg(long, default_value_t = 0.05)]
        step: f32,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adframe_editor=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("adframe failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), EditorError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut session = EditorSession::open(&cli.project, config)?;

    match cli.cmd {
        Command::Summary => print_summary(session.project()),
        Command::LinkReport => print_links(session.project()),
        Command::ExportPlan { ad_size, gif } => {
            let ad_size = AdSizeId::new(ad_size);
            let plan = if gif {
                session.export_gif(&ad_size)?
            } else {
                session.export_animation(&ad_size)?
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::SimulateGif {
            ad_size,
            seconds,
            step,
        } => simulate_gif(&mut session, &AdSizeId::new(ad_size), seconds, step),
    }
    Ok(())
}

fn print_summary(project: &Project) {
    println!(
        "{} ({:.2}s track, {} link groups)",
        project.name,
        project.track_duration(),
        project.links().group_count()
    );
    for ad in project.ad_sizes() {
        let frames = project.frames_for(&ad.id);
        println!(
            "  {} {} - {} layers, {} GIF frames",
            ad.id,
            ad.label(),
            ad.layers.len(),
            frames.len()
        );
        for layer in &ad.layers {
            let link = if layer.is_linked() { " [linked]" } else { "" };
            println!(
                "    {} \"{}\" {} animation(s){}",
                layer.id,
                layer.name,
                layer.animations.len(),
                link
            );
        }
    }
}

fn print_links(project: &Project) {
    let links = project.links();
    if links.group_count() == 0 {
        println!("No link groups");
        return;
    }
    for group in links.groups() {
        println!("{} ({})", group.name, group.id);
        for member in &group.members {
            let role = if *member == group.main { "main" } else { "secondary" };
            let mode = project
                .layer(member)
                .map(|l| format!("{:?}", l.sync_mode()))
                .unwrap_or_default();
            println!("  {member} {role} {mode}");
        }
    }
}

fn simulate_gif(session: &mut EditorSession, ad_size: &AdSizeId, seconds: f32, step: f32) {
    if !session.set_active_ad_size(ad_size) {
        println!("Unknown ad size {ad_size}");
        return;
    }
    session.play(PlaybackMode::GifSequence);
    if !session.scheduler().is_playing() {
        println!("{ad_size} has no GIF frames");
        return;
    }

    let step = step.max(0.001);
    let mut elapsed = 0.0;
    while elapsed < seconds {
        session.tick(step);
        elapsed += step;
        for event in session.take_events() {
            if let PlaybackEvent::ActiveFrameChanged(frame) = event {
                println!("{elapsed:>8.3}s  {frame}");
            }
        }
    }
    session.pause();
}
