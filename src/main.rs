//! xpad-engine diagnostic binary
//!
//! Drives the dispatcher against real hardware at a fixed tick rate and
//! echoes every engine event to the log. Handy for checking controller
//! wiring, dead-zone and trigger tuning without a host application.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xpad_engine::backend::{GilrsPoller, LogHaptics};
use xpad_engine::{Dispatcher, EngineConfig, EventKind, PadEvent};

/// XPad Engine - gamepad input diagnostics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML tuning file (dead_zone_radius, trigger_press_threshold)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Tick rate in Hz
    #[arg(long, default_value = "60")]
    hz: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting xpad-engine diagnostics...");

    let config = match &args.config {
        Some(path) => {
            info!("Tuning file: {}", path);
            EngineConfig::load(path).await?
        }
        None => EngineConfig::default(),
    };

    let poller = GilrsPoller::new()?;
    let mut dispatcher = Dispatcher::with_config(
        Box::new(poller),
        Box::new(LogHaptics::new()),
        config,
    );

    // Echo every event kind to the log.
    let observers = dispatcher.observers();
    for kind in EventKind::ALL {
        observers.subscribe(kind, Arc::new(|event| log_event(event)));
    }

    let period = Duration::from_secs_f64(1.0 / f64::from(args.hz.max(1)));
    info!("Ticking at {} Hz, press Ctrl-C to exit", args.hz.max(1));

    let mut interval = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                dispatcher.tick();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down, stopping all vibrations");
                dispatcher.stop_all_vibrations();
                break;
            }
        }
    }

    Ok(())
}

fn log_event(event: &PadEvent) {
    match event {
        PadEvent::Connected { slot } => info!("[{}] connected", slot),
        PadEvent::Disconnected { slot } => info!("[{}] disconnected", slot),
        PadEvent::ButtonPressed { slot, button } => info!("[{}] pressed {:?}", slot, button),
        PadEvent::ButtonReleased { slot, button } => info!("[{}] released {:?}", slot, button),
        PadEvent::StickDirectionChanged { slot, stick, direction } => {
            info!("[{}] {:?} stick moved {:?}", slot, stick, direction)
        }
        PadEvent::StickReleased { slot, stick } => info!("[{}] {:?} stick released", slot, stick),
        PadEvent::TriggerPressed { slot, side } => info!("[{}] {:?} trigger pressed", slot, side),
        PadEvent::TriggerReleased { slot, side } => info!("[{}] {:?} trigger released", slot, side),
        PadEvent::DPadDirectionChanged { slot, direction } => {
            info!("[{}] dpad {:?}", slot, direction)
        }
        PadEvent::DPadReleased { slot } => info!("[{}] dpad released", slot),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
