pub(crate) mod config;
pub(crate) mod effectplayer;
pub(crate) mod effects;
pub(crate) mod effectstate;
pub(crate) mod intervaltimer;
pub(crate) mod olaoutput;
pub(crate) mod panel;
pub(crate) mod registry;
pub(crate) mod watchdog;

use std::net::SocketAddr;
use std::process;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use config::Config;
use effectplayer::EffectPlayer;
use olaoutput::OlaOutput;
use panel::{FrameOutput, LedPanel, NullOutput};
use registry::EffectRegistry;

#[derive(Parser)]
struct Cli {
    /// Config file, TOML, JSON or YAML
    #[arg(short, long, value_name = "FILE", default_value = "feuerlicht.toml")]
    config: std::path::PathBuf,

    /// Effect to play instead of the configured one
    #[arg(short, long, value_name = "NAME")]
    effect: Option<String>,

    /// Seed for the effect's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    frames: Option<u64>,

    /// Render without sending anything to OLA
    #[arg(long)]
    dry_run: bool,

    /// Print the registered effects and exit
    #[arg(long)]
    list_effects: bool,
}

fn create_output(args: &Cli, config: &Config) -> Result<Box<dyn FrameOutput>, String> {
    if args.dry_run {
        log::info!("Dry run, frames are discarded");
        return Ok(Box::new(NullOutput));
    }

    let ola_addr = match SocketAddr::from_str(&config.output.ola_addr) {
        Ok(addr) => addr,
        Err(err) => return Err(format!("Bad OLA address {}: {}", config.output.ola_addr, err)),
    };
    let ola = OlaOutput::new(ola_addr, config.output.universe)?;
    Ok(Box::new(ola))
}

fn run(args: Cli) -> Result<(), String> {
    let registry = EffectRegistry::with_builtin_effects();
    if args.list_effects {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load(&args.config)?;
    if let Some(effect) = args.effect.as_deref() {
        config.effect = effect.to_string();
    }
    config.validate()?;

    let effect = registry.create(&config.effect, args.seed)?;
    let output = create_output(&args, &config)?;
    let panel = LedPanel::new(config.panel.width, config.panel.height, output);
    log::info!("Panel is {}x{}", config.panel.width, config.panel.height);

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || {
        handler_running.store(false, Ordering::SeqCst);
    }) {
        return Err(format!("Cannot install Ctrl-C handler: {}", err));
    }

    let mut player = EffectPlayer::new(config, effect, panel);
    player.run(running, args.frames);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    if let Err(err) = run(args) {
        log::error!("{err}");
        process::exit(1);
    }
}
