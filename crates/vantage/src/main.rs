use anyhow::Context;
use bearing::dial::{Dial, DialGeometry};
use bearing::session::{Participant, Session};
use bearing::{Point, trial};
use clap::Parser;
use relm4::prelude::*;
use std::path::PathBuf;
use vantage::config;
use vantage::gui::app::{AppInit, AppModel};
use vantage::gui::dial::CANVAS_SIZE;
use vantage::sys::responses::{self, ResponseLog};
use vantage::sys::runtime;

#[derive(Parser, Debug)]
#[command(name = "vantage", version, about = "Perspective-taking direction task", long_about = None)]
struct Cli {
    /// Participant name recorded with every answer
    #[arg(short = 'p', long, required_unless_present = "write_config")]
    participant: Option<String>,

    /// JSON file with the trials to run (overrides the config)
    #[arg(short = 't', long)]
    trials: Option<PathBuf>,

    /// Where to append answers as JSON Lines (overrides the config)
    #[arg(short = 'r', long)]
    responses: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let participant = Participant::parse(cli.participant.as_deref().unwrap_or_default())
        .context("--participant needs a name")?;

    let config = config::load_or_default();

    let trials = match cli.trials.as_ref().or(config.session.trials.as_ref()) {
        Some(path) => trial::load_trials(path)
            .with_context(|| format!("loading trials from {}", path.display()))?,
        None => trial::default_trials()?,
    };

    let responses_path = match cli.responses.or(config.session.responses) {
        Some(path) => path,
        None => responses::default_path()?,
    };
    let responses = ResponseLog::open(&responses_path)
        .with_context(|| format!("opening {}", responses_path.display()))?;
    log::info!("Recording answers in {}", responses.path().display());

    let session = Session::new(participant, trials);

    let half = CANVAS_SIZE as f64 / 2.0;
    let dial = Dial::new(
        DialGeometry::new(
            Point::new(half, half),
            config.dial.radius,
            config.dial.label_offset,
        ),
        config.dial.mode,
    );

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.vantage.vantage");

    app.run::<AppModel>(AppInit {
        session,
        dial,
        responses,
        events: rx,
    });
    Ok(())
}
