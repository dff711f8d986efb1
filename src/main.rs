use std::process::exit;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{error, info, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

use mcgym::api::GymClient;
use mcgym::config::{load_config, reset_config, Cli, Settings};
use mcgym::types::{App, NotificationKind};
use mcgym::ui::{self, Tui};
use mcgym::{logging, worker, Error};

const CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    // Handle reset flag first
    if cli.reset {
        match reset_config() {
            Ok(true) => println!("✅ Saved configuration has been reset."),
            Ok(false) => println!("ℹ️  No saved configuration found to reset."),
            Err(e) => {
                eprintln!("❌ Error resetting configuration: {}", e);
                exit(1);
            }
        }
        return Ok(());
    }

    let saved = load_config();
    let settings = Settings::resolve(&cli, saved.as_ref());

    let log_path = logging::init(cli.log_file.clone(), cli.verbose)?;
    info!("mcgym starting, backend {}", settings.api_url);

    let client = match GymClient::new(&settings.api_url, settings.token.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Use --api-url http://host:port/api or set it in the settings file.");
            exit(1);
        }
    };

    let (request_tx, request_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (outcome_tx, mut outcome_rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(worker::run(client, request_rx, outcome_tx));

    let mut app = App::new(&settings, saved);
    app.start();

    let mut terminal = ui::setup_terminal()?;
    let result = run_loop(&mut app, &mut terminal, &request_tx, &mut outcome_rx);
    ui::restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!("UI loop failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("📄 Details in {}", log_path.display());
    }
    info!("mcgym stopped");
    result
}

fn run_loop(
    app: &mut App,
    terminal: &mut Tui,
    requests: &mpsc::Sender<worker::FetchRequest>,
    outcomes: &mut mpsc::Receiver<worker::FetchOutcome>,
) -> Result<(), Error> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Hand queued work to the worker before drawing the loading state
        for request in app.take_requests() {
            match requests.try_send(request) {
                Ok(()) => {}
                Err(TrySendError::Full(request)) => {
                    warn!("request queue full, dropping {:?}", request);
                    app.request_dropped(&request);
                    app.notify(NotificationKind::Error, "Demasiadas peticiones en curso, intenta de nuevo");
                }
                Err(TrySendError::Closed(request)) => {
                    error!("worker stopped");
                    app.request_dropped(&request);
                    app.notify(NotificationKind::Error, "El proceso de red se detuvo");
                }
            }
        }

        ui::render_ui(app, terminal)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && ui::input::handle_key_event(app, key.code) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            while let Ok(outcome) = outcomes.try_recv() {
                app.apply_outcome(outcome);
            }
            app.expire_notification(Instant::now());
            last_tick = Instant::now();
        }
    }
}
