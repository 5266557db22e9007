use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use autosnap_core::{update, AppState, AppViewModel, Msg, Phase};
use autosnap_engine::{ReqwestScrapeApi, ScrapeApi};
use autosnap_logging::{snap_error, snap_info, snap_warn};

use super::cli::Args;
use super::effects::EffectRunner;
use super::logging;
use super::settings::{settings_path, AppSettings};
use super::ui;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// A line typed on stdin.
    Line(String),
    /// Stdin reached end of file.
    InputClosed,
    /// Engine outcome, already translated for the core.
    Core(Msg),
}

/// Sole owner of the session state; applies messages one at a time.
pub struct Controller {
    state: AppState,
    effects: EffectRunner,
}

impl Controller {
    pub fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies `msgs` in order and returns the view when anything changed.
    pub fn dispatch_all(&mut self, msgs: Vec<Msg>) -> Option<AppViewModel> {
        let mut changed = false;
        for msg in msgs {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            changed |= state.consume_dirty();
            self.state = state;
            self.effects.enqueue(effects);
        }
        changed.then(|| self.state.view())
    }
}

pub fn run_app(args: Args) -> anyhow::Result<ExitCode> {
    let path = settings_path(&args);
    let (mut settings, settings_error) = match AppSettings::load(&path) {
        Ok(settings) => (settings, None),
        Err(err) => (AppSettings::default(), Some(err)),
    };
    settings.apply_args(&args);

    logging::initialize(
        settings.log_destination,
        logging::level_for_verbosity(args.verbose),
        &settings.log_file,
    );
    if let Some(err) = settings_error {
        snap_warn!("{}; using defaults", err);
        eprintln!("Warning: {err}; using defaults");
    }
    snap_info!(
        "AutoSnap starting api_base={} download_dir={:?}",
        settings.api_base,
        settings.download_dir
    );

    if args.check {
        return check_service(&settings);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(
        settings.client_settings(),
        settings.download_dir.clone(),
        event_tx.clone(),
    )
    .context("failed to start engine")?;
    let mut controller = Controller::new(runner);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", ui::constants::TITLE)?;

    if let Some(url) = &args.url {
        if let Some(view) =
            controller.dispatch_all(vec![Msg::InputChanged(url.clone()), Msg::SubmitClicked])
        {
            print_view(&mut out, &view)?;
        }
    } else {
        print_view(&mut out, &controller.view())?;
    }

    if args.once {
        drop(event_tx);
        // A blank URL never leaves Idle, so there is nothing to wait for.
        if let OnceStep::Exit { success } = once_step(&controller.view()) {
            return Ok(exit_code(success));
        }
    } else {
        spawn_stdin_reader(event_tx);
    }

    let mut input_closed = false;
    loop {
        let event = match event_rx.recv_timeout(HEARTBEAT_INTERVAL) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                controller.dispatch_all(vec![Msg::Tick]);
                if let Some(mark) = ui::render::heartbeat(&controller.view()) {
                    write!(out, "{mark}")?;
                    out.flush()?;
                }
                continue;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                snap_error!("Event channel closed");
                return Ok(ExitCode::FAILURE);
            }
        };

        let msgs = match event {
            AppEvent::Core(msg) => vec![msg],
            AppEvent::InputClosed => {
                input_closed = true;
                if controller.view().phase.is_in_flight() {
                    continue;
                }
                break;
            }
            AppEvent::Line(line) => match ui::input::interpret(&line, &controller.view()) {
                ui::input::Command::Dispatch(msgs) => msgs,
                ui::input::Command::Help => {
                    writeln!(out, "{}", ui::constants::HELP_TEXT)?;
                    continue;
                }
                ui::input::Command::Quit => break,
                ui::input::Command::Ignore(hint) => {
                    if let Some(hint) = hint {
                        writeln!(out, "{hint}")?;
                    }
                    continue;
                }
            },
        };

        if let Some(view) = controller.dispatch_all(msgs) {
            print_view(&mut out, &view)?;
        }

        let view = controller.view();
        if args.once {
            match once_step(&view) {
                OnceStep::Continue => {}
                OnceStep::Download => {
                    if let Some(view) = controller.dispatch_all(vec![Msg::DownloadClicked]) {
                        print_view(&mut out, &view)?;
                    }
                }
                OnceStep::Exit { success } => return Ok(exit_code(success)),
            }
        } else if input_closed && !view.phase.is_in_flight() {
            break;
        }
    }

    snap_info!("AutoSnap exiting");
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, PartialEq, Eq)]
enum OnceStep {
    Continue,
    Download,
    Exit { success: bool },
}

/// Non-interactive run: download as soon as a result is ready, stop at the first error.
fn once_step(view: &AppViewModel) -> OnceStep {
    match view.phase {
        Phase::Scraping | Phase::Downloading => OnceStep::Continue,
        Phase::Downloaded => OnceStep::Exit { success: true },
        Phase::Ready if view.error.is_none() && view.can_download => OnceStep::Download,
        Phase::Idle | Phase::Ready => OnceStep::Exit { success: false },
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_view(out: &mut impl Write, view: &AppViewModel) -> io::Result<()> {
    writeln!(out)?;
    for line in ui::render::render(view) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    snap_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

fn check_service(settings: &AppSettings) -> anyhow::Result<ExitCode> {
    let api = ReqwestScrapeApi::new(settings.client_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    match runtime.block_on(api.health()) {
        Ok(health) => {
            println!(
                "{} is up: status={} service={}",
                settings.api_base,
                health.status,
                health.service.as_deref().unwrap_or("-")
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            snap_warn!("Health check failed: {}", err);
            println!("{} is not reachable", settings.api_base);
            Ok(ExitCode::FAILURE)
        }
    }
}
