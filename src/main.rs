mod audio;
mod audio_api;
mod config;
mod loader;
mod middle;
mod pipeline;
mod shared;
mod tui;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use audio_api::{SampleSink, SilentSink};
use middle::Middle;
use pipeline::kit::Kit;
use pipeline::project::ProjectState;
use shared::InputEvent;

const FRAME: Duration = Duration::from_millis(16); // ~60fps redraw when nothing happens

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = config::Args::parse();
    init_logging(args.log.as_deref())?;

    let kit_dir = args.kit_dir();
    let kit = Kit::load(&kit_dir).unwrap_or_else(|e| {
        tracing::warn!("{e}; using the default kit layout");
        Kit::defaults(&kit_dir)
    });
    tracing::info!(dir = %kit.dir.display(), "kit loaded");
    let sink = start_sink(&kit);

    let (tick_tx, tick_rx) = pipeline::clock::tick_channel();
    let state = ProjectState::with_settings(args.bpm, args.step_count());
    let mut middle = Middle::new(state, &kit, sink, tick_tx);

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // restores the terminal however we leave
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen)?;
    let mut term = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    term.clear()?;

    let (key_tx, key_rx) = crossbeam_channel::unbounded();
    tui::input::spawn_reader(key_tx);

    let mut tui_state = tui::mode::TuiState::default();
    let mut last_frame = Instant::now();

    loop {
        tui_state.sync(middle.display_state());
        term.draw(|frame| {
            tui::view::render(frame, frame.area(), middle.display_state(), &tui_state);
        })?;

        // keys and clock ticks arrive on the same thread, one at a time
        crossbeam_channel::select! {
            recv(tick_rx) -> tick => {
                if let Ok(tick) = tick {
                    middle.on_clock_tick(tick);
                }
            }
            recv(key_rx) -> ev => {
                let Ok(ev) = ev else {
                    tracing::error!("input reader went away, quitting");
                    middle.handle_input(InputEvent::Quit);
                    return Ok(());
                };
                for event in tui::input::resolve_event(&ev, &mut tui_state) {
                    if event == InputEvent::Quit {
                        middle.handle_input(event);
                        return Ok(());
                    }
                    middle.handle_input(event);
                }
            }
            default(FRAME) => {}
        }

        let elapsed = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        middle.advance_frame(elapsed);
    }
}

// Open the output device and hand it every instrument of the kit. No device
// means a silent session rather than a failed one.
fn start_sink(kit: &Kit) -> Box<dyn SampleSink> {
    let mut handle = match audio::start_audio() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!("audio unavailable ({e:#}), running without sound");
            return Box::new(SilentSink);
        }
    };
    for sample in loader::sample_loader::load_kit(kit, handle.sample_rate()) {
        tracing::debug!(
            instrument = ?sample.instrument,
            source = ?sample.source,
            frames = sample.buffer.len(),
            "registering sample"
        );
        if let Err(e) = handle.register(sample.instrument, sample.buffer, sample.gain) {
            tracing::warn!("could not register {:?}: {e}", sample.instrument);
        }
    }
    Box::new(handle)
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        let _ = terminal::disable_raw_mode();
    }
}
