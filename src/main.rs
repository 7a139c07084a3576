use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use member_map::app::App;
use member_map::map::transform::{
    BASELINE_SCALE, BASELINE_TRANSLATE_X, BASELINE_TRANSLATE_Y,
};
use member_map::map::{MapArtwork, ZoomState};
use member_map::ui;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Bundled dataset used when no payload file is supplied.
const DEMO_PAYLOAD: &str = include_str!("../demos/members.json");

/// Interactive member-country map for the terminal.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// GeoJSON artwork file; the bundled simplified Europe is used if omitted
    #[arg(long)]
    artwork: Option<PathBuf>,

    /// Member payload JSON file; a bundled demo dataset is used if omitted
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Append diagnostics to this file (RUST_LOG controls verbosity)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Initial zoom scale, tied to the artwork's projection
    #[arg(long, default_value_t = BASELINE_SCALE)]
    zoom_scale: f64,

    /// Initial horizontal translation of the artwork root group
    #[arg(long, default_value_t = BASELINE_TRANSLATE_X)]
    zoom_translate_x: f64,

    /// Initial vertical translation of the artwork root group
    #[arg(long, default_value_t = BASELINE_TRANSLATE_Y)]
    zoom_translate_y: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logging goes to a file; writing to the terminal would tear the UI.
    if let Some(path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let artwork = load_artwork(&args);
    let payload = match &args.payload {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload {}", path.display()))?,
        None => DEMO_PAYLOAD.to_string(),
    };
    let zoom = ZoomState::new(
        args.zoom_scale,
        args.zoom_translate_x,
        args.zoom_translate_y,
    );

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, artwork, zoom, &payload);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn load_artwork(args: &Args) -> MapArtwork {
    let Some(path) = &args.artwork else {
        return MapArtwork::simple_europe();
    };
    match MapArtwork::load(path) {
        Ok(artwork) => artwork,
        Err(err) => {
            warn!(path = %path.display(), %err, "artwork load failed, using bundled map");
            MapArtwork::simple_europe()
        }
    }
}

/// Handle mouse events for hovering, selection and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.pointer_moved(mouse.column, mouse.row);
        }
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        MouseEventKind::Down(MouseButton::Left) => {
            app.pointer_moved(mouse.column, mouse.row);
            app.mouse_click(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    artwork: MapArtwork,
    zoom: ZoomState,
    payload: &str,
) -> Result<()> {
    let size = terminal.size()?;

    // A bad payload leaves the map drawn but non-interactive.
    let mut app = App::new(artwork, zoom, size.width, size.height);
    if let Err(err) = app.load_payload(payload) {
        error!(%err, "payload rejected, map stays inert");
    }

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Drop the filter
                            KeyCode::Char('a') | KeyCode::Char('A') => app.show_all(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width, height);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
