use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use barrelwatch::{
    events, export, ui, App, DataSource, FeedEndpoint, FeedSource, FileSource, Settings,
    ViewModel, WebSocketTransport,
};

#[derive(Parser, Debug)]
#[command(name = "barrelwatch")]
#[command(about = "Live terminal dashboard for search engine statistics")]
struct Args {
    /// Origin of the search front end (http:// or https://)
    #[arg(short, long, conflicts_with = "file")]
    origin: Option<String>,

    /// Feed path on the origin
    #[arg(long)]
    path: Option<String>,

    /// Delay before reconnecting after the feed drops (e.g. "2s", "500ms")
    #[arg(long)]
    reconnect_delay: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a snapshot file instead of following the live feed
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Refresh interval in seconds (only used with --file)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Export the view model of --file to JSON and exit
    #[arg(short, long, requires = "file")]
    export: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(origin) = args.origin {
        settings.origin = origin;
    }
    if let Some(path) = args.path {
        settings.path = path;
    }
    if let Some(delay) = args.reconnect_delay {
        settings.reconnect_delay = delay;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }

    init_logging(settings.log_file.as_deref())?;

    // Handle export mode (non-interactive)
    if let (Some(export_path), Some(file)) = (&args.export, &args.file) {
        return export_to_file(file, export_path);
    }

    if let Some(ref file) = args.file {
        let source = Box::new(FileSource::new(file));
        return run_tui(source, Duration::from_secs(args.refresh));
    }

    run_live(&settings)
}

/// Logs go to a file or nowhere; stdout belongs to the TUI.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
    }
    Ok(())
}

/// Follow the live feed
fn run_live(settings: &Settings) -> Result<()> {
    let delay = settings.reconnect_delay()?;

    // Build a single-worker runtime for the feed; the TUI stays on this thread
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let source: Box<dyn DataSource> = match FeedEndpoint::resolve(&settings.origin, &settings.path) {
        Ok(endpoint) => {
            info!(url = endpoint.as_str(), ?delay, "starting feed");
            let _guard = rt.enter();
            Box::new(FeedSource::spawn(WebSocketTransport::new(endpoint), delay))
        }
        Err(e) => {
            warn!(origin = %settings.origin, error = %e, "feed unavailable");
            Box::new(FeedSource::unsupported(&e.to_string()))
        }
    };

    let result = run_tui(source, Duration::from_millis(100));

    rt.shutdown_timeout(Duration::from_millis(500));
    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source);
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export the view model of a snapshot file and exit
fn export_to_file(snapshot_path: &Path, export_path: &Path) -> Result<()> {
    let snapshot = FileSource::new(snapshot_path)
        .read_snapshot()
        .with_context(|| format!("failed to read {}", snapshot_path.display()))?;
    let view = ViewModel::from_snapshot(&snapshot);
    export::write_view(&view, export_path)?;

    println!("Exported view model to: {}", export_path.display());
    Ok(())
}
