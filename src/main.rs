//! A terminal pager with drag-to-scroll momentum and wheel-driven physics
//! scrolling.
//!
//! Run with one or more files to page through them side by side, or with no
//! arguments for a built-in demo document.  `--print-config` dumps the
//! effective configuration in config-file format.

mod app;
mod config;
mod core;
mod error;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::document::Document;
use crate::ui::{layout::AppLayout, pager::PagerWidget, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Pager with momentum scrolling")]
struct Cli {
    /// Files to page through, one pane each (defaults to a demo document).
    paths: Vec<PathBuf>,

    /// Config file (defaults to `$XDG_CONFIG_HOME/momentum-scroll/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Animation frame rate, overriding the config file.
    #[arg(long)]
    fps: Option<u32>,

    /// Print the effective configuration and exit.
    #[arg(long = "print-config")]
    print_config: bool,
}

fn load_config(cli: &Cli) -> AppConfig {
    let path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut cfg = match AppConfig::load(&path) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "config not usable, using defaults");
            AppConfig::default()
        }
    };
    if let Some(fps) = cli.fps {
        cfg.frame_rate = fps.clamp(1, 240);
    }
    cfg
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // the pager owns stdout
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }

    // ── documents ─────────────────────────────────────────────
    let documents = if cli.paths.is_empty() {
        vec![Document::demo()]
    } else {
        cli.paths
            .iter()
            .map(|p| Document::from_path(p))
            .collect::<Result<Vec<_>>>()?
    };

    let frame_period = Duration::from_secs_f64(1.0 / f64::from(config.frame_rate));
    let mut state = AppState::new(documents, config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout_handle = stdout();
    execute!(
        stdout_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frame_clock = tokio::time::interval(frame_period);
    frame_clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::from_area(area, state.panes.len());

            for (idx, pane_area) in layout.pane_areas.iter().enumerate() {
                state.panes[idx].set_area(*pane_area);
                frame.render_widget(
                    PagerWidget::new(&state.panes[idx]).focused(idx == state.focus),
                    *pane_area,
                );
            }

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m, at) => handler::handle_mouse(&mut state, m, at),
                    AppEvent::FocusLost => handler::handle_focus_lost(&mut state),
                    // The next draw re-runs layout.
                    AppEvent::Resize(_, _) => {}
                }
            }

            _ = frame_clock.tick(), if state.frames.has_pending() => {
                handler::handle_frame(&mut state, Instant::now());
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    Ok(())
}
