//! Load Rack Locator entry point.
//!
//! Wires the infrastructure to the select-location use case and runs the
//! single-threaded event loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML config, defaults on first run
//!  └─ pick frontend
//!       ├─ terminal: TerminalInputSource + TerminalRenderer (mouse + keys)
//!       └─ json:     StdioInputSource + JsonRenderer (external surface)
//!  └─ pump_events()            -- one event at a time, to completion
//! ```
//!
//! The capture thread only feeds the channel; every selection change happens
//! on this thread, so the use case needs no synchronisation.

use std::sync::{mpsc, Arc};

use anyhow::anyhow;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rack_core::DiagramGeometry;
use rack_locator::application::select_location::{SelectLocationUseCase, SelectionRenderer};
use rack_locator::infrastructure::display::json::JsonRenderer;
use rack_locator::infrastructure::display::terminal::{
    TerminalRenderer, DIAGRAM_ORIGIN_X, DIAGRAM_ORIGIN_Y,
};
use rack_locator::infrastructure::input::stdio::StdioInputSource;
use rack_locator::infrastructure::input::terminal::TerminalInputSource;
use rack_locator::infrastructure::input::{InputSource, RawInputEvent};
use rack_locator::infrastructure::storage::config::{load_config, AppConfig, RendererKind};

fn main() -> anyhow::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config, using defaults: {e}");
            AppConfig::default()
        }
    };

    // Structured logging goes to stderr so stdout stays a clean rendering
    // surface.  `RUST_LOG` overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.general.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let renderer_kind = if std::env::args().any(|arg| arg == "--json") {
        RendererKind::Json
    } else {
        config.display.renderer
    };
    let geometry = config.geometry.to_geometry();

    info!("load rack locator starting");
    match renderer_kind {
        RendererKind::Terminal => run_terminal(geometry, config.display.color),
        RendererKind::Json => run_bridge(geometry),
    }
}

/// Interactive mode: raw terminal with mouse capture.
fn run_terminal(geometry: DiagramGeometry, color: bool) -> anyhow::Result<()> {
    let renderer = Arc::new(TerminalRenderer::stdout(geometry, color));
    let source = TerminalInputSource::new(DIAGRAM_ORIGIN_X, DIAGRAM_ORIGIN_Y);

    let events = source.start()?;
    if let Err(e) = renderer.draw_initial() {
        source.stop();
        return Err(anyhow!(e));
    }

    let result = pump_events(
        events,
        geometry,
        Arc::clone(&renderer) as Arc<dyn SelectionRenderer>,
    );

    source.stop();
    if let Err(e) = renderer.release() {
        warn!("failed to restore terminal: {e}");
    }
    println!();
    result
}

/// Bridge mode: line commands on stdin, JSON notifications on stdout.
fn run_bridge(geometry: DiagramGeometry) -> anyhow::Result<()> {
    let renderer = Arc::new(JsonRenderer::new(std::io::stdout()));
    let source = StdioInputSource::new();

    let events = source.start()?;
    let result = pump_events(events, geometry, renderer as Arc<dyn SelectionRenderer>);

    source.stop();
    result
}

/// Runs the single-threaded event loop until the user quits.
fn pump_events(
    events: mpsc::Receiver<RawInputEvent>,
    geometry: DiagramGeometry,
    renderer: Arc<dyn SelectionRenderer>,
) -> anyhow::Result<()> {
    let mut use_case = SelectLocationUseCase::new(geometry, renderer);

    info!("ready");
    for event in events.iter() {
        match event {
            RawInputEvent::Quit => break,
            other => {
                // Renderer failures are logged, not fatal: the next event
                // repaints from scratch anyway.
                if let Err(e) = use_case.handle_event(other) {
                    error!("failed to apply input event: {e}");
                }
            }
        }
    }

    info!("load rack locator stopped");
    Ok(())
}
