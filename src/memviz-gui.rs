//! Memory access viewer GUI
//!
//! Loads a JSON-lines instruction trace, aggregates the accesses that fall in
//! a memory window and shows them as a hex/ASCII grid:
//! - every byte is colored by the instruction that touched it
//! - hovering shows the access in the status bar
//! - clicking asks the host to go to the trace row; right-click opens a menu
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state and coordination
//! - `io/` - Trace-file backed host
//! - `ui/` - Panel layout, grid input and context menu
//! - `rendering/` - Painting of the grid and its scrollbar
//! - `state/` - Interaction and inspection state

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, ValueEnum};
use eframe::egui;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

mod app;
mod io;
mod rendering;
mod state;
mod ui;

use app::{AppState, ApplicationCoordinator};
use io::FileHost;
use rendering::scrollbar_renderer::SCROLLBAR_WIDTH;
use rmemviz::{read_trace_file, OptionValue};
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Visualize the memory accesses of an instruction trace
#[derive(Parser, Debug)]
#[command(name = "memviz-gui")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Trace file (.jsonl, or .jsonl.br for Brotli)
    trace: PathBuf,

    /// Start of the memory window (hex with 0x prefix, or decimal)
    #[arg(short, long, default_value = "0x0", env = "MEMVIZ_ADDRESS")]
    address: String,

    /// Size of the memory window in bytes
    #[arg(short, long, default_value = "2000")]
    size: i64,

    /// Which trace to read
    #[arg(long, value_enum, default_value_t = SourceArg::Full)]
    source: SourceArg,

    /// Byte order used to split values into bytes
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Little)]
    byte_order: ByteOrderArg,

    /// Include writes, not only reads
    #[arg(long)]
    all_accesses: bool,

    /// Let later accesses replace earlier ones in the grid
    #[arg(long)]
    keep_last: bool,

    /// Seed for colors beyond the fixed palette
    #[arg(long, env = "MEMVIZ_SEED")]
    seed: Option<u64>,

    /// Bytes shown per grid row
    #[arg(long, default_value = "16")]
    bytes_per_row: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Full,
    Filtered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ByteOrderArg {
    Little,
    Big,
}

impl Cli {
    /// Option form answers in the order the form lists its fields.
    fn option_values(&self) -> Vec<OptionValue> {
        vec![
            OptionValue::Text(self.address.clone()),
            OptionValue::Number(self.size),
            OptionValue::Choice(match self.source {
                SourceArg::Full => 0,
                SourceArg::Filtered => 1,
            }),
            OptionValue::Choice(match self.byte_order {
                ByteOrderArg::Little => 0,
                ByteOrderArg::Big => 1,
            }),
            OptionValue::Choice(usize::from(self.all_accesses)),
            OptionValue::Choice(usize::from(self.keep_last)),
        ]
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let trace_path = cli.trace.to_string_lossy().into_owned();
    let trace = read_trace_file(&trace_path)?;
    info!("Loaded {} trace rows from {}", trace.len(), trace_path);

    let mut host = FileHost::new(trace, Some(cli.option_values()));
    let session = match rmemviz::execute(&mut host, cli.seed) {
        Ok(session) => session,
        Err(e) if e.is_silent() => return Ok(()),
        Err(e) => return Err(e).context("Failed to build memory view"),
    };

    let state = AppState::from_session(session, cli.bytes_per_row);
    let width = state.grid.layout().content_width() + SCROLLBAR_WIDTH;
    let title = state.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, 940.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(MemvizApp::new(state, host)))),
    )
    .map_err(|e| anyhow!("Viewer failed: {}", e))
}

/// The memory viewer application.
///
/// Delegates to coordinators:
/// - `PanelManager` renders the panels and collects interactions
/// - `ApplicationCoordinator` applies them to state and host
struct MemvizApp {
    state: AppState,
    host: FileHost,
}

impl MemvizApp {
    fn new(state: AppState, host: FileHost) -> Self {
        Self { state, host }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::Grid { event, pointer } => {
                ApplicationCoordinator::handle_grid_event(&mut self.state, &mut self.host, event, pointer);
            }
            PanelInteraction::ContextMenu(action) => {
                ApplicationCoordinator::handle_context_menu_action(&mut self.state, &mut self.host, action, ctx);
            }
        }
    }
}

impl eframe::App for MemvizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());

        let interactions = PanelManager::render_all_panels(ctx, &mut self.state);
        if !interactions.is_empty() {
            // State changed after painting; show it without waiting for more input
            ctx.request_repaint();
        }
        for interaction in interactions {
            self.handle_panel_interaction(interaction, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmemviz::{VisualizerError, VisualizerOptions};

    #[test]
    fn test_cli_defaults_match_form_defaults() {
        let cli = Cli::parse_from(["memviz-gui", "trace.jsonl"]);
        let options = VisualizerOptions::from_values(&cli.option_values()).unwrap();
        assert_eq!(options, VisualizerOptions::default());
    }

    #[test]
    fn test_cli_flags_map_to_options() {
        let cli = Cli::parse_from([
            "memviz-gui",
            "trace.jsonl.br",
            "--address",
            "0x7ffe0000",
            "--size",
            "256",
            "--source",
            "filtered",
            "--byte-order",
            "big",
            "--all-accesses",
            "--keep-last",
        ]);
        let options = VisualizerOptions::from_values(&cli.option_values()).unwrap();
        assert_eq!(options.base_address, 0x7ffe_0000);
        assert_eq!(options.window_size, 256);
        assert_eq!(options.source, rmemviz::TraceSource::Filtered);
        assert_eq!(options.byte_order, rmemviz::ByteOrder::Big);
        assert_eq!(options.access_filter, rmemviz::AccessFilter::All);
        assert_eq!(options.first_access_policy, rmemviz::FirstAccessPolicy::Overwrite);
    }

    #[test]
    fn test_cancel_is_not_an_error() {
        assert!(VisualizerError::UserCancelled.is_silent());
    }
}
