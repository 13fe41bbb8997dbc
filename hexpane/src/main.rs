#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
// Tell OS to hide the console window when running.
// This attribute is only applied if the target OS is Windows.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod events;
mod renderer;
mod ui_filedrop;
mod ui_hexview;
mod ui_menubar;
mod ui_popup;
mod ui_scrollbar;
mod ui_sidepanel;

use crate::events::collect_ui_events;
use crate::ui_popup::PopupType;
use app::HexViewerApp;
use clap::Parser;
use eframe::egui;
use hexdatalib::{AppOptions, OPTIONS_FILE_NAME};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hexpane", version, about = "Hex dump viewer and byte editor")]
struct Args {
    /// File to open ("-" reads standard input)
    file: Option<PathBuf>,

    /// Bytes per row (8 to 48)
    #[arg(short = 'w', long)]
    bytes_per_line: Option<usize>,

    /// Settings file
    #[arg(long, default_value = OPTIONS_FILE_NAME)]
    options: PathBuf,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut startup_error = None;
    let mut options = AppOptions::load_or_default(&args.options).unwrap_or_else(|err| {
        log::warn!("{err}");
        startup_error = Some(err.to_string());
        AppOptions::default()
    });
    if let Some(width) = args.bytes_per_line {
        options.default_bytes_per_line = hexdatalib::clamp_bytes_per_line(width);
    }

    let mut app = HexViewerApp::new(options, args.options);
    if let Some(msg) = startup_error {
        app.report_error(msg);
    }

    match args.file {
        Some(path) if path.as_os_str() == "-" => {
            let mut data = Vec::new();
            match std::io::stdin().read_to_end(&mut data) {
                Ok(_) => app.load_bytes("<stdin>", data),
                Err(err) => app.report_error(format!("Failed to read standard input: {err}")),
            }
        }
        Some(path) => app.load_file(&path),
        None => {}
    }

    let native_options = eframe::NativeOptions {
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_resizable(true)
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native("Hexpane", native_options, Box::new(move |_cc| Ok(Box::new(app))))
}

impl eframe::App for HexViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.options.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        // Collect input events once per frame
        self.events = collect_ui_events(ctx);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.title()));

        if !self.popup.active {
            self.handle_shortcuts();
        }

        self.check_disk();
        ctx.request_repaint_after(std::time::Duration::from_secs(1));

        self.show_menu_bar(ctx);

        if self.error.borrow().is_some() {
            self.popup.open(PopupType::Error);
        }

        self.show_side_panel(ctx);

        self.handle_drag_and_drop(ctx);

        // If pop active - show it and return (don't display the hex bytes)
        if self.popup.active {
            self.show_popup(ctx);
            return;
        }

        self.show_hex_view(ctx);
    }
}

impl HexViewerApp {
    fn handle_shortcuts(&mut self) {
        let events = self.events;

        if events.save_pressed && self.session.hexdata.is_modified() {
            self.save();
        }
        if events.open_pressed {
            self.open_dialog();
        }
        if events.goto_pressed && !self.session.hexdata.is_empty() {
            self.popup.open(PopupType::GoTo);
        }
        if events.select_all_pressed {
            self.session.select_all();
        }
        if let Some(backwards) = events.find_pressed {
            self.find(backwards);
        }
    }
}
