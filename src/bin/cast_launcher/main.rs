#![windows_subsystem = "windows"] // Don't go through console on Windows.

use std::path::PathBuf;

use eframe::egui;

use lib::job_helpers;
use message_log::MessageLog;

mod menu;
mod settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    clap::App::new("Cast Launcher")
        .version(VERSION)
        .about("Records the path to a screen casting tool and launches it")
        .get_matches();

    eframe::run_native(
        "Cast Launcher",
        eframe::NativeOptions {
            drag_and_drop_support: true, // Enable drag-and-dropping files on Windows.
            ..eframe::NativeOptions::default()
        },
        Box::new(|cc| Box::new(AppMain::new(cc))),
    );
}

pub struct AppMain {
    log: MessageLog,
    last_opened_directory: Option<PathBuf>,
    config: settings::LauncherConfig,

    ui_data: UIData,
}

/// The stuff the UI code needs access to for drawing and update.
pub struct UIData {
    /// Path as currently shown in the selector; saved to the config only
    /// on Apply.
    pub tool_path_field: String,

    /// Whether the launch confirmation dialog is open.
    pub confirm_launch: bool,
}

impl AppMain {
    fn new(cc: &eframe::CreationContext) -> AppMain {
        // Dark mode.
        cc.egui_ctx.set_visuals(egui::style::Visuals {
            dark_mode: true,
            ..egui::style::Visuals::default()
        });

        let config = settings::load_config();
        let tool_path_field = config.tool_path.clone();

        AppMain {
            log: MessageLog::new(),
            last_opened_directory: std::env::current_dir().ok(),
            config,

            ui_data: UIData {
                tool_path_field,
                confirm_launch: false,
            },
        }
    }
}

impl eframe::App for AppMain {
    // Called before shutdown.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        // Don't need to do anything.
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let mut working_dir = self
            .last_opened_directory
            .clone()
            .unwrap_or_else(|| "".into());

        // File dialogs used in the UI.
        let select_tool_dialog = {
            let mut d = rfd::FileDialog::new()
                .set_title("Select Screen Casting Tool")
                .add_filter("Programs", &["exe", "EXE"]);
            let current: PathBuf = self.ui_data.tool_path_field.clone().into();
            if let Some(dir) = current.parent().filter(|p| p.is_dir()) {
                d = d.set_directory(dir);
            } else if !working_dir.as_os_str().is_empty() && working_dir.is_dir() {
                d = d.set_directory(&working_dir);
            }
            d
        };

        //----------------
        // GUI.

        // Menu bar.
        menu::menu_bar(ctx, frame, self);

        // Status bar and log (footer).
        egui_custom::status_bar(ctx, &mut self.log);

        // Main area.
        egui::containers::panel::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label("Path to the screen casting tool:");
            ui.horizontal(|ui| {
                ui.add(
                    egui::widgets::TextEdit::singleline(&mut self.ui_data.tool_path_field)
                        .id(egui::Id::new("Tool Path"))
                        .desired_width(420.0),
                );
                if ui.button("Browse...").clicked() {
                    if let Some(path) = select_tool_dialog.clone().pick_file() {
                        if let Some(parent) = path.parent().map(|p| p.into()) {
                            working_dir = parent;
                        }
                        self.ui_data.tool_path_field = path.to_string_lossy().into();
                    }
                }
            });

            ui.add_space(8.0);

            let path_is_valid = settings::is_valid_tool_path(&self.ui_data.tool_path_field);
            ui.horizontal(|ui| {
                let apply = ui
                    .add_enabled(path_is_valid, egui::widgets::Button::new("Apply"))
                    .on_hover_text("Set directory")
                    .on_disabled_hover_text(format!(
                        "Please select a valid path to {}",
                        settings::TOOL_FILE_NAME
                    ));
                if apply.clicked() {
                    self.save_tool_path();
                }

                ui.add_space(16.0);
                if ui.button("Launch...").clicked() {
                    self.ui_data.confirm_launch = true;
                }
            });
        });

        // Launch confirmation, centered over everything else.
        if self.ui_data.confirm_launch {
            egui::Window::new("Screen casting")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label("The screen casting tool will open.");
                    ui.label(
                        "After it opens, click its device list and choose your display device.",
                    );
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Ok").clicked() {
                            self.ui_data.confirm_launch = false;
                            self.launch_tool();
                        }
                        if ui.button("Cancel").clicked() {
                            self.ui_data.confirm_launch = false;
                        }
                    });
                });
        }

        self.last_opened_directory = Some(working_dir);
    }
}

impl AppMain {
    fn save_tool_path(&mut self) {
        self.config.tool_path = self.ui_data.tool_path_field.clone();
        match settings::save_config(&self.config) {
            Ok(()) => {
                self.log.set_status("Tool path saved.".into());
            }
            Err(e) => {
                self.log
                    .log_error(format!("Unable to save the tool path: {}", e));
            }
        }
    }

    pub fn launch_tool(&mut self) {
        let path = self.config.tool_path.clone();
        match job_helpers::launch_tool(&path) {
            Ok(_child) => {
                self.log.set_status("Screen casting tool launched.".into());
            }
            Err(e) => {
                self.log.log_error(format!(
                    "Failed to open the screen casting tool. Please verify the path. ({})",
                    e
                ));
            }
        }
    }
}
