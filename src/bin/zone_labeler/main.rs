#![windows_subsystem = "windows"] // Don't go through console on Windows.

use std::path::{Path, PathBuf};

use eframe::egui;

use lib::{job_helpers, scene::Scene, zone_labeling, LutInfo};
use message_log::MessageLog;

mod menu;
mod segment_view;
mod volume_list;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    clap::App::new("Zone Labeler")
        .version(VERSION)
        .about("Labels brain parcellation volumes with a color table")
        .get_matches();

    eframe::run_native(
        "Zone Labeler",
        eframe::NativeOptions {
            drag_and_drop_support: true, // Enable drag-and-dropping files on Windows.
            ..eframe::NativeOptions::default()
        },
        Box::new(|cc| Box::new(AppMain::new(cc))),
    );
}

pub struct AppMain {
    scene: Scene,
    log: MessageLog,
    last_opened_directory: Option<PathBuf>,

    ui_data: UIData,
}

/// The stuff the UI code needs access to for drawing and update.
pub struct UIData {
    pub selected_volume: Option<lib::scene::NodeId>,

    /// Tables offered in the selector; index 0 of the combo box is the
    /// "Select LUT file" placeholder, so entry `i` is combo index `i + 1`.
    pub luts: Vec<LutInfo>,
    pub selected_lut: usize,

    /// The segmentation produced by the last successful run.
    pub result: Option<lib::scene::NodeId>,
}

impl AppMain {
    fn new(cc: &eframe::CreationContext) -> AppMain {
        // Dark mode.
        cc.egui_ctx.set_visuals(egui::style::Visuals {
            dark_mode: true,
            ..egui::style::Visuals::default()
        });

        let mut log = MessageLog::new();
        let luts = job_helpers::discover_luts(job_helpers::resource_dir().join("luts"));
        if luts.is_empty() {
            log.log_warning(
                "No color table files found in the resources directory.".into(),
            );
        }

        AppMain {
            scene: Scene::new(),
            log,
            last_opened_directory: std::env::current_dir().ok(),

            ui_data: UIData {
                selected_volume: None,
                luts,
                selected_lut: 0,
                result: None,
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
        let import_volume_dialog = {
            let mut d = rfd::FileDialog::new()
                .set_title("Import Parcellation Volume")
                .add_filter("NRRD volumes", &["nrrd", "NRRD"]);
            if !working_dir.as_os_str().is_empty() && working_dir.is_dir() {
                d = d.set_directory(&working_dir);
            }
            d
        };
        let select_lut_dialog = {
            let mut d = rfd::FileDialog::new()
                .set_title("Select Color Table")
                .add_filter("Color tables", &["txt", "TXT"]);
            if !working_dir.as_os_str().is_empty() && working_dir.is_dir() {
                d = d.set_directory(&working_dir);
            }
            d
        };

        //----------------
        // GUI.

        // Menu bar.
        menu::menu_bar(
            ctx,
            frame,
            self,
            &import_volume_dialog,
            &mut working_dir,
        );

        // Status bar and log (footer).
        egui_custom::status_bar(ctx, &mut self.log);

        // Volume list (left-side panel).
        egui::containers::panel::SidePanel::left("volume_list")
            .resizable(false)
            .show(ctx, |ui| {
                volume_list::list(ui, self, &import_volume_dialog, &mut working_dir);
            });

        // Main area.
        egui::containers::panel::CentralPanel::default().show(ctx, |ui| {
            // Color table selection and labeling.
            ui.horizontal_top(|ui| {
                ui.label("Color table: ");
                {
                    let ui_data = &mut self.ui_data;
                    let selected_text = if ui_data.selected_lut == 0
                        || ui_data.selected_lut > ui_data.luts.len()
                    {
                        "Select LUT file".into()
                    } else {
                        ui_data.luts[ui_data.selected_lut - 1].name.clone()
                    };
                    egui::ComboBox::from_id_source("LUT Selector")
                        .width(240.0)
                        .selected_text(selected_text)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut ui_data.selected_lut, 0, "Select LUT file");
                            for i in 0..ui_data.luts.len() {
                                let name = ui_data.luts[i].name.clone();
                                ui.selectable_value(&mut ui_data.selected_lut, i + 1, name);
                            }
                        });
                }
                if ui.button("Browse...").clicked() {
                    if let Some(path) = select_lut_dialog.clone().pick_file() {
                        if let Some(parent) = path.parent().map(|p| p.into()) {
                            working_dir = parent;
                        }
                        self.add_custom_lut(path);
                    }
                }

                ui.add_space(16.0);

                let apply_enabled = self.ui_data.selected_volume.is_some()
                    && self.ui_data.selected_lut != 0;
                let apply = ui
                    .add_enabled(apply_enabled, egui::widgets::Button::new("Apply"))
                    .on_hover_text("Convert the selected volume into a labeled segmentation")
                    .on_disabled_hover_text("Select a parcellation volume and a color table");
                if apply.clicked() {
                    self.apply_labeling();
                }
            });

            ui.add(egui::widgets::Separator::default().spacing(12.0));

            // Resulting segments.
            segment_view::view(ui, self);
        });

        self.last_opened_directory = Some(working_dir);

        //----------------
        // Processing.

        // Collect dropped files.
        if !ctx.input().raw.dropped_files.is_empty() {
            let file_list: Vec<PathBuf> = ctx
                .input()
                .raw
                .dropped_files
                .iter()
                .filter_map(|dropped_file| dropped_file.path.clone())
                .collect();

            for path in &file_list {
                self.import_volume(path);
            }
        }
    }
}

impl AppMain {
    pub fn import_volume(&mut self, path: &Path) {
        match job_helpers::load_volume(path) {
            Ok(volume) => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "volume".into());
                let id = self.scene.add_scalar_volume(&name, volume);
                self.ui_data.selected_volume = Some(id);
                self.log
                    .set_status(format!("Imported volume \"{}\".", name));
            }
            Err(volume_fmt::ReadError::UnknownFormat) => {
                self.log.log_error(format!(
                    "Not an NRRD volume: \"{}\".",
                    path.to_string_lossy()
                ));
            }
            Err(volume_fmt::ReadError::UnsupportedFeature) => {
                self.log.log_error(format!(
                    "\"{}\" uses NRRD features this tool doesn't support.",
                    path.to_string_lossy()
                ));
            }
            Err(e) => {
                self.log.log_error(format!(
                    "Unable to read \"{}\": {}",
                    path.to_string_lossy(),
                    e
                ));
            }
        }
    }

    fn add_custom_lut(&mut self, path: PathBuf) {
        if let Some(i) = self
            .ui_data
            .luts
            .iter()
            .position(|l| l.full_filepath == path)
        {
            self.ui_data.selected_lut = i + 1;
            return;
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "color table".into());
        self.ui_data.luts.push(LutInfo {
            name,
            full_filepath: path,
        });
        self.ui_data.selected_lut = self.ui_data.luts.len();
    }

    fn selected_lut(&self) -> Option<&LutInfo> {
        if self.ui_data.selected_lut == 0 {
            None
        } else {
            self.ui_data.luts.get(self.ui_data.selected_lut - 1)
        }
    }

    fn apply_labeling(&mut self) {
        let volume = match self.ui_data.selected_volume {
            Some(id) => id,
            None => return,
        };
        let lut_path = match self.selected_lut() {
            Some(lut) => lut.full_filepath.clone(),
            None => return,
        };

        let entries = match lut_fmt::load(&lut_path) {
            Ok(entries) => entries,
            Err(e) => {
                self.log.log_error(format!(
                    "Unable to load color table \"{}\": {}",
                    lut_path.to_string_lossy(),
                    e
                ));
                self.log.set_status("Zone labeling failed.".into());
                return;
            }
        };

        match zone_labeling::label_parcellation(&mut self.scene, volume, &entries) {
            Ok(seg) => {
                self.ui_data.selected_volume = None;
                self.ui_data.result = Some(seg);
                let segment_count = self
                    .scene
                    .segmentation(seg)
                    .map(|s| s.segments.len())
                    .unwrap_or(0);
                self.log
                    .log_note(format!("Created {} segments.", segment_count));
                self.log.set_status("Zone labeling finished.".into());
            }
            Err(e) => {
                self.log.log_error(format!("Zone labeling failed: {}", e));
                self.log.set_status("Zone labeling failed.".into());
            }
        }
    }
}
