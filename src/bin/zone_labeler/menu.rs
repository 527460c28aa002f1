use std::path::PathBuf;

use crate::egui::{self, Context};

/// The top menu bar of the UI.
pub fn menu_bar(
    ctx: &Context,
    frame: &mut eframe::Frame,
    app: &mut crate::AppMain,
    import_volume_dialog: &rfd::FileDialog,
    working_dir: &mut PathBuf,
) {
    egui::containers::panel::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            egui::menu::menu_button(ui, "File", |ui| {
                if ui
                    .add(egui::widgets::Button::new("Import Volume..."))
                    .clicked()
                {
                    if let Some(paths) = import_volume_dialog.clone().pick_files() {
                        for path in &paths {
                            app.import_volume(path);
                        }
                        if let Some(parent) =
                            paths.first().and_then(|p| p.parent()).map(|p| p.into())
                        {
                            *working_dir = parent;
                        }
                    }
                }

                ui.separator();
                if ui.add(egui::widgets::Button::new("Quit")).clicked() {
                    frame.quit();
                }
            });
        });
    });
}
