use std::path::PathBuf;

use crate::egui::{self, Ui};

use lib::scene::NodeData;

/// The volume list in the left-side panel.
pub fn list(
    ui: &mut Ui,
    app: &mut crate::AppMain,
    import_volume_dialog: &rfd::FileDialog,
    working_dir: &mut PathBuf,
) {
    ui.add_space(4.0);
    ui.label("Parcellation Volumes");
    ui.add(egui::widgets::Separator::default().spacing(12.0));

    let volumes: Vec<(lib::scene::NodeId, String)> = app
        .scene
        .nodes()
        .iter()
        .filter_map(|node| match node.data {
            NodeData::ScalarVolume(_) => Some((node.id, node.name.clone())),
            _ => None,
        })
        .collect();

    if volumes.is_empty() {
        ui.label("No volumes imported yet.");
    }
    for (id, name) in &volumes {
        if ui
            .selectable_label(app.ui_data.selected_volume == Some(*id), name)
            .clicked()
        {
            app.ui_data.selected_volume = Some(*id);
        }
    }

    ui.add_space(8.0);
    if ui.button("Import Volume...").clicked() {
        if let Some(paths) = import_volume_dialog.clone().pick_files() {
            for path in &paths {
                app.import_volume(path);
            }
            if let Some(parent) = paths.first().and_then(|p| p.parent()).map(|p| p.into()) {
                *working_dir = parent;
            }
        }
    }
}
