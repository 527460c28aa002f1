use crate::egui::{self, containers::ScrollArea, Ui};

/// The segment list produced by the last labeling run.
pub fn view(ui: &mut Ui, app: &crate::AppMain) {
    let seg_id = match app.ui_data.result {
        Some(id) => id,
        None => {
            ui.label("No segmentation yet.");
            return;
        }
    };
    let segmentation = match app.scene.segmentation(seg_id) {
        Ok(segmentation) => segmentation,
        Err(_) => return,
    };

    ui.label(format!("Segments: {}", segmentation.segments.len()));
    ui.add_space(4.0);

    ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for segment in &segmentation.segments {
                ui.horizontal(|ui| {
                    let (rect, _) = ui
                        .allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(
                        rect,
                        2.0,
                        egui::Color32::from_rgb(
                            segment.rgba[0],
                            segment.rgba[1],
                            segment.rgba[2],
                        ),
                    );
                    ui.label(&segment.label);
                    ui.with_layout(egui::Layout::right_to_left(), |ui| {
                        ui.label(format!(
                            "id {}, {} voxels",
                            segment.region_id, segment.voxel_count
                        ));
                    });
                });
            }
        });
}
