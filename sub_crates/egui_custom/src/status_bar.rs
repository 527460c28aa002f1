use eframe::egui::{
    self,
    color::Rgba,
    containers::ScrollArea,
    widgets::{Button, Label},
    RichText,
};
use message_log::{LogLevel, MessageLog};

pub fn status_bar(ctx: &egui::Context, log: &mut MessageLog) {
    egui::containers::panel::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        let log_count = log.log_count();

        let mut log_string = String::new();
        let mut error_count = 0;
        let mut warning_count = 0;
        let mut note_count = 0;

        // Draw unread log messages, if any.
        if log_count > 0 {
            for i in 0..log_count {
                let log_i = (log_count - 1) - i;
                if let Some((message, level)) = log.get_log(log_i) {
                    match level {
                        LogLevel::Error => {
                            error_count += 1;
                            log_string.push_str(&format!("{}:  ERROR: {}", i + 1, message));
                        }
                        LogLevel::Warning => {
                            warning_count += 1;
                            log_string.push_str(&format!("{}:  WARNING: {}", i + 1, message));
                        }
                        LogLevel::Note => {
                            note_count += 1;
                            log_string.push_str(&format!("{}:  {}", i + 1, message));
                        }
                    }
                    if log_i > 0 {
                        log_string.push_str("\n\n")
                    }
                }
            }
            ScrollArea::vertical()
                .auto_shrink([false, true])
                .max_height(100.0)
                .stick_to_bottom()
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut log_string.as_str())
                            .desired_rows(1)
                            .desired_width(std::f32::INFINITY),
                    );
                });
            ui.add_space(6.0);
        }

        // Status line on the left, log controls on the right.
        let status = log.status().map(|s| s.to_string());
        if status.is_some() || log_count > 0 {
            ui.horizontal(|ui| {
                if let Some(text) = status {
                    ui.label(text);
                }

                ui.with_layout(egui::Layout::right_to_left(), |ui| {
                    if log_count > 0 {
                        if ui.add(Button::new("🗙  Clear Log")).clicked() {
                            log.clear_log();
                        }

                        ui.add_space(6.0);

                        if error_count > 0 {
                            ui.add(Label::new(
                                RichText::new(format!("Errors: {}", error_count))
                                    .color(Rgba::from_rgb(1.0, 0.2, 0.1)),
                            ));
                        }
                        if warning_count > 0 {
                            ui.add(Label::new(
                                RichText::new(format!("Warnings: {}", warning_count))
                                    .color(Rgba::from_rgb(0.6, 0.6, 0.05)),
                            ));
                        }
                        if note_count > 0 {
                            ui.label(format!("Notes: {}", note_count));
                        }
                    }
                });
            });
        }
    });
}
