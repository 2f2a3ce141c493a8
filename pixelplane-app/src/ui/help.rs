use eframe::egui;

/// Keyboard and mouse bindings, shown in the debug panel.
pub(crate) const BINDINGS: &[(&str, &str)] = &[
    ("F3", "Toggle debug panel"),
    ("G", "Toggle grid"),
    ("H", "Toggle this help"),
    ("R", "Reset view"),
    ("Arrow keys", "Pan"),
    ("+ / -", "Zoom in / out"),
    ("Left drag", "Pan"),
    ("Scroll wheel", "Zoom at cursor"),
    ("Esc", "Quit"),
];

pub(crate) fn show_bindings(ui: &mut egui::Ui) {
    egui::Grid::new("help_bindings")
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            for &(key, action) in BINDINGS {
                ui.label(egui::RichText::new(key).strong().color(egui::Color32::WHITE));
                ui.label(action);
                ui.end_row();
            }
        });
}
