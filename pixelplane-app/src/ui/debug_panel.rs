use eframe::egui;

use crate::app::{PlotApp, HUD_CORNER_RADIUS, HUD_MARGIN};
use crate::ui::help;

/// Background opacity of the panel.
const PANEL_ALPHA: u8 = 170;

impl PlotApp {
    pub(crate) fn show_debug_panel(&mut self, ctx: &egui::Context) {
        if !self.show_debug {
            return;
        }

        let (bounds, w, h) = self.session.state().read_bounds_and_dims();
        let stats = self.session.stats();
        let (rows_done, rows_total) = stats.progress();

        egui::Area::new(egui::Id::new("debug_panel"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(PANEL_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        ui.label(format!("FPS: {:.0}", self.clock.fps()));
                        ui.label(format!(
                            "Bounds: x [{:.6}, {:.6}]  y [{:.6}, {:.6}]",
                            bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
                        ));
                        ui.label(format!("Buffer: {w} x {h}"));
                        match self.cursor_world {
                            Some((x, y)) => ui.label(format!("Mouse: {x:.6} ; {y:.6}")),
                            None => ui.label("Mouse: -"),
                        };
                        ui.label(format!(
                            "Camera: {:.6} ; {:.6}",
                            self.camera.center_x, self.camera.center_y
                        ));
                        ui.label(format!("Zoom: {:.3e} units/px", self.camera.zoom));
                        ui.label(format!("Coloring: {}", self.preferences.shader.label()));

                        ui.add_space(4.0);
                        ui.label(format!(
                            "Frames: {} published, {} abandoned",
                            stats.published(),
                            stats.abandoned()
                        ));
                        ui.label(format!(
                            "Last pass: {:.1} ms",
                            stats.last_pass().as_secs_f64() * 1000.0
                        ));
                        if rows_total > 0 && rows_done < rows_total {
                            ui.colored_label(
                                egui::Color32::YELLOW,
                                format!("Computing: {rows_done}/{rows_total} rows"),
                            );
                        }

                        ui.add_space(4.0);
                        if self.show_help {
                            help::show_bindings(ui);
                        } else {
                            ui.label("H: help");
                        }
                    });
            });
    }
}
