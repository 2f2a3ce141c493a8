use eframe::egui;

use crate::app::PlotApp;

/// Scroll distance egui reports for one mouse-wheel notch.
const SCROLL_POINTS_PER_NOTCH: f64 = 40.0;
/// Zoom multiplier for the `+` and `-` keys.
const KEY_ZOOM_FACTOR: f64 = 1.25;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum KeyAction {
    ToggleDebug,
    ToggleGrid,
    ToggleHelp,
    Quit,
    Reset,
    /// Pan by a fraction of the view, in view widths and heights.
    Pan(f64, f64),
    ZoomIn,
    ZoomOut,
}

impl KeyAction {
    /// Whether holding the key down should repeat the action.
    fn repeats(self) -> bool {
        matches!(self, Self::Pan(..) | Self::ZoomIn | Self::ZoomOut)
    }
}

pub(crate) fn action_for_key(key: egui::Key, pan_fraction: f64) -> Option<KeyAction> {
    let action = match key {
        egui::Key::F3 => KeyAction::ToggleDebug,
        egui::Key::G => KeyAction::ToggleGrid,
        egui::Key::H => KeyAction::ToggleHelp,
        egui::Key::Escape => KeyAction::Quit,
        egui::Key::R => KeyAction::Reset,
        egui::Key::ArrowLeft => KeyAction::Pan(-pan_fraction, 0.0),
        egui::Key::ArrowRight => KeyAction::Pan(pan_fraction, 0.0),
        egui::Key::ArrowUp => KeyAction::Pan(0.0, -pan_fraction),
        egui::Key::ArrowDown => KeyAction::Pan(0.0, pan_fraction),
        egui::Key::Plus | egui::Key::Equals => KeyAction::ZoomIn,
        egui::Key::Minus => KeyAction::ZoomOut,
        _ => return None,
    };
    Some(action)
}

/// Zoom multiplier for a scroll of `scroll_y` points. Scrolling up (positive)
/// zooms in by `per_notch` for each notch.
pub(crate) fn wheel_zoom_factor(scroll_y: f64, per_notch: f64) -> f64 {
    per_notch.powf(-scroll_y / SCROLL_POINTS_PER_NOTCH)
}

impl PlotApp {
    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let [w, h] = self.panel_size;
        let to_pixel = |pos: egui::Pos2| {
            (
                f64::from(pos.x - response.rect.min.x),
                f64::from(pos.y - response.rect.min.y),
            )
        };

        self.cursor_world = response.hover_pos().map(|pos| {
            let (px, py) = to_pixel(pos);
            self.camera.pixel_to_world(px, py, w, h)
        });

        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y != 0.0 && response.hovered() {
            if let Some(pos) = response.hover_pos() {
                let (px, py) = to_pixel(pos);
                let factor = wheel_zoom_factor(f64::from(scroll_y), self.preferences.wheel_zoom_factor);
                self.zoom_at_cursor(px, py, factor);
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.pan_by_pixels(f64::from(delta.x), f64::from(delta.y));
            }
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }

        let pan_fraction = self.preferences.pan_fraction;
        let actions: Vec<KeyAction> = ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat,
                        ..
                    } => action_for_key(*key, pan_fraction).filter(|a| !*repeat || a.repeats()),
                    _ => None,
                })
                .collect()
        });

        for action in actions {
            match action {
                KeyAction::ToggleDebug => self.show_debug = !self.show_debug,
                KeyAction::ToggleGrid => self.show_grid = !self.show_grid,
                KeyAction::ToggleHelp => self.show_help = !self.show_help,
                KeyAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                KeyAction::Reset => self.reset_view(),
                KeyAction::Pan(fx, fy) => self.pan_by_fraction(fx, fy),
                KeyAction::ZoomIn => self.zoom_center(1.0 / KEY_ZOOM_FACTOR),
                KeyAction::ZoomOut => self.zoom_center(KEY_ZOOM_FACTOR),
            }
        }
    }
}
