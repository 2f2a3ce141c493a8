use eframe::egui;

use pixelplane_core::{compute_grid, Grid, GridLine, LineType, Transform};

use crate::app::PlotApp;

const NORMAL_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 90, 90);
const MAIN_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(190, 190, 190);
/// Thickness of the axis lines.
const AXIS_WIDTH: f32 = 2.0;
const LABEL_OFFSET: f32 = 3.0;
const LABEL_SIZE: f32 = 11.0;

fn line_color(line_type: LineType) -> egui::Color32 {
    match line_type {
        LineType::Normal => NORMAL_COLOR,
        LineType::Main | LineType::AbsoluteMain => MAIN_COLOR,
    }
}

/// Shapes for every gridline inside `rect`, whose top-left corner is pixel
/// (0, 0) of the plot. Axes become filled rectangles, the rest hairlines.
pub(crate) fn grid_shapes(grid: &Grid, rect: egui::Rect) -> Vec<egui::Shape> {
    let vertical = grid.vertical.iter().map(|line| {
        let x = rect.min.x + line.pixel as f32;
        let color = line_color(line.line_type);
        if line.line_type == LineType::AbsoluteMain {
            let bar = egui::Rect::from_min_size(
                egui::pos2(x, rect.min.y),
                egui::vec2(AXIS_WIDTH, rect.height()),
            );
            egui::Shape::rect_filled(bar, 0.0, color)
        } else {
            egui::Shape::line_segment(
                [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                egui::Stroke::new(1.0, color),
            )
        }
    });
    let horizontal = grid.horizontal.iter().map(|line| {
        let y = rect.min.y + line.pixel as f32;
        let color = line_color(line.line_type);
        if line.line_type == LineType::AbsoluteMain {
            let bar = egui::Rect::from_min_size(
                egui::pos2(rect.min.x, y),
                egui::vec2(rect.width(), AXIS_WIDTH),
            );
            egui::Shape::rect_filled(bar, 0.0, color)
        } else {
            egui::Shape::line_segment(
                [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
                egui::Stroke::new(1.0, color),
            )
        }
    });
    vertical.chain(horizontal).collect()
}

fn draw_label(painter: &egui::Painter, pos: egui::Pos2, line: &GridLine) {
    painter.text(
        pos,
        egui::Align2::LEFT_TOP,
        &line.label,
        egui::FontId::monospace(LABEL_SIZE),
        LABEL_COLOR,
    );
}

impl PlotApp {
    pub(crate) fn draw_grid(&self, painter: &egui::Painter, rect: egui::Rect) {
        let (bounds, w, h) = self.session.state().read_bounds_and_dims();
        let Ok(transform) = Transform::new(bounds, w, h) else {
            return;
        };
        let grid = compute_grid(&transform);
        if grid.is_empty() {
            return;
        }

        painter.extend(grid_shapes(&grid, rect));

        for line in &grid.vertical {
            let x = rect.min.x + line.pixel as f32 + LABEL_OFFSET;
            draw_label(painter, egui::pos2(x, rect.min.y + LABEL_OFFSET), line);
        }
        for line in &grid.horizontal {
            let y = rect.min.y + line.pixel as f32 + LABEL_OFFSET;
            draw_label(painter, egui::pos2(rect.min.x + LABEL_OFFSET, y), line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelplane_core::Bounds;

    #[test]
    fn axes_are_filled_bars() {
        let bounds = Bounds::new(-5.0, 5.0, -5.0, 5.0).unwrap();
        let transform = Transform::new(bounds, 100, 100).unwrap();
        let grid = compute_grid(&transform);
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 100.0));
        let shapes = grid_shapes(&grid, rect);

        assert_eq!(shapes.len(), grid.vertical.len() + grid.horizontal.len());
        let bars: Vec<_> = shapes
            .iter()
            .filter_map(|s| match s {
                egui::Shape::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect();
        // One axis per direction, both through the centre of the view.
        assert_eq!(bars.len(), 2);
        assert!(bars.iter().any(|r| r.min.x == 60.0 && r.height() == 100.0));
        assert!(bars.iter().any(|r| r.min.y == 70.0 && r.width() == 100.0));
    }

    #[test]
    fn empty_grid_draws_nothing() {
        assert!(grid_shapes(&Grid::default(), egui::Rect::ZERO).is_empty());
    }
}
