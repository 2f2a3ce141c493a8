use tracing::trace;

use crate::transform::Transform;

/// Below this spacing the grid is not generated at all.
pub const MIN_STEP: f64 = 1e-10;
/// Above this spacing the grid is not generated at all.
pub const MAX_STEP: f64 = 1e12;
/// Upper limit on lines per axis (very tall or very wide windows).
pub const MAX_LINES_PER_AXIS: usize = 1000;
/// Line indices beyond this magnitude no longer map to distinct `f64` values.
const MAX_LINE_INDEX: f64 = 1e15;

/// Visual tier of a gridline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// The axis itself (world coordinate zero).
    AbsoluteMain,
    /// Aligned to a multiple of ten steps.
    Main,
    Normal,
}

/// One gridline, derived fresh each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub line_type: LineType,
    /// Pixel column (vertical lines) or row (horizontal lines).
    pub pixel: i64,
    /// World coordinate the line sits on.
    pub world: f64,
    pub label: String,
}

/// Gridlines for one frame, ordered by increasing world coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub step: f64,
    /// Lines of constant x.
    pub vertical: Vec<GridLine>,
    /// Lines of constant y.
    pub horizontal: Vec<GridLine>,
}

impl Grid {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Gridline spacing for a view `view_width` world units wide:
/// `10^(round(log10(view_width)) - 1)`.
pub fn grid_step(view_width: f64) -> f64 {
    10f64.powf(view_width.log10().round() - 1.0)
}

/// Decimal places needed to print labels at `step` spacing without collisions.
pub fn label_precision(step: f64) -> usize {
    (-step.log10().round()).max(0.0) as usize
}

/// Build the gridlines visible through `transform`.
///
/// The result depends only on the arguments, so identical views always
/// produce identical, identically ordered lines.
pub fn compute_grid(transform: &Transform) -> Grid {
    let bounds = transform.bounds;
    let step = grid_step(bounds.width());

    if !step.is_finite() || !(MIN_STEP..=MAX_STEP).contains(&step) {
        trace!(step, "grid step outside guarded range, skipping");
        return Grid::default();
    }

    let (Some(xs), Some(ys)) = (
        line_indices(bounds.x_min, bounds.x_max, step),
        line_indices(bounds.y_min, bounds.y_max, step),
    ) else {
        trace!(step, "too many gridlines, skipping");
        return Grid::default();
    };

    let precision = label_precision(step);

    let vertical = xs
        .map(|k| {
            let world = k as f64 * step;
            let pixel = transform.world_to_screen(world, bounds.y_min).0;
            make_line(k, world, pixel, precision)
        })
        .collect();

    let horizontal = ys
        .map(|k| {
            let world = k as f64 * step;
            let pixel = transform.world_to_screen(bounds.x_min, world).1;
            make_line(k, world, pixel, precision)
        })
        .collect();

    Grid {
        step,
        vertical,
        horizontal,
    }
}

/// Indices `k` with `k * step` inside `[min, max]`, or `None` if there are
/// too many of them.
fn line_indices(min: f64, max: f64, step: f64) -> Option<std::ops::RangeInclusive<i64>> {
    let first = (min / step).ceil();
    let last = (max / step).floor();
    if first.abs() > MAX_LINE_INDEX || last.abs() > MAX_LINE_INDEX {
        return None;
    }
    if last - first + 1.0 > MAX_LINES_PER_AXIS as f64 {
        return None;
    }
    Some(first as i64..=last as i64)
}

fn make_line(k: i64, world: f64, pixel: i64, precision: usize) -> GridLine {
    let line_type = if k == 0 {
        LineType::AbsoluteMain
    } else if k % 10 == 0 {
        LineType::Main
    } else {
        LineType::Normal
    };
    GridLine {
        line_type,
        pixel,
        world,
        label: format!("{world:.precision$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;

    fn view(x_min: f64, x_max: f64, y_min: f64, y_max: f64, w: u32, h: u32) -> Transform {
        Transform::new(Bounds::new(x_min, x_max, y_min, y_max).unwrap(), w, h).unwrap()
    }

    #[test]
    fn step_follows_formula() {
        // round(log10(500)) = 3 → 10^(3 - 1)
        let expected = 10f64.powf(500f64.log10().round() - 1.0);
        assert_eq!(grid_step(500.0), expected);
        assert!((grid_step(500.0) - 100.0).abs() < 1e-9);
        assert!((grid_step(3.84) - 1.0).abs() < 1e-12);
        assert!((grid_step(2.0) - 0.1).abs() < 1e-12);
        assert!((grid_step(40.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn label_precision_matches_step() {
        assert_eq!(label_precision(100.0), 0);
        assert_eq!(label_precision(1.0), 0);
        assert_eq!(label_precision(0.1), 1);
        assert_eq!(label_precision(0.001), 3);
    }

    #[test]
    fn lines_are_clipped_and_tiered() {
        // Width 2 → step 0.1; x lines from -1.0 to 1.0 inclusive.
        let grid = compute_grid(&view(-1.0, 1.0, -0.5, 0.5, 200, 50));
        assert!((grid.step - 0.1).abs() < 1e-12);
        assert_eq!(grid.vertical.len(), 21);
        assert_eq!(grid.horizontal.len(), 11);

        let first = &grid.vertical[0];
        assert_eq!(first.line_type, LineType::Main);
        assert_eq!(first.pixel, 0);
        assert_eq!(first.label, "-1.0");

        let axis = &grid.vertical[10];
        assert_eq!(axis.line_type, LineType::AbsoluteMain);
        assert_eq!(axis.pixel, 100);
        assert_eq!(axis.label, "0.0");

        assert_eq!(grid.vertical[3].line_type, LineType::Normal);
        assert_eq!(grid.horizontal[5].line_type, LineType::AbsoluteMain);
        assert_eq!(grid.horizontal[5].pixel, 25);

        for line in grid.vertical.iter().chain(grid.horizontal.iter()) {
            assert!(line.world >= -1.0 - 1e-12 && line.world <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn lines_are_ordered() {
        let grid = compute_grid(&view(-13.3, 27.9, 4.1, 30.2, 640, 400));
        assert!(!grid.is_empty());
        for pair in grid.vertical.windows(2) {
            assert!(pair[0].world < pair[1].world);
            assert!(pair[0].pixel <= pair[1].pixel);
        }
        for pair in grid.horizontal.windows(2) {
            assert!(pair[0].world < pair[1].world);
        }
    }

    #[test]
    fn grid_is_deterministic() {
        let t = view(-0.731, 0.412, -0.25, 0.33, 800, 600);
        let a = compute_grid(&t);
        let b = compute_grid(&view(-100.0, 100.0, -100.0, 100.0, 800, 600));
        let c = compute_grid(&t);
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn view_without_zero_has_no_axis() {
        let grid = compute_grid(&view(95.0, 149.0, 95.0, 149.0, 100, 100));
        assert!(grid
            .vertical
            .iter()
            .all(|l| l.line_type != LineType::AbsoluteMain));
        assert!(grid.vertical.iter().any(|l| l.line_type == LineType::Main));
    }

    #[test]
    fn extreme_zoom_in_is_skipped() {
        let grid = compute_grid(&view(0.0, 1e-12, 0.0, 1e-12, 100, 100));
        assert!(grid.is_empty());
    }

    #[test]
    fn extreme_zoom_out_is_skipped() {
        let grid = compute_grid(&view(-1e14, 1e14, -1e14, 1e14, 100, 100));
        assert!(grid.is_empty());
    }

    #[test]
    fn runaway_line_count_is_skipped() {
        // Narrow but extremely tall view: step comes from the width only.
        let grid = compute_grid(&view(0.0, 1.0, 0.0, 1e6, 10, 10000));
        assert!(grid.is_empty());
    }
}
