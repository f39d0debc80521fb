use std::collections::HashSet;

/// Linear mapping between a data domain and a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    /// The range may be inverted (pixel y grows downward).
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Domain value to pixel position.
    pub fn apply(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let t = (v - d0) / (d1 - d0);
        r0 + t as f32 * (r1 - r0)
    }

    /// Pixel position back to the domain value.
    pub fn invert(&self, p: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        let t = ((p - r0) / (r1 - r0)) as f64;
        d0 + t * (d1 - d0)
    }
}

/// A brush rectangle in pixel space, normalized so min <= max no matter
/// which way the drag went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BrushRect {
    pub fn from_drag(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    /// A zero-width or zero-height rectangle selects nothing.
    pub fn is_empty(&self) -> bool {
        self.x1 - self.x0 < f32::EPSILON || self.y1 - self.y0 < f32::EPSILON
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Ids of the points whose scaled coordinates fall inside the brush
/// rectangle. An empty rectangle yields an empty selection.
pub fn select(
    points: &[(f64, f64)],
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    rect: &BrushRect,
) -> HashSet<usize> {
    let mut selected = HashSet::new();
    if rect.is_empty() {
        return selected;
    }
    for (i, &(x, y)) in points.iter().enumerate() {
        if rect.contains(x_scale.apply(x), y_scale.apply(y)) {
            selected.insert(i);
        }
    }
    selected
}

/// How a point should be drawn given the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointEmphasis {
    Normal,
    Selected,
    Dimmed,
}

/// Pure styling decision: nothing is dimmed while the selection is empty.
pub fn emphasis(id: usize, selection: &HashSet<usize>) -> PointEmphasis {
    if selection.is_empty() {
        PointEmphasis::Normal
    } else if selection.contains(&id) {
        PointEmphasis::Selected
    } else {
        PointEmphasis::Dimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_scales() -> (LinearScale, LinearScale) {
        // x: [0,10] -> [0,100] px, y: [0,10] -> [100,0] px (screen-flipped)
        (
            LinearScale::new((0.0, 10.0), (0.0, 100.0)),
            LinearScale::new((0.0, 10.0), (100.0, 0.0)),
        )
    }

    #[test]
    fn scale_round_trip() {
        let s = LinearScale::new((2.0, 12.0), (50.0, 250.0));
        let p = s.apply(7.0);
        assert!((p - 150.0).abs() < 1e-4);
        assert!((s.invert(p) - 7.0).abs() < 1e-4);
    }

    #[test]
    fn inverted_range_flips() {
        let s = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        assert!((s.apply(0.0) - 100.0).abs() < 1e-4);
        assert!((s.apply(10.0) - 0.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_domain_collapses_to_mid_range() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert!((s.apply(5.0) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let a = BrushRect::from_drag((10.0, 80.0), (40.0, 20.0));
        let b = BrushRect::from_drag((40.0, 20.0), (10.0, 80.0));
        assert_eq!(a, b);
        assert!(a.x0 < a.x1 && a.y0 < a.y1);
    }

    #[test]
    fn empty_rectangle_selects_nothing() {
        let (xs, ys) = unit_scales();
        let points = vec![(5.0, 5.0)];
        let rect = BrushRect::from_drag((50.0, 50.0), (50.0, 50.0));
        assert!(rect.is_empty());
        assert!(select(&points, &xs, &ys, &rect).is_empty());
    }

    #[test]
    fn selects_points_inside_rectangle() {
        let (xs, ys) = unit_scales();
        let points = vec![(1.0, 1.0), (5.0, 5.0), (9.0, 9.0)];
        // pixel box around the middle of the plot
        let rect = BrushRect::from_drag((30.0, 30.0), (70.0, 70.0));
        let selected = select(&points, &xs, &ys, &rect);
        assert_eq!(selected.len(), 1);
        assert!(selected.contains(&1));
    }

    #[test]
    fn emphasis_with_empty_selection_is_normal() {
        let selection = HashSet::new();
        assert_eq!(emphasis(0, &selection), PointEmphasis::Normal);
        assert_eq!(emphasis(7, &selection), PointEmphasis::Normal);
    }

    #[test]
    fn emphasis_splits_selected_and_dimmed() {
        let selection: HashSet<usize> = [1, 2].into_iter().collect();
        assert_eq!(emphasis(1, &selection), PointEmphasis::Selected);
        assert_eq!(emphasis(0, &selection), PointEmphasis::Dimmed);
    }
}
