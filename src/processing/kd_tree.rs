use kiddo::KdTree;
use kiddo::SquaredEuclidean;

/// 2D KD-tree for nearest-point hover lookup over scatter data.
///
/// Callers feed coordinates already normalized to comparable spans
/// (e.g. both axes scaled to [0, 1]) so that distance is meaningful.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
    len: usize,
}

impl HoverTree {
    /// Build from point pairs, skipping non-finite coordinates. The
    /// item stored for each point is its index in `points`.
    pub fn build(points: &[(f64, f64)]) -> Self {
        let mut tree: KdTree<f64, 2> = KdTree::new();
        let mut len = 0usize;

        for (i, &(x, y)) in points.iter().enumerate() {
            if x.is_finite() && y.is_finite() {
                tree.add(&[x, y], i as u64);
                len += 1;
            }
        }

        // A dummy entry keeps queries from panicking on empty input
        if tree.size() == 0 {
            tree.add(&[f64::MAX, f64::MAX], u64::MAX);
        }

        Self { tree, len }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nearest point to (qx, qy) as (original index, Euclidean
    /// distance). `None` when the tree holds no real points.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<(usize, f64)> {
        if self.is_empty() {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[qx, qy]);
        Some((result.item as usize, result.distance.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nearest_point() {
        let points = vec![(0.0, 0.0), (1.0, 0.0), (0.5, 0.9)];
        let tree = HoverTree::build(&points);
        let (idx, dist) = tree.nearest(0.9, 0.1).unwrap();
        assert_eq!(idx, 1);
        assert!(dist < 0.2);
    }

    #[test]
    fn skips_non_finite_points() {
        let points = vec![(f64::NAN, 1.0), (2.0, 2.0)];
        let tree = HoverTree::build(&points);
        let (idx, _) = tree.nearest(0.0, 0.0).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn empty_input_yields_none() {
        let tree = HoverTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.nearest(0.0, 0.0).is_none());
    }
}
