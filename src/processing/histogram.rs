/// One histogram bin covering [x0, x1), except the last bin which also
/// includes its upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// Even-width histogram over the finite extent of `values`.
///
/// Empty (or entirely non-finite) input yields no bins. A degenerate
/// extent (min == max) yields a single bin holding every value.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![Bin {
            x0: min,
            x1: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            x0: min + i as f64 * width,
            x1: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for v in finite {
        let mut idx = ((v - min) / width) as usize;
        // the maximum lands exactly on the upper edge
        if idx >= bin_count {
            idx = bin_count - 1;
        }
        bins[idx].count += 1;
    }

    bins
}
