/// Baseline policy for stacked layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Bands start at zero (stacked bars).
    Zero,
    /// Bands are centered on zero (stream-graph silhouette).
    Silhouette,
}

/// One category's slice at one position on the independent axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub x: f64,
    pub lower: f64,
    pub upper: f64,
}

/// All bands for one category, aligned with the input positions.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSeries<K> {
    pub key: K,
    pub bands: Vec<Band>,
}

/// Stack per-category values into cumulative bands.
///
/// `series` holds (category, values) pairs with values aligned to `xs`;
/// the given category order is the stacking order. The running offset
/// resets at every position, so the upper bound of category i equals
/// the lower bound of category i+1, and the last upper bound equals the
/// position total (shifted by the baseline). A series shorter than `xs`
/// contributes zero thickness past its end.
pub fn stack<K: Clone>(
    xs: &[f64],
    series: &[(K, Vec<f64>)],
    baseline: Baseline,
) -> Vec<StackSeries<K>> {
    let mut out: Vec<StackSeries<K>> = series
        .iter()
        .map(|(key, _)| StackSeries {
            key: key.clone(),
            bands: Vec::with_capacity(xs.len()),
        })
        .collect();

    for (xi, &x) in xs.iter().enumerate() {
        let total: f64 = series
            .iter()
            .map(|(_, values)| values.get(xi).copied().unwrap_or(0.0))
            .sum();
        let mut offset = match baseline {
            Baseline::Zero => 0.0,
            Baseline::Silhouette => -total / 2.0,
        };
        for (si, (_, values)) in series.iter().enumerate() {
            let value = values.get(xi).copied().unwrap_or(0.0);
            out[si].bands.push(Band {
                x,
                lower: offset,
                upper: offset + value,
            });
            offset += value;
        }
    }

    out
}
