/// Index of the element of an ascending-sorted slice closest to `query`.
///
/// Binary search for the insertion point, then compare the neighbor on
/// each side; ties go to the earlier element. Queries before the first
/// or past the last element clamp to that end. `None` only when the
/// slice is empty.
pub fn nearest_index(sorted: &[f64], query: f64) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }

    let pos = sorted.partition_point(|&v| v < query);
    if pos == 0 {
        return Some(0);
    }
    if pos == sorted.len() {
        return Some(sorted.len() - 1);
    }

    let before = pos - 1;
    if (query - sorted[before]).abs() <= (sorted[pos] - query).abs() {
        Some(before)
    } else {
        Some(pos)
    }
}
