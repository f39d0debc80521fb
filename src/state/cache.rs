/// Memoization slot for derived chart data, keyed on the dataset
/// version and the chart configuration.
pub type DerivedSlot<C, D> = Option<(u64, C, D)>;

/// Return the cached derivation when (version, config) still match,
/// otherwise rebuild and cache.
pub fn memoize<'a, C, D>(
    slot: &'a mut DerivedSlot<C, D>,
    version: u64,
    config: &C,
    build: impl FnOnce() -> D,
) -> &'a D
where
    C: Clone + PartialEq,
{
    let stale = !matches!(slot, Some((v, c, _)) if *v == version && c == config);
    if stale {
        *slot = None;
    }
    let (_, _, data) = slot.get_or_insert_with(|| (version, config.clone(), build()));
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn rebuilds_only_when_key_changes() {
        let builds = Cell::new(0);
        let mut slot: DerivedSlot<i32, i32> = None;

        let v = *memoize(&mut slot, 1, &10, || {
            builds.set(builds.get() + 1);
            10 * 2
        });
        assert_eq!(v, 20);
        assert_eq!(builds.get(), 1);

        // same version and config: cached
        memoize(&mut slot, 1, &10, || {
            builds.set(builds.get() + 1);
            0
        });
        assert_eq!(builds.get(), 1);

        // config change rebuilds
        let v = *memoize(&mut slot, 1, &11, || {
            builds.set(builds.get() + 1);
            11 * 2
        });
        assert_eq!(v, 22);
        assert_eq!(builds.get(), 2);

        // version change rebuilds
        memoize(&mut slot, 2, &11, || {
            builds.set(builds.get() + 1);
            0
        });
        assert_eq!(builds.get(), 3);
    }
}
