//! Progress arithmetic shared by the reconciler and its tests.

/// Integral percent complete for `seen` completions out of `total`
/// targets, clamped to 100.
///
/// Integer floor division: the result reaches 100 exactly when
/// `seen >= total`, so a task can only be marked Completed once every
/// target has reported.
pub fn percent_complete(seen: u64, total: u64) -> i16 {
    if total == 0 {
        return 0;
    }
    std::cmp::min(100, (seen * 100 / total) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counter_is_zero() {
        assert_eq!(percent_complete(0, 40), 0);
    }

    #[test]
    fn partial_progress_floors() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(999, 1000), 99);
    }

    #[test]
    fn completion_requires_every_target() {
        assert_eq!(percent_complete(1000, 1000), 100);
        assert_eq!(percent_complete(999, 1000), 99);
    }

    #[test]
    fn overshoot_clamps_to_100() {
        // Workers may report more completions than targets after a
        // retest narrowed the target set.
        assert_eq!(percent_complete(1200, 1000), 100);
    }

    #[test]
    fn zero_total_yields_zero() {
        assert_eq!(percent_complete(5, 0), 0);
    }
}
