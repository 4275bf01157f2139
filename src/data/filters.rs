//! Filter Module
//! Dataset filters driven by the dashboard controls.

use crate::data::dataset::{Dataset, DatasetError};
use crate::stats::FrequencyTable;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Rows whose state is one of `selected`.
///
/// An empty selection means no filter is applied and nothing is displayed.
pub fn filter_by_states(
    dataset: &Dataset,
    selected: &[String],
) -> Result<Option<Dataset>, DatasetError> {
    if selected.is_empty() {
        return Ok(None);
    }

    let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let filtered = dataset.filter_records(|r| {
        r.state_name
            .as_deref()
            .is_some_and(|state| wanted.contains(state))
    })?;
    Ok(Some(filtered))
}

/// Frequency rows with at least `threshold` units.
pub fn filter_min_count(table: &FrequencyTable, threshold: u32) -> FrequencyTable {
    table.at_least(threshold)
}

/// Units of one state that can be placed on the map.
pub fn select_state_for_map(dataset: &Dataset, state: &str) -> Result<Dataset, DatasetError> {
    dataset.filter_records(|r| r.state_name.as_deref() == Some(state) && r.coordinates().is_some())
}

/// Range of the minimum-count slider and its starting value.
pub fn slider_bounds(table: &FrequencyTable, default: u32) -> (RangeInclusive<u32>, u32) {
    let max = table.max_count();
    (0..=max, default.min(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::tests::dataset_from_rows;
    use crate::stats::GroupKey;

    fn sample() -> Dataset {
        dataset_from_rows(&[
            ("SP", "São Paulo", "-23,5", "-46,6"),
            ("SP", "São Paulo", "-23,5", ""),
            ("SP", "Campinas", "-22,9", "-47,06"),
            (" RJ ", "Rio de Janeiro", "-22,9", "-43,2"),
            ("RJ", "Niterói", "abc", "-43,1"),
            ("BA", "Salvador", "-12,97", "-38,5"),
        ])
    }

    #[test]
    fn state_selection_keeps_order() {
        let ds = sample();
        let filtered = filter_by_states(&ds, &["RJ".to_string(), "BA".to_string()])
            .unwrap()
            .unwrap();

        let states: Vec<_> = filtered
            .records()
            .iter()
            .map(|r| r.state_name.clone().unwrap())
            .collect();
        assert_eq!(states, vec!["RJ", "RJ", "BA"]);
        assert_eq!(filtered.frame().height(), 3);
    }

    #[test]
    fn empty_state_selection_is_no_filter() {
        assert!(filter_by_states(&sample(), &[]).unwrap().is_none());
    }

    #[test]
    fn unknown_state_selects_nothing() {
        let filtered = filter_by_states(&sample(), &["XX".to_string()])
            .unwrap()
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn threshold_is_monotonic() {
        let table = FrequencyTable::count_by(&sample(), GroupKey::Municipality);
        let mut previous = usize::MAX;
        for threshold in 0..=table.max_count() + 1 {
            let len = filter_min_count(&table, threshold).len();
            assert!(len <= previous);
            previous = len;
        }
        assert_eq!(filter_min_count(&table, 0).len(), table.len());
        assert!(filter_min_count(&table, table.max_count() + 1).is_empty());
    }

    #[test]
    fn map_selection_drops_partial_coordinates() {
        let ds = sample();

        let sp = select_state_for_map(&ds, "SP").unwrap();
        let coords: Vec<_> = sp.records().iter().filter_map(|r| r.coordinates()).collect();
        assert_eq!(coords, vec![(-23.5, -46.6), (-22.9, -47.06)]);

        let rj = select_state_for_map(&ds, "RJ").unwrap();
        assert_eq!(rj.len(), 1);
        assert_eq!(rj.records()[0].municipality_name.as_deref(), Some("Rio de Janeiro"));
    }

    #[test]
    fn slider_default_is_clamped() {
        let table = FrequencyTable::count_by(&sample(), GroupKey::Municipality);
        let (range, start) = slider_bounds(&table, 300);
        assert_eq!(range, 0..=2);
        assert_eq!(start, 2);

        let (_, start) = slider_bounds(&table, 1);
        assert_eq!(start, 1);
    }
}
