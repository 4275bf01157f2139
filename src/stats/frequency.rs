//! Frequency Table Module
//! Counts health units per state or per municipality.

use crate::data::{Dataset, UbsRecord};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Categorical column a frequency table is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    State,
    Municipality,
}

impl GroupKey {
    /// Header of the key column in rendered tables.
    pub fn label(&self) -> &'static str {
        match self {
            GroupKey::State => "Estado",
            GroupKey::Municipality => "Município",
        }
    }

    fn select<'a>(&self, record: &'a UbsRecord) -> Option<&'a str> {
        match self {
            GroupKey::State => record.state_name.as_deref(),
            GroupKey::Municipality => record.municipality_name.as_deref(),
        }
    }
}

/// Header of the count column in rendered tables.
pub const COUNT_LABEL: &str = "Frequência";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    pub key: String,
    pub count: u32,
}

/// Two-column (key, count) table, highest count first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    pub group: GroupKey,
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    /// Count records per distinct key. Records with a missing key are skipped.
    ///
    /// Ties on count are ordered by key so the output is deterministic.
    pub fn count_by(dataset: &Dataset, group: GroupKey) -> Self {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for key in dataset.records().iter().filter_map(|r| group.select(r)) {
            *counts.entry(key).or_default() += 1;
        }

        let mut rows: Vec<FrequencyRow> = counts
            .into_iter()
            .map(|(key, count)| FrequencyRow {
                key: key.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));

        Self { group, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest count, or 0 for an empty table.
    pub fn max_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count).max().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.count)).sum()
    }

    pub fn keys(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.key.clone()).collect()
    }

    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<u32> {
        self.rows.iter().find(|r| r.key == key).map(|r| r.count)
    }

    /// Rows with `count >= threshold`, same order.
    pub fn at_least(&self, threshold: u32) -> Self {
        Self {
            group: self.group,
            rows: self
                .rows
                .iter()
                .filter(|r| r.count >= threshold)
                .cloned()
                .collect(),
        }
    }

    /// Render as a DataFrame with the dashboard's column headers.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let keys: Vec<&str> = self.rows.iter().map(|r| r.key.as_str()).collect();
        let counts: Vec<u32> = self.rows.iter().map(|r| r.count).collect();
        DataFrame::new(vec![
            Column::new(self.group.label().into(), keys),
            Column::new(COUNT_LABEL.into(), counts),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::tests::dataset_from_rows;
    use crate::data::DataLoader;
    use crate::config::ColumnConfig;
    use std::io::Write;

    #[test]
    fn counts_trimmed_states() {
        let ds = dataset_from_rows(&[
            ("SP", "São Paulo", "", ""),
            ("SP", "Campinas", "", ""),
            (" RJ ", "Niterói", "", ""),
        ]);
        let table = FrequencyTable::count_by(&ds, GroupKey::State);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("SP"), Some(2));
        assert_eq!(table.get("RJ"), Some(1));
        assert_eq!(table.rows[0].key, "SP");
    }

    #[test]
    fn counts_are_a_partition_of_rows() {
        let ds = dataset_from_rows(&[
            ("SP", "A", "", ""),
            ("MG", "B", "", ""),
            ("SP", "C", "", ""),
            ("BA", "D", "", ""),
            ("MG", "E", "", ""),
        ]);
        let table = FrequencyTable::count_by(&ds, GroupKey::State);
        let with_state = ds.records().iter().filter(|r| r.state_name.is_some()).count();
        assert_eq!(table.total(), with_state as u64);
    }

    #[test]
    fn missing_states_are_left_out_of_counts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            "Nome_UF;Nome_Município;LATITUDE;LONGITUDE\n\
             SP;A;-23,5;-46,6\n\
             ;B;1;1\n\
             RJ;C;1;1\n\
             SP;D;1;1\n"
                .as_bytes(),
        )
        .unwrap();
        file.flush().unwrap();

        let ds = DataLoader::new(b';', ColumnConfig::default())
            .load_dataset(file.path())
            .unwrap();
        let table = FrequencyTable::count_by(&ds, GroupKey::State);
        let with_state = ds.records().iter().filter(|r| r.state_name.is_some()).count();

        assert_eq!(ds.len(), 4);
        assert_eq!(with_state, 3);
        assert_eq!(table.total(), ds.len() as u64 - 1);
        assert_eq!(table.total(), with_state as u64);
        assert_eq!(table.keys(), vec!["SP", "RJ"]);
    }

    #[test]
    fn blank_state_counts_under_empty_key() {
        let ds = dataset_from_rows(&[
            ("SP", "A", "", ""),
            ("   ", "B", "", ""),
            ("\t", "C", "", ""),
        ]);
        let table = FrequencyTable::count_by(&ds, GroupKey::State);

        assert_eq!(table.get(""), Some(2));
        assert_eq!(table.get("SP"), Some(1));
        assert_eq!(table.total(), ds.len() as u64);
        assert_eq!(ds.unique_states(), vec!["SP", ""]);
    }

    #[test]
    fn ties_are_ordered_by_key() {
        let ds = dataset_from_rows(&[
            ("PE", "Recife", "", ""),
            ("AC", "Rio Branco", "", ""),
            ("PE", "Olinda", "", ""),
            ("AC", "Xapuri", "", ""),
            ("AM", "Manaus", "", ""),
        ]);
        let table = FrequencyTable::count_by(&ds, GroupKey::State);
        assert_eq!(table.keys(), vec!["AC", "PE", "AM"]);
        assert_eq!(table.max_count(), 2);
    }

    #[test]
    fn municipality_counts_and_threshold() {
        let ds = dataset_from_rows(&[
            ("SP", "São Paulo", "", ""),
            ("SP", "São Paulo", "", ""),
            ("SP", "São Paulo", "", ""),
            ("SP", "Campinas", "", ""),
            ("RJ", "Niterói", "", ""),
            ("RJ", "Niterói", "", ""),
        ]);
        let table = FrequencyTable::count_by(&ds, GroupKey::Municipality);
        assert_eq!(table.keys(), vec!["São Paulo", "Niterói", "Campinas"]);

        let at_two = table.at_least(2);
        assert_eq!(at_two.keys(), vec!["São Paulo", "Niterói"]);
        assert!(table.at_least(4).is_empty());
        assert_eq!(table.at_least(0), table);
    }

    #[test]
    fn empty_dataset_gives_empty_table() {
        let ds = dataset_from_rows(&[]);
        let table = FrequencyTable::count_by(&ds, GroupKey::State);
        assert!(table.is_empty());
        assert_eq!(table.max_count(), 0);
    }

    #[test]
    fn dataframe_has_two_labelled_columns() {
        let ds = dataset_from_rows(&[("SP", "A", "", ""), ("RJ", "B", "", "")]);
        let df = FrequencyTable::count_by(&ds, GroupKey::State)
            .to_dataframe()
            .unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 2);
        assert!(df.column("Estado").is_ok());
        assert!(df.column("Frequência").is_ok());
    }
}
