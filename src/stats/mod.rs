//! Stats module - frequency tables

mod frequency;

pub use frequency::{FrequencyTable, GroupKey, COUNT_LABEL};
