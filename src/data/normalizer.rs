//! Normalizer Module
//! Cleans the state-name column and coerces decimal-comma coordinates.

use crate::config::ColumnConfig;
use polars::prelude::*;
use tracing::debug;

/// Strip leading/trailing whitespace. A missing value stays missing.
pub fn trim_text(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Parse a coordinate written with either `,` or `.` as decimal separator.
///
/// Anything that does not parse to a finite number becomes `None`, so the
/// caller sees a missing coordinate instead of an error.
pub fn coerce_coordinate(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .trim()
        .parse::<f64>()
        .ok()
        // NaN and infinities have no position on the map
        .filter(|v| v.is_finite())
}

/// Read a column as text regardless of its current dtype.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Trim the state column and turn both coordinate columns into Float64.
///
/// Safe to apply to an already normalized frame.
pub fn normalize(mut df: DataFrame, columns: &ColumnConfig) -> PolarsResult<DataFrame> {
    let states: Vec<Option<String>> = text_values(&df, &columns.state)?
        .iter()
        .map(|v| trim_text(v.as_deref()))
        .collect();
    df.with_column(Column::new(columns.state.as_str().into(), states))?;

    for name in [&columns.latitude, &columns.longitude] {
        let raw = text_values(&df, name)?;
        let mut rejected = 0usize;
        let coerced: Vec<Option<f64>> = raw
            .iter()
            .map(|v| {
                let parsed = v.as_deref().and_then(coerce_coordinate);
                if v.is_some() && parsed.is_none() {
                    rejected += 1;
                }
                parsed
            })
            .collect();

        if rejected > 0 {
            debug!(column = %name, rejected, "Unparseable coordinates set to missing");
        }
        df.with_column(Column::new(name.as_str().into(), coerced))?;
    }

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "Nome_UF".into(),
                vec![Some("  SP"), Some("RJ \t"), None, Some(" MG ")],
            ),
            Column::new(
                "Nome_Município".into(),
                vec![Some("São Paulo"), Some("Niterói"), Some("X"), Some(" Belo Horizonte ")],
            ),
            Column::new(
                "LATITUDE".into(),
                vec![Some("-23,55"), Some("abc"), Some(""), Some("-19.92")],
            ),
            Column::new(
                "LONGITUDE".into(),
                vec![Some("-46,63"), Some("-43,1"), None, Some("-43.94")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(trim_text(Some("  RJ ")).as_deref(), Some("RJ"));
        assert_eq!(trim_text(Some("\tSão Paulo\n")).as_deref(), Some("São Paulo"));
        assert_eq!(trim_text(None), None);
        // Whitespace-only is kept as an empty name, not made missing
        assert_eq!(trim_text(Some("   ")).as_deref(), Some(""));
    }

    #[test]
    fn coerces_comma_decimals() {
        assert_eq!(coerce_coordinate("-23,55"), Some(-23.55));
        assert_eq!(coerce_coordinate("-46,6"), Some(-46.6));
        assert_eq!(coerce_coordinate(" -23.5 "), Some(-23.5));
        assert_eq!(coerce_coordinate("10"), Some(10.0));
    }

    #[test]
    fn unparseable_coordinates_become_missing() {
        assert_eq!(coerce_coordinate("abc"), None);
        assert_eq!(coerce_coordinate(""), None);
        assert_eq!(coerce_coordinate("1,234,5"), None);
        assert_eq!(coerce_coordinate("NaN"), None);
        assert_eq!(coerce_coordinate("inf"), None);
        assert_eq!(coerce_coordinate("-inf"), None);
    }

    #[test]
    fn coercion_is_idempotent() {
        for raw in ["-23,55", "-46.633308", "0", "5,0"] {
            let once = coerce_coordinate(raw).unwrap();
            assert_eq!(coerce_coordinate(&once.to_string()), Some(once));
        }
    }

    #[test]
    fn normalize_frame() {
        let columns = ColumnConfig::default();
        let df = normalize(raw_frame(), &columns).unwrap();

        let states = text_values(&df, "Nome_UF").unwrap();
        assert_eq!(
            states,
            vec![Some("SP".to_string()), Some("RJ".to_string()), None, Some("MG".to_string())]
        );
        for state in states.iter().flatten() {
            assert_eq!(state.trim(), state);
        }

        let lat = df.column("LATITUDE").unwrap();
        assert_eq!(lat.dtype(), &DataType::Float64);
        let lat: Vec<Option<f64>> = lat.as_materialized_series().f64().unwrap().into_iter().collect();
        assert_eq!(lat, vec![Some(-23.55), None, None, Some(-19.92)]);

        // Municipality names are left untouched
        let municipalities = text_values(&df, "Nome_Município").unwrap();
        assert_eq!(municipalities[3].as_deref(), Some(" Belo Horizonte "));
    }

    #[test]
    fn normalize_twice_is_stable() {
        let columns = ColumnConfig::default();
        let once = normalize(raw_frame(), &columns).unwrap();
        let twice = normalize(once.clone(), &columns).unwrap();
        assert!(once.equals_missing(&twice));
    }
}
