use super::model::{Series, Station};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Column selection: which pollutant series of a station are analysed
// ---------------------------------------------------------------------------

/// Return a copy of `station` restricted to the `selected` columns, in the
/// order they were requested.
///
/// * `selected` empty → no filter, every column is kept
/// * any unknown column name → `CategoryNotFound`
/// * a name listed twice is kept once
pub fn select_columns(station: &Station, selected: &[String]) -> Result<Station, AnalysisError> {
    if selected.is_empty() {
        return Ok(station.clone());
    }

    let mut series: Vec<Series> = Vec::with_capacity(selected.len());
    for name in selected {
        if series.iter().any(|s| &s.name == name) {
            continue;
        }
        series.push(station.series(name)?.clone());
    }

    Ok(Station::new(station.name.clone(), series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn station() -> Station {
        let d = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
        Station::new(
            "Huairou",
            vec![
                Series::from_values("PM2.5", &[(d, 1.0)]),
                Series::from_values("PM10", &[(d, 2.0)]),
                Series::from_values("O3", &[(d, 3.0)]),
            ],
        )
    }

    #[test]
    fn test_empty_selection_keeps_everything() {
        let s = select_columns(&station(), &[]).unwrap();
        assert_eq!(s.column_names(), vec!["PM2.5", "PM10", "O3"]);
    }

    #[test]
    fn test_selection_order_and_dedup() {
        let picks = vec!["O3".to_string(), "PM2.5".to_string(), "O3".to_string()];
        let s = select_columns(&station(), &picks).unwrap();
        assert_eq!(s.name, "Huairou");
        assert_eq!(s.column_names(), vec!["O3", "PM2.5"]);
    }

    #[test]
    fn test_unknown_column_fails() {
        let err = select_columns(&station(), &["NO2".to_string()]).unwrap_err();
        assert_eq!(err, AnalysisError::CategoryNotFound("Huairou/NO2".to_string()));
    }
}
