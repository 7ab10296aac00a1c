use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::analysis::normalize;
use crate::analysis::records::RawMapRecord;
use crate::error::AppError;

const LIST_KEYS: [&str; 3] = ["maps", "matches", "games"];

/// Loads map records from a JSON file holding either an array of records or
/// an object with the array under `maps`, `matches` or `games`.
pub fn load_maps(path: &Path) -> Result<Vec<RawMapRecord>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_maps(&content)
}

pub fn parse_maps(content: &str) -> Result<Vec<RawMapRecord>, AppError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| AppError::JsonError(format!("Failed to parse tournament data: {}", e)))?;

    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut fields) => LIST_KEYS
            .iter()
            .find_map(|k| match fields.remove(*k) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                AppError::JsonError("Expected an array of maps or a `maps` field".to_string())
            })?,
        _ => {
            return Err(AppError::JsonError(
                "Expected an array of maps or a `maps` field".to_string(),
            ))
        }
    };

    Ok(list
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<RawMapRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(record = idx + 1, error = %e, "Skipping unreadable map record");
                None
            }
        })
        .collect())
}

/// Keeps only the maps of one division. Records without a division never match.
pub fn filter_division(maps: Vec<RawMapRecord>, division: &str) -> Vec<RawMapRecord> {
    let key = normalize(division);
    maps.into_iter()
        .filter(|m| m.division.as_deref().map(normalize).as_deref() == Some(key.as_str()))
        .collect()
}

/// Whether any map lists `team` on either side.
pub fn has_team(maps: &[RawMapRecord], team: &str) -> bool {
    let key = normalize(team);
    maps.iter().any(|m| m.involves(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_and_wrapped() {
        let array = r#"[{"team1": "Alpha", "team2": "Beta", "score1": 3, "score2": 1}]"#;
        assert_eq!(parse_maps(array).unwrap().len(), 1);

        let wrapped = r#"{"name": "Cup", "matches": [{"team1": "A", "team2": "B"}, {"team1": "A", "team2": "C"}]}"#;
        assert_eq!(parse_maps(wrapped).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(parse_maps("42"), Err(AppError::JsonError(_))));
        assert!(matches!(parse_maps(r#"{"teams": []}"#), Err(AppError::JsonError(_))));
        assert!(matches!(parse_maps("not json"), Err(AppError::JsonError(_))));
    }

    #[test]
    fn test_loose_records_keep_the_file() {
        let maps = parse_maps(
            r#"[
                {"team1": "A", "team2": "B", "score1": 3, "score2": 1},
                {"team1": "A", "team2": "B", "score1": "7", "score2": "many"},
                {"team1": "A", "team2": "C", "date": 1704067200000,
                 "players": [{"name": "Rocket", "team": "A", "frags": 12.0}]},
                42,
                "not a map"
            ]"#,
        )
        .unwrap();

        assert_eq!(maps.len(), 3);
        assert_eq!(maps[1].score1, 7);
        assert_eq!(maps[1].score2, 0);
        assert!(maps[2].date.is_none());
        assert_eq!(maps[2].players[0].frags, 12);
    }

    #[test]
    fn test_filter_division() {
        let maps = parse_maps(
            r#"[
                {"team1": "A", "team2": "B", "division": "Div 1"},
                {"team1": "A", "team2": "C", "division": " div 1 "},
                {"team1": "A", "team2": "D", "division": "Div 2"},
                {"team1": "A", "team2": "E"}
            ]"#,
        )
        .unwrap();

        let div1 = filter_division(maps, "DIV 1");
        assert_eq!(div1.len(), 2);
        assert!(has_team(&div1, "c"));
        assert!(!has_team(&div1, "d"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_maps(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
