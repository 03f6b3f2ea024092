//! Lenient readers for numbers the model writes: `85`, `85.5`, `"85"`, `"85%"`.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Reads a JSON number or a numeric string with an optional trailing `%`.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Rounds to the nearest integer and clamps to 0..=100.
pub fn clamp_percent(n: f64) -> u8 {
    n.round().clamp(0.0, 100.0) as u8
}

/// `deserialize_with` for required 0–100 fields.
pub fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_number(&value)
        .map(clamp_percent)
        .ok_or_else(|| de::Error::custom(format!("expected a percentage, got {value}")))
}

/// `deserialize_with` for optional numbers; anything unreadable becomes `None`.
/// Pair with `#[serde(default)]`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_number(&value))
}

/// Like `lenient_number`, rounded to a whole number.
pub fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map(|n| n.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Scored {
        #[serde(deserialize_with = "percent")]
        fit: u8,
        #[serde(default, deserialize_with = "lenient_number")]
        raw: Option<f64>,
    }

    #[test]
    fn test_parse_number_accepts_model_spellings() {
        assert_eq!(parse_number(&json!(85)), Some(85.0));
        assert_eq!(parse_number(&json!(85.5)), Some(85.5));
        assert_eq!(parse_number(&json!(" 70% ")), Some(70.0));
        assert_eq!(parse_number(&json!("high")), None);
        assert_eq!(parse_number(&json!(null)), None);
    }

    #[test]
    fn test_percent_rounds_and_clamps() {
        let s: Scored = serde_json::from_value(json!({"fit": 85.5})).unwrap();
        assert_eq!(s.fit, 86);
        let s: Scored = serde_json::from_value(json!({"fit": 300})).unwrap();
        assert_eq!(s.fit, 100);
        let s: Scored = serde_json::from_value(json!({"fit": -4})).unwrap();
        assert_eq!(s.fit, 0);
        let s: Scored = serde_json::from_value(json!({"fit": "85%"})).unwrap();
        assert_eq!(s.fit, 85);
        assert!(s.raw.is_none());
    }

    #[test]
    fn test_percent_rejects_words() {
        let result: Result<Scored, _> = serde_json::from_value(json!({"fit": "great"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_lenient_number_swallows_junk() {
        let s: Scored = serde_json::from_value(json!({"fit": 1, "raw": "8"})).unwrap();
        assert_eq!(s.raw, Some(8.0));
        let s: Scored = serde_json::from_value(json!({"fit": 1, "raw": ["8"]})).unwrap();
        assert!(s.raw.is_none());
    }
}
