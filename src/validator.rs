use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::{AnalysisResult, AnalysisSummary, KeywordEntry, MISSING_FIELD};
use crate::prompt::{KEYWORDS_KEY, SUMMARY_KEY};

// Accepted spellings per field, canonical name first
const SUMMARY_TEXT_KEYS: &[&str] = &["summary_text", "summary"];
const TONE_KEYS: &[&str] = &["tone_analysis", "tone"];
const READABILITY_KEYS: &[&str] = &["readability_level", "readability"];
const KEYWORD_KEYS: &[&str] = &["keyword", "word"];
const FREQUENCY_KEYS: &[&str] = &["frequency_count", "frequency", "count"];
const POS_KEYS: &[&str] = &["part_of_speech", "pos"];

/// Parses a raw provider reply and checks its top-level shape.
///
/// Only `analysis_summary` (non-empty object) and `keyword_frequency`
/// (non-empty array) are required. Anything missing below that level is
/// filled with a typed default, so the result is always complete.
pub fn validate(raw_text: &str) -> Result<AnalysisResult, ValidationError> {
    let value = parse_json(raw_text)?;

    let incomplete = |missing: &str| ValidationError::IncompleteResult {
        raw: raw_text.to_string(),
        missing: missing.to_string(),
    };

    let root = value
        .as_object()
        .ok_or_else(|| incomplete("a top-level JSON object"))?;

    let summary = root
        .get(SUMMARY_KEY)
        .and_then(Value::as_object)
        .filter(|obj| !obj.is_empty());
    let keywords = root
        .get(KEYWORDS_KEY)
        .and_then(Value::as_array)
        .filter(|arr| !arr.is_empty());

    let (summary, keywords) = match (summary, keywords) {
        (Some(summary), Some(keywords)) => (summary, keywords),
        (None, Some(_)) => return Err(incomplete(SUMMARY_KEY)),
        (Some(_), None) => return Err(incomplete(KEYWORDS_KEY)),
        (None, None) => return Err(incomplete(&format!("{SUMMARY_KEY} and {KEYWORDS_KEY}"))),
    };

    Ok(AnalysisResult {
        summary: project_summary(summary),
        keywords: keywords.iter().map(project_keyword).collect(),
    })
}

fn parse_json(raw_text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str::<Value>(raw_text).map_err(|err| ValidationError::MalformedJson {
        raw: raw_text.to_string(),
        reason: err.to_string(),
    })
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn text_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => MISSING_FIELD.to_string(),
    }
}

fn count_value(value: Option<&Value>) -> u64 {
    let as_float = |f: f64| if f.is_finite() && f > 0.0 { f as u64 } else { 0 };

    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| n.as_f64().map(as_float).unwrap_or(0)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(as_float))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn project_summary(obj: &Map<String, Value>) -> AnalysisSummary {
    AnalysisSummary {
        summary_text: text_value(lookup(obj, SUMMARY_TEXT_KEYS)),
        tone: text_value(lookup(obj, TONE_KEYS)),
        readability_level: text_value(lookup(obj, READABILITY_KEYS)),
    }
}

fn project_keyword(value: &Value) -> KeywordEntry {
    match value {
        Value::Object(obj) => KeywordEntry {
            keyword: text_value(lookup(obj, KEYWORD_KEYS)),
            frequency_count: count_value(lookup(obj, FREQUENCY_KEYS)),
            part_of_speech: text_value(lookup(obj, POS_KEYS)),
        },
        Value::String(_) => KeywordEntry {
            keyword: text_value(Some(value)),
            ..KeywordEntry::default()
        },
        _ => KeywordEntry::default(),
    }
}
