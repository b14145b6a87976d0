use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RequestError;

pub const MIN_KEYWORD_COUNT: u32 = 10;
pub const MAX_KEYWORD_COUNT: u32 = 50;
pub const DEFAULT_KEYWORD_COUNT: u32 = 10;

// Placeholder for any sub-field the provider left out
pub const MISSING_FIELD: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLanguage {
    #[default]
    English,
    Thai,
}

impl SummaryLanguage {
    pub fn name(self) -> &'static str {
        match self {
            SummaryLanguage::English => "English",
            SummaryLanguage::Thai => "Thai",
        }
    }
}

impl fmt::Display for SummaryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SummaryLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(SummaryLanguage::English),
            "thai" | "th" | "ไทย" => Ok(SummaryLanguage::Thai),
            other => Err(format!("unsupported summary language: {other} (expected english or thai)")),
        }
    }
}

// One user-triggered analysis. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    user_text: String,
    keyword_count: u32,
    summary_language: SummaryLanguage,
}

impl AnalysisRequest {
    pub fn new(
        user_text: impl Into<String>,
        keyword_count: u32,
        summary_language: SummaryLanguage,
    ) -> Result<Self, RequestError> {
        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(RequestError::EmptyText);
        }
        if !(MIN_KEYWORD_COUNT..=MAX_KEYWORD_COUNT).contains(&keyword_count) {
            return Err(RequestError::KeywordCountOutOfRange(keyword_count));
        }

        Ok(AnalysisRequest {
            user_text,
            keyword_count,
            summary_language,
        })
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn keyword_count(&self) -> u32 {
        self.keyword_count
    }

    pub fn summary_language(&self) -> SummaryLanguage {
        self.summary_language
    }
}

/// Validated analysis. Serializes back to the same wire names the provider
/// was asked to produce, so a serialized result validates to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "analysis_summary")]
    pub summary: AnalysisSummary,
    #[serde(rename = "keyword_frequency")]
    pub keywords: Vec<KeywordEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub summary_text: String,
    #[serde(rename = "tone_analysis")]
    pub tone: String,
    pub readability_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency_count: u64,
    pub part_of_speech: String,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        AnalysisSummary {
            summary_text: MISSING_FIELD.to_string(),
            tone: MISSING_FIELD.to_string(),
            readability_level: MISSING_FIELD.to_string(),
        }
    }
}

impl Default for KeywordEntry {
    fn default() -> Self {
        KeywordEntry {
            keyword: MISSING_FIELD.to_string(),
            frequency_count: 0,
            part_of_speech: MISSING_FIELD.to_string(),
        }
    }
}

impl AnalysisResult {
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn max_frequency(&self) -> u64 {
        self.keywords
            .iter()
            .map(|k| k.frequency_count)
            .max()
            .unwrap_or(0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("english".parse::<SummaryLanguage>(), Ok(SummaryLanguage::English));
        assert_eq!(" TH ".parse::<SummaryLanguage>(), Ok(SummaryLanguage::Thai));
        assert!("klingon".parse::<SummaryLanguage>().is_err());
    }

    #[test]
    fn test_request_rejects_empty_text() {
        let err = AnalysisRequest::new("   \n", 10, SummaryLanguage::English).unwrap_err();
        assert_eq!(err, RequestError::EmptyText);
    }

    #[test]
    fn test_request_rejects_out_of_range_count() {
        assert_eq!(
            AnalysisRequest::new("text", 9, SummaryLanguage::English).unwrap_err(),
            RequestError::KeywordCountOutOfRange(9)
        );
        assert_eq!(
            AnalysisRequest::new("text", 51, SummaryLanguage::Thai).unwrap_err(),
            RequestError::KeywordCountOutOfRange(51)
        );
        assert!(AnalysisRequest::new("text", 50, SummaryLanguage::Thai).is_ok());
    }

    #[test]
    fn test_result_serializes_to_wire_names() {
        let result = AnalysisResult {
            summary: AnalysisSummary::default(),
            keywords: vec![KeywordEntry::default()],
        };
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        assert_eq!(value["analysis_summary"]["tone_analysis"], "N/A");
        assert_eq!(value["keyword_frequency"][0]["frequency_count"], 0);
    }
}
