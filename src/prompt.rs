use crate::models::{AnalysisRequest, SummaryLanguage};

pub const SUMMARY_KEY: &str = "analysis_summary";
pub const KEYWORDS_KEY: &str = "keyword_frequency";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub system_instruction: String,
}

impl PromptSpec {
    pub fn for_request(request: &AnalysisRequest) -> Self {
        PromptSpec {
            system_instruction: build_prompt(request.keyword_count(), request.summary_language()),
        }
    }
}

// Part-of-speech tag vocabulary the provider should use
fn pos_tags(language: SummaryLanguage) -> &'static str {
    match language {
        SummaryLanguage::English => "Noun, Verb, Adjective, Adverb",
        SummaryLanguage::Thai => "คำนาม, คำกริยา, คำคุณศัพท์, คำวิเศษณ์",
    }
}

/// Builds the system instruction for one analysis.
///
/// `keyword_count` is written into the text as given; bounds are the caller's
/// concern. The key names requested here are exactly the ones
/// [`crate::validator::validate`] reads back.
pub fn build_prompt(keyword_count: u32, language: SummaryLanguage) -> String {
    let lang = language.name();
    let tags = pos_tags(language);

    format!(
        r#"
You are an expert Content Analyzer and Linguist. Your task is to analyze the provided NEWS ARTICLE or TEXT.
You must perform four major tasks:
1.  **Summarize** the article concisely in 2-3 sentences, written in {lang}.
2.  **Analyze the Tone (Sentiment)** of the article (e.g., Positive, Negative, Neutral, Informative) and justify it in 1-2 sentences, written in {lang}.
3.  **Assess Readability** and suggest a reader level (e.g., High School, College, General Public) with a short rationale, written in {lang}.
4.  **Rank Keywords**: list exactly {keyword_count} of the most salient non-stop-word nouns and verbs in the text, ordered from most to least important, with how many times each appears in the text and its part of speech. Use {lang} part-of-speech tags ({tags}).

Return the result *strictly* as a single valid JSON object with exactly two top-level keys:
-   '{SUMMARY_KEY}': an object with the keys:
    -   'summary_text': the summary.
    -   'tone_analysis': the tone label followed by its rationale.
    -   'readability_level': the reader level followed by its rationale.
-   '{KEYWORDS_KEY}': a JSON array of exactly {keyword_count} objects, each with the keys:
    -   'keyword': the keyword as it appears in the text.
    -   'frequency_count': a non-negative integer.
    -   'part_of_speech': the part-of-speech tag.

Output raw JSON only. Do not wrap it in markdown code fences and DO NOT include any introductory or concluding text outside the JSON object.
"#
    )
}
