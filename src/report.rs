use std::fmt::Write;

use crate::models::{AnalysisResult, SummaryLanguage};
use crate::session::SessionState;

const CHART_WIDTH: u128 = 40;

/// Table headings in the language the summary was requested in.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub field_column: &'static str,
    pub result_column: &'static str,
    pub summary_rows: [&'static str; 3],
    pub keyword_columns: [&'static str; 4],
    pub summary_title: &'static str,
    pub keywords_title: &'static str,
    pub chart_title: &'static str,
}

impl Labels {
    pub fn for_language(language: SummaryLanguage) -> Labels {
        match language {
            SummaryLanguage::English => Labels {
                field_column: "Field",
                result_column: "Result",
                summary_rows: ["Summary", "Tone Analysis", "Readability Level"],
                keyword_columns: ["Rank", "Keyword", "Frequency", "Part of Speech"],
                summary_title: "1. Summary and overall analysis",
                keywords_title: "2. Keyword frequency",
                chart_title: "3. Keyword frequency chart",
            },
            SummaryLanguage::Thai => Labels {
                field_column: "หัวข้อ",
                result_column: "ผลการวิเคราะห์",
                summary_rows: ["สรุป", "การวิเคราะห์โทน", "ระดับความยากในการอ่าน"],
                keyword_columns: ["ลำดับ", "คำศัพท์", "ความถี่ที่ปรากฏ", "ส่วนของคำพูด (POS)"],
                summary_title: "1. สรุปและวิเคราะห์ภาพรวม",
                keywords_title: "2. การวิเคราะห์ความถี่คำศัพท์สำคัญ",
                chart_title: "3. แผนภูมิความถี่คำศัพท์",
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub language: SummaryLanguage,
    pub include_chart: bool,
}

// Rows shared by the table renderer and the exporters
pub fn summary_rows(result: &AnalysisResult, labels: &Labels) -> [(&'static str, String); 3] {
    [
        (labels.summary_rows[0], result.summary.summary_text.clone()),
        (labels.summary_rows[1], result.summary.tone.clone()),
        (labels.summary_rows[2], result.summary.readability_level.clone()),
    ]
}

pub fn keyword_rows(result: &AnalysisResult) -> Vec<[String; 4]> {
    result
        .keywords
        .iter()
        .enumerate()
        .map(|(i, k)| {
            [
                (i + 1).to_string(),
                k.keyword.clone(),
                k.frequency_count.to_string(),
                k.part_of_speech.clone(),
            ]
        })
        .collect()
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', to.saturating_sub(width(s))));
    out
}

fn render_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(width(cell));
        }
    }

    let line = |out: &mut String, cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect();
        let _ = writeln!(out, "| {} |", padded.join(" | "));
    };
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    line(out, headers);
    let _ = writeln!(out, "|-{}-|", rule.join("-|-"));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        line(out, &cells);
    }
}

fn render_chart(out: &mut String, result: &AnalysisResult) {
    let max = result.max_frequency();
    let label_width = result.keywords.iter().map(|k| width(&k.keyword)).max().unwrap_or(0);

    for k in &result.keywords {
        let bar = if max == 0 {
            0
        } else {
            // u128 so any u64 count times the width fits
            (u128::from(k.frequency_count) * CHART_WIDTH).div_ceil(u128::from(max))
        };
        let _ = writeln!(
            out,
            "{} | {} {}",
            pad(&k.keyword, label_width),
            "█".repeat(bar as usize),
            k.frequency_count
        );
    }
}

/// Renders a validated result as plain-text tables and an optional bar chart.
pub fn render(result: &AnalysisResult, options: &RenderOptions) -> String {
    let labels = Labels::for_language(options.language);
    let mut out = String::new();

    let _ = writeln!(out, "{}\n", labels.summary_title);
    let summary: Vec<Vec<String>> = summary_rows(result, &labels)
        .into_iter()
        .map(|(label, value)| vec![label.to_string(), value])
        .collect();
    render_table(&mut out, &[labels.field_column, labels.result_column], &summary);

    let _ = writeln!(out, "\n{} (Top {})\n", labels.keywords_title, result.keyword_count());
    let keywords: Vec<Vec<String>> = keyword_rows(result).into_iter().map(Vec::from).collect();
    render_table(&mut out, &labels.keyword_columns, &keywords);

    if options.include_chart {
        let _ = writeln!(out, "\n{}\n", labels.chart_title);
        render_chart(&mut out, result);
    }

    out
}

/// Renders whatever result the session currently holds.
pub fn render_session(session: &SessionState, options: &RenderOptions) -> Option<String> {
    session.last_result().map(|result| render(result, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisSummary, KeywordEntry};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            summary: AnalysisSummary {
                summary_text: "LLMs are big.".to_string(),
                tone: "Informative".to_string(),
                readability_level: "College".to_string(),
            },
            keywords: vec![
                KeywordEntry {
                    keyword: "LLMs".to_string(),
                    frequency_count: 4,
                    part_of_speech: "Noun".to_string(),
                },
                KeywordEntry {
                    keyword: "train".to_string(),
                    frequency_count: 1,
                    part_of_speech: "Verb".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_english_tables() {
        let options = RenderOptions {
            language: SummaryLanguage::English,
            include_chart: false,
        };
        let text = render(&sample(), &options);

        assert!(text.contains("| Tone Analysis     | Informative   |"));
        assert!(text.contains("| 1    | LLMs    | 4         | Noun           |"));
        assert!(text.contains("(Top 2)"));
        assert!(!text.contains('█'));
    }

    #[test]
    fn test_render_chart_scales_to_max() {
        let options = RenderOptions {
            language: SummaryLanguage::Thai,
            include_chart: true,
        };
        let text = render(&sample(), &options);

        assert!(text.contains("ผลการวิเคราะห์"));
        assert!(text.contains(&format!("LLMs  | {} 4", "█".repeat(40))));
        assert!(text.contains(&format!("train | {} 1", "█".repeat(10))));
    }

    #[test]
    fn test_render_chart_all_zero() {
        let mut result = sample();
        for k in &mut result.keywords {
            k.frequency_count = 0;
        }
        let options = RenderOptions {
            language: SummaryLanguage::English,
            include_chart: true,
        };
        assert!(render(&result, &options).contains("LLMs  |  0"));
    }

    #[test]
    fn test_render_chart_huge_counts() {
        let raw = r#"{"analysis_summary": {"summary_text": "s"}, "keyword_frequency": [
            {"keyword": "a", "frequency_count": 1e19},
            {"keyword": "b", "frequency_count": 5}
        ]}"#;
        let result = crate::validator::validate(raw).unwrap();
        let options = RenderOptions {
            language: SummaryLanguage::English,
            include_chart: true,
        };
        let text = render(&result, &options);

        assert!(text.contains(&format!("a | {} ", "█".repeat(40))));
        assert!(text.contains("b | █ 5"));
    }

    #[test]
    fn test_render_empty_session() {
        let options = RenderOptions {
            language: SummaryLanguage::English,
            include_chart: true,
        };
        assert!(render_session(&SessionState::new(), &options).is_none());
    }
}
