use rust_xlsxwriter::{Format, Workbook};
use std::path::PathBuf;

use crate::config::OutputConfig;
use crate::error::{ContentError, Result};
use crate::models::{AnalysisResult, SummaryLanguage};
use crate::report::{Labels, keyword_rows, summary_rows};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const SUMMARY_SHEET: &str = "Summary_Analysis";
pub const KEYWORDS_SHEET: &str = "Keyword_Frequency";

fn csv_writer(bom: bool) -> csv::Writer<Vec<u8>> {
    let buffer = if bom { UTF8_BOM.to_vec() } else { Vec::new() };
    csv::Writer::from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ContentError::Io(e.into_error()))
}

/// Summary table as CSV: a label column followed by the result column.
pub fn summary_csv(result: &AnalysisResult, language: SummaryLanguage, bom: bool) -> Result<Vec<u8>> {
    let labels = Labels::for_language(language);
    let mut writer = csv_writer(bom);

    writer.write_record([labels.field_column, labels.result_column])?;
    for (label, value) in summary_rows(result, &labels) {
        writer.write_record([label, value.as_str()])?;
    }
    finish(writer)
}

/// Keyword table as CSV, ranked, without an index column.
pub fn keywords_csv(result: &AnalysisResult, language: SummaryLanguage, bom: bool) -> Result<Vec<u8>> {
    let labels = Labels::for_language(language);
    let mut writer = csv_writer(bom);

    writer.write_record(labels.keyword_columns)?;
    for row in keyword_rows(result) {
        writer.write_record(&row)?;
    }
    finish(writer)
}

/// Both tables as one workbook with two sheets.
pub fn excel_workbook(result: &AnalysisResult, language: SummaryLanguage) -> Result<Vec<u8>> {
    let labels = Labels::for_language(language);
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name(SUMMARY_SHEET)?;
    summary_sheet.write_string_with_format(0, 0, labels.field_column, &header)?;
    summary_sheet.write_string_with_format(0, 1, labels.result_column, &header)?;
    for (i, (label, value)) in summary_rows(result, &labels).into_iter().enumerate() {
        let row = i as u32 + 1;
        summary_sheet.write_string_with_format(row, 0, label, &header)?;
        summary_sheet.write_string(row, 1, value)?;
    }
    summary_sheet.set_column_width(0, 22)?;
    summary_sheet.set_column_width(1, 80)?;

    let keyword_sheet = workbook.add_worksheet();
    keyword_sheet.set_name(KEYWORDS_SHEET)?;
    for (col, title) in labels.keyword_columns.iter().enumerate() {
        keyword_sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, k) in result.keywords.iter().enumerate() {
        let row = i as u32 + 1;
        keyword_sheet.write_number(row, 0, (i + 1) as f64)?;
        keyword_sheet.write_string(row, 1, k.keyword.as_str())?;
        keyword_sheet.write_number(row, 2, k.frequency_count as f64)?;
        keyword_sheet.write_string(row, 3, k.part_of_speech.as_str())?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub summary_csv: PathBuf,
    pub keywords_csv: PathBuf,
    pub excel: PathBuf,
}

// Writes every export into the configured output directory
pub fn export_all(
    result: &AnalysisResult,
    language: SummaryLanguage,
    output: &OutputConfig,
) -> Result<ExportedFiles> {
    std::fs::create_dir_all(&output.directory)?;

    let files = ExportedFiles {
        summary_csv: output.summary_csv_path(),
        keywords_csv: output.keywords_csv_path(),
        excel: output.excel_path(),
    };

    std::fs::write(&files.summary_csv, summary_csv(result, language, output.csv_bom)?)?;
    std::fs::write(&files.keywords_csv, keywords_csv(result, language, output.csv_bom)?)?;
    std::fs::write(&files.excel, excel_workbook(result, language)?)?;

    tracing::info!(directory = %output.directory.display(), "exported analysis files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisSummary, KeywordEntry};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            summary: AnalysisSummary {
                summary_text: "Cats, mostly.".to_string(),
                tone: "Neutral".to_string(),
                readability_level: "General Public".to_string(),
            },
            keywords: vec![
                KeywordEntry {
                    keyword: "cat".to_string(),
                    frequency_count: 3,
                    part_of_speech: "Noun".to_string(),
                },
                KeywordEntry {
                    keyword: "\"purr\"".to_string(),
                    frequency_count: 1,
                    part_of_speech: "Verb".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_summary_csv_has_label_column() {
        let bytes = summary_csv(&sample(), SummaryLanguage::English, false).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Field,Result\nSummary,\"Cats, mostly.\"\nTone Analysis,Neutral\nReadability Level,General Public\n"
        );
    }

    #[test]
    fn test_keywords_csv_is_ranked_and_quoted() {
        let bytes = keywords_csv(&sample(), SummaryLanguage::English, false).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Rank,Keyword,Frequency,Part of Speech");
        assert_eq!(lines[1], "1,cat,3,Noun");
        assert_eq!(lines[2], "2,\"\"\"purr\"\"\",1,Verb");
    }

    #[test]
    fn test_bom_prefix_and_thai_headers() {
        let bytes = keywords_csv(&sample(), SummaryLanguage::Thai, true).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert!(text.starts_with("ลำดับ,คำศัพท์,ความถี่ที่ปรากฏ,ส่วนของคำพูด (POS)\n"));
    }

    #[test]
    fn test_excel_workbook_is_a_zip() {
        let bytes = excel_workbook(&sample(), SummaryLanguage::English).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_export_all_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            directory: dir.path().join("reports"),
            ..OutputConfig::default()
        };

        let files = export_all(&sample(), SummaryLanguage::English, &output).unwrap();

        assert!(files.summary_csv.exists());
        assert!(files.keywords_csv.exists());
        assert!(files.excel.exists());
        assert_eq!(files.excel.file_name().unwrap(), "content_analysis_report.xlsx");
        let summary = std::fs::read(&files.summary_csv).unwrap();
        assert!(summary.starts_with(UTF8_BOM));
    }
}
