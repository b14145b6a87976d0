use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

use content_analyzer::config::Config;
use content_analyzer::error::ContentError;
use content_analyzer::export::export_all;
use content_analyzer::logging::init_logging;
use content_analyzer::models::{MAX_KEYWORD_COUNT, MIN_KEYWORD_COUNT};
use content_analyzer::report::{RenderOptions, render, render_session};
use content_analyzer::{AnalysisRequest, ContentAnalyzer, RequestError, SessionState, SummaryLanguage};

#[derive(Debug, Parser)]
#[command(name = "content-analyzer", version, about = "Summary, tone, readability and keyword analysis of a text via an LLM")]
struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one text and print the report
    Analyze {
        /// Text file to analyze; stdin when omitted or "-"
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short = 'n', long)]
        keywords: Option<u32>,
        #[arg(short, long)]
        language: Option<SummaryLanguage>,
        #[arg(long)]
        api_key: Option<String>,
        /// Write CSV and Excel files into the output directory
        #[arg(long)]
        export: bool,
        #[arg(long)]
        no_chart: bool,
    },
    /// Validate and render a saved provider response without calling the provider
    Validate {
        response: PathBuf,
        #[arg(short = 'n', long)]
        keywords: Option<u32>,
        #[arg(short, long)]
        language: Option<SummaryLanguage>,
        #[arg(long)]
        export: bool,
        #[arg(long)]
        no_chart: bool,
    },
    /// Interactive session that keeps the last result
    Session {
        #[arg(short = 'n', long)]
        keywords: Option<u32>,
        #[arg(short, long)]
        language: Option<SummaryLanguage>,
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Submit,
    Show,
    Export,
    Clear,
    Keywords(u32),
    Language(SummaryLanguage),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<std::result::Result<SessionCommand, String>> {
    let line = line.trim();
    if line == "." {
        return Some(Ok(SessionCommand::Submit));
    }
    let rest = line.strip_prefix(':')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let command = match (name, arg) {
        ("show", None) => Ok(SessionCommand::Show),
        ("export", None) => Ok(SessionCommand::Export),
        ("clear", None) => Ok(SessionCommand::Clear),
        ("help", None) => Ok(SessionCommand::Help),
        ("quit" | "q", None) => Ok(SessionCommand::Quit),
        ("keywords", Some(n)) => match n.parse::<u32>() {
            Ok(n) if (MIN_KEYWORD_COUNT..=MAX_KEYWORD_COUNT).contains(&n) => Ok(SessionCommand::Keywords(n)),
            Ok(n) => Err(format!(
                "keyword count must be between {MIN_KEYWORD_COUNT} and {MAX_KEYWORD_COUNT}, got {n}"
            )),
            Err(_) => Err(format!("not a number: {n}")),
        },
        ("language", Some(l)) => l.parse().map(SessionCommand::Language),
        _ => Err(format!("unknown command: {line}")),
    };
    Some(command)
}

// The buffer is only emptied once it became a request, so a rejected submit keeps the text.
fn take_request(
    buffer: &mut String,
    keyword_count: u32,
    language: SummaryLanguage,
) -> std::result::Result<AnalysisRequest, RequestError> {
    let request = AnalysisRequest::new(buffer.clone(), keyword_count, language)?;
    buffer.clear();
    Ok(request)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match input {
        Some(path) if path != Path::new("-") => {
            text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read input file {}", path.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read text from stdin")?;
        }
    }
    Ok(text)
}

// Flag, then environment, then ask. An empty key is left for the analyzer to reject.
fn resolve_api_key(flag: Option<String>, config: &Config) -> Result<String> {
    if let Some(key) = flag {
        return Ok(key);
    }
    if let Ok(key) = std::env::var(config.api.provider.api_key_env()) {
        return Ok(key);
    }

    print!("🔑 API key ({}): ", config.api.provider.api_key_env());
    std::io::stdout().flush()?;
    let mut key = String::new();
    std::io::stdin().lock().read_line(&mut key)?;
    Ok(key.trim().to_string())
}

fn print_failure(err: &ContentError) {
    println!("❌ {err}");
    if let Some(raw) = err.raw_text() {
        println!("📄 Raw provider response:\n{raw}");
    }
}

fn export_result(result: &content_analyzer::AnalysisResult, language: SummaryLanguage, config: &Config) -> Result<()> {
    let files = export_all(result, language, &config.output)?;
    println!("⬇️  {}", files.summary_csv.display());
    println!("⬇️  {}", files.keywords_csv.display());
    println!("⬇️  {}", files.excel.display());
    Ok(())
}

async fn run_analyze(
    config: Config,
    input: Option<PathBuf>,
    keywords: Option<u32>,
    language: Option<SummaryLanguage>,
    api_key: Option<String>,
    export: bool,
) -> Result<()> {
    let text = read_input(input.as_deref())?;
    let request = AnalysisRequest::new(
        text,
        keywords.unwrap_or(config.analysis.keyword_count),
        language.unwrap_or(config.analysis.language),
    )?;
    let api_key = resolve_api_key(api_key, &config)?;
    let analyzer = ContentAnalyzer::new(config)?;

    println!("⏳ Analyzing content with {}...", analyzer.config.api.model());
    let result = match analyzer.analyze(&api_key, &request).await {
        Ok(result) => result,
        Err(e) => {
            print_failure(&e);
            return Err(e.into());
        }
    };

    println!("✅ Analysis complete\n");
    println!("{}", render(&result, &analyzer.render_options(&request)));

    if export {
        export_result(&result, request.summary_language(), &analyzer.config)?;
    }
    Ok(())
}

fn run_validate(
    config: Config,
    response: &Path,
    keywords: Option<u32>,
    language: Option<SummaryLanguage>,
    export: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(response)
        .with_context(|| format!("failed to read response file {}", response.display()))?;
    let requested = keywords.unwrap_or(config.analysis.keyword_count);
    let language = language.unwrap_or(config.analysis.language);
    let analyzer = ContentAnalyzer::new(config)?;

    let result = match analyzer.validate_saved(&raw, requested) {
        Ok(result) => result,
        Err(e) => {
            print_failure(&e);
            return Err(e.into());
        }
    };

    let options = RenderOptions {
        language,
        include_chart: analyzer.config.output.include_chart,
    };
    println!("✅ Response is valid\n");
    println!("{}", render(&result, &options));

    if export {
        export_result(&result, language, &analyzer.config)?;
    }
    Ok(())
}

fn print_session_help() {
    println!("Paste or type the text to analyze, then a line with a single \".\" to submit.");
    println!("Commands: :show  :export  :clear  :keywords N  :language english|thai  :help  :quit");
}

async fn run_session(
    config: Config,
    keywords: Option<u32>,
    language: Option<SummaryLanguage>,
    api_key: Option<String>,
) -> Result<()> {
    let mut keyword_count = keywords.unwrap_or(config.analysis.keyword_count);
    let mut language = language.unwrap_or(config.analysis.language);
    let api_key = resolve_api_key(api_key, &config)?;
    let analyzer = ContentAnalyzer::new(config)?;

    let mut session = SessionState::new();
    let mut buffer = String::new();

    println!("📰 Content Analyzer session ({} keywords, {language})", keyword_count);
    print_session_help();

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            None => {
                buffer.push_str(&line);
                buffer.push('\n');
                continue;
            }
            Some(Err(message)) => {
                println!("⚠️  {message}");
                continue;
            }
            Some(Ok(command)) => command,
        };

        let options = RenderOptions {
            language,
            include_chart: analyzer.config.output.include_chart,
        };

        match command {
            SessionCommand::Submit => {
                let request = match take_request(&mut buffer, keyword_count, language) {
                    Ok(request) => request,
                    Err(e) => {
                        println!("❌ {e}");
                        continue;
                    }
                };

                println!("⏳ Analyzing...");
                let (next, outcome) = analyzer.analyze_in_session(session, &api_key, request).await;
                session = next;
                match outcome {
                    Ok(()) => {
                        println!("✅ Analysis complete\n");
                        if let Some(report) = render_session(&session, &options) {
                            println!("{report}");
                        }
                    }
                    Err(e) => print_failure(&e),
                }
            }
            SessionCommand::Show => match render_session(&session, &options) {
                Some(report) => println!("{report}"),
                None => println!("⚠️  No analysis yet"),
            },
            SessionCommand::Export => match session.last_entry() {
                Some(entry) => {
                    if let Err(e) = export_result(&entry.result, entry.request.summary_language(), &analyzer.config) {
                        println!("❌ Export failed: {e}");
                    }
                }
                None => println!("⚠️  No analysis yet"),
            },
            SessionCommand::Clear => {
                session = session.cleared();
                buffer.clear();
                println!("🧹 Session cleared");
            }
            SessionCommand::Keywords(n) => {
                keyword_count = n;
                println!("🔢 Keywords: {keyword_count}");
            }
            SessionCommand::Language(l) => {
                language = l;
                println!("🌐 Summary language: {language}");
            }
            SessionCommand::Help => print_session_help(),
            SessionCommand::Quit => break,
        }
    }

    println!("👋 Bye");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Command::Analyze {
            input,
            keywords,
            language,
            api_key,
            export,
            no_chart,
        } => {
            config.output.include_chart &= !no_chart;
            run_analyze(config, input, keywords, language, api_key, export).await
        }
        Command::Validate {
            response,
            keywords,
            language,
            export,
            no_chart,
        } => {
            config.output.include_chart &= !no_chart;
            run_validate(config, &response, keywords, language, export)
        }
        Command::Session {
            keywords,
            language,
            api_key,
        } => run_session(config, keywords, language, api_key).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "content-analyzer",
            "analyze",
            "-n",
            "25",
            "--language",
            "thai",
            "--export",
        ])
        .unwrap();

        match cli.command {
            Command::Analyze {
                keywords,
                language,
                export,
                ..
            } => {
                assert_eq!(keywords, Some(25));
                assert_eq!(language, Some(SummaryLanguage::Thai));
                assert!(export);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["content-analyzer", "analyze", "-l", "french"]).is_err());
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_command("."), Some(Ok(SessionCommand::Submit)));
        assert_eq!(parse_command(":keywords 30"), Some(Ok(SessionCommand::Keywords(30))));
        assert_eq!(
            parse_command(":language th"),
            Some(Ok(SessionCommand::Language(SummaryLanguage::Thai)))
        );
        assert_eq!(parse_command(":q"), Some(Ok(SessionCommand::Quit)));
        assert!(matches!(parse_command(":keywords many"), Some(Err(_))));
        assert!(matches!(parse_command(":keywords 9"), Some(Err(_))));
        assert!(matches!(parse_command(":keywords 60"), Some(Err(_))));
        assert!(matches!(parse_command(":dance"), Some(Err(_))));
        assert_eq!(parse_command("Cats are small mammals."), None);
    }

    #[test]
    fn test_keyword_command_bounds() {
        assert_eq!(
            parse_command(&format!(":keywords {MIN_KEYWORD_COUNT}")),
            Some(Ok(SessionCommand::Keywords(MIN_KEYWORD_COUNT)))
        );
        assert_eq!(
            parse_command(&format!(":keywords {MAX_KEYWORD_COUNT}")),
            Some(Ok(SessionCommand::Keywords(MAX_KEYWORD_COUNT)))
        );
        assert_eq!(
            parse_command(":keywords 51"),
            Some(Err("keyword count must be between 10 and 50, got 51".to_string()))
        );
    }

    #[test]
    fn test_rejected_submit_keeps_buffer() {
        let mut buffer = String::from("Cats are small mammals.\n");

        let err = take_request(&mut buffer, 60, SummaryLanguage::English).unwrap_err();
        assert!(matches!(err, RequestError::KeywordCountOutOfRange(60)));
        assert_eq!(buffer, "Cats are small mammals.\n");

        let request = take_request(&mut buffer, 10, SummaryLanguage::English).unwrap();
        assert_eq!(request.user_text(), "Cats are small mammals.\n");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_is_rejected() {
        let mut buffer = String::from("  \n");
        assert!(matches!(
            take_request(&mut buffer, 10, SummaryLanguage::English),
            Err(RequestError::EmptyText)
        ));
        assert_eq!(buffer, "  \n");
    }
}
