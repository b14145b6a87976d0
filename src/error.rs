use thiserror::Error;

// Local request errors, raised before anything reaches the network
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("input text is empty")]
    EmptyText,

    #[error("keyword count {0} is outside the supported range {min}..={max}", min = crate::models::MIN_KEYWORD_COUNT, max = crate::models::MAX_KEYWORD_COUNT)]
    KeywordCountOutOfRange(u32),
}

// AnalysisClient errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no API key supplied")]
    MissingCredential,

    #[error("no text supplied for analysis")]
    EmptyInput,

    #[error("provider error{}: {message}", status_suffix(.status))]
    ProviderError {
        status: Option<u16>,
        message: String,
    },

    #[error("unexpected error during analysis: {0}")]
    UnknownError(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl AnalysisError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        AnalysisError::ProviderError {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::ProviderError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

// ResultValidator errors; both variants keep the provider's text verbatim
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("provider response is not valid JSON: {reason}")]
    MalformedJson { raw: String, reason: String },

    #[error("provider response is missing {missing}")]
    IncompleteResult { raw: String, missing: String },
}

impl ValidationError {
    pub fn raw_text(&self) -> &str {
        match self {
            ValidationError::MalformedJson { raw, .. } => raw,
            ValidationError::IncompleteResult { raw, .. } => raw,
        }
    }
}

// Everything the pipeline and its outer surfaces can fail with
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

impl ContentError {
    // Raw provider text for JSON-shape failures
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            ContentError::Validation(err) => Some(err.raw_text()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
