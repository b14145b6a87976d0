pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod report;
pub mod session;
pub mod validator;

pub use analyzer::ContentAnalyzer;
pub use api::{ApiClient, GenerationProvider, GenerationRequest};
pub use config::Config;
pub use error::{AnalysisError, ContentError, RequestError, ValidationError};
pub use models::*;
pub use prompt::{PromptSpec, build_prompt};
pub use session::SessionState;
pub use validator::validate;
