use chrono::{DateTime, Local};

use crate::models::{AnalysisRequest, AnalysisResult};

/// A validated result together with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub request: AnalysisRequest,
    pub result: AnalysisResult,
    pub analyzed_at: DateTime<Local>,
}

/// State that survives between interactions of one session.
///
/// Owned by the caller and threaded through each step by value; the core
/// components never hold on to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    last_input: Option<String>,
    last_entry: Option<SessionEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    pub fn last_input(&self) -> Option<&str> {
        self.last_input.as_deref()
    }

    pub fn last_entry(&self) -> Option<&SessionEntry> {
        self.last_entry.as_ref()
    }

    pub fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_entry.as_ref().map(|entry| &entry.result)
    }

    pub fn has_result(&self) -> bool {
        self.last_entry.is_some()
    }

    pub fn with_input(mut self, text: impl Into<String>) -> Self {
        self.last_input = Some(text.into());
        self
    }

    // A new result always replaces the previous one
    pub fn record(mut self, request: AnalysisRequest, result: AnalysisResult) -> Self {
        self.last_input = Some(request.user_text().to_string());
        self.last_entry = Some(SessionEntry {
            request,
            result,
            analyzed_at: Local::now(),
        });
        self
    }

    pub fn cleared(self) -> Self {
        SessionState::default()
    }
}
