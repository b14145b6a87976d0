use crate::api::ApiClient;
use crate::config::{Config, KeywordPolicy};
use crate::error::{ContentError, Result};
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::prompt::PromptSpec;
use crate::report::RenderOptions;
use crate::session::SessionState;
use crate::validator::validate;

/// The whole prompt → provider → validation pipeline, parameterized by
/// configuration instead of duplicated per variant.
pub struct ContentAnalyzer {
    api_client: ApiClient,
    keyword_policy: KeywordPolicy,
    pub config: Config,
}

impl ContentAnalyzer {
    pub fn new(config: Config) -> Result<Self> {
        let api_client = ApiClient::new(&config.api)?;
        Ok(ContentAnalyzer::with_client(api_client, config))
    }

    pub fn with_client(api_client: ApiClient, config: Config) -> Self {
        ContentAnalyzer {
            api_client,
            keyword_policy: config.analysis.keyword_policy,
            config,
        }
    }

    pub fn render_options(&self, request: &AnalysisRequest) -> RenderOptions {
        RenderOptions {
            language: request.summary_language(),
            include_chart: self.config.output.include_chart,
        }
    }

    /// Runs one analysis. Every failure is terminal for this attempt.
    pub async fn analyze(&self, api_key: &str, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let prompt = PromptSpec::for_request(request);

        tracing::info!(
            provider = self.api_client.provider_name(),
            keyword_count = request.keyword_count(),
            language = %request.summary_language(),
            "analyzing text"
        );

        let raw = self
            .api_client
            .analyze(api_key, &prompt.system_instruction, request.user_text())
            .await?;

        let result = validate(&raw).inspect_err(|e| {
            tracing::warn!(error = %e, "provider response failed validation");
        })?;

        Ok(apply_keyword_policy(result, request.keyword_count(), self.keyword_policy))
    }

    /// Runs one analysis against the caller's session and hands the session
    /// back. A failed attempt keeps the previous result.
    pub async fn analyze_in_session(
        &self,
        session: SessionState,
        api_key: &str,
        request: AnalysisRequest,
    ) -> (SessionState, Result<()>) {
        match self.analyze(api_key, &request).await {
            Ok(result) => (session.record(request, result), Ok(())),
            Err(e) => (session.with_input(request.user_text()), Err(e)),
        }
    }

    /// Validates a response that was saved earlier, without any network call.
    pub fn validate_saved(&self, raw: &str, requested: u32) -> Result<AnalysisResult> {
        let result = validate(raw).map_err(ContentError::from)?;
        Ok(apply_keyword_policy(result, requested, self.keyword_policy))
    }
}

/// Applies the configured policy when the provider returned more keywords
/// than requested. Fewer than requested is always kept as-is.
pub fn apply_keyword_policy(
    mut result: AnalysisResult,
    requested: u32,
    policy: KeywordPolicy,
) -> AnalysisResult {
    let requested = requested as usize;
    let returned = result.keywords.len();

    if returned > requested {
        match policy {
            KeywordPolicy::Tolerate => {
                tracing::warn!(requested, returned, "provider returned more keywords than requested");
            }
            KeywordPolicy::Truncate => {
                tracing::info!(requested, returned, "truncating keyword list");
                result.keywords.truncate(requested);
            }
        }
    } else if returned < requested {
        tracing::info!(requested, returned, "provider returned fewer keywords than requested");
    }

    result
}
