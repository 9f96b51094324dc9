//! Analysis orchestration

use crate::analysis::fallback::create_fallback_analysis;
use crate::analysis::llm::{CompletionRequest, LanguageModel};
use crate::analysis::parse::parse_model_output;
use crate::analysis::prompt::{
    build_analysis_prompt, build_area_prompt, ANALYSIS_SYSTEM_PROMPT, AREA_SYSTEM_PROMPT,
};
use crate::analysis::validate::validate_analysis;
use crate::analysis::{AnalysisResult, AreaPlace, RestaurantProfile};
use tracing::{error, info, warn};

pub const ANALYSIS_MAX_TOKENS: u32 = 1500;
pub const ANALYSIS_TEMPERATURE: f64 = 0.3;
pub const AREA_MAX_TOKENS: u32 = 500;
pub const AREA_TEMPERATURE: f64 = 0.4;

pub const AREA_NO_MODEL: &str = "AI analysis not available - OpenAI API key not configured";
pub const AREA_NO_PLACES: &str = "No restaurants found in this area.";
pub const AREA_EMPTY_REPLY: &str = "No analysis generated";

/// Runs restaurant and area analyses against an optional model
///
/// With no model configured every single-restaurant analysis takes the
/// fallback path without attempting a call.
#[derive(Debug, Clone)]
pub struct AnalysisEngine<M> {
    model: Option<M>,
}

impl<M: LanguageModel> AnalysisEngine<M> {
    pub fn new(model: Option<M>) -> Self {
        Self { model }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Model-backed analysis; `None` when there is no model, the call fails,
    /// or the reply holds no JSON object
    pub async fn analyze_restaurant(&self, profile: &RestaurantProfile) -> Option<AnalysisResult> {
        let Some(model) = &self.model else {
            warn!("no language model configured");
            return None;
        };

        let request = CompletionRequest {
            system: ANALYSIS_SYSTEM_PROMPT.to_string(),
            user: build_analysis_prompt(profile),
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: ANALYSIS_TEMPERATURE,
        };

        let reply = match model.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "restaurant analysis call failed");
                return None;
            }
        };

        if reply.is_empty() {
            error!("empty reply from language model");
            return None;
        }

        match parse_model_output(&reply) {
            Some(object) => Some(validate_analysis(&object)),
            None => {
                error!("could not extract a JSON object from model reply");
                None
            }
        }
    }

    /// Always produces an analysis, falling back to rule-based output
    pub async fn analyze_single_restaurant(&self, profile: &RestaurantProfile) -> AnalysisResult {
        match self.analyze_restaurant(profile).await {
            Some(result) => result,
            None => {
                info!(name = ?profile.name, "using fallback analysis");
                create_fallback_analysis(profile)
            }
        }
    }

    /// Free-text overview of an area's dining scene
    pub async fn analyze_area(&self, places: &[AreaPlace]) -> String {
        let Some(model) = &self.model else {
            return AREA_NO_MODEL.to_string();
        };
        if places.is_empty() {
            return AREA_NO_PLACES.to_string();
        }

        let request = CompletionRequest {
            system: AREA_SYSTEM_PROMPT.to_string(),
            user: build_area_prompt(places),
            max_tokens: AREA_MAX_TOKENS,
            temperature: AREA_TEMPERATURE,
        };

        match model.complete(&request).await {
            Ok(reply) if reply.is_empty() => AREA_EMPTY_REPLY.to_string(),
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "area analysis call failed");
                format!("Error generating area analysis: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{OverallRating, PriceLevel};
    use crate::error::{Error, Result};
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Fail,
    }

    struct FakeModel {
        reply: Reply,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeModel {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl LanguageModel for FakeModel {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail => Err(Error::Model("connection reset".to_string())),
            }
        }
    }

    fn profile() -> RestaurantProfile {
        RestaurantProfile {
            name: Some("Luigi's".to_string()),
            rating: Some(4.3),
            total_ratings: Some(150),
            price_level: PriceLevel::Tier(2),
            ..Default::default()
        }
    }

    fn area() -> Vec<AreaPlace> {
        vec![AreaPlace {
            name: "Luigi's".to_string(),
            rating: Some(4.3),
            distance_miles: Some(0.8),
            cuisine_types: vec!["italian".to_string()],
            price_level: Some(2),
        }]
    }

    #[tokio::test]
    async fn test_model_reply_is_validated() {
        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Text(
            "```json\n{\"overall_rating\": \"Good\", \"confidence_score\": \"1.7\"}\n```",
        ))));

        let result = engine.analyze_single_restaurant(&profile()).await;
        assert_eq!(result.overall_rating, OverallRating::Good);
        assert_eq!(result.confidence_score, 1.0);

        let seen = engine.model.as_ref().unwrap().seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, ANALYSIS_MAX_TOKENS);
        assert_eq!(seen[0].temperature, ANALYSIS_TEMPERATURE);
        assert!(seen[0].user.contains("Luigi's"));
    }

    #[tokio::test]
    async fn test_transport_error_falls_back() {
        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Fail)));

        assert!(engine.analyze_restaurant(&profile()).await.is_none());
        let result = engine.analyze_single_restaurant(&profile()).await;
        assert_eq!(result, create_fallback_analysis(&profile()));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Text("Sorry, no."))));
        let result = engine.analyze_single_restaurant(&profile()).await;
        assert_eq!(result.confidence_score, 0.3);
        assert_eq!(result.overall_rating, OverallRating::VeryGood);
    }

    #[tokio::test]
    async fn test_missing_model_falls_back() {
        let engine: AnalysisEngine<FakeModel> = AnalysisEngine::new(None);
        assert!(!engine.has_model());
        let result = engine.analyze_single_restaurant(&profile()).await;
        assert_eq!(result, create_fallback_analysis(&profile()));
    }

    #[tokio::test]
    async fn test_area_without_model_checks_credential_first() {
        let engine: AnalysisEngine<FakeModel> = AnalysisEngine::new(None);
        assert_eq!(engine.analyze_area(&[]).await, AREA_NO_MODEL);
    }

    #[tokio::test]
    async fn test_area_without_places() {
        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Text("unused"))));
        assert_eq!(engine.analyze_area(&[]).await, AREA_NO_PLACES);
        assert!(engine.model.as_ref().unwrap().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_area_reply() {
        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Text("Great pasta scene."))));
        assert_eq!(engine.analyze_area(&area()).await, "Great pasta scene.");

        let seen = engine.model.as_ref().unwrap().seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, AREA_MAX_TOKENS);
        assert_eq!(seen[0].system, AREA_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_area_empty_and_failed_replies() {
        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Text(""))));
        assert_eq!(engine.analyze_area(&area()).await, AREA_EMPTY_REPLY);

        let engine = AnalysisEngine::new(Some(FakeModel::new(Reply::Fail)));
        assert_eq!(
            engine.analyze_area(&area()).await,
            "Error generating area analysis: Model error: connection reset"
        );
    }
}
