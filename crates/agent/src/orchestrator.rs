use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use tankquote_core::domain::estimate::{PriceEstimate, TankSpecification};
use tankquote_core::domain::order::Order;
use tankquote_core::pricing::PricingEstimator;
use tankquote_db::{OrderRepository, RepositoryError};

use crate::intent::PriceIntentDetector;
use crate::llm::{ChatMessage, CompletionRequest, LlmClient, LlmError};
use crate::prompt::{build_analysis_prompt, build_system_prompt, AgentContextData};

const CHAT_TEMPERATURE: f64 = 0.7;
const CHAT_MAX_TOKENS: u32 = 1000;
const ANALYSIS_TEMPERATURE: f64 = 0.5;
const ANALYSIS_MAX_TOKENS: u32 = 1500;
/// How many recent orders are pulled into the chat context.
const CHAT_CONTEXT_ORDERS: i64 = 5;

const APOLOGY_REPLY: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Optional caller-supplied context for a chat turn.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatContext {
    pub specifications: Option<TankSpecification>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ContextUsed {
    pub recent_orders_count: usize,
    pub material_types_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatData {
    pub price_estimate: Option<PriceEstimate>,
    pub context_used: ContextUsed,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
    pub data: Option<ChatData>,
    pub tokens: Option<i64>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderAnalysis {
    pub success: bool,
    pub price_estimate: Option<PriceEstimate>,
    pub similar_orders: Vec<Order>,
    pub analysis: Option<String>,
    pub tokens: Option<i64>,
    pub error: Option<String>,
}

/// Conversation orchestrator: pulls order history context, forwards the
/// user message to the text-generation API, and merges in a deterministic
/// price estimate when the message asks for one.
///
/// Every failure inside a request, data access or LLM, is absorbed here
/// and reported as a `success: false` payload; nothing propagates to the
/// HTTP layer as an error.
pub struct TankCostAgent {
    repository: Arc<dyn OrderRepository>,
    llm: Arc<dyn LlmClient>,
    estimator: PricingEstimator,
    intent: PriceIntentDetector,
}

impl TankCostAgent {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        llm: Arc<dyn LlmClient>,
        estimator: PricingEstimator,
        intent: PriceIntentDetector,
    ) -> Self {
        Self { repository, llm, estimator, intent }
    }

    pub fn estimator(&self) -> &PricingEstimator {
        &self.estimator
    }

    pub async fn chat(&self, message: &str, context: Option<ChatContext>) -> ChatResponse {
        match self.chat_inner(message, context.as_ref()).await {
            Ok(response) => response,
            Err(error) => {
                warn!(event_name = "agent.chat.failed", error = %error, "chat request failed");
                ChatResponse {
                    success: false,
                    reply: APOLOGY_REPLY.to_string(),
                    data: None,
                    tokens: None,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    async fn chat_inner(
        &self,
        message: &str,
        context: Option<&ChatContext>,
    ) -> Result<ChatResponse, AgentError> {
        let context_data = AgentContextData {
            recent_orders: self.repository.recent_orders(CHAT_CONTEXT_ORDERS).await?,
            material_prices: self.repository.material_prices().await?,
            labor_rates: self.repository.labor_rates().await?,
        };

        let is_price_request = self.intent.detect(message);

        let completion = self
            .llm
            .complete(CompletionRequest {
                messages: vec![
                    ChatMessage::system(build_system_prompt(&context_data)),
                    ChatMessage::user(message),
                ],
                temperature: CHAT_TEMPERATURE,
                max_tokens: CHAT_MAX_TOKENS,
            })
            .await?;

        let price_estimate = if is_price_request {
            context
                .and_then(|ctx| ctx.specifications.as_ref())
                .map(|spec| self.estimator.estimate(spec))
        } else {
            None
        };

        info!(
            event_name = "agent.chat.completed",
            price_intent = is_price_request,
            estimate_attached = price_estimate.is_some(),
            recent_orders = context_data.recent_orders.len(),
            "chat request completed"
        );

        Ok(ChatResponse {
            success: true,
            reply: completion.content,
            data: Some(ChatData {
                price_estimate,
                context_used: ContextUsed {
                    recent_orders_count: context_data.recent_orders.len(),
                    material_types_count: context_data.material_prices.len(),
                },
            }),
            tokens: completion.total_tokens,
            error: None,
        })
    }

    pub async fn analyze_order(&self, spec: &TankSpecification) -> OrderAnalysis {
        match self.analyze_inner(spec).await {
            Ok(analysis) => analysis,
            Err(error) => {
                warn!(
                    event_name = "agent.analyze.failed",
                    error = %error,
                    "order analysis failed"
                );
                OrderAnalysis {
                    success: false,
                    price_estimate: None,
                    similar_orders: Vec::new(),
                    analysis: None,
                    tokens: None,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    async fn analyze_inner(&self, spec: &TankSpecification) -> Result<OrderAnalysis, AgentError> {
        let similar_orders = self.repository.similar_orders(spec).await?;
        let price_estimate = self.estimator.estimate(spec);

        let completion = self
            .llm
            .complete(CompletionRequest {
                messages: vec![
                    ChatMessage::system(
                        "You are a cost analysis expert for industrial tank manufacturing.",
                    ),
                    ChatMessage::user(build_analysis_prompt(spec, &price_estimate, &similar_orders)),
                ],
                temperature: ANALYSIS_TEMPERATURE,
                max_tokens: ANALYSIS_MAX_TOKENS,
            })
            .await?;

        info!(
            event_name = "agent.analyze.completed",
            similar_orders = similar_orders.len(),
            "order analysis completed"
        );

        Ok(OrderAnalysis {
            success: true,
            price_estimate: Some(price_estimate),
            similar_orders,
            analysis: Some(completion.content),
            tokens: completion.total_tokens,
            error: None,
        })
    }
}
