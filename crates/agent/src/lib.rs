//! Conversation orchestration for the tank cost service.
//!
//! The flow for one chat turn:
//! 1. **Context fetch** - recent orders, material price averages, and labor
//!    rates from the order store (`tankquote-db`).
//! 2. **Intent check** (`intent`) - keyword heuristic deciding whether the
//!    message asks for a price.
//! 3. **Prompt assembly** (`prompt`) - system prompt embedding the fetched
//!    tables and a short recent-order summary.
//! 4. **Completion** (`llm`) - one synchronous call to an OpenAI-compatible
//!    chat-completion endpoint.
//! 5. **Merge** (`orchestrator`) - deterministic price estimate from
//!    `tankquote-core` attached to the reply when requested.
//!
//! The LLM only writes prose. Every number in a response comes from the
//! deterministic estimator or straight from the order store.

pub mod intent;
pub mod llm;
pub mod orchestrator;
pub mod prompt;

pub use intent::PriceIntentDetector;
pub use llm::{ChatMessage, Completion, CompletionRequest, LlmClient, LlmError, OpenAiChatClient};
pub use orchestrator::{
    AgentError, ChatContext, ChatData, ChatResponse, ContextUsed, OrderAnalysis, TankCostAgent,
};
