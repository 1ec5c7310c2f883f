use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use tankquote_agent::{ChatContext, ChatResponse, OrderAnalysis, TankCostAgent};
use tankquote_core::domain::estimate::TankSpecification;
use tankquote_core::domain::order::Order;
use tankquote_db::OrderRepository;

/// How many orders the recent-orders context endpoint returns.
const CONTEXT_ORDERS_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<TankCostAgent>,
    pub repository: Arc<dyn OrderRepository>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[allow(dead_code)]
    pub session_id: Option<String>,
    pub message: String,
    pub context: Option<ChatContext>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub tank_specifications: TankSpecification,
    /// Accepted for wire compatibility but ignored; the quantity inside
    /// `tank_specifications` is authoritative.
    #[allow(dead_code)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentOrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct MaterialPricesResponse {
    pub success: bool,
    pub prices: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/analyze", post(analyze))
        .route("/context/recent-orders", get(recent_orders))
        .route("/context/material-prices", get(material_prices))
        .with_state(state)
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "tankquote",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Conversational entry point. The orchestrator absorbs every failure into
/// a `success: false` payload, so this handler always answers 200.
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    Json(state.agent.chat(&request.message, request.context).await)
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<OrderAnalysis> {
    Json(state.agent.analyze_order(&request.tank_specifications).await)
}

async fn recent_orders(
    State(state): State<AppState>,
) -> Result<Json<RecentOrdersResponse>, (StatusCode, Json<ErrorDetail>)> {
    match state.repository.recent_orders(CONTEXT_ORDERS_LIMIT).await {
        Ok(orders) => Ok(Json(RecentOrdersResponse { success: true, orders })),
        Err(db_error) => {
            error!(
                event_name = "server.context.recent_orders_failed",
                error = %db_error,
                "recent orders context query failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail { detail: db_error.to_string() }),
            ))
        }
    }
}

async fn material_prices(
    State(state): State<AppState>,
) -> Result<Json<MaterialPricesResponse>, (StatusCode, Json<ErrorDetail>)> {
    match state.repository.material_prices().await {
        Ok(prices) => Ok(Json(MaterialPricesResponse { success: true, prices })),
        Err(db_error) => {
            error!(
                event_name = "server.context.material_prices_failed",
                error = %db_error,
                "material prices context query failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail { detail: db_error.to_string() }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use tankquote_agent::{
        Completion, CompletionRequest, LlmClient, LlmError, PriceIntentDetector, TankCostAgent,
    };
    use tankquote_core::domain::estimate::TankSpecification;
    use tankquote_core::domain::order::{Order, OrderDetails};
    use tankquote_core::pricing::PricingEstimator;
    use tankquote_db::repositories::InMemoryOrderRepository;
    use tankquote_db::{OrderRepository, RepositoryError};

    use super::{router, AppState};

    struct ScriptedLlm;

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LlmError> {
            Ok(Completion { content: "Scripted reply.".to_string(), total_tokens: Some(42) })
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl OrderRepository for FailingRepository {
        async fn recent_orders(&self, _limit: i64) -> Result<Vec<Order>, RepositoryError> {
            Err(RepositoryError::Decode("store unreachable".to_string()))
        }

        async fn order_details(
            &self,
            _order_id: i64,
        ) -> Result<Option<OrderDetails>, RepositoryError> {
            Err(RepositoryError::Decode("store unreachable".to_string()))
        }

        async fn similar_orders(
            &self,
            _spec: &TankSpecification,
        ) -> Result<Vec<Order>, RepositoryError> {
            Err(RepositoryError::Decode("store unreachable".to_string()))
        }

        async fn material_prices(&self) -> Result<HashMap<String, f64>, RepositoryError> {
            Err(RepositoryError::Decode("store unreachable".to_string()))
        }

        async fn labor_rates(&self) -> Result<HashMap<String, f64>, RepositoryError> {
            Err(RepositoryError::Decode("store unreachable".to_string()))
        }
    }

    fn order(id: i64, month: u32) -> Order {
        Order {
            id,
            order_code: format!("TK-{id:04}"),
            customer_name: "Nordsee Chemie".to_string(),
            project_code: None,
            tank_name: None,
            diameter_mm: 1000.0,
            length_mm: 2000.0,
            volume: 100.0,
            material_grade: Some("standard".to_string()),
            quantity: 1,
            total_price_eur: 18400.0,
            total_weight_kg: 1250.0,
            labor_eur: 5200.0,
            outsource_eur: 0.0,
            created_date: None,
            created_at: Utc.with_ymd_and_hms(2026, month, 1, 0, 0, 0).single().expect("ts"),
        }
    }

    fn state_with_repository(repository: Arc<dyn OrderRepository>) -> AppState {
        let agent = Arc::new(TankCostAgent::new(
            repository.clone(),
            Arc::new(ScriptedLlm),
            PricingEstimator::default(),
            PriceIntentDetector::default(),
        ));
        AppState { agent, repository }
    }

    fn seeded_state() -> AppState {
        let mut prices = HashMap::new();
        prices.insert("Sheet Steel_KG".to_string(), 3.5);
        let repository = Arc::new(
            InMemoryOrderRepository::new(vec![order(1, 1), order(2, 2)])
                .with_material_prices(prices),
        );
        state_with_repository(repository)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    #[tokio::test]
    async fn root_reports_service_identity() {
        let app = router(seeded_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["service"], "tankquote");
        assert_eq!(payload["status"], "running");
        assert!(payload["version"].is_string());
    }

    #[tokio::test]
    async fn chat_returns_reply_with_context_counts() {
        let app = router(seeded_state());
        let response = app
            .oneshot(post_json("/chat", json!({"message": "latest orders?"})))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["reply"], "Scripted reply.");
        assert_eq!(payload["tokens"], 42);
        assert_eq!(payload["data"]["context_used"]["recent_orders_count"], 2);
    }

    #[tokio::test]
    async fn chat_with_price_intent_and_specs_attaches_estimate() {
        let app = router(seeded_state());
        let body = json!({
            "message": "fiyat teklifi istiyorum",
            "context": {
                "specifications": {
                    "diameter_mm": 1000.0,
                    "length_mm": 2000.0,
                    "volume": 100.0,
                    "material_grade": "standard"
                }
            }
        });
        let response = app.oneshot(post_json("/chat", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        let estimate = &payload["data"]["price_estimate"];
        assert_eq!(estimate["currency"], "EUR");
        assert_eq!(estimate["breakdown"]["quantity"], 1);
        assert_eq!(estimate["labor_cost"], 750.0);
    }

    #[tokio::test]
    async fn analyze_ignores_top_level_quantity() {
        let app = router(seeded_state());
        let body = json!({
            "tank_specifications": {
                "diameter_mm": 1000.0,
                "length_mm": 2000.0,
                "volume": 100.0,
                "material_grade": "standard"
            },
            "quantity": 2
        });
        let response = app.oneshot(post_json("/analyze", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["success"], true);
        // the quantity inside the specification (defaulted to 1) wins
        assert_eq!(payload["price_estimate"]["breakdown"]["quantity"], 1);
        assert_eq!(payload["analysis"], "Scripted reply.");
        assert_eq!(payload["similar_orders"].as_array().expect("array").len(), 2);
    }

    #[tokio::test]
    async fn analyze_honors_quantity_inside_the_specification() {
        let app = router(seeded_state());
        let body = json!({
            "tank_specifications": {
                "diameter_mm": 1000.0,
                "length_mm": 2000.0,
                "volume": 100.0,
                "material_grade": "standard",
                "quantity": 3
            },
            "quantity": 2
        });
        let response = app.oneshot(post_json("/analyze", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["price_estimate"]["breakdown"]["quantity"], 3);
    }

    #[tokio::test]
    async fn chat_failure_still_answers_200_with_error_payload() {
        let app = router(state_with_repository(Arc::new(FailingRepository)));
        let response = app
            .oneshot(post_json("/chat", json!({"message": "price?"})))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["success"], false);
        assert!(payload["error"].as_str().expect("error").contains("store unreachable"));
    }

    #[tokio::test]
    async fn recent_orders_context_lists_orders() {
        let app = router(seeded_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/context/recent-orders")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["success"], true);
        let orders = payload["orders"].as_array().expect("array");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0]["order_code"], "TK-0002");
    }

    #[tokio::test]
    async fn material_prices_context_returns_the_price_map() {
        let app = router(seeded_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/context/material-prices")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["prices"]["Sheet Steel_KG"], 3.5);
    }

    #[tokio::test]
    async fn context_failures_surface_as_500_with_detail() {
        let app = router(state_with_repository(Arc::new(FailingRepository)));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/context/recent-orders")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = body_json(response).await;
        assert!(payload["detail"].as_str().expect("detail").contains("store unreachable"));
    }

    #[tokio::test]
    async fn malformed_chat_body_is_rejected_at_the_boundary() {
        let app = router(seeded_state());
        let response =
            app.oneshot(post_json("/chat", json!({"session_id": "s-1"}))).await.expect("response");

        assert!(response.status().is_client_error());
    }
}
