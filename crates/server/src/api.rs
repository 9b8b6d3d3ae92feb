//! JSON API routes.
//!
//! - `POST /api/recommendation` — rank the three cheapest viable bundles
//! - `GET  /api/coverage/{address_id}` — coverage record + available tech
//! - `GET  /api/install-slots/{address_id}?tech=` — open install slots
//! - `POST /api/checkout` — validated acknowledgement stub, no order logic

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

use bundly_core::config::AppConfig;
use bundly_core::domain::catalog::{HomePlan, MobilePlan, Technology, TvPlan};
use bundly_core::domain::coverage::InstallSlot;
use bundly_core::domain::household::HouseholdLine;
use bundly_core::domain::recommendation::RecommendationResult;
use bundly_core::engine;
use bundly_core::errors::{ApplicationError, InterfaceError};
use bundly_db::repositories::{
    CatalogRepository, CoverageRepository, HouseholdRepository, SqlCatalogRepository,
    SqlCoverageRepository, SqlHouseholdRepository,
};
use bundly_db::DbPool;

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub coverage: Arc<dyn CoverageRepository>,
    pub household: Arc<dyn HouseholdRepository>,
}

impl ApiState {
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            catalog: Arc::new(SqlCatalogRepository::new(pool.clone())),
            coverage: Arc::new(SqlCoverageRepository::new(pool.clone())),
            household: Arc::new(SqlHouseholdRepository::new(pool)),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: i64,
    pub address_id: String,
    /// Inline usage profile; when empty, the user's stored household is used.
    #[serde(default)]
    pub household: Vec<HouseholdLineDto>,
    /// Declared but not consulted by the algorithm; historical field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer_tech: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdLineDto {
    pub line_id: String,
    pub expected_gb: Decimal,
    pub expected_min: Decimal,
    #[serde(default)]
    pub tv_hd_hours: Decimal,
}

impl RecommendationRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();

        if self.address_id.trim().is_empty() {
            violations.push("address_id is required".to_string());
        }

        for (index, line) in self.household.iter().enumerate() {
            if line.line_id.trim().is_empty() {
                violations.push(format!("household[{index}].line_id is required"));
            }
            if line.expected_gb < Decimal::ZERO {
                violations.push(format!("household[{index}].expected_gb must be at least 0"));
            }
            if line.expected_min < Decimal::ZERO {
                violations.push(format!("household[{index}].expected_min must be at least 0"));
            }
            if line.tv_hd_hours < Decimal::ZERO {
                violations.push(format!("household[{index}].tv_hd_hours must be at least 0"));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub top3: Vec<RecommendationCandidateDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationCandidateDto {
    pub combo_label: String,
    pub items: RecommendationItemsDto,
    pub monthly_total: Decimal,
    pub savings: Decimal,
    pub reasoning: String,
    pub discounts: RecommendationDiscountsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItemsDto {
    pub mobile: Vec<MobileAssignmentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<HomePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tv: Option<TvPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileAssignmentDto {
    pub line_id: String,
    pub plan: MobilePlan,
    pub line_cost: Decimal,
    pub overage_gb: Decimal,
    pub overage_min: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationDiscountsDto {
    pub line_discount: Decimal,
    pub bundle_discount: Decimal,
    pub total_discount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CoverageInfoResponse {
    pub address_id: String,
    pub city: String,
    pub district: String,
    pub fiber: bool,
    pub vdsl: bool,
    pub fwa: bool,
    pub available_tech: Vec<Technology>,
}

#[derive(Debug, Serialize)]
pub struct InstallSlotsResponse {
    pub address_id: String,
    pub tech: Technology,
    pub slots: Vec<InstallSlot>,
}

#[derive(Debug, Deserialize)]
pub struct InstallSlotsQuery {
    pub tech: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: i64,
    pub selected_combo: RecommendationCandidateDto,
    pub slot_id: i64,
    pub address_id: String,
}

impl CheckoutRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();

        if self.address_id.trim().is_empty() {
            violations.push("address_id is required".to_string());
        }
        if self.slot_id <= 0 {
            violations.push("slot_id is required".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub status: String,
    pub order_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(db_pool: DbPool, config: &AppConfig) -> Router {
    api_routes(ApiState::from_pool(db_pool)).layer(cors_layer(config))
}

pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/api/recommendation", post(post_recommendation))
        .route("/api/checkout", post(post_checkout))
        .route("/api/coverage/{address_id}", get(get_coverage))
        .route("/api/install-slots/{address_id}", get(get_install_slots))
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn post_recommendation(
    State(state): State<ApiState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    if let Err(violations) = request.validate() {
        return Err(validation_failed(violations));
    }

    let correlation_id = Uuid::new_v4().to_string();

    let coverage = state
        .coverage
        .coverage_for_address(&request.address_id)
        .await
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    let lines: Vec<HouseholdLine> = if request.household.is_empty() {
        state
            .household
            .lines_for_user(request.user_id)
            .await
            .map_err(|error| application_error(error.into(), &correlation_id))?
    } else {
        request
            .household
            .iter()
            .map(|line| HouseholdLine {
                line_id: line.line_id.clone(),
                expected_gb: line.expected_gb,
                expected_min: line.expected_min,
                tv_hd_hours: line.tv_hd_hours,
            })
            .collect()
    };

    let catalog = state
        .catalog
        .load_catalog()
        .await
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    let result = engine::recommend(&catalog, &coverage, &lines)
        .map_err(|error| application_error(ApplicationError::from(error), &correlation_id))?;

    info!(
        event_name = "api.recommendation.completed",
        correlation_id = %correlation_id,
        address_id = %request.address_id,
        line_count = lines.len(),
        candidate_count = result.candidates.len(),
        "recommendation computed"
    );

    Ok(Json(to_response(result)))
}

async fn get_coverage(
    State(state): State<ApiState>,
    Path(address_id): Path<String>,
) -> Result<Json<CoverageInfoResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let coverage = state
        .coverage
        .coverage_for_address(&address_id)
        .await
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    let available_tech = engine::coverage::available_technologies(&coverage);

    Ok(Json(CoverageInfoResponse {
        address_id: coverage.address_id,
        city: coverage.city,
        district: coverage.district,
        fiber: coverage.fiber,
        vdsl: coverage.vdsl,
        fwa: coverage.fwa,
        available_tech,
    }))
}

async fn get_install_slots(
    State(state): State<ApiState>,
    Path(address_id): Path<String>,
    Query(query): Query<InstallSlotsQuery>,
) -> Result<Json<InstallSlotsResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let tech = match query.tech.as_deref() {
        None | Some("") => Technology::Fiber,
        Some(raw) => raw.parse::<Technology>().map_err(|error| {
            validation_failed(vec![error.to_string()])
        })?,
    };

    let slots = state
        .coverage
        .available_slots(&address_id, tech)
        .await
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    Ok(Json(InstallSlotsResponse { address_id, tech, slots }))
}

async fn post_checkout(
    State(state): State<ApiState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    if let Err(violations) = request.validate() {
        return Err(validation_failed(violations));
    }

    let correlation_id = Uuid::new_v4().to_string();

    // The address must at least exist before acknowledging; order creation
    // itself is out of scope and stubbed.
    state
        .coverage
        .coverage_for_address(&request.address_id)
        .await
        .map_err(|error| application_error(error.into(), &correlation_id))?;

    let order_id = format!("ORD-{}", Uuid::new_v4().simple());
    info!(
        event_name = "api.checkout.accepted",
        correlation_id = %correlation_id,
        user_id = request.user_id,
        order_id = %order_id,
        "checkout acknowledged"
    );

    Ok(Json(CheckoutResponse { status: "success".to_string(), order_id }))
}

// ---------------------------------------------------------------------------
// Conversions and error mapping
// ---------------------------------------------------------------------------

fn to_response(result: RecommendationResult) -> RecommendationResponse {
    let top3 = result
        .candidates
        .into_iter()
        .map(|priced| RecommendationCandidateDto {
            combo_label: priced.candidate.label,
            items: RecommendationItemsDto {
                mobile: priced
                    .line_assignments
                    .into_iter()
                    .map(|assignment| MobileAssignmentDto {
                        line_id: assignment.line.line_id,
                        plan: assignment.plan,
                        line_cost: assignment.line_cost,
                        overage_gb: assignment.overage_gb,
                        overage_min: assignment.overage_min,
                    })
                    .collect(),
                home: priced.candidate.home_plan,
                tv: priced.candidate.tv_plan,
            },
            monthly_total: priced.grand_total,
            savings: priced.total_savings,
            reasoning: priced.reasoning,
            discounts: RecommendationDiscountsDto {
                line_discount: priced.line_discount,
                bundle_discount: priced.bundle_discount,
                total_discount: priced.total_savings,
            },
        })
        .collect();

    RecommendationResponse { top3 }
}

fn validation_failed(violations: Vec<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: ErrorDetail {
                code: "VALIDATION_FAILED".to_string(),
                message: "Request validation failed".to_string(),
                details: Some(violations),
            },
        }),
    )
}

fn application_error(error: ApplicationError, correlation_id: &str) -> ApiError {
    let interface = error.into_interface(correlation_id);
    let (status, code) = match &interface {
        InterfaceError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        InterfaceError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        InterfaceError::ServiceUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
        }
        InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    warn!(
        event_name = "api.request.failed",
        correlation_id = %correlation_id,
        error = %interface,
        "request failed"
    );

    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: interface.user_message().to_string(),
                details: Some(vec![interface.to_string()]),
            },
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use bundly_core::domain::catalog::{Catalog, HomePlan, MobilePlan, Technology, TvPlan};
    use bundly_core::domain::coverage::Coverage;
    use bundly_core::domain::household::{HouseholdLine, User};
    use bundly_db::repositories::{
        InMemoryCatalogRepository, InMemoryCoverageRepository, InMemoryHouseholdRepository,
    };

    use super::{api_routes, ApiState, ErrorResponse, RecommendationResponse};

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal literal")
    }

    fn catalog() -> Catalog {
        Catalog {
            mobile_plans: vec![
                MobilePlan {
                    plan_id: 1,
                    plan_name: "Basic 5GB".to_string(),
                    quota_gb: dec("5"),
                    quota_min: dec("300"),
                    monthly_price: dec("49.90"),
                    overage_gb: dec("2.00"),
                    overage_min: dec("0.50"),
                },
                MobilePlan {
                    plan_id: 2,
                    plan_name: "Standard 10GB".to_string(),
                    quota_gb: dec("10"),
                    quota_min: dec("500"),
                    monthly_price: dec("79.90"),
                    overage_gb: dec("1.50"),
                    overage_min: dec("0.30"),
                },
            ],
            home_plans: vec![HomePlan {
                home_id: 1,
                name: "Fiber 50".to_string(),
                tech: Technology::Fiber,
                down_mbps: 50,
                monthly_price: dec("89.90"),
                install_fee: dec("0.00"),
            }],
            tv_plans: vec![TvPlan {
                tv_id: 1,
                name: "Basic TV".to_string(),
                hd_hours_included: dec("50"),
                monthly_price: dec("29.90"),
            }],
            bundling_rules: Vec::new(),
        }
    }

    fn state() -> ApiState {
        let coverage = Coverage {
            address_id: "ADDR-001".to_string(),
            city: "Istanbul".to_string(),
            district: "Kadikoy".to_string(),
            fiber: true,
            vdsl: true,
            fwa: false,
        };
        let user = User {
            user_id: 1,
            name: "Demo Household".to_string(),
            address_id: "ADDR-001".to_string(),
            current_bundle_label: None,
            created_at: chrono::Utc::now(),
        };
        let stored_lines = HashMap::from([(
            1,
            vec![HouseholdLine {
                line_id: "LINE-001".to_string(),
                expected_gb: dec("3"),
                expected_min: dec("200"),
                tv_hd_hours: dec("20"),
            }],
        )]);

        ApiState {
            catalog: Arc::new(InMemoryCatalogRepository::new(catalog())),
            coverage: Arc::new(InMemoryCoverageRepository::new(vec![coverage], Vec::new())),
            household: Arc::new(InMemoryHouseholdRepository::new(vec![user], stored_lines)),
        }
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn response_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn recommendation_returns_ranked_bundles() {
        let app = api_routes(state());

        let body = serde_json::json!({
            "user_id": 1,
            "address_id": "ADDR-001",
            "household": [
                {"line_id": "LINE-001", "expected_gb": "3", "expected_min": "200", "tv_hd_hours": "20"}
            ]
        });
        let response =
            app.oneshot(json_request("/api/recommendation", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: RecommendationResponse = response_json(response).await;

        assert_eq!(payload.top3.len(), 3);
        assert_eq!(payload.top3[0].combo_label, "Mobile Only");
        assert_eq!(payload.top3[0].monthly_total, dec("49.90"));

        let bundle = payload
            .top3
            .iter()
            .find(|candidate| candidate.combo_label == "Mobile + Fiber 50")
            .expect("mobile + home candidate");
        assert_eq!(bundle.monthly_total, dec("125.82"));
        assert_eq!(bundle.savings, dec("13.98"));
        assert_eq!(bundle.discounts.bundle_discount, dec("13.98"));
        assert_eq!(bundle.discounts.line_discount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn empty_household_falls_back_to_stored_lines() {
        let app = api_routes(state());

        let body = serde_json::json!({"user_id": 1, "address_id": "ADDR-001", "household": []});
        let response =
            app.oneshot(json_request("/api/recommendation", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: RecommendationResponse = response_json(response).await;
        assert_eq!(payload.top3[0].items.mobile[0].line_id, "LINE-001");
    }

    #[tokio::test]
    async fn unknown_address_maps_to_not_found() {
        let app = api_routes(state());

        let body = serde_json::json!({
            "user_id": 1,
            "address_id": "ADDR-404",
            "household": [
                {"line_id": "LINE-001", "expected_gb": "3", "expected_min": "200"}
            ]
        });
        let response =
            app.oneshot(json_request("/api/recommendation", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload: ErrorResponse = response_json(response).await;
        assert_eq!(payload.error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn negative_usage_fails_validation() {
        let app = api_routes(state());

        let body = serde_json::json!({
            "user_id": 1,
            "address_id": "ADDR-001",
            "household": [
                {"line_id": "LINE-001", "expected_gb": "-1", "expected_min": "200"}
            ]
        });
        let response =
            app.oneshot(json_request("/api/recommendation", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = response_json(response).await;
        assert_eq!(payload.error.code, "VALIDATION_FAILED");
        assert!(payload
            .error
            .details
            .expect("details")
            .iter()
            .any(|detail| detail.contains("expected_gb")));
    }

    #[tokio::test]
    async fn coverage_endpoint_lists_available_tech_in_priority_order() {
        let app = api_routes(state());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/coverage/ADDR-001")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: serde_json::Value = response_json(response).await;
        assert_eq!(payload["available_tech"], serde_json::json!(["fiber", "vdsl"]));
    }

    #[tokio::test]
    async fn install_slots_reject_unknown_tech() {
        let app = api_routes(state());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/install-slots/ADDR-001?tech=cable")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn checkout_acknowledges_a_valid_request() {
        let app = api_routes(state());

        let recommendation = {
            let body = serde_json::json!({
                "user_id": 1,
                "address_id": "ADDR-001",
                "household": [
                    {"line_id": "LINE-001", "expected_gb": "3", "expected_min": "200"}
                ]
            });
            let response = api_routes(state())
                .oneshot(json_request("/api/recommendation", body))
                .await
                .expect("response");
            let payload: RecommendationResponse = response_json(response).await;
            payload.top3.into_iter().next().expect("candidate")
        };

        let body = serde_json::json!({
            "user_id": 1,
            "selected_combo": recommendation,
            "slot_id": 1,
            "address_id": "ADDR-001"
        });
        let response = app.oneshot(json_request("/api/checkout", body)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload: super::CheckoutResponse = response_json(response).await;
        assert_eq!(payload.status, "success");
        assert!(payload.order_id.starts_with("ORD-"));
    }
}
