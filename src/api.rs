// FamilyBook - REST API with Axum
//
// Handlers live in the library so tests can drive the router directly;
// bin/server.rs only wires config, logging and the listener.

use crate::chain::ChainLink;
use crate::error::FamilyError;
use crate::member::{Member, MemberAttributes};
use crate::network::{FamilyNetwork, NetworkSummary};
use crate::relationship::RelationshipType;
use crate::service::FamilyService;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FamilyService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<FamilyService>) -> Self {
        AppState {
            service,
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Envelope & errors
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Handler error, mapped onto HTTP status codes
#[derive(Debug)]
pub enum ApiError {
    Family(FamilyError),
    /// Request body was missing, not JSON, or the wrong shape
    BadRequest(String),
}

impl From<FamilyError> for ApiError {
    fn from(e: FamilyError) -> Self {
        ApiError::Family(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Family(e) => {
                let status = match &e {
                    FamilyError::NetworkNotFound(_) | FamilyError::MemberNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    FamilyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    other => {
                        error!(error = %other, "request failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// `Json` body extractor whose rejections use the API envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFamilyRequest {
    pub family_name: String,
    pub creator_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[serde(flatten)]
    pub attributes: MemberAttributes,

    /// Optionally relate the new member to an existing one in the same write
    #[serde(default)]
    pub related_member_id: Option<String>,
    #[serde(default)]
    pub relationship_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRelationshipRequest {
    pub from_member_id: String,
    pub to_member_id: String,
    pub relationship_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipResponse {
    pub from_member_id: String,
    pub to_member_id: String,
    pub relationship_type: String,
    pub reciprocal_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<ChainLink>,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    pub features: Vec<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/info - System info
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "FamilyBook - Family Network Platform".to_string(),
        version: crate::VERSION.to_string(),
        features: vec![
            "Family Management".to_string(),
            "Relationship Mapping".to_string(),
            "Relationship Chains".to_string(),
        ],
    })
}

/// GET /api/family - List networks
async fn list_families(State(state): State<AppState>) -> ApiResult<Vec<NetworkSummary>> {
    let networks = state.service.list_networks()?;
    Ok(Json(ApiResponse::ok(networks)))
}

/// POST /api/family - Create a network with its creator as first member
async fn create_family(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFamilyRequest>,
) -> ApiResult<FamilyNetwork> {
    let network = state.service.create_network(
        &request.family_name,
        &request.creator_name,
        request.description,
    )?;
    Ok(Json(ApiResponse::ok(network)))
}

/// GET /api/family/:id - Full network snapshot
async fn get_family(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
) -> ApiResult<FamilyNetwork> {
    let network = state.service.get_network(&family_id)?;
    Ok(Json(ApiResponse::ok(network)))
}

/// POST /api/family/:id/member - Add a member (optionally already related)
async fn add_member(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
    ApiJson(request): ApiJson<AddMemberRequest>,
) -> ApiResult<Member> {
    let related = request
        .related_member_id
        .filter(|id| !id.is_empty())
        .zip(request.relationship_type.filter(|t| !t.trim().is_empty()));

    let member = match related {
        Some((related_id, kind)) => state.service.add_related_member(
            &family_id,
            request.attributes,
            &related_id,
            RelationshipType::parse(&kind),
        )?,
        None => state.service.add_member(&family_id, request.attributes)?,
    };

    Ok(Json(ApiResponse::ok(member)))
}

/// POST /api/family/:id/relationship - Record a reciprocal relationship
async fn add_relationship(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
    ApiJson(request): ApiJson<AddRelationshipRequest>,
) -> ApiResult<RelationshipResponse> {
    let kind = RelationshipType::parse(&request.relationship_type);
    let reciprocal = kind.reciprocal();

    state.service.add_relationship(
        &family_id,
        &request.from_member_id,
        &request.to_member_id,
        kind.clone(),
    )?;

    Ok(Json(ApiResponse::ok(RelationshipResponse {
        from_member_id: request.from_member_id,
        to_member_id: request.to_member_id,
        relationship_type: kind.to_string(),
        reciprocal_type: reciprocal.to_string(),
    })))
}

/// GET /api/family/:id/relationship-chain/:from/:to - Shortest chain
async fn relationship_chain(
    State(state): State<AppState>,
    Path((family_id, from_id, to_id)): Path<(String, String, String)>,
) -> ApiResult<ChainResponse> {
    let chain = state
        .service
        .find_relationship_chain(&family_id, &from_id, &to_id)?;

    Ok(Json(ApiResponse::ok(ChainResponse {
        chain: chain.chain,
        summary: chain.summary,
    })))
}

// ============================================================================
// Router
// ============================================================================

/// Build the `/api` routes
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(info))
        .route("/family", get(list_families).post(create_family))
        .route("/family/:id", get(get_family))
        .route("/family/:id/member", post(add_member))
        .route("/family/:id/relationship", post(add_relationship))
        .route(
            "/family/:id/relationship-chain/:from/:to",
            get(relationship_chain),
        )
        .with_state(state)
}

/// Full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state))
        .layer(CorsLayer::permissive())
}
