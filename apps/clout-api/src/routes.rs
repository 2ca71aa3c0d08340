use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use clout_service::{
	CallerScope, CreateProfileRequest, Error, ProfileDetail, ProfileRecord, ScoreSummary,
	SearchRequest, SearchResponse,
};

use crate::state::AppState;

/// Identifies the caller whose searches feed the tag cache used on profile creation.
pub const SESSION_HEADER: &str = "x-clout-session";

#[derive(Debug, Serialize)]
pub struct CreatedProfile {
	pub influencer: ProfileRecord,
}

#[derive(Debug, Serialize)]
pub struct ResolvedProfile {
	pub influencer_id: i32,
}

#[derive(Debug, Serialize)]
pub struct DeletedProfile {
	pub deleted: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidFilter { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_FILTER", message),
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { message } => ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::Conflict { message } => ApiError::new(StatusCode::CONFLICT, "CONFLICT", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Catalog storage failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error_code: self.error_code, message: self.message }))
			.into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/influencers", post(create_profile))
		.route("/v1/influencers/search", get(search))
		.route("/v1/influencers/category/{category}", get(search_category))
		.route("/v1/influencers/id/{id}", get(get_profile))
		.route("/v1/influencers/external/{external_id}", get(resolve_profile_id))
		.route("/v1/influencers/{id}/scores", post(refresh_scores))
		.route("/v1/influencers/{id}", axum::routing::delete(delete_profile))
		.with_state(state)
}

fn caller_scope(headers: &HeaderMap) -> CallerScope {
	CallerScope::from_session(headers.get(SESSION_HEADER).and_then(|value| value.to_str().ok()))
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(req): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(&caller_scope(&headers), req).await?;

	Ok(Json(response))
}

async fn search_category(
	State(state): State<AppState>,
	Path(category): Path<String>,
	Query(req): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search_category(&category, req).await?;

	Ok(Json(response))
}

async fn create_profile(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<CreatedProfile>), ApiError> {
	let influencer = state.service.create_profile(&caller_scope(&headers), req).await?;

	Ok((StatusCode::CREATED, Json(CreatedProfile { influencer })))
}

async fn get_profile(
	State(state): State<AppState>,
	Path(id): Path<i32>,
) -> Result<Json<ProfileDetail>, ApiError> {
	Ok(Json(state.service.get_profile(id).await?))
}

async fn resolve_profile_id(
	State(state): State<AppState>,
	Path(external_id): Path<String>,
) -> Result<Json<ResolvedProfile>, ApiError> {
	let influencer_id = state.service.resolve_profile_id(&external_id).await?;

	Ok(Json(ResolvedProfile { influencer_id }))
}

async fn refresh_scores(
	State(state): State<AppState>,
	Path(id): Path<i32>,
) -> Result<Json<ScoreSummary>, ApiError> {
	Ok(Json(state.service.refresh_scores(id).await?))
}

async fn delete_profile(
	State(state): State<AppState>,
	Path(id): Path<i32>,
) -> Result<Json<DeletedProfile>, ApiError> {
	state.service.delete_profile(id).await?;

	Ok(Json(DeletedProfile { deleted: true }))
}
