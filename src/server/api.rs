use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::data::tables::TableSummary;
use crate::ingest::IngestError;
use crate::query::views::{AttributesView, FullView, ModulesView, SkillsView, SummaryView};
use crate::query::{search, search_resolved, CalcParams, FacetQuery, QueryError};
use crate::server::AppState;

/// Query-string parameters shared by the operator endpoints. `tag` is a
/// comma-separated list; every tag must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorParams {
    pub char_id: Option<String>,
    pub name: Option<String>,
    pub profession: Option<String>,
    pub sub_profession: Option<String>,
    pub rarity: Option<i64>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub nation: Option<String>,
    pub gender: Option<String>,
    pub birth_place: Option<String>,
    pub race: Option<String>,
    pub obtain_approach: Option<String>,
    pub elite: Option<i64>,
    pub level: Option<i64>,
    pub trust: Option<i64>,
    pub potential: Option<i64>,
}

impl OperatorParams {
    pub fn facets(&self) -> FacetQuery {
        let tags = self
            .tag
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        FacetQuery {
            char_id: self.char_id.clone(),
            name: self.name.clone(),
            profession: self.profession.clone(),
            sub_profession: self.sub_profession.clone(),
            rarity: self.rarity,
            position: self.position.clone(),
            tags,
            nation: self.nation.clone(),
            gender: self.gender.clone(),
            birth_place: self.birth_place.clone(),
            race: self.race.clone(),
            obtain_approach: self.obtain_approach.clone(),
        }
    }

    pub fn calc(&self) -> CalcParams {
        CalcParams {
            elite: self.elite,
            level: self.level,
            trust: self.trust,
            potential: self.potential,
        }
    }
}

/// `Query<OperatorParams>` whose parse failures use the JSON error body.
#[derive(Debug, FromRequestParts)]
#[from_request(rejection(ApiError))]
pub struct OperatorQuery(#[from_request(via(Query))] pub OperatorParams);

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Query(QueryError),
    Ingest(IngestError),
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Query(QueryError::UnknownCharacter(id)) => {
                (StatusCode::NOT_FOUND, format!("unknown character id '{id}'"))
            }
            Self::Query(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Ingest(err) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        warn!(code = status.as_u16(), %message, "request failed");
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.repo.current();
    Json(json!({
        "status": "ok",
        "service": "opdex",
        "version": env!("CARGO_PKG_VERSION"),
        "generation": snapshot.generation,
        "characters": snapshot.len(),
    }))
}

pub async fn operators(
    State(state): State<AppState>,
    OperatorQuery(params): OperatorQuery,
) -> Result<Response, ApiError> {
    let snapshot = state.repo.current();
    let hits = search_resolved(&snapshot, &params.facets(), &params.calc())?;
    let views: Vec<FullView> = hits.iter().map(FullView::from).collect();
    Ok(Json(views).into_response())
}

pub async fn operators_basic(
    State(state): State<AppState>,
    OperatorQuery(params): OperatorQuery,
) -> Result<Response, ApiError> {
    let snapshot = state.repo.current();
    let records = search(&snapshot, &params.facets(), &CalcParams::default())?;
    let views: Vec<SummaryView> = records
        .iter()
        .map(|record| SummaryView::from(&**record))
        .collect();
    Ok(Json(views).into_response())
}

pub async fn operators_attributes(
    State(state): State<AppState>,
    OperatorQuery(params): OperatorQuery,
) -> Result<Response, ApiError> {
    let snapshot = state.repo.current();
    let hits = search_resolved(&snapshot, &params.facets(), &params.calc())?;
    let views: Vec<AttributesView> = hits.iter().map(AttributesView::from).collect();
    Ok(Json(views).into_response())
}

pub async fn operators_skills(
    State(state): State<AppState>,
    OperatorQuery(params): OperatorQuery,
) -> Result<Response, ApiError> {
    let snapshot = state.repo.current();
    let records = search(&snapshot, &params.facets(), &CalcParams::default())?;
    let views: Vec<SkillsView> = records.iter().map(|record| SkillsView::from(&**record)).collect();
    Ok(Json(views).into_response())
}

pub async fn operators_modules(
    State(state): State<AppState>,
    OperatorQuery(params): OperatorQuery,
) -> Result<Response, ApiError> {
    let snapshot = state.repo.current();
    let records = search(&snapshot, &params.facets(), &CalcParams::default())?;
    let views: Vec<ModulesView> = records
        .iter()
        .map(|record| ModulesView::from(&**record))
        .collect();
    Ok(Json(views).into_response())
}

#[derive(Debug, Clone, Serialize)]
pub struct DataVersionResponse {
    pub generation: u64,
    pub loaded_at: String,
    pub source: String,
    pub characters: usize,
    pub tables: Vec<TableSummary>,
}

pub async fn data_version(State(state): State<AppState>) -> Json<DataVersionResponse> {
    let snapshot = state.repo.current();
    Json(DataVersionResponse {
        generation: snapshot.generation,
        loaded_at: snapshot.loaded_at.to_rfc3339(),
        source: snapshot.provenance.source.clone(),
        characters: snapshot.len(),
        tables: snapshot.provenance.tables.clone(),
    })
}

pub async fn reload(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = state
        .reload()
        .await
        .map_err(|err| ApiError::Internal(format!("reload task failed: {err}")))?
        .map_err(ApiError::Ingest)?;
    Ok(Json(json!({
        "status": "ok",
        "generation": outcome.generation,
        "characters": outcome.characters,
        "warnings": outcome.warnings,
        "diagnostics": outcome.report.diagnostics,
    }))
    .into_response())
}
