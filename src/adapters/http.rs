//! companies resource 的 HTTP 介面
//!
//! - `GET  /companies/`      列出所有公司
//! - `POST /companies/`      新增公司（JSON、urlencoded 或 multipart form）
//! - `GET  /companies/{id}/` 取得單一公司
//! - `GET  /health`

use crate::core::registry::CompanyRegistry;
use crate::domain::model::{Company, CompanyInput};
use crate::utils::error::CoronaError;
use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CompanyRegistry>,
}

pub fn build_router(registry: Arc<CompanyRegistry>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/", get(list_companies).post(create_company))
        .route("/companies/:id", get(retrieve_company))
        .route("/companies/:id/", get(retrieve_company))
        .with_state(AppState { registry })
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_companies(State(state): State<AppState>) -> Json<Vec<Company>> {
    Json(state.registry.list().await)
}

async fn create_company(
    State(state): State<AppState>,
    CompanyPayload(input): CompanyPayload,
) -> Result<(StatusCode, Json<Company>), CoronaError> {
    let company = state.registry.create(input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

async fn retrieve_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Company>, CoronaError> {
    let id: u64 = id.parse().map_err(|_| CoronaError::NotFound)?;
    state
        .registry
        .get(id)
        .await
        .map(Json)
        .ok_or(CoronaError::NotFound)
}

/// 依 Content-Type 解析 JSON、urlencoded 或 multipart form 的新增請求
///
/// 沒有 Content-Type 且沒有內容的請求視為空白表單。
pub struct CompanyPayload(pub CompanyInput);

#[async_trait]
impl<S> FromRequest<S> for CompanyPayload
where
    S: Send + Sync,
{
    type Rejection = CoronaError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // 比對用小寫，錯誤訊息保留原始值（boundary 區分大小寫）
        let media_type = content_type.as_deref().map(str::to_ascii_lowercase);

        match media_type.as_deref() {
            Some(ct) if ct.starts_with("application/json") => {
                let Json(input) = Json::<CompanyInput>::from_request(req, state)
                    .await
                    .map_err(|rejection| CoronaError::MalformedRequest {
                        message: format!("JSON parse error - {}", rejection.body_text()),
                    })?;
                Ok(Self(input))
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(input) = Form::<CompanyInput>::from_request(req, state)
                    .await
                    .map_err(|rejection| CoronaError::MalformedRequest {
                        message: rejection.body_text(),
                    })?;
                Ok(Self(input))
            }
            Some(ct) if ct.starts_with("multipart/form-data") => {
                read_multipart(req, state).await.map(Self)
            }
            Some(_) => Err(CoronaError::UnsupportedMediaType {
                content_type: content_type.unwrap_or_default(),
            }),
            None => {
                let body = read_body(req, state).await?;
                if body.is_empty() {
                    Ok(Self(CompanyInput::default()))
                } else {
                    Err(CoronaError::UnsupportedMediaType {
                        content_type: String::new(),
                    })
                }
            }
        }
    }
}

async fn read_body<S: Send + Sync>(req: Request, state: &S) -> Result<Bytes, CoronaError> {
    Bytes::from_request(req, state)
        .await
        .map_err(|rejection| CoronaError::MalformedRequest {
            message: rejection.body_text(),
        })
}

/// multipart 表單只讀取已知的文字欄位，重複欄位以最後一個為準；
/// 沒有內容的請求視為空白表單
async fn read_multipart<S: Send + Sync>(
    req: Request,
    state: &S,
) -> Result<CompanyInput, CoronaError> {
    let headers = req.headers().clone();
    let body = read_body(req, state).await?;
    if body.is_empty() {
        return Ok(CompanyInput::default());
    }

    let mut rebuilt = Request::new(Body::from(body));
    *rebuilt.headers_mut() = headers;

    let malformed = |message: String| CoronaError::MalformedRequest {
        message: format!("Multipart form parse error - {}", message),
    };
    let mut multipart = Multipart::from_request(rebuilt, state)
        .await
        .map_err(|rejection| malformed(rejection.body_text()))?;

    let mut input = CompanyInput::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(e.body_text()))?
    {
        let slot = match field.name() {
            Some("name") => &mut input.name,
            Some("status") => &mut input.status,
            Some("application_link") => &mut input.application_link,
            Some("notes") => &mut input.notes,
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(|e| malformed(e.body_text()))?);
    }

    Ok(input)
}

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "detail": message }))).into_response()
}

impl IntoResponse for CoronaError {
    fn into_response(self) -> Response {
        match self {
            CoronaError::Validation(errors) => {
                tracing::debug!("Validation failed: {}", errors);
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            CoronaError::MalformedRequest { message } => detail(StatusCode::BAD_REQUEST, message),
            e @ CoronaError::UnsupportedMediaType { .. } => {
                detail(StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
            }
            e @ CoronaError::NotFound => detail(StatusCode::NOT_FOUND, e.to_string()),
            e => {
                tracing::error!("❌ Request failed: {}", e);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        }
    }
}
