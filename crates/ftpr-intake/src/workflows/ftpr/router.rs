use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::domain::{AccountId, CaseId, SubmissionForm, TenantId};
use super::repository::{AccountDirectory, CaseRepository};
use super::service::FtprIntakeService;
use crate::error::AppError;

/// Header carrying the authenticated account established by the session layer.
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// Router builder exposing HTTP endpoints for case intake.
pub fn intake_router<D, R>(service: Arc<FtprIntakeService<D, R>>) -> Router
where
    D: AccountDirectory + 'static,
    R: CaseRepository + 'static,
{
    Router::new()
        .route("/api/v1/ftpr/cases", post(submit_handler::<D, R>))
        .route("/api/v1/ftpr/cases/:case_id", get(status_handler::<D, R>))
        .route("/api/v1/ftpr/quote/:tenant_id", get(quote_handler::<D, R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<D, R>(
    State(service): State<Arc<FtprIntakeService<D, R>>>,
    headers: HeaderMap,
    axum::Json(form): axum::Json<SubmissionForm>,
) -> Result<Response, AppError>
where
    D: AccountDirectory + 'static,
    R: CaseRepository + 'static,
{
    let account_id = account_from_headers(&headers);
    let record = service.submit(account_id.as_ref(), form)?;
    Ok((StatusCode::CREATED, axum::Json(record.status_view())).into_response())
}

pub(crate) async fn status_handler<D, R>(
    State(service): State<Arc<FtprIntakeService<D, R>>>,
    headers: HeaderMap,
    Path(case_id): Path<String>,
) -> Result<Response, AppError>
where
    D: AccountDirectory + 'static,
    R: CaseRepository + 'static,
{
    let account_id = account_from_headers(&headers);
    let record = service.get(account_id.as_ref(), &CaseId(case_id))?;
    Ok((StatusCode::OK, axum::Json(record.status_view())).into_response())
}

pub(crate) async fn quote_handler<D, R>(
    State(service): State<Arc<FtprIntakeService<D, R>>>,
    headers: HeaderMap,
    Path(tenant_id): Path<String>,
) -> Result<Response, AppError>
where
    D: AccountDirectory + 'static,
    R: CaseRepository + 'static,
{
    let account_id = account_from_headers(&headers);
    let quote = service.quote(account_id.as_ref(), &TenantId(tenant_id))?;
    Ok((StatusCode::OK, axum::Json(quote)).into_response())
}

fn account_from_headers(headers: &HeaderMap) -> Option<AccountId> {
    headers
        .get(ACCOUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| AccountId(value.to_string()))
}
