pub(crate) use crate::error::PlaceholderError;
pub(crate) use crate::web::AppState;
pub(crate) use axum::Json;
pub(crate) use axum::extract::rejection::QueryRejection;
pub(crate) use axum::extract::{Query, State};
pub(crate) use axum::http::{StatusCode, header::CONTENT_TYPE};
pub(crate) use axum::response::{IntoResponse, Response};
pub(crate) use serde::Serialize;
pub(crate) use tracing::{error, info};
