// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTTP request handlers for the master web UI.
//!
//! Rendering is synchronous and may block on catalog locks or storage, so it
//! runs on tokio's blocking pool.

use crate::html::Html;
use crate::page::{landing_body, styled_page};
use crate::server::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html as HtmlBody, IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::error;

/// A render task that did not complete.
#[derive(Debug)]
pub struct RenderError(JoinError);

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("Render task failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Internal error while rendering page",
        )
            .into_response()
    }
}

async fn render_styled<F>(
    state: Arc<AppState>,
    title: &'static str,
    render: F,
) -> Result<Response, RenderError>
where
    F: FnOnce(&AppState) -> Html + Send + 'static,
{
    let body = tokio::task::spawn_blocking(move || render(&state))
        .await
        .map_err(RenderError)?;
    Ok(HtmlBody(styled_page(title, &body).into_string()).into_response())
}

/// GET /
pub async fn index() -> Response {
    HtmlBody(styled_page("Tabula Master", &landing_body()).into_string()).into_response()
}

/// GET /tablet-servers
pub async fn tablet_servers(State(state): State<Arc<AppState>>) -> Result<Response, RenderError> {
    render_styled(state, "Tablet Servers", |s| s.renderer.tablet_servers()).await
}

/// GET /tables
pub async fn tables(State(state): State<Arc<AppState>>) -> Result<Response, RenderError> {
    render_styled(state, "Tables", |s| s.renderer.tables()).await
}

/// GET /table?id=<table_id>
pub async fn table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, RenderError> {
    let Some(table_id) = params.get("id").cloned() else {
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Missing 'id' argument",
        )
            .into_response());
    };
    render_styled(state, "Table", move |s| s.renderer.table(&table_id)).await
}

/// GET /masters
pub async fn masters(State(state): State<Arc<AppState>>) -> Result<Response, RenderError> {
    render_styled(state, "Masters", |s| s.renderer.masters()).await
}

/// GET /dump-entities
pub async fn dump_entities(State(state): State<Arc<AppState>>) -> Result<Response, RenderError> {
    let json = tokio::task::spawn_blocking(move || state.exporter.dump_entities())
        .await
        .map_err(RenderError)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json,
    )
        .into_response())
}
