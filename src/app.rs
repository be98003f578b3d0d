use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::chart::{ChartOptions, render_bar_chart};
use crate::export;
use crate::loader::{ColumnSelector, extract_citations, table_from_bytes};
use crate::metrics::Analysis;

/// Shared state: the most recent analysis, replaced on every upload
///
/// The calculator itself is stateless; this is purely the web layer
/// remembering what to chart and export between requests.
pub struct AppState {
    analysis: Mutex<Option<Analysis>>,
}

#[derive(Deserialize)]
struct ExportQuery {
    format: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// Start the web server
///
/// Builds the router, binds the listener and serves until shutdown.
///
/// # Arguments
/// * `addr` - Socket address to bind, e.g. "127.0.0.1:3000"
pub async fn run(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState {
        analysis: Mutex::new(None),
    });

    let app = Router::new()
        .route("/", get(serve_index))
        .route("/api/upload", post(upload))
        .route("/api/results", get(get_results))
        .route("/api/chart.png", get(download_chart))
        .route("/api/export", get(download_export))
        .with_state(app_state);

    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", addr);
    println!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

/// Handle a citation file upload
///
/// Expects multipart form data with a `file` field (CSV or XLSX) and an
/// optional `column` field: digits select a column by position, anything
/// else by header name, and when absent the documented default of column
/// index 12 applies. On success the analysis replaces whatever the
/// previous upload produced.
async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut file_data = Vec::new();
    let mut filename = String::new();
    let mut column_arg: Option<String> = None;

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                filename = field.file_name().unwrap_or("upload.csv").to_string();
                file_data = field.bytes().await.unwrap_or_default().to_vec();
            }
            "column" => {
                if let Ok(value) = field.text().await {
                    if !value.trim().is_empty() {
                        column_arg = Some(value);
                    }
                }
            }
            _ => {}
        }
    }

    if file_data.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No file data received");
    }

    let table = match table_from_bytes(&filename, &file_data) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("failed to parse upload {}: {}", filename, e);
            return error_json(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Failed to read {}: {}", filename, e),
            );
        }
    };

    let selector = column_arg
        .as_deref()
        .map(ColumnSelector::parse)
        .unwrap_or_default();

    let citations = match extract_citations(&table, &selector) {
        Ok(citations) => citations,
        Err(e) => {
            log::warn!("failed to extract citations from {}: {}", filename, e);
            return error_json(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    let analysis = match Analysis::new(
        filename.clone(),
        table.headers.clone(),
        table.preview(5),
        citations,
    ) {
        Ok(analysis) => analysis,
        Err(e) => return error_json(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };

    log::info!(
        "analysed {}: {} papers, h-index {}, i10-index {}",
        filename,
        analysis.summary.papers,
        analysis.summary.h_index,
        analysis.summary.i10_index
    );

    let payload = serde_json::json!({
        "status": "ok",
        "filename": analysis.filename,
        "h_index": analysis.summary.h_index,
        "i10_index": analysis.summary.i10_index,
        "papers": analysis.summary.papers,
        "total_citations": analysis.summary.total_citations,
        "headers": analysis.headers,
        "preview": analysis.preview,
    });

    let mut current = state.analysis.lock().unwrap();
    *current = Some(analysis);

    Json(payload).into_response()
}

/// Return the most recent analysis as JSON
async fn get_results(State(state): State<Arc<AppState>>) -> Response {
    let analysis = state.analysis.lock().unwrap();

    match analysis.as_ref() {
        Some(analysis) => Json(serde_json::json!({
            "status": "ok",
            "filename": analysis.filename,
            "summary": analysis.summary,
            "citations": analysis.citations,
        }))
        .into_response(),
        None => error_json(StatusCode::NOT_FOUND, "No file uploaded yet"),
    }
}

/// Serve the citation distribution chart as a PNG download
async fn download_chart(State(state): State<Arc<AppState>>) -> Response {
    let citations = {
        let analysis = state.analysis.lock().unwrap();
        match analysis.as_ref() {
            Some(analysis) => analysis.citations.clone(),
            None => return error_json(StatusCode::NOT_FOUND, "No file uploaded yet"),
        }
    };

    match render_bar_chart(&citations, &ChartOptions::default()) {
        Ok(png_data) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .header(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"citations_plot.png\"",
            )
            .body(axum::body::Body::from(Bytes::from(png_data)))
            .unwrap(),
        Err(e) => {
            log::warn!("failed to render chart: {}", e);
            error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Serve the analysed data plus indices as a CSV or XLSX download
async fn download_export(
    Query(params): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let analysis = {
        let guard = state.analysis.lock().unwrap();
        match guard.as_ref() {
            Some(analysis) => analysis.clone(),
            None => return error_json(StatusCode::NOT_FOUND, "No file uploaded yet"),
        }
    };

    let stem = Path::new(&analysis.filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("citations")
        .to_string();

    match params.format.as_deref().unwrap_or("csv") {
        "csv" => match export::to_csv(&analysis) {
            Ok(csv) => attachment_response(
                "text/csv",
                &format!("{}_metrics.csv", stem),
                csv.into_bytes(),
            ),
            Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        },
        "xlsx" => match export::to_xlsx(&analysis) {
            Ok(bytes) => attachment_response(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                &format!("{}_metrics.xlsx", stem),
                bytes,
            ),
            Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        },
        other => error_json(
            StatusCode::BAD_REQUEST,
            format!("Unsupported export format: {}", other),
        ),
    }
}

fn attachment_response(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(axum::body::Body::from(Bytes::from(body)))
        .unwrap()
}
