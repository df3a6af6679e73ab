//! xml2xlsx API - HTTP endpoint that converts XML table exports to XLSX workbooks.
//!
//! XML can arrive as a JSON body (`xml_content` or `xml` field), an urlencoded form with
//! the same field names, a raw `text/xml`/`application/xml` body, or a query parameter.
//! Successful conversions return the workbook base64-encoded in a JSON envelope.

use axum::{
    body::Bytes,
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use xml2xlsx::conversion::{convert_bytes, ConversionOptions};
use xml2xlsx::workbook::workbook_to_bytes;

#[derive(Debug, Default, Deserialize)]
struct XmlParams {
    xml_content: Option<String>,
    xml: Option<String>,
}

#[derive(Serialize)]
struct ConvertResponse {
    success: bool,
    message: String,
    processing_notes: String,
    records_count: usize,
    excel_file: String,
    filename: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = Router::new()
        .route("/", get(home))
        .route("/api/convert", post(convert))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("XML to XLSX converter API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind server port");
    axum::serve(listener, app).await.expect("server error");
}

async fn convert(
    Query(params): Query<XmlParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(xml) = xml_from_request(&headers, &params, &body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No XML content provided. Send XML data in a JSON body, form data, \
                        raw body, or query parameter."
                    .to_string(),
            }),
        )
            .into_response();
    };

    let conversion = match convert_bytes(&xml, &ConversionOptions::default()) {
        Ok(conversion) => conversion,
        Err(e) => {
            tracing::warn!("conversion rejected: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    match workbook_to_bytes(&conversion, None) {
        Ok(bytes) => {
            tracing::info!(
                records = conversion.record_count,
                pivoted = conversion.was_pivoted(),
                "conversion succeeded"
            );
            (
                StatusCode::OK,
                Json(ConvertResponse {
                    success: true,
                    message: conversion.parse_message.clone(),
                    processing_notes: conversion.reshape_message.clone(),
                    records_count: conversion.record_count,
                    excel_file: BASE64.encode(&bytes),
                    filename: "converted_data.xlsx".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("workbook serialization failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Conversion failed: {e}"),
                }),
            )
                .into_response()
        }
    }
}

/// Pull the XML payload out of whichever transport the client used.
fn xml_from_request(headers: &HeaderMap, params: &XmlParams, body: &Bytes) -> Option<Vec<u8>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        let v: serde_json::Value = serde_json::from_slice(body).ok()?;
        let field = v.get("xml_content").or_else(|| v.get("xml"))?.as_str()?;
        return Some(field.as_bytes().to_vec());
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        return url::form_urlencoded::parse(body)
            .find(|(k, _)| k == "xml_content" || k == "xml")
            .map(|(_, v)| v.into_owned().into_bytes());
    }

    if !body.is_empty() {
        return Some(body.to_vec());
    }

    params
        .xml_content
        .as_ref()
        .or(params.xml.as_ref())
        .map(|s| s.as_bytes().to_vec())
}

async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "service": "XML to XLSX Converter API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/convert": "Convert XML to XLSX format",
            "GET /api/health": "Health check endpoint",
            "GET /": "This documentation"
        },
        "usage": {
            "endpoint": "/api/convert",
            "method": "POST",
            "content_types": [
                "application/json with xml_content field",
                "application/x-www-form-urlencoded with xml_content field",
                "text/xml or application/xml (raw XML data)"
            ],
            "response": "JSON with base64 encoded Excel file"
        }
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "message": "XML to XLSX converter API is running"
    }))
}
