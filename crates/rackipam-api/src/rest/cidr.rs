use crate::AppState;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rackipam_cidr::{
    check_overlap, format_ip_count, generate_ip_records, is_ip_in_cidr, parse_cidr,
    validate_cidr, CidrInfo, GenerateOptions, GeneratedRecord, ValidationResult,
};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cidr/parse", post(parse))
        .route("/cidr/validate", post(validate))
        .route("/cidr/overlap", post(overlap))
        .route("/cidr/contains", get(contains))
        .route("/cidr/records", post(preview_records))
}

#[derive(Deserialize)]
struct CidrRequest {
    cidr: String,
}

#[derive(Serialize)]
struct ParseResponse {
    info: CidrInfo,
    /// Human-readable address count, e.g. "65.5K"
    total_display: String,
}

#[derive(Deserialize)]
struct OverlapRequest {
    a: String,
    b: String,
}

#[derive(Serialize)]
struct OverlapResponse {
    overlaps: bool,
}

#[derive(Deserialize)]
struct ContainsQuery {
    ip: String,
    cidr: String,
}

#[derive(Serialize)]
struct ContainsResponse {
    contains: bool,
}

#[derive(Deserialize)]
struct RecordsRequest {
    cidr: String,
    #[serde(default)]
    reserve_gateway: Option<bool>,
    #[serde(default)]
    gateway_name: Option<String>,
}

#[derive(Serialize)]
struct RecordsResponse {
    cidr: String,
    count: usize,
    records: Vec<GeneratedRecord>,
}

async fn parse(Json(req): Json<CidrRequest>) -> Result<Json<ParseResponse>, (StatusCode, String)> {
    let info = parse_cidr(&req.cidr).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid CIDR: {}", req.cidr),
        )
    })?;

    Ok(Json(ParseResponse {
        total_display: format_ip_count(info.total_addresses),
        info,
    }))
}

async fn validate(Json(req): Json<CidrRequest>) -> Json<ValidationResult> {
    Json(validate_cidr(&req.cidr))
}

async fn overlap(Json(req): Json<OverlapRequest>) -> Json<OverlapResponse> {
    Json(OverlapResponse {
        overlaps: check_overlap(&req.a, &req.b),
    })
}

async fn contains(Query(q): Query<ContainsQuery>) -> Json<ContainsResponse> {
    Json(ContainsResponse {
        contains: is_ip_in_cidr(&q.ip, &q.cidr),
    })
}

/// Generate records without storing them.
async fn preview_records(
    Json(req): Json<RecordsRequest>,
) -> Result<Json<RecordsResponse>, (StatusCode, String)> {
    let info = parse_cidr(&req.cidr).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid CIDR: {}", req.cidr),
        )
    })?;

    let defaults = GenerateOptions::default();
    let options = GenerateOptions {
        reserve_gateway: req.reserve_gateway.unwrap_or(defaults.reserve_gateway),
        gateway_name: req.gateway_name,
    };
    let records = generate_ip_records(&info.cidr, &options);

    Ok(Json(RecordsResponse {
        cidr: info.cidr,
        count: records.len(),
        records,
    }))
}
