use crate::security::{error_response, internal_error, Pagination};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use rackipam_core::types::{IpAddressRecord, IpStatus, IpType};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subnets/{id}/ips", get(list_ips).post(create_ip))
        .route(
            "/subnets/{id}/ips/{ip}",
            get(get_ip).put(update_ip).delete(delete_ip),
        )
        .route("/subnets/{id}/ips/{ip}/claim", post(claim_ip))
        .route("/subnets/{id}/ips/{ip}/release", post(release_ip))
}

#[derive(Serialize)]
struct IpResponse {
    id: Uuid,
    subnet_id: Uuid,
    ip_address: String,
    ip_type: IpType,
    status: IpStatus,
    name: Option<String>,
    equipment_id: Option<Uuid>,
    created_at: String,
    updated_at: String,
}

impl From<IpAddressRecord> for IpResponse {
    fn from(r: IpAddressRecord) -> Self {
        Self {
            id: r.id,
            subnet_id: r.subnet_id,
            ip_address: r.ip_address,
            ip_type: r.ip_type,
            status: r.status,
            name: r.name,
            equipment_id: r.equipment_id,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
struct ListQuery {
    status: Option<IpStatus>,
}

#[derive(Deserialize)]
struct CreateIpRequest {
    ip_address: String,
    #[serde(default = "default_ip_type")]
    ip_type: IpType,
    #[serde(default = "default_status")]
    status: IpStatus,
    #[serde(default)]
    name: Option<String>,
}

fn default_ip_type() -> IpType {
    IpType::Host
}

fn default_status() -> IpStatus {
    IpStatus::Available
}

#[derive(Deserialize)]
struct UpdateIpRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<IpStatus>,
}

#[derive(Deserialize)]
struct ClaimRequest {
    equipment_id: Uuid,
}

#[derive(Deserialize)]
struct ReleaseRequest {
    #[serde(default)]
    equipment_id: Option<Uuid>,
}

/// Canonical text form of an address taken from a path or body.
fn canonical_ip(raw: &str) -> Result<String, (StatusCode, String)> {
    raw.trim()
        .parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid IP address: {raw}")))
}

fn ensure_subnet(state: &AppState, id: &Uuid) -> Result<(), (StatusCode, String)> {
    state
        .db
        .get_subnet(id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "subnet not found".to_string()))?;
    Ok(())
}

async fn list_ips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<ListQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<IpResponse>>, (StatusCode, String)> {
    ensure_subnet(&state, &id)?;
    let records = state.db.list_subnet_ips(&id).map_err(internal_error)?;

    let response = records
        .into_iter()
        .filter(|r| q.status.map_or(true, |s| r.status == s))
        .map(IpResponse::from)
        .collect();

    Ok(Json(page.apply(response)))
}

async fn create_ip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateIpRequest>,
) -> Result<(StatusCode, Json<IpResponse>), (StatusCode, String)> {
    if req.status == IpStatus::Used {
        return Err((
            StatusCode::BAD_REQUEST,
            "addresses are marked used by claiming them".to_string(),
        ));
    }

    let now = Utc::now();
    let record = IpAddressRecord {
        id: Uuid::new_v4(),
        subnet_id: id,
        ip_address: canonical_ip(&req.ip_address)?,
        ip_type: req.ip_type,
        status: req.status,
        name: req.name,
        equipment_id: None,
        created_at: now,
        updated_at: now,
    };
    state.db.create_ip_record(&record).map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn get_ip(
    State(state): State<AppState>,
    Path((id, ip)): Path<(Uuid, String)>,
) -> Result<Json<IpResponse>, (StatusCode, String)> {
    let ip = canonical_ip(&ip)?;
    let record = state
        .db
        .get_ip_record(&id, &ip)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "ip address not found".to_string()))?;

    Ok(Json(record.into()))
}

/// Edit the name or availability of an address. Ownership changes go through
/// claim and release, and the address type never changes.
async fn update_ip(
    State(state): State<AppState>,
    Path((id, ip)): Path<(Uuid, String)>,
    Json(req): Json<UpdateIpRequest>,
) -> Result<Json<IpResponse>, (StatusCode, String)> {
    let ip = canonical_ip(&ip)?;
    if req.status == Some(IpStatus::Used) {
        return Err((
            StatusCode::BAD_REQUEST,
            "addresses are marked used by claiming them".to_string(),
        ));
    }

    let record = state
        .db
        .update_ip_fields(&id, &ip, req.name, req.status)
        .map_err(error_response)?;

    Ok(Json(record.into()))
}

async fn delete_ip(
    State(state): State<AppState>,
    Path((id, ip)): Path<(Uuid, String)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let ip = canonical_ip(&ip)?;
    state.db.delete_ip_record(&id, &ip).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn claim_ip(
    State(state): State<AppState>,
    Path((id, ip)): Path<(Uuid, String)>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<IpResponse>, (StatusCode, String)> {
    let ip = canonical_ip(&ip)?;
    let record = state
        .service
        .claim_ip(&id, &ip, &req.equipment_id)
        .await
        .map_err(error_response)?;

    Ok(Json(record.into()))
}

async fn release_ip(
    State(state): State<AppState>,
    Path((id, ip)): Path<(Uuid, String)>,
    Json(req): Json<ReleaseRequest>,
) -> Result<Json<IpResponse>, (StatusCode, String)> {
    let ip = canonical_ip(&ip)?;
    let record = state
        .service
        .release_ip(&id, &ip, req.equipment_id.as_ref())
        .await
        .map_err(error_response)?;

    Ok(Json(record.into()))
}
