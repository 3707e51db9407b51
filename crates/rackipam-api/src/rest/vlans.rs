use crate::security::{error_response, internal_error, Pagination};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use rackipam_core::types::{SubnetUsage, Vlan};
use rackipam_provision::VlanIpStatus;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vlans", get(list_vlans).post(create_vlan))
        .route("/vlans/{id}", get(get_vlan).delete(delete_vlan))
        .route("/vlans/{id}/ip-status", get(vlan_ip_status))
        .route("/vlans/{id}/usage", get(vlan_usage))
}

#[derive(Serialize)]
struct VlanResponse {
    id: Uuid,
    vlan_number: u16,
    name: String,
    description: Option<String>,
    subnet_count: usize,
    created_at: String,
    updated_at: String,
}

impl VlanResponse {
    fn from_vlan(vlan: Vlan, subnet_count: usize) -> Self {
        Self {
            id: vlan.id,
            vlan_number: vlan.vlan_number,
            name: vlan.name,
            description: vlan.description,
            subnet_count,
            created_at: vlan.created_at.to_rfc3339(),
            updated_at: vlan.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
struct CreateVlanRequest {
    vlan_number: u16,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

fn load_vlan(state: &AppState, id: &Uuid) -> Result<Vlan, (StatusCode, String)> {
    state
        .db
        .get_vlan(id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "vlan not found".to_string()))
}

async fn list_vlans(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<VlanResponse>>, (StatusCode, String)> {
    let vlans = state.db.list_vlans().map_err(internal_error)?;
    let subnets = state.db.list_subnets().map_err(internal_error)?;

    let response = vlans
        .into_iter()
        .map(|v| {
            let count = subnets.iter().filter(|s| s.vlan_id == Some(v.id)).count();
            VlanResponse::from_vlan(v, count)
        })
        .collect();

    Ok(Json(page.apply(response)))
}

async fn create_vlan(
    State(state): State<AppState>,
    Json(req): Json<CreateVlanRequest>,
) -> Result<(StatusCode, Json<VlanResponse>), (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "vlan name cannot be empty".to_string()));
    }

    let now = Utc::now();
    let vlan = Vlan {
        id: Uuid::new_v4(),
        vlan_number: req.vlan_number,
        name: req.name.trim().to_string(),
        description: req.description,
        created_at: now,
        updated_at: now,
    };
    state.db.create_vlan(&vlan).map_err(error_response)?;
    info!(vlan_id = %vlan.id, vlan_number = vlan.vlan_number, "vlan created");

    Ok((StatusCode::CREATED, Json(VlanResponse::from_vlan(vlan, 0))))
}

async fn get_vlan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VlanResponse>, (StatusCode, String)> {
    let vlan = load_vlan(&state, &id)?;
    let subnets = state.db.list_subnets_for_vlan(&id).map_err(internal_error)?;

    Ok(Json(VlanResponse::from_vlan(vlan, subnets.len())))
}

async fn delete_vlan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.db.delete_vlan(&id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn vlan_ip_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VlanIpStatus>, (StatusCode, String)> {
    load_vlan(&state, &id)?;
    Ok(Json(state.service.check_vlan_has_subnets_with_ips(&id).await))
}

async fn vlan_usage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubnetUsage>, (StatusCode, String)> {
    load_vlan(&state, &id)?;
    let usage = state.service.vlan_usage(&id).await.map_err(error_response)?;
    Ok(Json(usage))
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_vlan_lifecycle() {
        let app = TestApp::new(None);

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/vlans",
                Some(json!({"vlan_number": 120, "name": "provisioning"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let vlan_id = body["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send(
                "POST",
                "/api/v1/vlans",
                Some(json!({"vlan_number": 120, "name": "dup"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        for number in [0, 4095] {
            let (status, _) = app
                .send("POST", "/api/v1/vlans", Some(json!({"vlan_number": number, "name": "x"})))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (_, body) = app
            .send("GET", &format!("/api/v1/vlans/{vlan_id}/ip-status"), None)
            .await;
        assert_eq!(body["has_subnets"], false);
        assert_eq!(body["subnet_id"], Value::Null);

        let (_, body) = app
            .send(
                "POST",
                "/api/v1/subnets",
                Some(json!({"cidr": "10.120.0.0/29", "vlan_id": vlan_id, "provision": true})),
            )
            .await;
        let subnet_id = body["subnet"]["id"].as_str().unwrap().to_string();

        let (_, body) = app
            .send("GET", &format!("/api/v1/vlans/{vlan_id}/ip-status"), None)
            .await;
        assert_eq!(body["has_subnets"], true);
        assert_eq!(body["has_ips"], true);
        assert_eq!(body["subnet_id"], subnet_id.as_str());

        let (_, body) = app.send("GET", &format!("/api/v1/vlans/{vlan_id}/usage"), None).await;
        assert_eq!(body["total"], 8);

        let (_, body) = app.send("GET", &format!("/api/v1/vlans/{vlan_id}"), None).await;
        assert_eq!(body["subnet_count"], 1);

        let (_, body) = app
            .send("GET", &format!("/api/v1/subnets?vlan_id={vlan_id}"), None)
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app.send("DELETE", &format!("/api/v1/vlans/{vlan_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app
            .send("GET", &format!("/api/v1/subnets/{subnet_id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vlan_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_vlan() {
        let app = TestApp::new(None);
        let missing = uuid::Uuid::new_v4();
        for path in ["", "/ip-status", "/usage"] {
            let (status, _) = app
                .send("GET", &format!("/api/v1/vlans/{missing}{path}"), None)
                .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        let (status, _) = app.send("DELETE", &format!("/api/v1/vlans/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(
                "POST",
                "/api/v1/subnets",
                Some(json!({"cidr": "10.0.0.0/24", "vlan_id": missing})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
