use crate::security::{error_response, internal_error, Pagination};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use rackipam_core::types::{Subnet, SubnetUsage};
use rackipam_provision::{NewSubnet, ProvisionOutcome, ProvisionRequest};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subnets", get(list_subnets).post(create_subnet))
        .route(
            "/subnets/{id}",
            get(get_subnet).put(update_subnet).delete(delete_subnet),
        )
        .route("/subnets/{id}/provision", post(provision_subnet))
        .route("/subnets/{id}/has-ips", get(has_ips))
        .route("/subnets/{id}/usage", get(subnet_usage))
}

#[derive(Serialize)]
pub(crate) struct SubnetResponse {
    id: Uuid,
    cidr: String,
    name: String,
    vlan_id: Option<Uuid>,
    description: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<Subnet> for SubnetResponse {
    fn from(s: Subnet) -> Self {
        Self {
            id: s.id,
            cidr: s.cidr,
            name: s.name,
            vlan_id: s.vlan_id,
            description: s.description,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
struct ListQuery {
    vlan_id: Option<Uuid>,
}

#[derive(Deserialize)]
struct CreateSubnetRequest {
    cidr: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    vlan_id: Option<Uuid>,
    #[serde(default)]
    description: Option<String>,
    /// Generate the address records right after creating the subnet
    #[serde(default)]
    provision: bool,
}

/// Absent fields are left alone. `vlan_id: null` detaches the subnet.
#[derive(Deserialize)]
struct UpdateSubnetRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Accepted only when it names the subnet's current block
    #[serde(default)]
    cidr: Option<String>,
    #[serde(default, deserialize_with = "present")]
    vlan_id: Option<Option<Uuid>>,
}

fn present<'de, D>(d: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(d).map(Some)
}

#[derive(Serialize)]
struct CreateSubnetResponse {
    subnet: SubnetResponse,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provision: Option<ProvisionOutcome>,
}

#[derive(Deserialize)]
struct ProvisionParams {
    reserve_gateway: Option<bool>,
    gateway_name: Option<String>,
}

#[derive(Serialize)]
struct HasIpsResponse {
    subnet_id: Uuid,
    has_ips: bool,
}

async fn list_subnets(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<SubnetResponse>>, (StatusCode, String)> {
    let subnets = match q.vlan_id {
        Some(vlan_id) => state.db.list_subnets_for_vlan(&vlan_id),
        None => state.db.list_subnets(),
    }
    .map_err(internal_error)?;

    let response = subnets.into_iter().map(SubnetResponse::from).collect();
    Ok(Json(page.apply(response)))
}

async fn create_subnet(
    State(state): State<AppState>,
    Json(req): Json<CreateSubnetRequest>,
) -> Result<(StatusCode, Json<CreateSubnetResponse>), (StatusCode, String)> {
    let new = NewSubnet {
        cidr: req.cidr,
        name: req.name,
        vlan_id: req.vlan_id,
        description: req.description,
    };
    let (subnet, warnings) = state
        .service
        .create_subnet(new)
        .await
        .map_err(error_response)?;

    let provision = if req.provision && subnet_is_ipv4(&subnet) {
        let outcome = state
            .service
            .generate_and_upsert_ips_for_subnet(&ProvisionRequest {
                subnet_id: subnet.id,
                cidr: subnet.cidr.clone(),
                reserve_gateway: None,
                gateway_name: None,
            })
            .await;
        Some(outcome)
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateSubnetResponse {
            subnet: subnet.into(),
            warnings,
            provision,
        }),
    ))
}

fn subnet_is_ipv4(subnet: &Subnet) -> bool {
    rackipam_cidr::parse_cidr(&subnet.cidr).is_some_and(|info| info.is_ipv4())
}

async fn get_subnet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubnetResponse>, (StatusCode, String)> {
    let subnet = state
        .db
        .get_subnet(&id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "subnet not found".to_string()))?;

    Ok(Json(subnet.into()))
}

async fn update_subnet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubnetRequest>,
) -> Result<Json<SubnetResponse>, (StatusCode, String)> {
    let mut subnet = state
        .db
        .get_subnet(&id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "subnet not found".to_string()))?;

    if let Some(cidr) = req.cidr {
        let info = rackipam_cidr::parse_cidr(&cidr)
            .ok_or((StatusCode::BAD_REQUEST, format!("invalid CIDR: {cidr}")))?;
        subnet.cidr = info.cidr;
    }
    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, "subnet name cannot be empty".to_string()));
        }
        subnet.name = name.trim().to_string();
    }
    if let Some(description) = req.description {
        subnet.description = Some(description);
    }
    if let Some(vlan_id) = req.vlan_id {
        subnet.vlan_id = vlan_id;
    }
    subnet.updated_at = Utc::now();

    state.db.update_subnet(&subnet).map_err(error_response)?;
    info!(subnet_id = %id, "subnet updated");

    Ok(Json(subnet.into()))
}

async fn delete_subnet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = state.db.delete_subnet(&id).map_err(error_response)?;
    info!(subnet_id = %id, removed, "subnet deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Generate and store the subnet's address records. A failed run answers
/// 422 with the outcome, whose `count` is the progress made before the error.
async fn provision_subnet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ProvisionParams>,
) -> Result<(StatusCode, Json<ProvisionOutcome>), (StatusCode, String)> {
    let subnet = state
        .db
        .get_subnet(&id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "subnet not found".to_string()))?;

    let outcome = state
        .service
        .generate_and_upsert_ips_for_subnet(&ProvisionRequest {
            subnet_id: subnet.id,
            cidr: subnet.cidr,
            reserve_gateway: params.reserve_gateway,
            gateway_name: params.gateway_name,
        })
        .await;

    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(outcome)))
}

async fn has_ips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HasIpsResponse>, (StatusCode, String)> {
    state
        .db
        .get_subnet(&id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "subnet not found".to_string()))?;

    Ok(Json(HasIpsResponse {
        subnet_id: id,
        has_ips: state.service.check_subnet_has_ips(&id).await,
    }))
}

async fn subnet_usage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubnetUsage>, (StatusCode, String)> {
    let usage = state.service.subnet_usage(&id).await.map_err(error_response)?;
    Ok(Json(usage))
}
