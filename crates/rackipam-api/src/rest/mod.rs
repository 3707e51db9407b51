pub mod addresses;
pub mod cidr;
pub mod health;
pub mod subnets;
pub mod vlans;

use crate::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(cidr::router())
        .merge(subnets::router())
        .merge(addresses::router())
        .merge(vlans::router())
}
