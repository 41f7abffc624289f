mod common;

use axum::extract::State;
use printshop_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_degraded_without_database() {
    let response = health_check(State(common::offline_state())).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "degraded");
    assert_eq!(data.database, "down");
}
