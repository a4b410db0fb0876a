use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::bonus::{compute_bonus, BonusBracket, BonusResult};
use super::career::{evaluate, LevelThreshold, ProgressionStatus};
use super::composite::{score, CompositeScore};
use super::domain::{KpiPeriod, MetricInput, SellerId};
use super::dre::DreInput;
use super::error::ScoringError;
use super::metrics::{validate_weights, MetricTable};
use super::repository::{RepositoryError, SnapshotRepository};
use super::scorecard::SellerSnapshot;
use super::service::{ScorecardService, ScorecardServiceError};

#[derive(Debug, Deserialize)]
pub struct CompositeRequest {
    pub metrics: Vec<MetricInput>,
}

#[derive(Debug, Serialize)]
pub struct CompositeResponse {
    #[serde(flatten)]
    pub composite: CompositeScore,
    pub classification: super::classification::Classification,
}

#[derive(Debug, Deserialize)]
pub struct BonusRequest {
    pub brackets: Vec<BonusBracket>,
    pub composite_attainment_percent: f64,
    pub base_salary: f64,
}

#[derive(Debug, Deserialize)]
pub struct CareerRequest {
    pub current_volume: f64,
    pub current_tenure_months: f64,
    #[serde(default)]
    pub next_level: Option<LevelThreshold>,
}

#[derive(Debug, Deserialize)]
pub struct WeightsRequest {
    pub metrics: MetricTable,
}

/// Router exposing the scoring engine and the seller scorecard service.
pub fn scoring_router<R>(service: Arc<ScorecardService<R>>) -> Router
where
    R: SnapshotRepository + 'static,
{
    Router::new()
        .route("/api/v1/scoring/composite", post(composite_handler))
        .route("/api/v1/scoring/bonus", post(bonus_handler::<R>))
        .route("/api/v1/scoring/career", post(career_handler))
        .route("/api/v1/scoring/weights/validate", post(weights_handler))
        .route("/api/v1/scoring/dre", post(dre_handler))
        .route("/api/v1/badges", get(badges_handler::<R>))
        .route(
            "/api/v1/sellers/:seller_id/snapshots/:period",
            put(record_handler::<R>),
        )
        .route(
            "/api/v1/sellers/:seller_id/scorecard/:period",
            get(scorecard_handler::<R>),
        )
        .route("/api/v1/ranking/:period", get(ranking_handler::<R>))
        .with_state(service)
}

pub(crate) async fn composite_handler(Json(request): Json<CompositeRequest>) -> Response {
    match score(&request.metrics) {
        Ok(composite) => {
            let classification = composite.classification();
            (
                StatusCode::OK,
                Json(CompositeResponse {
                    composite,
                    classification,
                }),
            )
                .into_response()
        }
        Err(error) => scoring_error_response(&error),
    }
}

pub(crate) async fn bonus_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Json(request): Json<BonusRequest>,
) -> Response
where
    R: SnapshotRepository + 'static,
{
    let result: Result<BonusResult, ScoringError> = compute_bonus(
        &request.brackets,
        request.composite_attainment_percent,
        request.base_salary,
        service.engine().schedule(),
    );
    match result {
        Ok(bonus) => (StatusCode::OK, Json(bonus)).into_response(),
        Err(error) => scoring_error_response(&error),
    }
}

pub(crate) async fn career_handler(Json(request): Json<CareerRequest>) -> Json<ProgressionStatus> {
    Json(evaluate(
        request.current_volume,
        request.current_tenure_months,
        request.next_level.as_ref(),
    ))
}

pub(crate) async fn weights_handler(Json(request): Json<WeightsRequest>) -> Response {
    match validate_weights(&request.metrics) {
        Ok(sum) => (StatusCode::OK, Json(json!({ "valid": true, "sum": sum }))).into_response(),
        Err(error) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "valid": false, "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn dre_handler(Json(request): Json<DreInput>) -> Response {
    match request.statement() {
        Ok(statement) => (StatusCode::OK, Json(statement)).into_response(),
        Err(error) => scoring_error_response(&error),
    }
}

pub(crate) async fn badges_handler<R>(State(service): State<Arc<ScorecardService<R>>>) -> Response
where
    R: SnapshotRepository + 'static,
{
    (StatusCode::OK, Json(service.engine().badge_catalog().clone())).into_response()
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((seller_id, period)): Path<(String, String)>,
    Json(mut snapshot): Json<SellerSnapshot>,
) -> Response
where
    R: SnapshotRepository + 'static,
{
    let period = match parse_period(&period) {
        Ok(period) => period,
        Err(response) => return response,
    };

    if snapshot.kpis.period != period {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!(
                    "snapshot period {} does not match path period {}",
                    snapshot.kpis.period, period
                )
            })),
        )
            .into_response();
    }

    snapshot.seller_id = SellerId(seller_id);

    match service.record(snapshot) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn scorecard_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((seller_id, period)): Path<(String, String)>,
) -> Response
where
    R: SnapshotRepository + 'static,
{
    let period = match parse_period(&period) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.scorecard(&SellerId(seller_id), period) {
        Ok(scorecard) => (StatusCode::OK, Json(scorecard)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path(period): Path<String>,
) -> Response
where
    R: SnapshotRepository + 'static,
{
    let period = match parse_period(&period) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.ranking(period) {
        Ok(ranking) => (StatusCode::OK, Json(ranking)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn parse_period(raw: &str) -> Result<KpiPeriod, Response> {
    raw.parse::<KpiPeriod>().map_err(|error| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response()
    })
}

fn scoring_error_response(error: &ScoringError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

fn service_error_response(error: ScorecardServiceError) -> Response {
    match error {
        ScorecardServiceError::Scoring(error) => scoring_error_response(&error),
        ScorecardServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no snapshot recorded for seller and period" })),
        )
            .into_response(),
        ScorecardServiceError::Repository(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::scorecard::ScorecardEngine;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemoryRepository {
        records: Mutex<HashMap<(SellerId, KpiPeriod), SellerSnapshot>>,
    }

    impl SnapshotRepository for MemoryRepository {
        fn upsert(&self, snapshot: SellerSnapshot) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            guard.insert((snapshot.seller_id.clone(), snapshot.period()), snapshot);
            Ok(())
        }

        fn fetch(
            &self,
            seller_id: &SellerId,
            period: KpiPeriod,
        ) -> Result<Option<SellerSnapshot>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.get(&(seller_id.clone(), period)).cloned())
        }

        fn for_period(&self, period: KpiPeriod) -> Result<Vec<SellerSnapshot>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard
                .values()
                .filter(|snapshot| snapshot.period() == period)
                .cloned()
                .collect())
        }
    }

    fn router() -> Router {
        let service = Arc::new(ScorecardService::new(
            Arc::new(MemoryRepository::default()),
            ScorecardEngine::default(),
        ));
        scoring_router(service)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn read_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn seller_body() -> Value {
        json!({
            "name": "Bruna",
            "kpis": {
                "period": "2025-01",
                "readings": {
                    "new_actives": { "target": 12.0, "actual": 12.0 },
                    "churn": { "target": 5.0, "actual": 0.0 },
                    "tpv_m1": { "target": 100000.0, "actual": 100000.0 },
                    "actives_m1": { "target": 10.0, "actual": 10.0 },
                    "hunter_migration": { "target": 70.0, "actual": 70.0 }
                }
            },
            "base_salary": 1000.0,
            "brackets": [
                { "label": "15k+", "bonus_per_client": 10.0, "current_client_count": 5 }
            ]
        })
    }

    #[tokio::test]
    async fn composite_endpoint_scores_request_metrics() {
        let body = json!({
            "metrics": [
                { "key": "new_actives", "name": "New Actives", "target": 12.0, "actual": 14.0, "weight": 0.3 },
                { "key": "churn", "name": "Churn", "target": 5.0, "actual": 3.0, "weight": 0.2, "inverse": true }
            ]
        });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/composite", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["metrics"][1]["attainment_percent"], json!(40.0));
        assert_eq!(payload["metrics"][0]["classification"], json!("on_target"));
        assert_eq!(payload["classification"], json!("critical"));
    }

    #[tokio::test]
    async fn composite_endpoint_rejects_negative_actual() {
        let body = json!({
            "metrics": [
                { "key": "tpv_m1", "name": "TPV M1", "target": 10.0, "actual": -1.0, "weight": 1.0 }
            ]
        });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/composite", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("tpv_m1"));
    }

    #[tokio::test]
    async fn bonus_endpoint_applies_schedule_and_cap() {
        let body = json!({
            "brackets": [
                { "label": "A", "bonus_per_client": 10.0, "current_client_count": 5 },
                { "label": "B", "bonus_per_client": 20.0, "current_client_count": 2 }
            ],
            "composite_attainment_percent": 110.0,
            "base_salary": 1000.0
        });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/bonus", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["gross_bonus"], json!(90.0));
        assert_eq!(payload["final_bonus"], json!(90.0));
    }

    #[tokio::test]
    async fn bonus_endpoint_rejects_non_positive_salary() {
        let body = json!({
            "brackets": [],
            "composite_attainment_percent": 110.0,
            "base_salary": 0.0
        });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/bonus", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn career_endpoint_reports_terminal_without_next_level() {
        let body = json!({ "current_volume": 10.0, "current_tenure_months": 1.0 });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/career", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["terminal"], json!(true));
        assert_eq!(payload["eligible"], json!(true));
    }

    #[tokio::test]
    async fn weights_endpoint_flags_bad_sums() {
        let body = json!({
            "metrics": [
                { "key": "a", "label": "A", "weight": 0.6 },
                { "key": "b", "label": "B", "weight": 0.6 }
            ]
        });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/weights/validate", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json(response).await;
        assert_eq!(payload["valid"], json!(false));
    }

    #[tokio::test]
    async fn dre_endpoint_guards_zero_costs() {
        let body = json!({ "salary": 0.0, "revenue": 4000.0 });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/dre", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["roi_percent"], json!(0.0));
        assert_eq!(payload["payback_months"], json!(0));
    }

    #[tokio::test]
    async fn dre_endpoint_rejects_negative_salary() {
        let body = json!({ "salary": -10.0, "benefits": 0.0, "revenue": 100.0 });

        let response = router()
            .oneshot(json_request("POST", "/api/v1/scoring/dre", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn badge_catalog_is_listed() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/badges")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let badges = payload.as_array().expect("badge list");
        assert_eq!(badges.len(), 10);
        assert!(badges
            .iter()
            .any(|badge| badge["id"] == json!("rising_star") && badge["points"] == json!(100)));
    }

    #[tokio::test]
    async fn recorded_snapshot_is_served_as_scorecard_and_ranking() {
        let router = router();

        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/sellers/seller-9/snapshots/2025-01",
                seller_body(),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/sellers/seller-9/scorecard/2025-01")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["seller_id"], json!("seller-9"));
        assert_eq!(payload["bonus"]["final_bonus"], json!(50.0));

        let response = router
            .oneshot(
                Request::get("/api/v1/ranking/2025-01")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["entries"][0]["seller_id"], json!("seller-9"));
        assert_eq!(payload["entries"][0]["position"], json!(1));
    }

    #[tokio::test]
    async fn snapshot_for_another_month_is_rejected() {
        let router = router();

        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/sellers/seller-9/snapshots/2025-02",
                seller_body(),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("2025-01"));

        let response = router
            .oneshot(
                Request::get("/api/v1/sellers/seller-9/scorecard/2025-02")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_seller_is_not_found() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/sellers/nobody/scorecard/2025-01")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_period_is_bad_request() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/ranking/january")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
