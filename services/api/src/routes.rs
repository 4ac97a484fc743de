use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use bonus_panel::bonus::report::views::BonusReportView;
use bonus_panel::bonus::{BonusPanelService, Period, ReportFilter, RowSource};
use bonus_panel::error::AppError;
use bonus_panel::import::read_month_sheet;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    pub(crate) period: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) tenure: Option<String>,
}

impl ReportQuery {
    fn into_parts(self) -> (Period, ReportFilter) {
        let filter = ReportFilter {
            name: self.name,
            role: self.role,
            city: self.city,
            tenure: self.tenure,
        };
        (Period::parse(&self.period), filter)
    }
}

pub(crate) fn bonus_router<S>(service: Arc<BonusPanelService<S>>) -> Router
where
    S: RowSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/bonus/report",
            get(report_endpoint::<S>).post(supplied_rows_endpoint::<S>),
        )
        .with_state(service)
}

pub(crate) fn with_bonus_routes<S>(service: Arc<BonusPanelService<S>>) -> Router
where
    S: RowSource + 'static,
{
    bonus_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Report over the stored month sheets.
pub(crate) async fn report_endpoint<S>(
    State(service): State<Arc<BonusPanelService<S>>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<BonusReportView>, AppError>
where
    S: RowSource + 'static,
{
    let (period, filter) = query.into_parts();
    let report = service.report(period, &filter)?;
    Ok(Json(report.view()))
}

/// Report over one month sheet posted as CSV in the request body.
pub(crate) async fn supplied_rows_endpoint<S>(
    State(service): State<Arc<BonusPanelService<S>>>,
    Query(query): Query<ReportQuery>,
    body: String,
) -> Result<Json<BonusReportView>, AppError>
where
    S: RowSource + 'static,
{
    let (period, filter) = query.into_parts();
    let Period::Month(month) = period else {
        return Err(AppError::BadRequest(
            "supplied rows cover a single month; quarter reports use the stored sheets"
                .to_string(),
        ));
    };

    let records = read_month_sheet(Cursor::new(body.into_bytes()))?;
    let report = service.report_from_records(month, &records, &filter);
    Ok(Json(report.view()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bonus_panel::bonus::{
        BonusEngine, BranchProfile, EmployeeMonthRecord, IndicatorCalendar, IndicatorFlag,
        InMemoryRowSource, MonthName, MonthlyIndicatorSet, RoleRuleSet, RuleBook,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn seller(name: &str) -> EmployeeMonthRecord {
        EmployeeMonthRecord {
            name: name.to_string(),
            role: "Vendedor".to_string(),
            city: "Chapadinha".to_string(),
            admission_date: "2021-01-04".to_string(),
            tenure: "3 years".to_string(),
            monthly_target: Some(100.0),
            ..EmployeeMonthRecord::default()
        }
    }

    fn service() -> Arc<BonusPanelService<InMemoryRowSource>> {
        let rules = RuleBook::new([RoleRuleSet::new("Vendedor", 100.0)
            .with_goal("Produção", 0.5)
            .with_goal("Lucratividade", 0.5)]);
        let calendar = IndicatorCalendar::default().with_month(
            "JULY",
            MonthlyIndicatorSet::new().with_flag(IndicatorFlag::Financial, false),
        );
        let rows = InMemoryRowSource::default().with_month("JULY", vec![seller("Maria Souza")]);

        Arc::new(BonusPanelService::new(
            BonusEngine::new(rules, BranchProfile::standard()),
            calendar,
            vec![MonthName::new("JULY")],
            rows,
        ))
    }

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn router(ready: bool) -> Router {
        with_bonus_routes(service()).layer(Extension(app_state(ready)))
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = router(true)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = router(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], "initializing");
    }

    #[tokio::test]
    async fn month_report_lists_missed_items() {
        let response = router(true)
            .oneshot(
                Request::get("/api/v1/bonus/report?period=july&name=maria")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["period"], "JULY");
        let card = &payload["employees"][0];
        assert_eq!(card["earned"], 50.0);
        assert_eq!(card["missed"][0], "Profitability");
        assert_eq!(card["target_kind"], "Monthly target");
        assert_eq!(payload["totals"]["forfeited_label"], "R$ 50.00");
    }

    #[tokio::test]
    async fn quarter_report_tags_missed_items_with_month() {
        let response = router(true)
            .oneshot(
                Request::get("/api/v1/bonus/report?period=quarter")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["employees"][0]["missed"][0], "Profitability (JULY)");
        assert_eq!(payload["employees"][0]["target_kind"], "Quarterly target");
    }

    #[tokio::test]
    async fn unknown_month_is_a_bad_request() {
        let response = router(true)
            .oneshot(
                Request::get("/api/v1/bonus/report?period=december")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("DECEMBER"));
    }

    #[tokio::test]
    async fn posted_sheet_is_computed_against_loaded_rules() {
        let csv = "NOME,FUNÇÃO,CIDADE,VALOR MENSAL META,OBSERVAÇÃO\n\
Ana Lima,Vendedor,Chapadinha,250,\n\
Rui Costa,Vendedor,Chapadinha,250,Licença médica\n";

        let response = router(true)
            .oneshot(
                Request::post("/api/v1/bonus/report?period=JULY")
                    .header(header::CONTENT_TYPE, "text/csv")
                    .body(Body::from(csv))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let employees = payload["employees"].as_array().expect("employees");
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0]["name"], "Ana Lima");
        assert_eq!(employees[0]["target"], 100.0);
        assert_eq!(employees[1]["badge"], "On leave this period");
    }

    #[tokio::test]
    async fn posted_sheet_cannot_cover_a_quarter() {
        let response = router(true)
            .oneshot(
                Request::post("/api/v1/bonus/report?period=trimestre")
                    .body(Body::from("NAME,ROLE\n"))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
