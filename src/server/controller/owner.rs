use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        dashboard::{FinancialReportDto, MonthlyRevenueDto, OwnerAnalyticsDto, OwnerDashboardDto},
    },
    server::{
        controller::param::{AnalyticsParam, MonthParam, ReportParam},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::analytics::AnalyticsService,
        state::AppState,
        util::parse::parse_date,
    },
};

pub static OWNER_TAG: &str = "owner";

const DEFAULT_ANALYTICS_DAYS: i64 = 90;

/// Court count, pending requests, today's schedule and this month's revenue.
#[utoipa::path(
    get,
    path = "/api/owner/dashboard",
    tag = OWNER_TAG,
    responses(
        (status = 200, description = "Owner dashboard", body = OwnerDashboardDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a court owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let dashboard = AnalyticsService::new(&state.db)
        .owner_dashboard(owner.id, Utc::now().date_naive())
        .await?;

    Ok((StatusCode::OK, Json(dashboard.into_dto())))
}

/// Revenue and booking breakdowns over the last `days` days.
#[utoipa::path(
    get,
    path = "/api/owner/analytics",
    tag = OWNER_TAG,
    params(AnalyticsParam),
    responses(
        (status = 200, description = "Revenue by court, weekday and hour", body = OwnerAnalyticsDto),
        (status = 400, description = "Days out of range", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a court owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_analytics(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<AnalyticsParam>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let analytics = AnalyticsService::new(&state.db)
        .owner_analytics(
            owner.id,
            params.days.unwrap_or(DEFAULT_ANALYTICS_DAYS),
            Utc::now().date_naive(),
        )
        .await?;

    Ok((StatusCode::OK, Json(analytics.into_dto())))
}

/// Confirmed revenue for one calendar month, the current month by default.
#[utoipa::path(
    get,
    path = "/api/owner/revenue",
    tag = OWNER_TAG,
    params(MonthParam),
    responses(
        (status = 200, description = "Monthly revenue", body = MonthlyRevenueDto),
        (status = 400, description = "Invalid month", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a court owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_monthly_revenue(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<MonthParam>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let today = Utc::now().date_naive();
    let revenue = AnalyticsService::new(&state.db)
        .monthly_revenue(
            owner.id,
            params.year.unwrap_or(today.year()),
            params.month.unwrap_or(today.month()),
        )
        .await?;

    Ok((StatusCode::OK, Json(revenue.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/owner/report",
    tag = OWNER_TAG,
    params(ReportParam),
    responses(
        (status = 200, description = "Financial report for the date range", body = FinancialReportDto),
        (status = 400, description = "Malformed or inverted date range", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a court owner", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_financial_report(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ReportParam>,
) -> Result<impl IntoResponse, AppError> {
    let owner = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Owner])
        .await?;

    let report = AnalyticsService::new(&state.db)
        .financial_report(owner.id, parse_date(&params.start)?, parse_date(&params.end)?)
        .await?;

    Ok((StatusCode::OK, Json(report.into_dto())))
}
