use crate::{
    api::models::*,
    core::{
        errors::FintrackError,
        models::{
            AppLog, AuthUser, Group, GroupInvitation, NewTransaction, OwnerScope, ProfileUpdate, Transaction,
            TransactionPatch, UserProfile, UserSettings,
        },
        services::{
            CalendarMonth, CategorySuggestion, CreatedInvitation, Dashboard, FintrackService, InvitationLookup,
            Report, ReportRequest,
        },
    },
    infrastructure::{
        classifier::http::HttpClassifier, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post, put},
};
use http::header;

use std::sync::Arc;

pub type AppService = FintrackService<InMemoryLogging, InMemoryStorage, HttpClassifier>;

/// Validates the bearer token and exposes the caller as an [`AuthUser`] extension.
async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| FintrackError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| FintrackError::Unauthorized("Invalid Authorization header".to_string()))?;

    let user = service.validate_token(token)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    let protected_routes = Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{transaction_id}",
            put(update_transaction).delete(delete_transaction),
        )
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/{group_id}", get(get_group).delete(delete_group))
        .route("/groups/{group_id}/leave", post(leave_group))
        .route(
            "/groups/{group_id}/transactions",
            get(list_group_transactions).post(create_group_transaction),
        )
        .route(
            "/groups/{group_id}/transactions/{transaction_id}",
            put(update_group_transaction).delete(delete_group_transaction),
        )
        .route("/groups/{group_id}/invitations", post(create_invitation))
        .route("/invitations", get(list_pending_invitations))
        .route("/invitations/token/{token}", get(get_invitation_by_token))
        .route("/invitations/{invitation_id}/accept", post(accept_invitation))
        .route("/invitations/{invitation_id}/reject", post(reject_invitation))
        .route("/reports", get(get_report))
        .route("/reports/export", get(export_report))
        .route("/dashboard", get(get_dashboard))
        .route("/calendar", get(get_calendar))
        .route("/suggestions/category", post(suggest_category))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/settings", get(get_settings).put(save_settings))
        .route("/logs", get(get_app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health)) // Unprotected
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Personal transactions, newest first", body = [Transaction]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_transactions(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let scope = OwnerScope::User(user.id.clone());
    Ok(Json(service.list_transactions(&user, &scope).await?))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = NewTransaction,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_transaction(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let scope = OwnerScope::User(user.id.clone());
    let transaction = service.create_transaction(&user, &scope, req).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{transaction_id}",
    request_body = TransactionPatch,
    params(
        ("transaction_id" = String, Path, description = "ID of the transaction to update")
    ),
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_transaction(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(transaction_id): Path<String>,
    Json(req): Json<TransactionPatch>,
) -> Result<Json<Transaction>, ApiError> {
    let scope = OwnerScope::User(user.id.clone());
    Ok(Json(
        service.update_transaction(&user, &scope, &transaction_id, req).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{transaction_id}",
    params(
        ("transaction_id" = String, Path, description = "ID of the transaction to delete")
    ),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_transaction(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let scope = OwnerScope::User(user.id.clone());
    service.delete_transaction(&user, &scope, &transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Groups of the current user", body = [Group]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_groups(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(service.list_groups(&user).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_group(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.create_group(&user, &req.name, &req.description).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Group detail", body = Group),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_group(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(service.get_group(&user, &group_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group to delete")
    ),
    responses(
        (status = 200, description = "Group deleted successfully", body = DeleteGroupResponse),
        (status = 403, description = "Not group creator", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_group(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
) -> Result<Json<DeleteGroupResponse>, ApiError> {
    let removed_invitations = service.delete_group(&user, &group_id).await?;
    Ok(Json(DeleteGroupResponse { removed_invitations }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/leave",
    params(
        ("group_id" = String, Path, description = "ID of the group to leave")
    ),
    responses(
        (status = 200, description = "Left the group", body = LeaveGroupResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn leave_group(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
) -> Result<Json<LeaveGroupResponse>, ApiError> {
    let group_deleted = service.leave_group(&user, &group_id).await?;
    Ok(Json(LeaveGroupResponse { group_deleted }))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/transactions",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Group transactions, newest first", body = [Transaction]),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_group_transactions(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let scope = OwnerScope::Group(group_id);
    Ok(Json(service.list_transactions(&user, &scope).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/transactions",
    request_body = NewTransaction,
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_group_transaction(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
    Json(req): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let scope = OwnerScope::Group(group_id);
    let transaction = service.create_transaction(&user, &scope, req).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    put,
    path = "/api/groups/{group_id}/transactions/{transaction_id}",
    request_body = TransactionPatch,
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        ("transaction_id" = String, Path, description = "ID of the transaction to update")
    ),
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group or transaction not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_group_transaction(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path((group_id, transaction_id)): Path<(String, String)>,
    Json(req): Json<TransactionPatch>,
) -> Result<Json<Transaction>, ApiError> {
    let scope = OwnerScope::Group(group_id);
    Ok(Json(
        service.update_transaction(&user, &scope, &transaction_id, req).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}/transactions/{transaction_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        ("transaction_id" = String, Path, description = "ID of the transaction to delete")
    ),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group or transaction not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_group_transaction(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path((group_id, transaction_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let scope = OwnerScope::Group(group_id);
    service.delete_transaction(&user, &scope, &transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/invitations",
    request_body = CreateInvitationRequest,
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 201, description = "Invitation created", body = CreatedInvitation),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_invitation(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<String>,
    Json(req): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<CreatedInvitation>), ApiError> {
    let created = service.create_invitation(&user, &group_id, &req.email).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/invitations",
    responses(
        (status = 200, description = "Pending invitations for the current user", body = [GroupInvitation])
    ),
    security(("Bearer" = []))
)]
async fn list_pending_invitations(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<GroupInvitation>>, ApiError> {
    Ok(Json(service.list_pending_invitations(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/invitations/token/{token}",
    params(
        ("token" = String, Path, description = "Invite token from the shared link")
    ),
    responses(
        (status = 200, description = "Invitation with validity verdict", body = InvitationLookup),
        (status = 404, description = "Invitation not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_invitation_by_token(
    State(service): State<Arc<AppService>>,
    Path(token): Path<String>,
) -> Result<Json<InvitationLookup>, ApiError> {
    Ok(Json(service.get_invitation_by_token(&token).await?))
}

#[utoipa::path(
    post,
    path = "/api/invitations/{invitation_id}/accept",
    params(
        ("invitation_id" = String, Path, description = "ID of the invitation")
    ),
    responses(
        (status = 200, description = "Joined the group", body = Group),
        (status = 403, description = "Invitation sent to another email", body = ErrorResponse),
        (status = 404, description = "Invitation not found", body = ErrorResponse),
        (status = 409, description = "Invitation already used or already a member", body = ErrorResponse),
        (status = 410, description = "Invitation expired", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn accept_invitation(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(invitation_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(service.accept_invitation(&user, &invitation_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/invitations/{invitation_id}/reject",
    params(
        ("invitation_id" = String, Path, description = "ID of the invitation")
    ),
    responses(
        (status = 204, description = "Invitation declined"),
        (status = 403, description = "Invitation sent to another email", body = ErrorResponse),
        (status = 404, description = "Invitation not found", body = ErrorResponse),
        (status = 409, description = "Invitation already used", body = ErrorResponse),
        (status = 410, description = "Invitation expired", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn reject_invitation(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Path(invitation_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.reject_invitation(&user, &invitation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report data", body = Report),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_report(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, ApiError> {
    let request = ReportRequest::try_from(query)?;
    Ok(Json(service.report(&user, &request).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/export",
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV export", body = String, content_type = "text/csv"),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn export_report(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = ReportRequest::try_from(query)?;
    let export = service.export_report(&user, &request).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    ))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard summary", body = Dashboard),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_dashboard(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(service.dashboard(&user, query.group_id.as_deref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Daily totals for the month", body = CalendarMonth),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_calendar(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, ApiError> {
    let currency = query.currency_filter()?;
    let month = service
        .calendar(
            &user,
            query.group_id.as_deref(),
            query.year,
            query.month,
            currency,
            query.day,
        )
        .await?;
    Ok(Json(month))
}

#[utoipa::path(
    post,
    path = "/api/suggestions/category",
    request_body = SuggestCategoryRequest,
    responses(
        (status = 200, description = "Suggested category", body = CategorySuggestion),
        (status = 400, description = "Invalid description", body = ErrorResponse),
        (status = 502, description = "Classifier unavailable", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn suggest_category(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SuggestCategoryRequest>,
) -> Result<Json<CategorySuggestion>, ApiError> {
    Ok(Json(service.suggest_category(&user, &req.description).await?))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the current user", body = UserProfile)
    ),
    security(("Bearer" = []))
)]
async fn get_profile(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(service.get_profile(&user).await?))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_profile(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(service.update_profile(&user, req).await?))
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings of the current user", body = UserSettings)
    ),
    security(("Bearer" = []))
)]
async fn get_settings(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(service.get_settings(&user).await?))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UserSettings,
    responses(
        (status = 200, description = "Settings saved", body = UserSettings),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn save_settings(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UserSettings>,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(service.save_settings(&user, req).await?))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Activity log of the current user", body = [AppLog]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs(&user).await?))
}
