use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{
        CreateGroupRequest, CreateInvitationRequest, DeleteGroupResponse, ErrorResponse, HealthResponse,
        LeaveGroupResponse, SuggestCategoryRequest,
    },
    core::{
        models::{
            AppLog, Category, Currency, Group, GroupInvitation, GroupMember, InvitationStatus, NewTransaction,
            NotificationSettings, ProfileUpdate, Role, Transaction, TransactionItem, TransactionPatch,
            TransactionType, UserProfile, UserSettings,
        },
        reports::{
            BreakdownCell, CategoryBreakdown, CategorySpending, CurrencyTotals, DailyTotal, DashboardSummary,
            MemberBreakdown, ReportPeriod,
        },
        services::{CalendarMonth, CategorySuggestion, CreatedInvitation, Dashboard, InvitationLookup, Report},
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health,
        super::handlers::list_transactions,
        super::handlers::create_transaction,
        super::handlers::update_transaction,
        super::handlers::delete_transaction,
        super::handlers::list_groups,
        super::handlers::create_group,
        super::handlers::get_group,
        super::handlers::delete_group,
        super::handlers::leave_group,
        super::handlers::list_group_transactions,
        super::handlers::create_group_transaction,
        super::handlers::update_group_transaction,
        super::handlers::delete_group_transaction,
        super::handlers::create_invitation,
        super::handlers::list_pending_invitations,
        super::handlers::get_invitation_by_token,
        super::handlers::accept_invitation,
        super::handlers::reject_invitation,
        super::handlers::get_report,
        super::handlers::export_report,
        super::handlers::get_dashboard,
        super::handlers::get_calendar,
        super::handlers::suggest_category,
        super::handlers::get_profile,
        super::handlers::update_profile,
        super::handlers::get_settings,
        super::handlers::save_settings,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateGroupRequest,
        CreateInvitationRequest,
        SuggestCategoryRequest,
        LeaveGroupResponse,
        DeleteGroupResponse,
        HealthResponse,
        ErrorResponse,
        Currency,
        Category,
        TransactionType,
        TransactionItem,
        Transaction,
        NewTransaction,
        TransactionPatch,
        Role,
        GroupMember,
        Group,
        InvitationStatus,
        GroupInvitation,
        CreatedInvitation,
        InvitationLookup,
        UserProfile,
        ProfileUpdate,
        NotificationSettings,
        UserSettings,
        AppLog,
        ReportPeriod,
        CurrencyTotals,
        BreakdownCell,
        CategoryBreakdown,
        MemberBreakdown,
        CategorySpending,
        DailyTotal,
        DashboardSummary,
        Report,
        Dashboard,
        CalendarMonth,
        CategorySuggestion
    )),
    modifiers(&SecurityAddon),
    info(
        title = "Fintrack API",
        description = "API for tracking personal and group income and expenses",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
