use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use super::FintrackService;
use crate::core::constants::RECENT_TRANSACTIONS_LIMIT;
use crate::core::errors::FintrackError;
use crate::core::export::{ExportVariant, export_csv, export_file_name};
use crate::core::models::{AuthUser, Currency, Group, OwnerScope, Transaction};
use crate::core::reports::{
    CategoryBreakdown, CategorySpending, CurrencyFilter, CurrencyTotals, DailyTotal, DashboardSummary,
    MemberBreakdown, ReportPeriod, category_breakdown, count_since, currencies_used, daily_totals,
    dashboard_summary, filter_by_currency, filter_by_period, main_currency, member_breakdown, month_range,
    month_start, recent_transactions, sort_newest_first, spending_by_category, totals_by_currency,
    transactions_on,
};
use crate::infrastructure::classifier::Classifier;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;

/// Report selection. Explicit `from`/`to` dates take precedence over `period`.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub group_id: Option<String>,
    pub period: ReportPeriod,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub currency: CurrencyFilter,
}

impl ReportRequest {
    fn scope(&self, user: &AuthUser) -> OwnerScope {
        OwnerScope::resolve(&user.id, self.group_id.as_deref())
    }

    fn range(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), FintrackError> {
        let (from, to) = match (self.from, self.to) {
            (Some(from), Some(to)) => {
                let start = from.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
                let end = to.and_hms_milli_opt(23, 59, 59, 999).map(|d| d.and_utc());
                (start, end)
            }
            (None, None) => match self.period.range(now) {
                Some((from, to)) => (Some(from), Some(to)),
                None => (None, None),
            },
            _ => {
                return Err(FintrackError::invalid(
                    "from",
                    "Incomplete range",
                    "Both from and to must be given",
                ));
            }
        };
        match (from, to) {
            (Some(from), Some(to)) if from <= to => Ok((from, to)),
            (Some(_), Some(_)) => Err(FintrackError::invalid(
                "from",
                "Invalid range",
                "Start date must not be after end date",
            )),
            _ => Err(FintrackError::InternalServerError(
                "Could not resolve report date range".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Currencies present in the period before the currency filter is applied.
    pub currencies: Vec<Currency>,
    pub totals: Vec<CurrencyTotals>,
    pub categories: Vec<CategoryBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberBreakdown>>,
    pub transaction_count: usize,
}

#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub recent: Vec<Transaction>,
    pub transactions_this_month: usize,
    pub spending: Vec<CategorySpending>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DailyTotal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_transactions: Option<Vec<Transaction>>,
}

struct ReportData {
    group: Option<Group>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    currencies: Vec<Currency>,
    transactions: Vec<Transaction>,
}

impl<L: LoggingService, S: Storage, C: Classifier> FintrackService<L, S, C> {
    async fn load_report_data(&self, user: &AuthUser, request: &ReportRequest) -> Result<ReportData, FintrackError> {
        let scope = request.scope(user);
        let group = self.authorize_scope(&scope, user).await?;
        let (from, to) = request.range(Utc::now())?;

        let all = self.storage.list_transactions(&scope).await?;
        let in_period = filter_by_period(&all, from, to);
        let currencies = currencies_used(&in_period);
        let mut transactions = filter_by_currency(&in_period, request.currency);
        sort_newest_first(&mut transactions);
        debug!(
            "Report for {} from {} to {}: {} of {} transactions",
            scope,
            from,
            to,
            transactions.len(),
            all.len()
        );

        Ok(ReportData {
            group,
            from,
            to,
            currencies,
            transactions,
        })
    }

    pub async fn report(&self, user: &AuthUser, request: &ReportRequest) -> Result<Report, FintrackError> {
        let data = self.load_report_data(user, request).await?;
        let totals = totals_by_currency(&data.transactions);

        Ok(Report {
            from: data.from,
            to: data.to,
            currencies: data.currencies,
            totals,
            categories: category_breakdown(&data.transactions),
            members: data
                .group
                .as_ref()
                .map(|g| member_breakdown(&data.transactions, &g.members)),
            transaction_count: data.transactions.len(),
        })
    }

    pub async fn export_report(&self, user: &AuthUser, request: &ReportRequest) -> Result<CsvExport, FintrackError> {
        let data = self.load_report_data(user, request).await?;
        let (variant, name) = match &data.group {
            Some(group) => (ExportVariant::Group(&group.members), Some(group.name.as_str())),
            None => (ExportVariant::Personal, None),
        };

        Ok(CsvExport {
            file_name: export_file_name(name, data.from.date_naive(), data.to.date_naive()),
            content: export_csv(&data.transactions, variant)?,
        })
    }

    pub async fn dashboard(&self, user: &AuthUser, group_id: Option<&str>) -> Result<Dashboard, FintrackError> {
        let scope = OwnerScope::resolve(&user.id, group_id);
        self.authorize_scope(&scope, user).await?;
        let transactions = self.storage.list_transactions(&scope).await?;
        let now = Utc::now();

        let this_month = month_start(now)
            .map(|start| count_since(&transactions, start))
            .unwrap_or_default();

        Ok(Dashboard {
            summary: dashboard_summary(&transactions, now),
            recent: recent_transactions(&transactions, RECENT_TRANSACTIONS_LIMIT),
            transactions_this_month: this_month,
            spending: spending_by_category(&transactions, main_currency(&transactions)),
        })
    }

    /// Daily totals for a month, plus the transactions of `day` when given.
    pub async fn calendar(
        &self,
        user: &AuthUser,
        group_id: Option<&str>,
        year: i32,
        month: u32,
        currency: CurrencyFilter,
        day: Option<NaiveDate>,
    ) -> Result<CalendarMonth, FintrackError> {
        if month_range(year, month).is_none() {
            return Err(FintrackError::invalid(
                "month",
                "Invalid month",
                "Month must be between 1 and 12",
            ));
        }
        let scope = OwnerScope::resolve(&user.id, group_id);
        self.authorize_scope(&scope, user).await?;
        let transactions = filter_by_currency(&self.storage.list_transactions(&scope).await?, currency);

        Ok(CalendarMonth {
            year,
            month,
            days: daily_totals(&transactions, year, month),
            day_transactions: day.map(|d| {
                let mut on_day = transactions_on(&transactions, d);
                sort_newest_first(&mut on_day);
                on_day
            }),
        })
    }
}
