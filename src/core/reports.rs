//! Aggregations over in-memory transaction lists.
//!
//! Everything here is a pure function of its inputs and is recomputed per request.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::constants::GROWTH_WINDOW_DAYS;
use crate::core::format::category_icon;
use crate::core::models::{Category, Currency, GroupMember, Transaction};

#[derive(Clone, Copy, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

impl CurrencyTotals {
    fn empty(currency: Currency) -> Self {
        CurrencyTotals {
            currency,
            income: 0.0,
            expenses: 0.0,
            balance: 0.0,
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        if transaction.is_income() {
            self.income += transaction.amount;
        } else {
            self.expenses += transaction.amount;
        }
        self.balance = self.income - self.expenses;
    }
}

/// Income, expense and balance per currency, ordered by currency code.
pub fn totals_by_currency(transactions: &[Transaction]) -> Vec<CurrencyTotals> {
    let mut totals: BTreeMap<&'static str, CurrencyTotals> = BTreeMap::new();
    for t in transactions {
        totals
            .entry(t.currency.code())
            .or_insert_with(|| CurrencyTotals::empty(t.currency))
            .add(t);
    }
    totals.into_values().collect()
}

/// Keeps transactions dated within `from..=to`.
pub fn filter_by_period(transactions: &[Transaction], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date >= from && t.date <= to)
        .cloned()
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CurrencyFilter {
    #[default]
    All,
    Only(Currency),
}

impl CurrencyFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            CurrencyFilter::All => true,
            CurrencyFilter::Only(currency) => transaction.currency == *currency,
        }
    }
}

impl FromStr for CurrencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CurrencyFilter::All)
        } else {
            s.parse().map(CurrencyFilter::Only)
        }
    }
}

impl TryFrom<String> for CurrencyFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CurrencyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyFilter::All => f.write_str("all"),
            CurrencyFilter::Only(currency) => write!(f, "{}", currency),
        }
    }
}

pub fn filter_by_currency(transactions: &[Transaction], filter: CurrencyFilter) -> Vec<Transaction> {
    transactions.iter().filter(|t| filter.matches(t)).cloned().collect()
}

#[derive(Clone, Copy, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownCell {
    pub currency: Currency,
    pub income: f64,
    pub expenses: f64,
    pub count: usize,
}

impl BreakdownCell {
    fn add(&mut self, transaction: &Transaction) {
        if transaction.is_income() {
            self.income += transaction.amount;
        } else {
            self.expenses += transaction.amount;
        }
        self.count += 1;
    }
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    pub currencies: Vec<BreakdownCell>,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberBreakdown {
    pub member: String,
    pub currencies: Vec<BreakdownCell>,
}

fn cells<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Vec<BreakdownCell> {
    let mut by_currency: BTreeMap<&'static str, BreakdownCell> = BTreeMap::new();
    for t in transactions {
        by_currency
            .entry(t.currency.code())
            .or_insert(BreakdownCell {
                currency: t.currency,
                income: 0.0,
                expenses: 0.0,
                count: 0,
            })
            .add(t);
    }
    by_currency.into_values().collect()
}

/// Groups by category, then by currency.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryBreakdown> {
    let mut by_category: BTreeMap<Category, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        by_category.entry(t.category).or_default().push(t);
    }
    by_category
        .into_iter()
        .map(|(category, list)| CategoryBreakdown {
            category,
            currencies: cells(list.into_iter()),
        })
        .collect()
}

/// Resolves who added a transaction: the current member record, then the
/// name stamped on the transaction, then `"Unknown"`.
pub fn resolve_member_name(transaction: &Transaction, members: &[GroupMember]) -> String {
    members
        .iter()
        .find(|m| m.user_id == transaction.created_by)
        .map(|m| m.display_name.clone())
        .or_else(|| transaction.created_by_name.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Groups by resolved member name, then by currency.
pub fn member_breakdown(transactions: &[Transaction], members: &[GroupMember]) -> Vec<MemberBreakdown> {
    let mut by_member: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        by_member.entry(resolve_member_name(t, members)).or_default().push(t);
    }
    by_member
        .into_iter()
        .map(|(member, list)| MemberBreakdown {
            member,
            currencies: cells(list.into_iter()),
        })
        .collect()
}

/// The most used currency. Equal counts go to the alphabetically first code;
/// an empty list yields USD.
pub fn main_currency(transactions: &[Transaction]) -> Currency {
    let mut counts: HashMap<Currency, usize> = HashMap::new();
    for t in transactions {
        *counts.entry(t.currency).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.code().cmp(a.code())))
        .map(|(currency, _)| currency)
        .unwrap_or_default()
}

/// Currencies present in the list, ordered by code.
pub fn currencies_used(transactions: &[Transaction]) -> Vec<Currency> {
    let mut currencies: Vec<Currency> = transactions.iter().map(|t| t.currency).collect();
    currencies.sort_by_key(|c| c.code());
    currencies.dedup();
    currencies
}

pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sort_newest_first(&mut sorted);
    sorted.truncate(limit);
    sorted
}

pub fn month_start(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    month_range(now.year(), now.month()).map(|(start, _)| start)
}

pub fn count_since(transactions: &[Transaction], since: DateTime<Utc>) -> usize {
    transactions.iter().filter(|t| t.date >= since).count()
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category: Category,
    pub icon: String,
    pub amount: f64,
}

/// Expense totals per category in `currency`, largest first.
pub fn spending_by_category(transactions: &[Transaction], currency: Currency) -> Vec<CategorySpending> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for t in transactions.iter().filter(|t| !t.is_income() && t.currency == currency) {
        *totals.entry(t.category).or_insert(0.0) += t.amount;
    }
    let mut spending: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category, amount)| CategorySpending {
            category,
            icon: category_icon(category).to_string(),
            amount,
        })
        .collect();
    spending.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    spending
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub count: usize,
}

/// Per-day totals for the days of `year`/`month` that have transactions.
pub fn daily_totals(transactions: &[Transaction], year: i32, month: u32) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
    for t in transactions {
        let day = t.date.date_naive();
        if day.year() != year || day.month() != month {
            continue;
        }
        let entry = days.entry(day).or_insert(DailyTotal {
            date: day,
            income: 0.0,
            expenses: 0.0,
            count: 0,
        });
        if t.is_income() {
            entry.income += t.amount;
        } else {
            entry.expenses += t.amount;
        }
        entry.count += 1;
    }
    days.into_values().collect()
}

pub fn transactions_on(transactions: &[Transaction], day: NaiveDate) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.date_naive() == day)
        .cloned()
        .collect()
}

/// First and last instant (inclusive, millisecond precision) of a calendar month.
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let next = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).single()?;
    Some((start, next - Duration::milliseconds(1)))
}

pub fn year_range(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    let next = Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single()?;
    Some((start, next - Duration::milliseconds(1)))
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReportPeriod {
    #[default]
    CurrentMonth,
    LastMonth,
    CurrentYear,
    LastYear,
}

impl ReportPeriod {
    /// Resolves the period to an inclusive date range relative to `now`.
    pub fn range(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            ReportPeriod::CurrentMonth => month_range(now.year(), now.month()),
            ReportPeriod::LastMonth => {
                if now.month() == 1 {
                    month_range(now.year() - 1, 12)
                } else {
                    month_range(now.year(), now.month() - 1)
                }
            }
            ReportPeriod::CurrentYear => year_range(now.year()),
            ReportPeriod::LastYear => year_range(now.year() - 1),
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub main_currency: Currency,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub currency_count: usize,
    pub income_growth: f64,
    pub expense_growth: f64,
}

fn growth(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Stats-card figures for the main currency.
///
/// Growth compares the last 30 days with the 30 days before them and is 0 when
/// the earlier window has no activity of that type.
pub fn dashboard_summary(transactions: &[Transaction], now: DateTime<Utc>) -> DashboardSummary {
    let main = main_currency(transactions);
    let totals = totals_by_currency(transactions);
    let main_totals = totals
        .iter()
        .find(|t| t.currency == main)
        .copied()
        .unwrap_or_else(|| CurrencyTotals::empty(main));

    let window_start = now - Duration::days(GROWTH_WINDOW_DAYS);
    let previous_start = now - Duration::days(GROWTH_WINDOW_DAYS * 2);
    let mut current = CurrencyTotals::empty(main);
    let mut previous = CurrencyTotals::empty(main);
    for t in transactions.iter().filter(|t| t.currency == main) {
        if t.date >= window_start {
            current.add(t);
        } else if t.date >= previous_start {
            previous.add(t);
        }
    }

    DashboardSummary {
        main_currency: main,
        income: main_totals.income,
        expenses: main_totals.expenses,
        balance: main_totals.balance,
        currency_count: totals.len(),
        income_growth: growth(current.income, previous.income),
        expense_growth: growth(current.expenses, previous.expenses),
    }
}
