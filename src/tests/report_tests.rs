use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::core::errors::FintrackError;
use crate::core::models::TransactionType::{Expense, Income};
use crate::core::models::{Category, Currency, GroupMember, OwnerScope, Role};
use crate::core::reports::{
    CurrencyFilter, ReportPeriod, category_breakdown, daily_totals, dashboard_summary, filter_by_currency,
    filter_by_period, main_currency, member_breakdown, month_range, resolve_member_name, spending_by_category,
    totals_by_currency,
};
use crate::core::services::ReportRequest;
use crate::tests::{alice, at, bob, carol, create_test_service, new_expense, transaction};

#[test]
fn test_totals_by_currency() {
    let list = vec![
        transaction("1", Income, Category::Income, 1000.0, Currency::Usd, at(2024, 3, 1)),
        transaction("2", Expense, Category::Groceries, 250.0, Currency::Usd, at(2024, 3, 2)),
        transaction("3", Expense, Category::Travel, 80.0, Currency::Eur, at(2024, 3, 3)),
    ];

    let totals = totals_by_currency(&list);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].currency, Currency::Eur);
    assert_eq!(totals[0].expenses, 80.0);
    assert_eq!(totals[0].balance, -80.0);
    assert_eq!(totals[1].currency, Currency::Usd);
    assert_eq!(totals[1].income, 1000.0);
    assert_eq!(totals[1].expenses, 250.0);
    assert_eq!(totals[1].balance, 750.0);
}

#[test]
fn test_filters() {
    let list = vec![
        transaction("1", Expense, Category::Groceries, 10.0, Currency::Usd, at(2024, 2, 28)),
        transaction("2", Expense, Category::Groceries, 20.0, Currency::Eur, at(2024, 3, 1)),
        transaction("3", Expense, Category::Groceries, 30.0, Currency::Usd, at(2024, 3, 31)),
    ];
    let (from, to) = month_range(2024, 3).unwrap();

    let march = filter_by_period(&list, from, to);
    assert_eq!(march.len(), 2);
    let usd = filter_by_currency(&march, CurrencyFilter::Only(Currency::Usd));
    assert_eq!(usd.len(), 1);
    assert_eq!(usd[0].id, "3");
    assert_eq!(filter_by_currency(&march, CurrencyFilter::All).len(), 2);
}

#[test]
fn test_currency_filter_parsing() {
    assert_eq!("all".parse::<CurrencyFilter>().unwrap(), CurrencyFilter::All);
    assert_eq!("ALL".parse::<CurrencyFilter>().unwrap(), CurrencyFilter::All);
    assert_eq!(
        "JPY".parse::<CurrencyFilter>().unwrap(),
        CurrencyFilter::Only(Currency::Jpy)
    );
    assert!("XYZ".parse::<CurrencyFilter>().is_err());
    assert_eq!(CurrencyFilter::Only(Currency::Eur).to_string(), "EUR");
}

#[test]
fn test_month_range_bounds() {
    let (start, end) = month_range(2024, 2).unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() - Duration::milliseconds(1));
    assert!(month_range(2024, 13).is_none());

    let (start, _) = month_range(2024, 12).unwrap();
    assert_eq!(start.month(), 12);
}

#[test]
fn test_report_period_last_month_wraps_year() {
    let now = at(2024, 1, 15);
    let (from, to) = ReportPeriod::LastMonth.range(now).unwrap();
    assert_eq!(from, Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap());
    assert_eq!(to.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

    let (from, _) = ReportPeriod::CurrentYear.range(now).unwrap();
    assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_main_currency() {
    assert_eq!(main_currency(&[]), Currency::Usd);

    let list = vec![
        transaction("1", Expense, Category::Groceries, 1.0, Currency::Eur, at(2024, 1, 1)),
        transaction("2", Expense, Category::Groceries, 1.0, Currency::Jpy, at(2024, 1, 1)),
        transaction("3", Expense, Category::Groceries, 1.0, Currency::Jpy, at(2024, 1, 1)),
    ];
    assert_eq!(main_currency(&list), Currency::Jpy);

    // Ties go to the alphabetically first code.
    let tied = vec![
        transaction("1", Expense, Category::Groceries, 1.0, Currency::Usd, at(2024, 1, 1)),
        transaction("2", Expense, Category::Groceries, 1.0, Currency::Eur, at(2024, 1, 1)),
    ];
    assert_eq!(main_currency(&tied), Currency::Eur);
}

#[test]
fn test_category_breakdown_splits_currencies() {
    let list = vec![
        transaction("1", Expense, Category::Groceries, 10.0, Currency::Usd, at(2024, 1, 1)),
        transaction("2", Expense, Category::Groceries, 5.0, Currency::Usd, at(2024, 1, 2)),
        transaction("3", Expense, Category::Groceries, 7.0, Currency::Eur, at(2024, 1, 3)),
        transaction("4", Income, Category::Income, 100.0, Currency::Usd, at(2024, 1, 4)),
    ];

    let breakdown = category_breakdown(&list);
    assert_eq!(breakdown.len(), 2);
    let groceries = breakdown.iter().find(|b| b.category == Category::Groceries).unwrap();
    assert_eq!(groceries.currencies.len(), 2);
    let usd = groceries.currencies.iter().find(|c| c.currency == Currency::Usd).unwrap();
    assert_eq!(usd.expenses, 15.0);
    assert_eq!(usd.count, 2);
}

#[test]
fn test_member_names_resolve_with_fallbacks() {
    let members = vec![GroupMember {
        user_id: "alice-id".to_string(),
        email: "alice@example.com".to_string(),
        display_name: "Alice".to_string(),
        role: Role::Admin,
        joined_at: at(2024, 1, 1),
    }];

    let mut by_member = transaction("1", Expense, Category::Groceries, 10.0, Currency::Usd, at(2024, 1, 1));
    assert_eq!(resolve_member_name(&by_member, &members), "Alice");

    by_member.created_by = "gone-id".to_string();
    by_member.created_by_name = Some("Former Member".to_string());
    assert_eq!(resolve_member_name(&by_member, &members), "Former Member");

    by_member.created_by_name = None;
    assert_eq!(resolve_member_name(&by_member, &members), "Unknown");

    let list = vec![
        transaction("1", Expense, Category::Groceries, 10.0, Currency::Usd, at(2024, 1, 1)),
        by_member,
    ];
    let breakdown = member_breakdown(&list, &members);
    let names: Vec<&str> = breakdown.iter().map(|b| b.member.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Unknown"]);
}

#[test]
fn test_spending_by_category_sorted_descending() {
    let list = vec![
        transaction("1", Expense, Category::Groceries, 30.0, Currency::Usd, at(2024, 1, 1)),
        transaction("2", Expense, Category::Travel, 120.0, Currency::Usd, at(2024, 1, 2)),
        transaction("3", Expense, Category::Groceries, 20.0, Currency::Usd, at(2024, 1, 3)),
        transaction("4", Expense, Category::Travel, 999.0, Currency::Eur, at(2024, 1, 3)),
        transaction("5", Income, Category::Income, 500.0, Currency::Usd, at(2024, 1, 4)),
    ];

    let spending = spending_by_category(&list, Currency::Usd);
    assert_eq!(spending.len(), 2);
    assert_eq!(spending[0].category, Category::Travel);
    assert_eq!(spending[0].amount, 120.0);
    assert_eq!(spending[0].icon, "plane");
    assert_eq!(spending[1].category, Category::Groceries);
    assert_eq!(spending[1].amount, 50.0);
}

#[test]
fn test_daily_totals_for_month() {
    let list = vec![
        transaction("1", Expense, Category::Groceries, 10.0, Currency::Usd, at(2024, 5, 3)),
        transaction("2", Income, Category::Income, 50.0, Currency::Usd, at(2024, 5, 3)),
        transaction("3", Expense, Category::Groceries, 5.0, Currency::Usd, at(2024, 5, 20)),
        transaction("4", Expense, Category::Groceries, 5.0, Currency::Usd, at(2024, 6, 1)),
    ];

    let days = daily_totals(&list, 2024, 5);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    assert_eq!(days[0].income, 50.0);
    assert_eq!(days[0].expenses, 10.0);
    assert_eq!(days[0].count, 2);
    assert_eq!(days[1].count, 1);
}

#[test]
fn test_dashboard_growth() {
    let now = at(2024, 6, 30);
    let list = vec![
        transaction("1", Expense, Category::Groceries, 150.0, Currency::Usd, now - Duration::days(5)),
        transaction("2", Expense, Category::Groceries, 100.0, Currency::Usd, now - Duration::days(40)),
        transaction("3", Income, Category::Income, 300.0, Currency::Usd, now - Duration::days(3)),
    ];

    let summary = dashboard_summary(&list, now);
    assert_eq!(summary.main_currency, Currency::Usd);
    assert_eq!(summary.income, 300.0);
    assert_eq!(summary.expenses, 250.0);
    assert_eq!(summary.balance, 50.0);
    assert_eq!(summary.currency_count, 1);
    assert_eq!(summary.expense_growth, 50.0);
    // No income in the previous window.
    assert_eq!(summary.income_growth, 0.0);
}

#[tokio::test]
async fn test_report_for_explicit_range() {
    let service = create_test_service();
    let user = alice();
    let scope = OwnerScope::User(user.id.clone());
    for (description, amount, currency, day) in [
        ("Bread", 4.0, Currency::Usd, at(2024, 3, 2)),
        ("Sushi", 1500.0, Currency::Jpy, at(2024, 3, 5)),
        ("Outside", 99.0, Currency::Usd, at(2024, 4, 2)),
    ] {
        service
            .create_transaction(&user, &scope, new_expense(description, amount, currency, day))
            .await
            .unwrap();
    }

    let request = ReportRequest {
        from: NaiveDate::from_ymd_opt(2024, 3, 1),
        to: NaiveDate::from_ymd_opt(2024, 3, 31),
        currency: CurrencyFilter::Only(Currency::Usd),
        ..Default::default()
    };
    let report = service.report(&user, &request).await.unwrap();

    assert_eq!(report.transaction_count, 1);
    assert_eq!(report.currencies, vec![Currency::Jpy, Currency::Usd]);
    assert_eq!(report.totals.len(), 1);
    assert_eq!(report.totals[0].expenses, 4.0);
    assert!(report.members.is_none());
}

#[tokio::test]
async fn test_report_rejects_inverted_or_partial_range() {
    let service = create_test_service();
    let user = alice();

    let inverted = ReportRequest {
        from: NaiveDate::from_ymd_opt(2024, 3, 31),
        to: NaiveDate::from_ymd_opt(2024, 3, 1),
        ..Default::default()
    };
    let result = service.report(&user, &inverted).await;
    assert!(matches!(result, Err(FintrackError::InvalidInput(_, _))));

    let partial = ReportRequest {
        from: NaiveDate::from_ymd_opt(2024, 3, 1),
        ..Default::default()
    };
    let result = service.report(&user, &partial).await;
    assert!(matches!(result, Err(FintrackError::InvalidInput(_, _))));
}

#[tokio::test]
async fn test_group_report_includes_members() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Flat", "").await.unwrap();
    let created = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();
    service.accept_invitation(&bob(), &created.invitation.id).await.unwrap();
    let scope = OwnerScope::Group(group.id.clone());
    service
        .create_transaction(&alice(), &scope, new_expense("Rent share", 500.0, Currency::Usd, at(2024, 3, 1)))
        .await
        .unwrap();
    service
        .create_transaction(&bob(), &scope, new_expense("Internet", 40.0, Currency::Usd, at(2024, 3, 8)))
        .await
        .unwrap();

    let request = ReportRequest {
        group_id: Some(group.id.clone()),
        from: NaiveDate::from_ymd_opt(2024, 3, 1),
        to: NaiveDate::from_ymd_opt(2024, 3, 31),
        ..Default::default()
    };
    let report = service.report(&bob(), &request).await.unwrap();
    let members = report.members.unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.member.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    let result = service.report(&carol(), &request).await;
    assert!(matches!(result, Err(FintrackError::NotGroupMember(_))));
}

#[tokio::test]
async fn test_dashboard_recent_transactions() {
    let service = create_test_service();
    let user = alice();
    let scope = OwnerScope::User(user.id.clone());
    let now = Utc::now();
    for days_ago in 0..7 {
        service
            .create_transaction(
                &user,
                &scope,
                new_expense(&format!("Item {}", days_ago), 10.0, Currency::Usd, now - Duration::days(days_ago)),
            )
            .await
            .unwrap();
    }

    let dashboard = service.dashboard(&user, None).await.unwrap();
    assert_eq!(dashboard.recent.len(), 5);
    assert_eq!(dashboard.recent[0].description, "Item 0");
    assert_eq!(dashboard.summary.expenses, 70.0);
    assert_eq!(dashboard.spending.len(), 1);
    assert_eq!(dashboard.spending[0].amount, 70.0);
}

#[tokio::test]
async fn test_calendar_month_and_day() {
    let service = create_test_service();
    let user = alice();
    let scope = OwnerScope::User(user.id.clone());
    for (description, day) in [("Early", at(2024, 5, 3)), ("Late", at(2024, 5, 20)), ("Next", at(2024, 6, 1))] {
        service
            .create_transaction(&user, &scope, new_expense(description, 12.0, Currency::Usd, day))
            .await
            .unwrap();
    }

    let day = NaiveDate::from_ymd_opt(2024, 5, 20);
    let calendar = service
        .calendar(&user, None, 2024, 5, CurrencyFilter::All, day)
        .await
        .unwrap();
    assert_eq!(calendar.days.len(), 2);
    let on_day = calendar.day_transactions.unwrap();
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].description, "Late");

    let result = service.calendar(&user, None, 2024, 0, CurrencyFilter::All, None).await;
    assert!(matches!(result, Err(FintrackError::InvalidInput(ref field, _)) if field == "month"));
}
