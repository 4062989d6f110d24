//! Display formatting for amounts and categories.

use crate::core::models::{Category, Currency, TransactionType};

pub fn symbol(currency: Currency) -> &'static str {
    match currency {
        Currency::Usd => "$",
        Currency::Cup => "₱",
        Currency::Eur => "€",
        Currency::Gbp => "£",
        Currency::Cad => "C$",
        Currency::Aud => "A$",
        Currency::Jpy => "¥",
        Currency::Chf => "Fr.",
    }
}

pub fn decimal_places(currency: Currency) -> usize {
    match currency {
        Currency::Jpy => 0,
        _ => 2,
    }
}

/// Formats `amount` with the currency symbol, thousands separators and the
/// currency's fixed number of decimals, e.g. `$1,234.50` or `¥45`.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol(currency), group_digits(amount.abs(), decimal_places(currency)))
}

/// Like [`format_currency`], prefixed by `+` for income and `-` for expenses.
/// The prefix follows the transaction type; `amount` is expected to be positive.
pub fn format_signed(amount: f64, currency: Currency, kind: TransactionType) -> String {
    let prefix = match kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    format!("{}{}", prefix, format_currency(amount.abs(), currency))
}

fn group_digits(amount: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, amount);
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{}.{}", grouped, fraction),
        None => grouped,
    }
}

pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Groceries => "shopping-cart",
        Category::DiningOut => "utensils-crossed",
        Category::Transportation => "car",
        Category::Utilities => "lightbulb",
        Category::RentMortgage => "home",
        Category::Entertainment => "film",
        Category::Shopping => "shirt",
        Category::Travel => "plane",
        Category::Healthcare => "heart-pulse",
        Category::Education => "book-open",
        Category::Income => "dollar-sign",
        Category::Other => "help-circle",
    }
}
