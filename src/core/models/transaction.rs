use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Cup,
    Eur,
    Gbp,
    Cad,
    Aud,
    Jpy,
    Chf,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::Usd,
        Currency::Cup,
        Currency::Eur,
        Currency::Gbp,
        Currency::Cad,
        Currency::Aud,
        Currency::Jpy,
        Currency::Chf,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cup => "CUP",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| format!("unknown currency {}", s))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Groceries,
    #[serde(rename = "Dining Out")]
    DiningOut,
    Transportation,
    Utilities,
    #[serde(rename = "Rent/Mortgage")]
    RentMortgage,
    Entertainment,
    Shopping,
    Travel,
    Healthcare,
    Education,
    Income,
    Other,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Groceries,
        Category::DiningOut,
        Category::Transportation,
        Category::Utilities,
        Category::RentMortgage,
        Category::Entertainment,
        Category::Shopping,
        Category::Travel,
        Category::Healthcare,
        Category::Education,
        Category::Income,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::DiningOut => "Dining Out",
            Category::Transportation => "Transportation",
            Category::Utilities => "Utilities",
            Category::RentMortgage => "Rent/Mortgage",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Travel => "Travel",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Income => "Income",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category {}", s))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl TransactionItem {
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Selects which transaction collection an operation addresses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OwnerScope {
    User(String),
    Group(String),
}

impl OwnerScope {
    /// The group collection when `group_id` is given, otherwise the user's own.
    pub fn resolve(user_id: &str, group_id: Option<&str>) -> Self {
        match group_id {
            Some(id) => OwnerScope::Group(id.to_string()),
            None => OwnerScope::User(user_id.to_string()),
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            OwnerScope::Group(id) => Some(id),
            OwnerScope::User(_) => None,
        }
    }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerScope::User(id) => write!(f, "users/{}/transactions", id),
            OwnerScope::Group(id) => write!(f, "groups/{}/transactions", id),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TransactionItem>>,
    #[serde(default)]
    pub has_item_details: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Sum of `quantity * unit_price` over the item breakdown, if any.
    pub fn items_total(&self) -> Option<f64> {
        self.items
            .as_ref()
            .map(|items| items.iter().map(TransactionItem::total).sum())
    }
}

/// Entry-form payload: a transaction without its id or creator fields.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    #[serde(default)]
    pub items: Option<Vec<TransactionItem>>,
    #[serde(default)]
    pub has_item_details: bool,
}

/// Fields replaced by an edit. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
    pub items: Option<Vec<TransactionItem>>,
    pub has_item_details: Option<bool>,
}

impl TransactionPatch {
    pub fn apply(self, transaction: &mut Transaction) {
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(currency) = self.currency {
            transaction.currency = currency;
        }
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
        if let Some(items) = self.items {
            transaction.items = Some(items);
        }
        if let Some(has_item_details) = self.has_item_details {
            transaction.has_item_details = has_item_details;
        }
    }
}
