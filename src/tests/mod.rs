mod classifier_tests;
mod invitation_tests;
mod report_tests;
mod validation_tests;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::core::errors::FintrackError;
use crate::core::models::{AuthUser, Category, Currency, NewTransaction, Transaction, TransactionType};
use crate::core::services::FintrackService;
use crate::infrastructure::classifier::{Classification, Classifier};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_ORIGIN: &str = "https://fintrack.test";

/// Classifier returning a fixed verdict, or failing when `verdict` is `None`.
pub struct StubClassifier {
    verdict: Option<(String, f64)>,
}

impl StubClassifier {
    pub fn answering(category: &str, confidence: f64) -> Self {
        StubClassifier {
            verdict: Some((category.to_string(), confidence)),
        }
    }

    pub fn failing() -> Self {
        StubClassifier { verdict: None }
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _description: &str) -> Result<Classification, FintrackError> {
        match &self.verdict {
            Some((category, confidence)) => Ok(Classification {
                category: category.clone(),
                confidence: *confidence,
            }),
            None => Err(FintrackError::ClassifierError("service unavailable".to_string())),
        }
    }
}

pub type TestService = FintrackService<InMemoryLogging, InMemoryStorage, StubClassifier>;

pub fn create_service_with(classifier: StubClassifier) -> TestService {
    FintrackService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        classifier,
        TEST_SECRET.to_string(),
        TEST_ORIGIN.to_string(),
    )
}

pub fn create_test_service() -> TestService {
    create_service_with(StubClassifier::answering("Groceries", 0.9))
}

pub fn test_user(id: &str, email: &str, name: &str) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        email: email.to_string(),
        display_name: Some(name.to_string()),
        email_verified: true,
    }
}

pub fn alice() -> AuthUser {
    test_user("alice-id", "alice@example.com", "Alice")
}

pub fn bob() -> AuthUser {
    test_user("bob-id", "bob@example.com", "Bob")
}

pub fn carol() -> AuthUser {
    test_user("carol-id", "carol@example.com", "Carol")
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn new_expense(description: &str, amount: f64, currency: Currency, date: DateTime<Utc>) -> NewTransaction {
    NewTransaction {
        date,
        description: description.to_string(),
        amount,
        currency,
        kind: TransactionType::Expense,
        category: Category::Groceries,
        items: None,
        has_item_details: false,
    }
}

pub fn transaction(
    id: &str,
    kind: TransactionType,
    category: Category,
    amount: f64,
    currency: Currency,
    date: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        date,
        description: format!("Transaction {}", id),
        amount,
        currency,
        kind,
        category,
        items: None,
        has_item_details: false,
        group_id: None,
        created_by: "alice-id".to_string(),
        created_by_name: None,
    }
}
