use crate::core::errors::FintrackError;
use crate::core::models::TransactionItem;
use crate::core::validation::{
    validate_amount, validate_description, validate_email, validate_group_description, validate_group_name,
    validate_items,
};

fn item(description: &str, quantity: f64, unit_price: f64) -> TransactionItem {
    TransactionItem {
        description: description.to_string(),
        quantity,
        unit_price,
        unit: None,
    }
}

#[test]
fn test_description_bounds() {
    assert_eq!(validate_description("  Rent  ").unwrap(), "Rent");
    assert!(validate_description("ab").is_ok());
    assert!(validate_description(" a ").is_err());
    assert!(validate_description(&"a".repeat(255)).is_ok());

    match validate_description(&"a".repeat(256)) {
        Err(FintrackError::InvalidInput(field, detail)) => {
            assert_eq!(field, "description");
            assert_eq!(detail.title, "Description Too Long");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_description_rejects_line_breaks() {
    for value in ["Dinner\nwith friends", "Tab\there", "Bell\u{7}"] {
        match validate_description(value) {
            Err(FintrackError::InvalidInput(field, _)) => assert_eq!(field, "description"),
            other => panic!("{:?} should be rejected, got {:?}", value, other),
        }
    }
    // Surrounding whitespace is trimmed before the check.
    assert_eq!(validate_description("Lunch\n").unwrap(), "Lunch");
}

#[test]
fn test_amount_must_be_positive_and_finite() {
    assert!(validate_amount("amount", 0.01).is_ok());
    assert!(validate_amount("amount", 0.0).is_err());
    assert!(validate_amount("amount", -3.0).is_err());
    assert!(validate_amount("amount", f64::NAN).is_err());
    assert!(validate_amount("amount", f64::INFINITY).is_err());
}

#[test]
fn test_items_total_and_errors() {
    let total = validate_items(&[item("Rice", 2.0, 1.5), item("Beans", 4.0, 0.25)]).unwrap();
    assert_eq!(total, 4.0);

    assert!(matches!(
        validate_items(&[]),
        Err(FintrackError::InvalidInput(ref field, _)) if field == "items"
    ));
    assert!(matches!(
        validate_items(&[item("Rice", 1.0, 1.0), item("  ", 1.0, 1.0)]),
        Err(FintrackError::InvalidInput(ref field, _)) if field == "items[1].description"
    ));
    assert!(matches!(
        validate_items(&[item("Rice", 0.0, 1.0)]),
        Err(FintrackError::InvalidInput(ref field, _)) if field == "items[0].quantity"
    ));
    assert!(matches!(
        validate_items(&[item("Rice", 1.0, -1.0)]),
        Err(FintrackError::InvalidInput(ref field, _)) if field == "items[0].unitPrice"
    ));
}

#[test]
fn test_group_name_and_description() {
    assert_eq!(validate_group_name(" Family ").unwrap(), "Family");
    assert!(validate_group_name(&"n".repeat(100)).is_ok());
    assert!(validate_group_name(&"n".repeat(101)).is_err());
    assert!(validate_group_name("Bad{name}").is_err());
    assert!(validate_group_name("tab\tname").is_err());

    assert_eq!(validate_group_description("").unwrap(), "");
    assert!(validate_group_description(&"d".repeat(500)).is_ok());
    assert!(validate_group_description(&"d".repeat(501)).is_err());
}

#[test]
fn test_email_shape() {
    assert_eq!(validate_email(" Bob@Example.com ").unwrap(), "Bob@Example.com");
    for bad in ["", "bob", "bob@", "@example.com", "bob@example", "bob @example.com", "bob@.com"] {
        assert!(
            matches!(validate_email(bad), Err(FintrackError::InvalidEmail(_))),
            "{:?} should be rejected",
            bad
        );
    }
}
