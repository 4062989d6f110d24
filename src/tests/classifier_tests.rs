use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::errors::FintrackError;
use crate::infrastructure::classifier::Classifier;
use crate::infrastructure::classifier::http::HttpClassifier;

fn classifier_for(server: &MockServer, api_key: Option<&str>) -> HttpClassifier {
    HttpClassifier::builder()
        .endpoint(format!("{}/classify", server.uri()))
        .api_key(api_key.map(String::from))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_classify_posts_description_and_parses_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "transactionDescription": "Uber to airport" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggestedCategory": "Transportation",
            "confidence": 0.87
        })))
        .expect(1)
        .mount(&server)
        .await;

    let classification = classifier_for(&server, Some("test-key"))
        .classify("Uber to airport")
        .await
        .unwrap();
    assert_eq!(classification.category, "Transportation");
    assert_eq!(classification.confidence, 0.87);
}

#[tokio::test]
async fn test_classify_maps_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let result = classifier_for(&server, None).classify("Coffee").await;
    match result {
        Err(FintrackError::ClassifierError(message)) => assert!(message.contains("503")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_classify_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = classifier_for(&server, None).classify("Coffee").await;
    assert!(matches!(result, Err(FintrackError::ClassifierError(_))));
}
