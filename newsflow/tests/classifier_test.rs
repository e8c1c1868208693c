use newsflow::classifier::remote::RemoteClassifier;
use newsflow::classifier::{classify_with_fallback, Classifier, FALLBACK_CATEGORY};

#[tokio::test]
async fn test_remote_classifier_with_mock() {
    let mut server = mockito::Server::new_async().await;

    // Mock successful prediction
    let mock = server
        .mock("POST", "/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"category": "Business"}"#)
        .create_async()
        .await;

    let classifier = RemoteClassifier::new(format!("{}/predict", server.url()));

    let category = classifier.classify("stocks rally").await.expect("classify");
    assert_eq!(category, "Business");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_classifier_error_status() {
    let mut server = mockito::Server::new_async().await;

    // Mock service error
    let mock = server
        .mock("POST", "/predict")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "model not loaded"}"#)
        .create_async()
        .await;

    let classifier = RemoteClassifier::new(format!("{}/predict", server.url()));

    let result = classifier.classify("stocks rally").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("500"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_classifier_timeout() {
    let mut server = mockito::Server::new_async().await;

    // Mock slow response
    let _mock = server
        .mock("POST", "/predict")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_secs(3));
            w.write_all(b"too late")
        })
        .create_async()
        .await;

    let classifier =
        RemoteClassifier::new(format!("{}/predict", server.url())).with_timeout(1);

    let result = classifier.classify("stocks rally").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("timed out"));
}

#[tokio::test]
async fn test_fallback_degrades_without_propagating() {
    // Nothing listening on this port: connection errors must become the sentinel
    let classifier = RemoteClassifier::new("http://127.0.0.1:9/predict");

    let (category, ok) = classify_with_fallback(&classifier, "stocks rally").await;
    assert_eq!(category, FALLBACK_CATEGORY);
    assert!(!ok);
}

#[tokio::test]
async fn test_fallback_keeps_label_verbatim() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"category": "Health"}"#)
        .create_async()
        .await;

    let classifier = RemoteClassifier::new(format!("{}/predict", server.url()));

    let (category, ok) = classify_with_fallback(&classifier, "flu season update").await;
    assert_eq!(category, "Health");
    assert!(ok);
}
