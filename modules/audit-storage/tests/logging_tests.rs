//! Log output of the receiver. Kept in its own test binary because each test
//! installs a thread-local subscriber.

mod common;

use axum::http::StatusCode;
use serial_test::serial;
use tower::ServiceExt;

use common::{app, binary_event, CapturedLogs, SUBJECT};

#[tokio::test]
#[serial]
async fn test_mismatch_logs_service_name() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let response = app()
        .oneshot(binary_event(
            SUBJECT,
            r#"{"serviceName":"pubsub.googleapis.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let output = logs.contents();
    assert!(
        output.contains("non-storage audit log received: pubsub.googleapis.com"),
        "mismatch should be logged, got: {output}"
    );
    assert!(output.contains(
        "Detected change in Cloud Storage bucket: projects/p/buckets/b/objects/o"
    ));
}

#[tokio::test]
#[serial]
async fn test_match_logs_detection_only() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let response = app()
        .oneshot(binary_event(
            SUBJECT,
            r#"{"serviceName":"storage.googleapis.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let output = logs.contents();
    assert!(output.contains(
        "Detected change in Cloud Storage bucket: projects/p/buckets/b/objects/o"
    ));
    assert!(!output.contains("non-storage audit log received"));
}

#[tokio::test]
#[serial]
async fn test_rejection_is_logged() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let response = app()
        .oneshot(binary_event(SUBJECT, "[1, 2, 3]"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(logs.contents().contains("Rejected event"));
}

#[tokio::test]
#[serial]
async fn test_detection_log_names_principal_and_source() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let response = app()
        .oneshot(binary_event(
            SUBJECT,
            r#"{"serviceName":"pubsub.googleapis.com","authenticationInfo":{"principalEmail":"dev@example.com"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let output = logs.contents();
    assert!(output.contains("principal=dev@example.com"), "got: {output}");
    assert!(
        output.contains("source=//cloudaudit.googleapis.com/projects/p/logs/activity"),
        "got: {output}"
    );
}
