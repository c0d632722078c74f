use crate::{Client, ClientError};

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = Client::new("http://localhost:9000/");
    assert_eq!(client.base_url, "http://localhost:9000");
}

#[test]
fn test_base_url_no_trailing_slash() {
    let client = Client::new("http://localhost:9000");
    assert_eq!(client.base_url, "http://localhost:9000");
}

#[test]
fn test_api_error_exposes_output() {
    let error = ClientError::api_error(
        "LAUNCH_FAILED".to_string(),
        "alpha exited".to_string(),
        Some("Traceback".to_string()),
    );

    assert_eq!(error.output(), Some("Traceback"));
    assert!(error.to_string().contains("LAUNCH_FAILED"));
}
