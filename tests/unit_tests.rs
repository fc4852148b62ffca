//! Unit tests for individual components

use axum::http::StatusCode;
use career_copilot::{
    config::Config,
    error::{AppError, ErrorCategory},
    models::{PdfMetadata, RenderedSection, RenderedSections},
};
use std::env;
use std::time::Duration;

#[test]
fn test_config_from_env() {
    // Only test in this binary that touches the environment.
    let vars = [
        ("SERVER_HOST", "127.0.0.1"),
        ("SERVER_PORT", "9090"),
        ("MAX_FILE_SIZE_MB", "5"),
        ("OPENAI_API_KEY", "  sk-test-key  "),
        ("OPENAI_MODEL", "gpt-4o"),
        ("OPENAI_TEMPERATURE", "0.7"),
        ("OPENAI_BASE_URL", "http://localhost:1234/v1/"),
        ("LLM_TIMEOUT_SECONDS", "15"),
        ("JD_MIN_LENGTH", "50"),
        ("JD_LLM_CHECK", "true"),
        ("MAX_CONCURRENT_REQUESTS", "not-a-number"),
    ];
    for (k, v) in vars {
        env::set_var(k, v);
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.server_port, 9090);
    assert_eq!(config.max_file_size_mb, 5);
    assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
    assert_eq!(config.llm.api_key.as_deref(), Some("sk-test-key"));
    assert_eq!(config.llm.model, "gpt-4o");
    assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.llm.base_url, "http://localhost:1234/v1");
    assert_eq!(config.llm.timeout, Duration::from_secs(15));
    assert_eq!(config.validator.min_length, 50);
    assert!(config.validator.llm_check);
    // Unparseable values fall back to the default.
    assert_eq!(config.max_concurrent_requests, 100);

    env::set_var("OPENAI_TEMPERATURE", "5.0");
    assert!(Config::from_env().is_err());

    for (k, _) in vars {
        env::remove_var(k);
    }

    let config = Config::from_env().unwrap();
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.validator.min_length, 30);
}

#[test]
fn test_error_codes() {
    assert_eq!(AppError::unreadable("x").error_code(), "UNREADABLE_DOCUMENT");
    assert_eq!(AppError::NoTextFound.error_code(), "NO_TEXT_FOUND");
    assert_eq!(AppError::TooShort { length: 2, minimum: 30 }.error_code(), "TOO_SHORT");
    assert_eq!(
        AppError::NotAJobDescription { reason: "x".into() }.error_code(),
        "NOT_A_JOB_DESCRIPTION"
    );
    assert_eq!(AppError::AuthenticationFailed.error_code(), "AUTHENTICATION_FAILED");
    assert_eq!(AppError::RateLimited.error_code(), "RATE_LIMITED");
    assert_eq!(AppError::upstream("x").error_code(), "UPSTREAM_ERROR");
    assert_eq!(AppError::Timeout.error_code(), "TIMEOUT");
}

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::TooShort { length: 2, minimum: 30 }.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::NoTextFound.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(AppError::FileTooLarge { limit: 10 }.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(AppError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(AppError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(AppError::AuthenticationFailed.status_code(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_validation_rejections_are_distinct_from_system_faults() {
    let user_fixable = [
        AppError::TooShort { length: 2, minimum: 30 },
        AppError::NotAJobDescription { reason: "x".into() },
        AppError::unreadable("bad xref"),
        AppError::NoTextFound,
        AppError::MissingFile,
        AppError::MissingJobDescription,
    ];
    for err in user_fixable {
        assert_eq!(err.category(), ErrorCategory::Validation, "{:?}", err);
    }

    let faults = [
        AppError::AuthenticationFailed,
        AppError::RateLimited,
        AppError::upstream("500"),
        AppError::Timeout,
        AppError::internal("boom"),
    ];
    for err in faults {
        assert_eq!(err.category(), ErrorCategory::System, "{:?}", err);
    }
}

#[test]
fn test_error_messages_name_the_failure() {
    let msg = AppError::TooShort { length: 2, minimum: 30 }.to_string();
    assert!(msg.contains("too short"));
    assert!(msg.contains("30"));
    assert!(AppError::AuthenticationFailed.to_string().contains("credentials"));
}

#[test]
fn test_error_conversions() {
    let app_error: AppError = anyhow::anyhow!("Test error").into();
    match app_error {
        AppError::Internal { message } => assert!(message.contains("Test error")),
        _ => panic!("Expected Internal error"),
    }
}

#[tokio::test]
async fn test_elapsed_converts_to_timeout() {
    let elapsed = tokio::time::timeout(Duration::from_millis(1), std::future::pending::<()>())
        .await
        .unwrap_err();
    assert!(matches!(AppError::from(elapsed), AppError::Timeout));
}

#[test]
fn test_pdf_metadata_builder() {
    let metadata = PdfMetadata::new(1024)
        .with_title(Some("Jane Doe - Resume".to_string()))
        .with_author(None);

    assert_eq!(metadata.file_size_bytes, 1024);
    assert_eq!(metadata.title.as_deref(), Some("Jane Doe - Resume"));
    assert!(metadata.author.is_none());
}

#[test]
fn test_rendered_sections_lookup() {
    let sections = RenderedSections {
        sections: vec![RenderedSection {
            key: "summary".into(),
            title: "Tailored Professional Summary".into(),
            body: "Good fit.".into(),
            html: "<p>Good fit.</p>\n".into(),
        }],
        degraded: false,
    };
    assert_eq!(sections.body("summary"), Some("Good fit."));
    assert!(sections.get("gaps").is_none());
}
