use tessera::core::error::AppError;
use tessera::core::store::StoreError;
use tessera::core::types::{ErrorCategory, ErrorSeverity};

#[test]
fn test_error_creation_all_categories() {
    let categories = vec![
        ErrorCategory::MalformedDocument,
        ErrorCategory::ConstructionFailure,
        ErrorCategory::SerializationFailure,
        ErrorCategory::ProvisioningFailure,
        ErrorCategory::ConfigurationError,
        ErrorCategory::IoError,
        ErrorCategory::InternalError,
        ErrorCategory::Unknown,
    ];

    for category in categories {
        let error = AppError::new(category, "test message");
        assert_eq!(error.category, category);
        assert_eq!(error.message, "test message");
        assert_eq!(error.context.len(), 0);
        assert_eq!(error.recovery_suggestions.len(), 0);
        assert!(error.occurred_at <= chrono::Utc::now());
        assert!(error.source.is_none());
    }
}

#[test]
fn test_error_severity_mapping() {
    let test_cases = vec![
        (ErrorCategory::MalformedDocument, ErrorSeverity::Error),
        (ErrorCategory::ConstructionFailure, ErrorSeverity::Error),
        (ErrorCategory::SerializationFailure, ErrorSeverity::Error),
        (ErrorCategory::ProvisioningFailure, ErrorSeverity::Error),
        (ErrorCategory::ConfigurationError, ErrorSeverity::Error),
        (ErrorCategory::IoError, ErrorSeverity::Error),
        (ErrorCategory::InternalError, ErrorSeverity::Error),
        (ErrorCategory::Unknown, ErrorSeverity::Info),
    ];

    for (category, expected_severity) in test_cases {
        let error = AppError::new(category, "test");
        assert_eq!(error.severity(), expected_severity);
    }
}

#[test]
fn test_construction_error_carries_type_and_field() {
    let error = AppError::construction("Tessera.WriteLine", "bad text").at_field("text");

    assert_eq!(error.category, ErrorCategory::ConstructionFailure);
    assert_eq!(error.code, "ACT-CTOR-001");
    assert_eq!(
        error.context.get("type_name").map(String::as_str),
        Some("Tessera.WriteLine")
    );
    assert_eq!(error.context.get("field").map(String::as_str), Some("text"));
}

#[test]
fn test_innermost_field_wins() {
    let error = AppError::construction("Tessera.If", "bad")
        .at_field("condition")
        .at_field("then");
    assert_eq!(
        error.context.get("field").map(String::as_str),
        Some("condition")
    );
}

#[test]
fn test_error_display() {
    let mut error = AppError::malformed("ACT-READ-002", "failed to extract activity typeName");
    error.add_context("document", "workflow.json");

    let display = format!("{}", error);
    assert!(display.contains("ACT-READ-002"));
    assert!(display.contains("MalformedDocument"));
    assert!(display.contains("typeName"));
    assert!(display.contains("workflow.json"));
}

#[test]
fn test_suggestions_accumulate() {
    let error = AppError::new(ErrorCategory::ConfigurationError, "missing alias")
        .with_suggestion("add an alias")
        .with_suggestion("or drop the document type");
    assert_eq!(error.recovery_suggestions.len(), 2);
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: AppError = io.into();
    assert_eq!(error.category, ErrorCategory::IoError);
}

#[test]
fn test_store_error_keeps_original_as_source() {
    let store_error = StoreError::MissingAlias {
        document_type: "WorkflowInstance".to_string(),
    };
    let error: AppError = store_error.into();

    assert_eq!(error.category, ErrorCategory::ProvisioningFailure);
    assert_eq!(error.code, "STORE-CFG-001");
    let source = error.source.as_ref().expect("source should be kept");
    assert!(source.to_string().contains("WorkflowInstance"));
}
