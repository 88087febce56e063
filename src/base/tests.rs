use crate::base::lookuperror::LookupError;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn test_exit_codes_by_category() {
    assert_eq!(LookupError::NoInputSources.exit_code(), 2);
    assert_eq!(
        LookupError::ConsumerCountOutOfRange { count: 0, min: 1, max: 10 }.exit_code(),
        2
    );

    let sink = LookupError::SinkWriteFailed {
        source: Arc::new(io::Error::new(io::ErrorKind::Other, "disk full")),
    };
    assert_eq!(sink.exit_code(), 3);

    assert_eq!(LookupError::QueueDisconnected.exit_code(), 4);
    assert_eq!(LookupError::NoAddresses { domain: "a.test".into() }.exit_code(), 1);
}

#[test]
fn test_recoverable_errors() {
    let open = LookupError::SourceOpenFailed {
        path: PathBuf::from("missing.txt"),
        source: Arc::new(io::Error::new(io::ErrorKind::NotFound, "missing")),
    };
    assert!(open.is_recoverable());
    assert!(LookupError::dns_failed("x.invalid", io::Error::other("nx")).is_recoverable());

    let write = LookupError::SinkWriteFailed {
        source: Arc::new(io::Error::new(io::ErrorKind::Other, "disk full")),
    };
    assert!(!write.is_recoverable());
    assert!(!LookupError::QueueDisconnected.is_recoverable());
}

#[test]
fn test_config_errors_are_flagged() {
    assert!(LookupError::ZeroQueueCapacity.is_config_error());
    assert!(LookupError::InvalidOverride("nope".into()).is_config_error());
    assert!(!LookupError::QueueDisconnected.is_config_error());
}

#[test]
fn test_error_display_carries_context() {
    let err = LookupError::ConsumerCountOutOfRange { count: 0, min: 1, max: 10 };
    assert_eq!(err.to_string(), "Consumer count 0 out of range (1..=10)");

    let err = LookupError::NameTooLong { length: 2000, max: 1024 };
    assert!(err.to_string().contains("2000"));
}
