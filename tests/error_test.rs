use std::io;
use std::path::PathBuf;

use sprout::constants::{
    EXIT_ABORTED, EXIT_FAILURE, EXIT_IO_ERROR, EXIT_VALIDATION_ERROR, EXIT_VCS_ERROR,
};
use sprout::error::{Error, VcsError};

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::OutputDirectoryNotEmpty { output_dir: "demo".to_string() };
    assert_eq!(
        err.to_string(),
        "The directory 'demo' is not empty. Please specify a different location."
    );

    let err = Error::WriteError {
        path: PathBuf::from("demo/README.md"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
    };
    assert!(err.to_string().starts_with("Failed to write 'demo/README.md': permission denied"));
    assert!(err.to_string().contains("Remove the directory"));
}

#[test]
fn test_exit_codes() {
    let validation = Error::InvalidLocation { location: "a/b".into(), reason: "x".into() };
    assert_eq!(validation.exit_code(), EXIT_VALIDATION_ERROR);

    let collision = Error::PathCollision {
        first: "a".into(),
        second: "b".into(),
        target: "c".into(),
    };
    assert_eq!(collision.exit_code(), EXIT_VALIDATION_ERROR);

    let io = Error::WriteError {
        path: PathBuf::from("x"),
        source: io::Error::new(io::ErrorKind::Other, "disk full"),
    };
    assert_eq!(io.exit_code(), EXIT_IO_ERROR);
    let read = Error::IoError(io::Error::new(io::ErrorKind::NotFound, "config.yml"));
    assert_eq!(read.exit_code(), EXIT_FAILURE);
    assert_eq!(Error::ConfigError("bad".into()).exit_code(), EXIT_FAILURE);
    assert_eq!(Error::Aborted.exit_code(), EXIT_ABORTED);
    assert_eq!(VcsError::Unavailable.exit_code(), EXIT_VCS_ERROR);
    assert_ne!(EXIT_VCS_ERROR, 0);
}
