//! CLI error helpers shared by the encoder and decoder binaries.

use std::fmt;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Format a user friendly I/O error message with suggestions.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the file exists and the path is correct.",
        PermissionDenied => "Check permissions or run as a different user.",
        UnexpectedEof => "File appears truncated or corrupted.",
        WriteZero => "Disk may be full. Free up space and try again.",
        _ => "Check permissions or free up disk space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a CLI error with context.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError {
        msg: format_io_error(operation, path, &err),
        source: Some(Box::new(err)),
    }
}

/// Simple CLI error from string.
pub fn simple_cli_error(msg: &str) -> CliError {
    CliError {
        msg: msg.to_string(),
        source: None,
    }
}

/// Invalid file extension error.
pub fn extension_error(path: &Path) -> CliError {
    CliError {
        msg: format!(
            "Invalid file extension for '{}'. Expected .nmq. Check the input file.",
            path.display()
        ),
        source: None,
    }
}

/// Convert a nimiqode library error into a CLI error with a hint.
pub fn nimiqode_cli_error(context: &str, err: crate::NimiqodeError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for a nimiqode error variant.
pub fn cli_hint(err: &crate::NimiqodeError) -> String {
    use crate::NimiqodeError::*;
    match err {
        InvalidArgument(msg) => format!("{msg}. Check the command line arguments."),
        PayloadTooLarge { bits, max } => {
            format!("Payload of {bits} bits exceeds the {max} bit maximum. Split the data.")
        }
        UnsupportedVersion(v) => format!("Version {v} is not supported. Re-encode the code."),
        LengthMismatch { .. } => {
            "Declared and observed lengths disagree. The ring dump may be truncated.".into()
        }
        FecDecodeFailure(e) => format!("{e}. The scan is too damaged to recover."),
        ChecksumMismatch { .. } => "Payload recovered but corrupt. Re-scan the code.".into(),
        Header(msg) => format!("{msg}. Verify the dump is intact."),
        Io(io) => format!("{io}"),
        Internal(msg) => format!("{msg}. This is a bug."),
    }
}
