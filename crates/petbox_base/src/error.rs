use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

/* 📖 # Why a custom error type and not anyhow/thiserror?

- Better control over error handling
- No dependencies to compile and integrate
- More transparency into error handling logic
 */

/// Error variants that can occur in petbox operations.
/// Each variant represents a specific error category with its associated context.
#[derive(Debug)]
pub enum ErrorKind {
    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file exists but its contents could not be decoded as the expected structure
    DecodeError { path: PathBuf, message: String },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* 📖 # Why separate ErrorKind and PetboxError?
This two-layer design provides a clear separation of concerns:
- ErrorKind: structural variants with specific contexts (file paths, decode details)
- PetboxError: wraps ErrorKind with additional runtime context strings

Users can pattern match on ErrorKind for specific handling (the store tests
distinguish missing-file bootstrap from decode failures this way), while
propagation sites attach context without nesting.
*/

/// Error type wrapping ErrorKind with optional context.
#[derive(Debug)]
pub struct PetboxError {
    kind: ErrorKind,
    context: Vec<String>,
}

impl PetboxError {
    /// Creates a new error from an ErrorKind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
        }
    }

    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Creates a file error for the given path.
    pub fn file(path: PathBuf, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileError { path, source })
    }

    /// Creates a decode error for the given path. The cause is captured as a
    /// rendered message so the base crate stays free of serializer dependencies.
    pub fn decode(path: PathBuf, cause: impl fmt::Display) -> Self {
        Self::new(ErrorKind::DecodeError {
            path,
            message: cause.to_string(),
        })
    }

    /// Attaches context to an error.
    /// Context is displayed before the error message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl From<ErrorKind> for PetboxError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for PetboxError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::DecodeError { .. } => None,
            ErrorKind::Message { .. } => None,
        }
    }
}

impl fmt::Display for PetboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ctx) in self.context.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", ctx)?;
            } else {
                write!(f, ": {}", ctx)?;
            }
        }

        if !self.context.is_empty() {
            write!(f, ": ")?;
        }

        match &self.kind {
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::DecodeError { path, message } => {
                write!(f, "Failed to decode {}: {}", path.display(), message)
            }
            ErrorKind::Message { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

/* 📖 # Why use Box<PetboxError> in the result type?

Boxing the error reduces the size of the result type, making it more efficient
to return in the common case.
*/

/// Standard result type for petbox operations.
pub type PetboxResult<T> = std::result::Result<T, Box<PetboxError>>;

/// Builds a boxed message error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::PetboxError::message(format!($($arg)*)))
    };
}

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> PetboxResult<T>;

    /// Attaches context using lazy evaluation.
    /// Prefer this to avoid expensive string formatting in the success path.
    fn with_context<F>(self, f: F) -> PetboxResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for PetboxResult<T> {
    fn context(self, context: impl Into<String>) -> PetboxResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> PetboxResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}
