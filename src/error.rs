use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "summary.params.text", "choices[0].message.content")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "service_loader", "ingest")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the intelligence engine.
///
/// Variants follow the engine's error taxonomy: configuration errors are fatal at
/// startup, everything else is reported per request and never aborts sibling
/// entries of a batch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("{message}{}", format_context(.context))]
    Request {
        message: String,
        context: ErrorContext,
    },

    #[error("model '{0}' not found")]
    ModelNotFound(String),

    #[error("required parameter '{0}' is missing")]
    MissingParameter(String),

    #[error("invalid input: {0}")]
    InvalidParameter(String),

    #[error("unsupported provider/operation: {provider}/{operation}")]
    Unsupported { provider: String, operation: String },

    #[error("error making request to '{service}' service: {source}")]
    Transport {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error from '{service}' service: {message}")]
    Provider {
        service: String,
        status: u16,
        message: String,
    },

    #[error("request to '{0}' service was cancelled")]
    Cancelled(String),

    #[error("missing expected field '{field}' in {operation} response")]
    MissingField {
        operation: &'static str,
        field: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Error::Request {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new request-shape error with structured context
    pub fn request_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Request {
            message: msg.into(),
            context,
        }
    }

    pub fn missing_field(operation: &'static str, field: impl Into<String>) -> Self {
        Error::MissingField {
            operation,
            field: field.into(),
        }
    }

    /// Configuration errors stop the process before it serves traffic; every
    /// other class is reported per request.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Request { context, .. } => Some(context),
            _ => None,
        }
    }
}
