//! Error handling for the smart-meter exporter crate.

/// A specialized `Result` type for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// The main error type for exporter operations.
///
/// Every variant is fatal to the scrape it occurred in and to nothing else.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The gateway could not be reached or the body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// The gateway answered with a non-2xx status
    #[error("Gateway responded with status {status}")]
    Gateway { status: u16 },

    /// The gateway body is not a valid JSON document
    #[error("Gateway response is not valid JSON: {0}")]
    Decode(String),

    /// A single gateway field could not be coerced to its declared type
    #[error("Field '{field}' has invalid {expected} value '{value}'")]
    FieldParse {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Building or encoding the metric families failed
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new transport error
    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new decode error
    pub fn decode_error(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new field parse error
    pub fn field_error(
        field: &'static str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::FieldParse {
            field,
            value: value.into(),
            expected,
        }
    }

    /// Create a new metrics error
    pub fn metrics_error(msg: impl Into<String>) -> Self {
        Self::Metrics(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Stable label for logs and the scrape error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::Gateway { .. } => "gateway",
            Self::Decode(_) => "decode",
            Self::FieldParse { .. } => "field_parse",
            Self::Metrics(_) => "metrics",
            Self::WebServer(_) => "web_server",
            Self::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for ExporterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        Self::Metrics(err.to_string())
    }
}
