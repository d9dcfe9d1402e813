use std::fmt;

#[derive(Debug)]
pub enum JsObjectError {
    InvalidArgument(String),
    RemoteExecution(String),
    Serialization(serde_json::Error),
    Client(fantoccini::error::CmdError),
    Session(String),
    Generic(anyhow::Error),
}

impl fmt::Display for JsObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::RemoteExecution(msg) => write!(f, "Script failed in the browser: {msg}"),
            Self::Serialization(e) => write!(f, "JSON serialization error: {e}"),
            Self::Client(e) => write!(f, "WebDriver client error: {e}"),
            Self::Session(msg) => write!(f, "Session error: {msg}"),
            Self::Generic(e) => write!(f, "Generic error: {e}"),
        }
    }
}

impl std::error::Error for JsObjectError {}

impl From<fantoccini::error::CmdError> for JsObjectError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        // A browser-side throw comes back as a "javascript error" response.
        // Geckodriver keeps the status in the error kind rather than the
        // message, so both representations are checked.
        let msg = err.to_string();
        let detail = format!("{err:?}");
        if msg.contains("javascript error")
            || detail.contains("javascript error")
            || detail.contains("JavascriptError")
        {
            Self::RemoteExecution(msg)
        } else {
            Self::Client(err)
        }
    }
}

impl From<serde_json::Error> for JsObjectError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<fantoccini::error::NewSessionError> for JsObjectError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        Self::Session(format!("WebDriver session creation failed: {err}"))
    }
}

impl From<anyhow::Error> for JsObjectError {
    fn from(err: anyhow::Error) -> Self {
        Self::Generic(err)
    }
}

pub type Result<T> = std::result::Result<T, JsObjectError>;
