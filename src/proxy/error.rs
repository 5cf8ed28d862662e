use crate::proxy::provider;
use std::fmt::Display;
use std::io;
use tracing::debug;

#[derive(Debug)]
pub enum Error {
    MalformedCredentials(String),
    ProviderFault(String),
    UnknownScheme { scheme: String, valid: Vec<String> },
    Provider(provider::Error),
    Io(io::Error),
    // Catch-all
    Internal(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedCredentials(s) => write!(f, "malformed credentials: {s}"),
            Error::ProviderFault(s) => write!(f, "provider fault: {s}"),
            Error::UnknownScheme { scheme, valid } => {
                writeln!(f, "Unknown provider: {scheme}")?;
                write!(f, "Valid providers: {}", valid.join(", "))
            }
            Error::Provider(err) => write!(f, "provider initialization error: {err}"),
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Internal(s) => write!(f, "internal server error: {s}"),
        }
    }
}

impl From<provider::Error> for Error {
    fn from(error: provider::Error) -> Self {
        debug!("Provider error: {error}");
        Error::Provider(error)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        debug!("I/O error: {error:?}");
        Error::Io(error)
    }
}

impl From<hyper::http::Error> for Error {
    fn from(error: hyper::http::Error) -> Self {
        Error::Internal(format!("failed to build response: {error}"))
    }
}
