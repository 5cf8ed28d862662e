use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    InvalidUri(String),
    Io(io::Error),
    UsersFileFormat(String),
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidUri(uri) => write!(f, "Invalid provider URI: {uri}"),
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::UsersFileFormat(err) => {
                write!(f, "Users file format error: ")?;
                write!(f, "{err}")
            }
            Error::Backend(err) => write!(f, "Backend error: {err}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::UsersFileFormat(err.to_string())
    }
}
