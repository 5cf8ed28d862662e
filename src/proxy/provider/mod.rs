mod error;
pub mod ldap;
pub mod static_file;

use crate::proxy::{Constraints, Credentials};
use async_trait::async_trait;
pub use error::Error;
pub use ldap::LdapProvider;
pub use static_file::StaticProvider;

/// An identity backend able to decide whether credentials are valid.
///
/// Implementations are shared by every in-flight request and must tolerate
/// concurrent calls. A real backend is expected to enforce `constraints`,
/// see [`Constraints::permits`].
///
/// Returns:
/// - `Ok(true)` if the credentials are accepted
/// - `Ok(false)` if the backend rejects them
/// - `Err(Error)` if the backend could not reach a decision
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    async fn authenticate(
        &self,
        credentials: &Credentials,
        constraints: &Constraints,
    ) -> Result<bool, Error>;
}

/// How to reach one backend, built from a single `--uri` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub uri: String,
    pub scheme: String,
}

impl Config {
    pub fn from_uri(uri: &str) -> Self {
        let scheme = uri.split_once("://").map_or(uri, |(scheme, _)| scheme);

        Self {
            uri: uri.to_string(),
            scheme: scheme.to_string(),
        }
    }

    /// The part of the URI following `://`, if any.
    pub fn location(&self) -> Option<&str> {
        self.uri.split_once("://").map(|(_, location)| location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_uri() {
        let config = Config::from_uri("ldaps://ldap.example.com:636");
        assert_eq!(config.scheme, "ldaps");
        assert_eq!(config.uri, "ldaps://ldap.example.com:636");
        assert_eq!(config.location(), Some("ldap.example.com:636"));

        let config = Config::from_uri("static:///etc/authproxy/users.toml");
        assert_eq!(config.scheme, "static");
        assert_eq!(config.location(), Some("/etc/authproxy/users.toml"));
    }

    #[test]
    fn test_config_without_separator_uses_whole_uri_as_scheme() {
        let config = Config::from_uri("ldap");
        assert_eq!(config.scheme, "ldap");
        assert_eq!(config.location(), None);
    }
}
