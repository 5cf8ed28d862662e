use crate::proxy::provider::{Config, Error, Provider};
use crate::proxy::{Constraints, Credentials};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Directory-backed provider for `ldap://` and `ldaps://` URIs.
///
/// No directory traffic is performed yet: every credential pair is accepted
/// and the request constraints are only logged.
#[derive(Debug)]
pub struct LdapProvider {
    config: Config,
}

impl LdapProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn factory(config: &Config) -> Result<Arc<dyn Provider>, Error> {
        Ok(Arc::new(Self::new(config)))
    }
}

#[async_trait]
impl Provider for LdapProvider {
    #[instrument(skip(self, credentials), fields(uri = %self.config.uri, username = %credentials.username))]
    async fn authenticate(
        &self,
        credentials: &Credentials,
        constraints: &Constraints,
    ) -> Result<bool, Error> {
        // TODO: bind as the user against the directory, then check
        // `constraints.permits` with the memberOf groups it reports.
        debug!(
            "Accepting without directory lookup (require_users = {:?}, require_groups = {:?})",
            constraints.require_users, constraints.require_groups
        );
        Ok(true)
    }
}
