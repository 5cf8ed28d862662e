use crate::proxy::provider::Provider;
use crate::proxy::{Constraints, Credentials, Error};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

/// Consults the configured providers, in order, for every request.
pub struct AuthDispatcher {
    providers: Vec<Arc<dyn Provider>>,
    provider_timeout: Duration,
}

impl AuthDispatcher {
    pub fn new(providers: Vec<Arc<dyn Provider>>, provider_timeout: Duration) -> Self {
        Self {
            providers,
            provider_timeout,
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns `Allowed` as soon as one provider accepts the credentials,
    /// `Denied` when every provider rejected them (or none is configured).
    ///
    /// A provider failing or exceeding the provider timeout ends the dispatch
    /// with `Error::ProviderFault`; it is never counted as a rejection.
    #[instrument(skip(self, credentials, constraints), fields(username = %credentials.username))]
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        constraints: &Constraints,
    ) -> Result<Decision, Error> {
        for (index, provider) in self.providers.iter().enumerate() {
            let result = tokio::time::timeout(
                self.provider_timeout,
                provider.authenticate(credentials, constraints),
            )
            .await
            .map_err(|_| {
                warn!(
                    "Provider #{index} did not answer within {:?}",
                    self.provider_timeout
                );
                Error::ProviderFault(format!("provider #{index} timed out"))
            })?;

            match result {
                Ok(true) => {
                    debug!("Provider #{index} accepted the credentials");
                    return Ok(Decision::Allowed);
                }
                Ok(false) => debug!("Provider #{index} rejected the credentials"),
                Err(error) => {
                    warn!("Provider #{index} failed: {error}");
                    return Err(Error::ProviderFault(format!("provider #{index}: {error}")));
                }
            }
        }

        debug!("No provider accepted the credentials");
        Ok(Decision::Denied)
    }
}
