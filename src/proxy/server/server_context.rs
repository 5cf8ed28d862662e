use crate::proxy::credentials::extract_basic_auth;
use crate::proxy::{AuthDispatcher, Constraints, Decision, Error};
use hyper::http::request::Parts;
use tracing::{debug, instrument};

/// State shared read-only by every connection task.
pub struct ServerContext {
    dispatcher: AuthDispatcher,
}

impl ServerContext {
    pub fn new(dispatcher: AuthDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Returns `None` when the request carries no Basic credentials, in which
    /// case no provider is consulted.
    #[instrument(skip(self, parts))]
    pub async fn authenticate_request(&self, parts: &Parts) -> Result<Option<Decision>, Error> {
        let Some(credentials) = extract_basic_auth(parts)? else {
            return Ok(None);
        };

        let constraints = Constraints::from_headers(parts);
        debug!(
            "Dispatching '{}' to {} provider(s)",
            credentials.username,
            self.dispatcher.provider_count()
        );

        self.dispatcher
            .authenticate(&credentials, &constraints)
            .await
            .map(Some)
    }
}
