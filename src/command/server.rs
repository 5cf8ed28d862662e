use crate::configuration::{self, Configuration};
use crate::proxy::server::{Listener, ServerContext};
use crate::proxy::{AuthDispatcher, ProviderRegistry};
use crate::command;
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;

pub struct Command {
    listener: Listener,
}

impl Command {
    /// Resolves every provider URI, then binds the listener.
    ///
    /// Nothing is bound if any URI fails to resolve.
    pub async fn new(
        binding_address: SocketAddr,
        uris: &[String],
        config: &Configuration,
        registry: &ProviderRegistry,
    ) -> Result<Command, command::Error> {
        if uris.is_empty() {
            return Err(configuration::Error::MissingProviderUri.into());
        }

        let providers = registry.build(uris)?;
        info!("Configured {} provider(s)", providers.len());

        let dispatcher = AuthDispatcher::new(providers, config.provider.timeout());
        let context = ServerContext::new(dispatcher);
        let listener = Listener::bind(binding_address, &config.server, context).await?;

        Ok(Command { listener })
    }

    pub async fn run<F>(self, shutdown: F) -> Result<(), command::Error>
    where
        F: Future<Output = ()>,
    {
        self.listener.serve(shutdown).await?;
        Ok(())
    }
}
