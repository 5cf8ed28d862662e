use crate::proxy::provider::{self, LdapProvider, Provider, StaticProvider};
use crate::proxy::Error;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

pub type ProviderFactory = fn(&provider::Config) -> Result<Arc<dyn Provider>, provider::Error>;

/// Maps URI scheme tokens to provider constructors.
///
/// Populated once at startup and read-only afterward.
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, scheme: &'static str, factory: ProviderFactory) {
        debug!("Registering provider scheme '{scheme}'");
        self.factories.insert(scheme, factory);
    }

    pub fn resolve(&self, scheme: &str) -> Result<ProviderFactory, Error> {
        self.factories
            .get(scheme)
            .copied()
            .ok_or_else(|| Error::UnknownScheme {
                scheme: scheme.to_string(),
                valid: self.schemes(),
            })
    }

    pub fn schemes(&self) -> Vec<String> {
        self.factories.keys().map(ToString::to_string).collect()
    }

    /// Builds one provider per URI, keeping the URI order.
    ///
    /// Every scheme is resolved before any provider is constructed, so an
    /// unknown scheme anywhere in the list fails without side effects.
    #[instrument(skip(self))]
    pub fn build(&self, uris: &[String]) -> Result<Vec<Arc<dyn Provider>>, Error> {
        let configs = uris
            .iter()
            .map(|uri| provider::Config::from_uri(uri))
            .map(|config| {
                self.resolve(&config.scheme)
                    .map(|factory| (factory, config))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        configs
            .into_iter()
            .map(|(factory, config)| {
                debug!("Creating '{}' provider for {}", config.scheme, config.uri);
                factory(&config).map_err(Error::from)
            })
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("ldap", LdapProvider::factory);
        registry.register("ldaps", LdapProvider::factory);
        registry.register("static", StaticProvider::factory);
        registry
    }
}
