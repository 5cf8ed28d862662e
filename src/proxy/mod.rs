pub mod constraints;
pub mod credentials;
pub mod dispatcher;
mod error;
pub mod provider;
pub mod registry;
pub mod server;

pub use constraints::Constraints;
pub use credentials::Credentials;
pub use dispatcher::{AuthDispatcher, Decision};
pub use error::Error;
pub use registry::ProviderRegistry;
