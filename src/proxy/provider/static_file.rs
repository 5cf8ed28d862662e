use crate::proxy::provider::{Config, Error, Provider};
use crate::proxy::{Constraints, Credentials};
use crate::secret::Secret;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub password: Secret<String>, // argon2 PHC string
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersFile {
    #[serde(default)]
    pub users: HashMap<String, UserConfig>,
}

impl UsersFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Provider backed by a local TOML file of users, for `static:///path/to/users.toml`.
///
/// Passwords are verified against argon2 hashes and the request constraints
/// are enforced against the groups listed for each user.
pub struct StaticProvider {
    users: HashMap<String, Arc<UserConfig>>,
}

impl StaticProvider {
    pub fn new(users_file: UsersFile) -> Self {
        let users = users_file
            .users
            .into_iter()
            .map(|(username, user)| (username, Arc::new(user)))
            .collect();

        Self { users }
    }

    pub fn factory(config: &Config) -> Result<Arc<dyn Provider>, Error> {
        let path = config
            .location()
            .filter(|path| !path.is_empty())
            .ok_or_else(|| Error::InvalidUri(config.uri.clone()))?;

        let users_file = UsersFile::load(path)?;
        info!("Loaded {} user(s) from {path}", users_file.users.len());

        Ok(Arc::new(Self::new(users_file)))
    }

    fn verify_password(user: &UserConfig, password: &str) -> Result<bool, Error> {
        let hash = PasswordHash::new(user.password.expose()).map_err(|error| {
            error!("Unable to parse password hash: {error}");
            Error::Backend("stored password hash is invalid".to_string())
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &hash) {
            Ok(()) => Ok(true),
            Err(error) => {
                debug!("Password verification failed: {error}");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl Provider for StaticProvider {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn authenticate(
        &self,
        credentials: &Credentials,
        constraints: &Constraints,
    ) -> Result<bool, Error> {
        let Some(user) = self.users.get(&credentials.username) else {
            debug!("Username not found in users file");
            return Ok(false);
        };

        let user = Arc::clone(user);
        let password = credentials.password.clone();
        let verifier_user = Arc::clone(&user);
        let verified = tokio::task::spawn_blocking(move || {
            Self::verify_password(&verifier_user, password.expose())
        })
        .await
        .map_err(|error| Error::Backend(format!("password verification task failed: {error}")))??;

        if !verified {
            return Ok(false);
        }

        let permitted = constraints.permits(&credentials.username, &user.groups);
        if !permitted {
            debug!("Credentials valid but request constraints not satisfied");
        }
        Ok(permitted)
    }
}
