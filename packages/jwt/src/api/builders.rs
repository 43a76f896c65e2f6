//! Issuer entry point: owns the configuration snapshot and the key source

use super::JwtClaimsBuilder;
use crate::config::JwtBuildConfig;
use crate::error::JwtResult;
use crate::keys::{FileKeySource, KeyResolver, KeySource};
use std::sync::Arc;

/// Direct builder entry point
pub struct Jwt;

impl Jwt {
    /// Issuer reading keys from the file system
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` if the configuration is invalid
    pub fn issuer(config: JwtBuildConfig) -> JwtResult<JwtIssuer> {
        JwtIssuer::new(config)
    }
}

/// Starts token builds against one configuration and key source
///
/// Each build captures the configuration current when it starts. Replacing
/// the configuration affects later builds only; builders already in flight
/// keep their snapshot. Cloning is cheap and clones share the key source.
#[derive(Clone)]
pub struct JwtIssuer {
    config: Arc<JwtBuildConfig>,
    source: Arc<dyn KeySource>,
}

impl JwtIssuer {
    /// Issuer reading keys from the file system
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` if the configuration is invalid
    pub fn new(config: JwtBuildConfig) -> JwtResult<Self> {
        Self::with_source(config, FileKeySource::new())
    }

    /// Issuer reading keys through `source`
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` if the configuration is invalid
    pub fn with_source(config: JwtBuildConfig, source: impl KeySource + 'static) -> JwtResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            source: Arc::new(source),
        })
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &JwtBuildConfig {
        &self.config
    }

    /// Replace the configuration for subsequent builds
    ///
    /// # Errors
    /// Returns `JwtBuildError::Config` if the configuration is invalid; the
    /// previous configuration stays in effect
    pub fn set_config(&mut self, config: JwtBuildConfig) -> JwtResult<()> {
        config.validate()?;
        tracing::debug!("Replaced JWT build configuration");
        self.config = Arc::new(config);
        Ok(())
    }

    /// Edit a copy of the current configuration and install it
    ///
    /// # Errors
    /// Same as [`JwtIssuer::set_config`]
    pub fn update_config(&mut self, edit: impl FnOnce(&mut JwtBuildConfig)) -> JwtResult<()> {
        let mut config = (*self.config).clone();
        edit(&mut config);
        self.set_config(config)
    }

    /// Key resolver over the current configuration
    #[must_use]
    pub fn resolver(&self) -> KeyResolver {
        KeyResolver::new(Arc::clone(&self.config), Arc::clone(&self.source))
    }

    /// Start a token build
    #[must_use]
    pub fn claims(&self) -> JwtClaimsBuilder {
        JwtClaimsBuilder::new(self.resolver())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyConfig;
    use crate::error::JwtBuildError;
    use crate::keys::MemoryKeySource;

    #[test]
    fn test_invalid_config_rejected() {
        let config = JwtBuildConfig::new().with_token_lifespan(0);
        assert!(matches!(
            JwtIssuer::with_source(config, MemoryKeySource::new()),
            Err(JwtBuildError::Config(_))
        ));
    }

    #[test]
    fn test_update_config_keeps_previous_on_error() {
        let mut issuer = JwtIssuer::with_source(JwtBuildConfig::new(), MemoryKeySource::new()).unwrap();
        issuer
            .update_config(|config| config.signing_key = KeyConfig::pem("/privateKey.pem"))
            .unwrap();
        assert_eq!(issuer.config().signing_key.location.as_deref(), Some("/privateKey.pem"));

        let err = issuer.update_config(|config| config.token_lifespan_seconds = 0);
        assert!(err.is_err());
        assert_eq!(issuer.config().token_lifespan_seconds, 300);
    }

    #[test]
    fn test_builder_keeps_snapshot_across_config_change() {
        let mut issuer = JwtIssuer::with_source(JwtBuildConfig::new(), MemoryKeySource::new()).unwrap();
        let builder = issuer.claims();
        issuer
            .update_config(|config| config.token_lifespan_seconds = 60)
            .unwrap();

        let claims = builder.finalize_claims();
        assert_eq!(claims.expires_at().unwrap() - claims.issued_at().unwrap(), 300);
    }
}
