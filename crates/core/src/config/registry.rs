use super::{
    ConfigDomain, ConfigError, Configuration, DatabaseConfig, EnvSource, WebServiceConfig,
};

/// Holds exactly one [`Configuration`] per domain for the life of the process.
///
/// Constructed once by the binary and handed to the startup orchestrator by
/// value; there is no global instance.
#[derive(Debug, Default)]
pub struct ConfigurationRegistry {
    web_service: Configuration<WebServiceConfig>,
    databases: Configuration<DatabaseConfig>,
}

impl ConfigurationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every domain, web service first.
    pub fn load_all(&mut self, env: &dyn EnvSource) {
        self.web_service.load_environment_vars(env);
        self.databases.load_environment_vars(env);
    }

    pub fn web_service(&self) -> &Configuration<WebServiceConfig> {
        &self.web_service
    }

    pub fn web_service_mut(&mut self) -> &mut Configuration<WebServiceConfig> {
        &mut self.web_service
    }

    pub fn databases(&self) -> &Configuration<DatabaseConfig> {
        &self.databases
    }

    pub fn databases_mut(&mut self) -> &mut Configuration<DatabaseConfig> {
        &mut self.databases
    }

    /// Check that every domain is loaded and carries its required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.web_service.get()?.validate()?;
        self.databases.get()?.validate()?;
        Ok(())
    }
}
