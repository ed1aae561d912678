//! FortiOS Provider
//!
//! Dispatches resource operations by Terraform type name, the way the plugin
//! protocol's resource calls arrive.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use fortiform_common::{Diagnostic, Error, Result};

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::lifecycle::ResourceController;
use crate::resources;
use crate::schema::ResourceDescriptor;
use crate::state::{ResourceData, State};
use crate::validation;

/// FortiOS Terraform provider
pub struct Provider {
    config: Arc<RwLock<ProviderConfig>>,
    client: Arc<dyn ApiClient>,
}

impl Provider {
    pub fn new(config: ProviderConfig, client: Arc<dyn ApiClient>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            client,
        })
    }

    /// Replace the provider configuration
    pub async fn configure(&self, config: ProviderConfig) -> Result<()> {
        config.validate()?;
        info!(
            "Configuring provider for {}",
            config.hostname.as_deref().unwrap_or("<unset>")
        );
        *self.config.write().await = config;
        Ok(())
    }

    pub async fn config(&self) -> ProviderConfig {
        self.config.read().await.clone()
    }

    /// Descriptors of every supported resource type
    pub fn schema(&self) -> Vec<&'static ResourceDescriptor> {
        resources::all().to_vec()
    }

    pub async fn controller(&self, type_name: &str) -> Result<ResourceController<dyn ApiClient>> {
        let descriptor = descriptor(type_name)?;
        let config = self.config.read().await;
        Ok(ResourceController::new(descriptor, self.client.clone())
            .with_context(config.map_context())
            .with_retries(config.retries))
    }

    /// Validate a configured state without touching the API
    pub fn validate(&self, type_name: &str, state: &State) -> Result<Vec<Diagnostic>> {
        Ok(validation::validate(descriptor(type_name)?, state))
    }

    /// Apply a planned change. A missing `prior` creates, a missing `planned`
    /// deletes, and both present updates. Returns the new state, or `None`
    /// when the resource no longer exists.
    pub async fn apply(
        &self,
        type_name: &str,
        prior: Option<ResourceData>,
        planned: Option<State>,
    ) -> Result<Option<ResourceData>> {
        let controller = self.controller(type_name).await?;
        let prior = prior.filter(ResourceData::exists);

        match (prior, planned) {
            (None, Some(planned)) => {
                let mut data = ResourceData::new(planned);
                controller.create(&mut data).await?;
                Ok(Some(data).filter(ResourceData::exists))
            }
            (Some(mut prior), None) => {
                controller.delete(&mut prior).await?;
                Ok(None)
            }
            (Some(prior), Some(planned)) => {
                let mut data = ResourceData {
                    id: prior.id,
                    state: planned,
                };
                controller.update(&mut data).await?;
                Ok(Some(data).filter(ResourceData::exists))
            }
            (None, None) => {
                debug!("Nothing to apply for {}", type_name);
                Ok(None)
            }
        }
    }

    /// Refresh a resource. Returns `None` when it is gone.
    pub async fn read(&self, type_name: &str, mut data: ResourceData) -> Result<Option<ResourceData>> {
        let controller = self.controller(type_name).await?;
        controller.read(&mut data).await?;
        Ok(Some(data).filter(ResourceData::exists))
    }

    pub async fn import(&self, type_name: &str, id: &str) -> Result<Option<ResourceData>> {
        let controller = self.controller(type_name).await?;
        let data = controller.import(id).await?;
        Ok(Some(data).filter(ResourceData::exists))
    }
}

fn descriptor(type_name: &str) -> Result<&'static ResourceDescriptor> {
    resources::lookup(type_name).ok_or_else(|| Error::UnknownResource(type_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryClient;

    fn provider() -> (Provider, Arc<MemoryClient>) {
        let client = Arc::new(MemoryClient::new());
        let provider = Provider::new(ProviderConfig::default(), client.clone()).unwrap();
        (provider, client)
    }

    #[tokio::test]
    async fn test_schema_lists_catalog() {
        let (provider, _) = provider();
        let names: Vec<_> = provider.schema().iter().map(|d| d.type_name).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"fortios_vpncertificate_ca"));
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let (provider, _) = provider();
        let err = provider.read("fortios_nope", ResourceData::with_id("x")).await.unwrap_err();
        assert!(matches!(err, Error::UnknownResource(name) if name == "fortios_nope"));
    }

    #[tokio::test]
    async fn test_configure_rejects_invalid() {
        let (provider, _) = provider();
        let bad = ProviderConfig {
            retries: 99,
            ..Default::default()
        };
        assert!(provider.configure(bad).await.is_err());
        assert_eq!(provider.config().await.retries, 1);
    }

    #[tokio::test]
    async fn test_apply_dispatch() {
        let (provider, client) = provider();
        let planned = State::new()
            .with("name", "tun1")
            .with("destination", "2001:db8::2");

        let created = provider
            .apply("fortios_system_ipv6tunnel", None, Some(planned.clone()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, "tun1");

        let updated = provider
            .apply(
                "fortios_system_ipv6tunnel",
                Some(created),
                Some(planned.with("destination", "2001:db8::3")),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.state.get_str("destination"), Some("2001:db8::3"));

        let deleted = provider
            .apply("fortios_system_ipv6tunnel", Some(updated), None)
            .await
            .unwrap();
        assert!(deleted.is_none());
        assert!(client.is_empty());
    }
}
