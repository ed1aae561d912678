//! Resource Lifecycle
//!
//! One generic controller drives create/read/update/delete for every
//! descriptor in the catalog. Mapping goes through [`crate::mapper`]; the
//! only per-resource knowledge is the descriptor table.

use std::sync::Arc;

use fortiform_common::{ClientError, Error, Operation, Result, WireObject, WireValue};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::mapper::{get_object, refresh, MapContext};
use crate::schema::ResourceDescriptor;
use crate::state::{ResourceData, State};
use crate::validation::{has_errors, validate};

/// Lifecycle controller for one resource type
pub struct ResourceController<C: ApiClient + ?Sized> {
    descriptor: &'static ResourceDescriptor,
    client: Arc<C>,
    ctx: MapContext,
    retries: u32,
}

impl<C: ApiClient + ?Sized> ResourceController<C> {
    pub fn new(descriptor: &'static ResourceDescriptor, client: Arc<C>) -> Self {
        Self {
            descriptor,
            client,
            ctx: MapContext::default(),
            retries: 1,
        }
    }

    pub fn with_context(mut self, ctx: MapContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// Create the object described by `data.state`, then read it back.
    /// Settings objects always exist, so creating one is an update.
    pub async fn create(&self, data: &mut ResourceData) -> Result<()> {
        if self.descriptor.singleton {
            debug!("{} is a settings object, creating via update", self.descriptor.api_name);
            return self.update(data).await;
        }

        info!("Creating {}", self.descriptor.api_name);
        let object = self.build(data, Operation::Create)?;

        self.client.set_retries(self.retries);
        let response = self
            .client
            .create(self.descriptor, &object)
            .await
            .map_err(|e| self.api_error(Operation::Create, e))?;

        self.adopt_id(data, &response);
        self.read(data).await
    }

    /// Refresh `data.state` from the API. A missing object clears the id.
    pub async fn read(&self, data: &mut ResourceData) -> Result<()> {
        self.read_with(data, &self.ctx).await
    }

    pub async fn update(&self, data: &mut ResourceData) -> Result<()> {
        info!("Updating {} {}", self.descriptor.api_name, data.id);
        let object = self.build(data, Operation::Update)?;

        self.client.set_retries(self.retries);
        let response = self
            .client
            .update(self.descriptor, &object, &data.id)
            .await
            .map_err(|e| self.api_error(Operation::Update, e))?;

        self.adopt_id(data, &response);
        self.read(data).await
    }

    /// Delete the object. The id is cleared once the API accepts the call.
    pub async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        info!("Deleting {} {}", self.descriptor.api_name, data.id);

        self.client.set_retries(self.retries);
        self.client
            .delete(self.descriptor, &data.id)
            .await
            .map_err(|e| self.api_error(Operation::Delete, e))?;

        data.id.clear();
        Ok(())
    }

    /// Adopt an existing object by identifier. Blocks are always populated.
    pub async fn import(&self, id: &str) -> Result<ResourceData> {
        info!("Importing {} {}", self.descriptor.api_name, id);
        let mut data = ResourceData::with_id(id);
        self.read_with(&mut data, &MapContext::import()).await?;
        Ok(data)
    }

    async fn read_with(&self, data: &mut ResourceData, ctx: &MapContext) -> Result<()> {
        debug!("Reading {} {}", self.descriptor.api_name, data.id);

        self.client.set_retries(self.retries);
        let object = self
            .client
            .read(self.descriptor, &data.id)
            .await
            .map_err(|e| self.api_error(Operation::Read, e))?;

        match object {
            Some(object) => refresh(self.descriptor, &object, &mut data.state, ctx).map_err(|e| {
                Error::Refresh {
                    resource: self.descriptor.api_name.to_string(),
                    source: Box::new(e),
                }
            }),
            None => {
                warn!(
                    "{} {} not found, removing from state",
                    self.descriptor.api_name, data.id
                );
                data.id.clear();
                Ok(())
            }
        }
    }

    fn build(&self, data: &ResourceData, operation: Operation) -> Result<WireObject> {
        let diagnostics = validate(self.descriptor, &data.state);
        if has_errors(&diagnostics) {
            return Err(Error::Validation {
                resource: self.descriptor.api_name.to_string(),
                diagnostics,
            });
        }
        for warning in &diagnostics {
            warn!("{}: {}", self.descriptor.api_name, warning);
        }
        self.object(&data.state, operation)
    }

    fn object(&self, state: &State, operation: Operation) -> Result<WireObject> {
        get_object(self.descriptor, state).map_err(|e| Error::Object {
            resource: self.descriptor.api_name.to_string(),
            operation,
            source: Box::new(e),
        })
    }

    /// Take the identifier from the response's mkey, falling back to the
    /// API name for objects that have none
    fn adopt_id(&self, data: &mut ResourceData, response: &WireObject) {
        data.id = match response.get("mkey").and_then(WireValue::as_str) {
            Some(mkey) if !mkey.is_empty() => mkey.to_string(),
            _ => self.descriptor.api_name.to_string(),
        };
    }

    fn api_error(&self, operation: Operation, source: ClientError) -> Error {
        Error::Api {
            resource: self.descriptor.api_name.to_string(),
            operation,
            source,
        }
    }
}
