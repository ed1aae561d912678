//! Management API client seam
//!
//! The provider talks to the appliance only through [`ApiClient`]. Transport
//! and retry policy belong to the implementation; the lifecycle controller
//! only hands it the configured retry count before each call.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use fortiform_common::{ClientError, WireObject, WireValue};
use parking_lot::Mutex;
use tracing::debug;

use crate::schema::ResourceDescriptor;

/// Operations of the management API, keyed by resource descriptor
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Create an object. The response's `mkey` carries the assigned identifier.
    async fn create(
        &self,
        resource: &ResourceDescriptor,
        object: &WireObject,
    ) -> Result<WireObject, ClientError>;

    /// Read an object. `Ok(None)` means it does not exist.
    async fn read(
        &self,
        resource: &ResourceDescriptor,
        mkey: &str,
    ) -> Result<Option<WireObject>, ClientError>;

    async fn update(
        &self,
        resource: &ResourceDescriptor,
        object: &WireObject,
        mkey: &str,
    ) -> Result<WireObject, ClientError>;

    async fn delete(&self, resource: &ResourceDescriptor, mkey: &str) -> Result<(), ClientError>;

    /// Retry count for the next call
    fn set_retries(&self, _retries: u32) {}
}

/// In-memory stand-in for the management API, used for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryClient {
    objects: Mutex<BTreeMap<(String, String), WireObject>>,
    fail_next: Mutex<Option<ClientError>>,
    retries: AtomicU32,
    calls: AtomicU32,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object as if it already existed on the appliance
    pub fn insert(&self, resource: &ResourceDescriptor, mkey: &str, object: WireObject) {
        self.objects
            .lock()
            .insert((resource.path.to_string(), mkey.to_string()), object);
    }

    /// Inspect a stored object
    pub fn get(&self, resource: &ResourceDescriptor, mkey: &str) -> Option<WireObject> {
        self.objects
            .lock()
            .get(&(resource.path.to_string(), mkey.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ClientError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Last retry count handed to the client
    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::SeqCst)
    }

    /// Number of API calls made
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self, op: &str, resource: &ResourceDescriptor, mkey: &str) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("{} {}/{}", op, resource.path, mkey);
        match self.fail_next.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn key_of(resource: &ResourceDescriptor, object: &WireObject) -> String {
        resource
            .mkey
            .and_then(|k| object.get(k))
            .and_then(WireValue::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn storage_key(resource: &ResourceDescriptor, mkey: &str) -> (String, String) {
        let mkey = if resource.singleton || mkey.is_empty() {
            resource.api_name
        } else {
            mkey
        };
        (resource.path.to_string(), mkey.to_string())
    }

    fn response(mkey: &str) -> WireObject {
        WireObject::from([
            ("mkey".to_string(), WireValue::from(mkey)),
            ("status".to_string(), WireValue::from("success")),
        ])
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "entry not found".to_string(),
        }
    }
}

#[async_trait]
impl ApiClient for MemoryClient {
    async fn create(
        &self,
        resource: &ResourceDescriptor,
        object: &WireObject,
    ) -> Result<WireObject, ClientError> {
        let mkey = Self::key_of(resource, object);
        self.begin("POST", resource, &mkey)?;

        let key = Self::storage_key(resource, &mkey);
        let mut objects = self.objects.lock();
        if objects.contains_key(&key) {
            return Err(ClientError::Api {
                status: 500,
                message: "entry already exists".to_string(),
            });
        }
        objects.insert(key, object.clone());
        Ok(Self::response(&mkey))
    }

    async fn read(
        &self,
        resource: &ResourceDescriptor,
        mkey: &str,
    ) -> Result<Option<WireObject>, ClientError> {
        self.begin("GET", resource, mkey)?;
        Ok(self.objects.lock().get(&Self::storage_key(resource, mkey)).cloned())
    }

    async fn update(
        &self,
        resource: &ResourceDescriptor,
        object: &WireObject,
        mkey: &str,
    ) -> Result<WireObject, ClientError> {
        self.begin("PUT", resource, mkey)?;

        let key = Self::storage_key(resource, mkey);
        let mut objects = self.objects.lock();
        if resource.singleton {
            // Settings objects always exist; a PUT merges into them.
            let stored = objects.entry(key).or_default();
            stored.extend(object.iter().map(|(k, v)| (k.clone(), v.clone())));
            return Ok(Self::response(""));
        }

        let mut stored = objects.remove(&key).ok_or_else(Self::not_found)?;
        stored.extend(object.iter().map(|(k, v)| (k.clone(), v.clone())));
        let new_mkey = Self::key_of(resource, &stored);
        objects.insert(Self::storage_key(resource, &new_mkey), stored);
        Ok(Self::response(&new_mkey))
    }

    async fn delete(&self, resource: &ResourceDescriptor, mkey: &str) -> Result<(), ClientError> {
        self.begin("DELETE", resource, mkey)?;

        let key = Self::storage_key(resource, mkey);
        let removed = self.objects.lock().remove(&key);
        match removed {
            Some(_) => Ok(()),
            None if resource.singleton => Ok(()),
            None => Err(Self::not_found()),
        }
    }

    fn set_retries(&self, retries: u32) {
        self.retries.store(retries, Ordering::SeqCst);
    }
}
