//! FortiOS Terraform Provider
//!
//! A data-driven mapping engine between FortiOS management API objects and
//! Terraform state, plus the lifecycle controller that drives it.

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod mapper;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;
pub mod validation;

pub use client::{ApiClient, MemoryClient};
pub use config::ProviderConfig;
pub use lifecycle::ResourceController;
pub use mapper::MapContext;
pub use provider::Provider;
pub use schema::{Field, Kind, ResourceDescriptor};
pub use state::{ResourceData, State, StateValue};
