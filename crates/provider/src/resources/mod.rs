//! Resource Catalog
//!
//! Descriptor tables for every resource type the provider exposes.

pub mod firewall;
pub mod log;
pub mod system;
pub mod vpn;

use crate::schema::ResourceDescriptor;

/// All resource descriptors, in registration order
pub fn all() -> [&'static ResourceDescriptor; 7] {
    [
        &firewall::FIREWALL_VIPGRP46,
        &log::LOG_SYSLOGD2_OVERRIDE_SETTING,
        &system::SYSTEM_IPV6_TUNNEL,
        &system::SYSTEM_NTP,
        &system::SYSTEM_REPLACEMSG_EC,
        &system::SYSTEM_REPLACEMSG_DEVICE_DETECTION_PORTAL,
        &vpn::VPN_CERTIFICATE_CA,
    ]
}

/// Find a descriptor by Terraform type name
pub fn lookup(type_name: &str) -> Option<&'static ResourceDescriptor> {
    all().into_iter().find(|d| d.type_name == type_name)
}
