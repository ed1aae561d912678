//! Firewall resources

use crate::schema::{Field, ResourceDescriptor};

const VIPGRP46_MEMBER: &[Field] = &[Field::string("name", "name").length(0, 64)];

/// IPv4 to IPv6 virtual IP groups
pub static FIREWALL_VIPGRP46: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_firewall_vipgrp46",
    api_name: "FirewallVipgrp46",
    path: "firewall/vipgrp46",
    singleton: false,
    mkey: Some("name"),
    description: "Configure IPv4 to IPv6 virtual IP groups.",
    fields: &[
        Field::string("name", "name").length(0, 63),
        Field::string("uuid", "uuid"),
        Field::int("color", "color").range(0, 32),
        Field::string("comments", "comments").length(0, 255).optional(),
        Field::block("member", "member", VIPGRP46_MEMBER).required(),
    ],
};
