//! System resources

use crate::schema::{Field, ResourceDescriptor};

const NTP_SERVER: &[Field] = &[
    Field::int("id", "id"),
    Field::string("server", "server").length(0, 63),
    Field::string("ntpv3", "ntpv3"),
    Field::string("authentication", "authentication"),
    // The API never returns the key in clear text.
    Field::string("key", "key").length(0, 59).optional().sensitive(),
    Field::int("key_id", "key-id"),
];

const NTP_INTERFACE: &[Field] = &[Field::string("interface_name", "interface-name").length(0, 64)];

/// System NTP settings
pub static SYSTEM_NTP: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_system_ntp",
    api_name: "SystemNtp",
    path: "system/ntp",
    singleton: true,
    mkey: None,
    description: "Configure system NTP information.",
    fields: &[
        Field::string("ntpsync", "ntpsync"),
        Field::string("type", "type"),
        Field::int("syncinterval", "syncinterval").range(1, 1440),
        Field::block("ntpserver", "ntpserver", NTP_SERVER),
        Field::string("source_ip", "source-ip"),
        Field::string("source_ip6", "source-ip6"),
        Field::string("server_mode", "server-mode"),
        Field::block("interface", "interface", NTP_INTERFACE),
    ],
};

/// IPv6/IPv4 in IPv6 tunnels
pub static SYSTEM_IPV6_TUNNEL: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_system_ipv6tunnel",
    api_name: "SystemIpv6Tunnel",
    path: "system/ipv6-tunnel",
    singleton: false,
    mkey: Some("name"),
    description: "Configure IPv6/IPv4 in IPv6 tunnel.",
    fields: &[
        Field::string("name", "name").length(0, 15),
        Field::string("source", "source"),
        Field::string("destination", "destination").required(),
        Field::string("interface", "interface").length(0, 15),
    ],
};

const REPLACEMSG_FIELDS: &[Field] = &[
    Field::string("msg_type", "msg-type").length(0, 28).required(),
    Field::string("buffer", "buffer").length(0, 32768).optional(),
    Field::string("header", "header"),
    Field::string("format", "format"),
];

/// Replacement messages for endpoint control
pub static SYSTEM_REPLACEMSG_EC: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_systemreplacemsg_ec",
    api_name: "SystemReplacemsgEc",
    path: "system.replacemsg/ec",
    singleton: false,
    mkey: Some("msg-type"),
    description: "Replacement messages.",
    fields: REPLACEMSG_FIELDS,
};

/// Replacement messages for the device detection portal
pub static SYSTEM_REPLACEMSG_DEVICE_DETECTION_PORTAL: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_systemreplacemsg_devicedetectionportal",
    api_name: "SystemReplacemsgDeviceDetectionPortal",
    path: "system.replacemsg/device-detection-portal",
    singleton: false,
    mkey: Some("msg-type"),
    description: "Replacement messages.",
    fields: REPLACEMSG_FIELDS,
};
