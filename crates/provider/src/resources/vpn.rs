//! VPN resources

use crate::schema::{Field, ResourceDescriptor};

/// CA certificates
pub static VPN_CERTIFICATE_CA: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_vpncertificate_ca",
    api_name: "VpnCertificateCa",
    path: "vpn.certificate/ca",
    singleton: false,
    mkey: Some("name"),
    description: "CA certificate.",
    fields: &[
        Field::string("name", "name").length(0, 79).required(),
        Field::string("ca", "ca").required(),
        Field::string("range", "range"),
        Field::string("source", "source"),
        Field::string("trusted", "trusted"),
        Field::string("scep_url", "scep-url").length(0, 255),
        Field::int("auto_update_days", "auto-update-days"),
        Field::int("auto_update_days_warning", "auto-update-days-warning"),
        Field::string("source_ip", "source-ip"),
        Field::int("last_updated", "last-updated"),
    ],
};
