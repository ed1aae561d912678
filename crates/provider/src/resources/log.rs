//! Log resources

use crate::schema::{Field, ResourceDescriptor};

const CUSTOM_FIELD_NAME: &[Field] = &[
    Field::int("id", "id").range(0, 255),
    Field::string("name", "name").length(0, 35),
    Field::string("custom", "custom").length(0, 35),
];

/// Override settings for the second remote syslog server
pub static LOG_SYSLOGD2_OVERRIDE_SETTING: ResourceDescriptor = ResourceDescriptor {
    type_name: "fortios_log_syslogd2_override_setting",
    api_name: "LogSyslogd2OverrideSetting",
    path: "log.syslogd2/override-setting",
    singleton: true,
    mkey: None,
    description: "Override settings for remote syslog server.",
    fields: &[
        Field::string("override", "override"),
        Field::string("status", "status"),
        Field::string("server", "server").length(0, 63),
        Field::string("mode", "mode"),
        Field::int("port", "port").range(0, 65535),
        Field::string("facility", "facility"),
        Field::string("source_ip", "source-ip").length(0, 63),
        Field::string("format", "format"),
        Field::string("enc_algorithm", "enc-algorithm"),
        Field::string("ssl_min_proto_version", "ssl-min-proto-version"),
        Field::string("certificate", "certificate").length(0, 35),
        Field::block("custom_field_name", "custom-field-name", CUSTOM_FIELD_NAME),
        Field::int("syslog_type", "syslog-type"),
    ],
};
