use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tracing::{debug, trace};

use crate::api::{Device, DeviceConfigNetwork, DevicePortOverride};
use crate::mac::MacValidator;
use crate::values::{number, string_list, Fields, ObjectBuilder};

#[derive(Default)]
pub struct DeviceSwitchDataSource {
    provider_data: Option<crate::UnifiProviderData>,
}

impl DeviceSwitchDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn computed(builder: AttributeBuilder) -> Attribute {
    builder.computed().build()
}

fn computed_string_list(name: &str) -> Attribute {
    computed(AttributeBuilder::new(
        name,
        AttributeType::List(Box::new(AttributeType::String)),
    ))
}

fn config_network_attributes() -> Vec<Attribute> {
    vec![
        computed(AttributeBuilder::string("alternative_dns")),
        computed(AttributeBuilder::bool("bonding_enabled")),
        computed(AttributeBuilder::string("dns_suffix")),
        computed(AttributeBuilder::string("gateway")),
        computed(AttributeBuilder::string("ip")),
        computed(AttributeBuilder::string("netmask")),
        computed(AttributeBuilder::string("preferred_dns")),
        computed(AttributeBuilder::string("type")),
    ]
}

fn port_override_attributes() -> Vec<Attribute> {
    vec![
        computed(AttributeBuilder::number("aggregate_num_ports")),
        computed(AttributeBuilder::bool("auto_negotiate")),
        computed(AttributeBuilder::string("dot1x_ctrl")),
        computed(AttributeBuilder::number("dot1x_idle_timeout")),
        computed(AttributeBuilder::number("egress_rate_limit_kbps")),
        computed(AttributeBuilder::bool("egress_rate_limit_kbps_enabled")),
        computed_string_list("excluded_network_ids"),
        computed(AttributeBuilder::string("forward")),
        computed(AttributeBuilder::bool("full_duplex")),
        computed(AttributeBuilder::bool("isolation")),
        computed(AttributeBuilder::bool("lldp_med_enabled")),
        computed(AttributeBuilder::number("mirror_port_idx")),
        computed(AttributeBuilder::string("name")),
        computed(AttributeBuilder::string("native_network_id")),
        computed(AttributeBuilder::string("operation")),
        computed(AttributeBuilder::string("poe_mode")),
        computed(AttributeBuilder::bool("port_keepalive_enabled")),
        computed(AttributeBuilder::string("port_profile_id")),
        computed(AttributeBuilder::bool("port_security_enabled")),
        computed_string_list("port_security_mac_addresses"),
        computed(AttributeBuilder::string("setting_preference")),
        computed(AttributeBuilder::number("speed")),
        computed(AttributeBuilder::bool("stp_port_mode")),
        computed(AttributeBuilder::string("tagged_vlan_mgmt")),
        computed(AttributeBuilder::string("voice_networkconf_id")),
    ]
}

pub fn switch_data_source_schema() -> Schema {
    let mut builder = SchemaBuilder::new()
        .version(0)
        .description("Get information about a Unifi switch")
        .attribute(
            AttributeBuilder::string("mac")
                .description("The MAC address of the switch")
                .required()
                .validator(MacValidator)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("site")
                .description(
                    "The site of the switch. When set this overrides the default provider site",
                )
                .optional()
                .computed()
                .build(),
        )
        .attribute(computed(
            AttributeBuilder::string("id").description("Switch identifier"),
        ))
        .attribute(computed(AttributeBuilder::bool("adopted")))
        .attribute(computed(AttributeBuilder::single_nested(
            "config_network",
            config_network_attributes(),
        )))
        .attribute(computed(AttributeBuilder::bool("disabled")))
        .attribute(computed(AttributeBuilder::string(
            "dot1x_fallback_networkconf_id",
        )))
        .attribute(computed(AttributeBuilder::bool("dot1x_portctrl_enabled")))
        .attribute(computed(AttributeBuilder::bool("flowctrl_enabled")))
        .attribute(computed(AttributeBuilder::string("ip")))
        .attribute(computed(AttributeBuilder::bool("jumboframe_enabled")))
        .attribute(computed(AttributeBuilder::string("led_override")))
        .attribute(computed(AttributeBuilder::string("led_override_color")))
        .attribute(computed(AttributeBuilder::number(
            "led_override_color_brightness",
        )))
        .attribute(computed(AttributeBuilder::string("mgmt_network_id")))
        .attribute(computed(AttributeBuilder::string("model")))
        .attribute(computed(AttributeBuilder::string("name")))
        .attribute(computed(AttributeBuilder::map_nested(
            "port_overrides",
            port_override_attributes(),
        )));

    for name in [
        "snmp_contact",
        "snmp_location",
        "state",
        "stp_priority",
        "stp_version",
        "type",
    ] {
        builder = builder.attribute(computed(AttributeBuilder::string(name)));
    }

    builder.build()
}

fn config_network_state(network: Option<&DeviceConfigNetwork>) -> Dynamic {
    let network = network.cloned().unwrap_or_default();
    ObjectBuilder::new()
        .set("alternative_dns", Dynamic::optional_string(network.dns2))
        .set(
            "bonding_enabled",
            Dynamic::optional_bool(network.bonding_enabled),
        )
        .set("dns_suffix", Dynamic::optional_string(network.dnssuffix))
        .set("gateway", Dynamic::optional_string(network.gateway))
        .set("ip", Dynamic::optional_string(network.ip))
        .set("netmask", Dynamic::optional_string(network.netmask))
        .set("preferred_dns", Dynamic::optional_string(network.dns1))
        .set("type", Dynamic::optional_string(network.network_type))
        .build()
}

fn port_override_state(port: &DevicePortOverride) -> Dynamic {
    let text = |value: &Option<String>| Dynamic::optional_string(value.clone());
    ObjectBuilder::new()
        .set("aggregate_num_ports", number(port.aggregate_num_ports))
        .set("auto_negotiate", Dynamic::optional_bool(port.autoneg))
        .set("dot1x_ctrl", text(&port.dot1x_ctrl))
        .set("dot1x_idle_timeout", number(port.dot1x_idle_timeout))
        .set("egress_rate_limit_kbps", number(port.egress_rate_limit_kbps))
        .set(
            "egress_rate_limit_kbps_enabled",
            Dynamic::optional_bool(port.egress_rate_limit_kbps_enabled),
        )
        .set(
            "excluded_network_ids",
            string_list(port.excluded_network_ids.as_ref()),
        )
        .set("forward", text(&port.forward))
        .set("full_duplex", Dynamic::optional_bool(port.full_duplex))
        .set("isolation", Dynamic::optional_bool(port.isolation))
        .set("lldp_med_enabled", Dynamic::optional_bool(port.lldpmed_enabled))
        .set("mirror_port_idx", number(port.mirror_port_idx))
        .set("name", text(&port.name))
        .set("native_network_id", text(&port.native_network_id))
        .set("operation", text(&port.op_mode))
        .set("poe_mode", text(&port.poe_mode))
        .set(
            "port_keepalive_enabled",
            Dynamic::optional_bool(port.port_keepalive_enabled),
        )
        .set("port_profile_id", text(&port.port_profile_id))
        .set(
            "port_security_enabled",
            Dynamic::optional_bool(port.port_security_enabled),
        )
        .set(
            "port_security_mac_addresses",
            string_list(port.port_security_mac_addresses.as_ref()),
        )
        .set("setting_preference", text(&port.setting_preference))
        .set("speed", number(port.speed))
        .set("stp_port_mode", Dynamic::optional_bool(port.stp_port_mode))
        .set("tagged_vlan_mgmt", text(&port.tagged_vlan_mgmt))
        .set("voice_networkconf_id", text(&port.voice_network_id))
        .build()
}

/// Read-only view of a switch. Fields the controller omits read as null.
pub fn switch_state(device: &Device, mac: &str, site: &str) -> DynamicValue {
    let text = |value: &Option<String>| Dynamic::optional_string(value.clone());
    let port_overrides: HashMap<String, Dynamic> = device
        .port_overrides
        .iter()
        .map(|p| (p.port_idx.unwrap_or(0).to_string(), port_override_state(p)))
        .collect();

    DynamicValue::new(
        ObjectBuilder::new()
            .set("mac", Dynamic::string(mac))
            .set("site", Dynamic::string(site))
            .set("id", text(&device.id))
            .set("adopted", Dynamic::Bool(device.adopted.unwrap_or(false)))
            .set(
                "config_network",
                config_network_state(device.config_network.as_ref()),
            )
            .set("disabled", Dynamic::optional_bool(device.disabled))
            .set(
                "dot1x_fallback_networkconf_id",
                text(&device.dot1x_fallback_network_id),
            )
            .set(
                "dot1x_portctrl_enabled",
                Dynamic::optional_bool(device.dot1x_portctrl_enabled),
            )
            .set(
                "flowctrl_enabled",
                Dynamic::optional_bool(device.flowctrl_enabled),
            )
            .set("ip", text(&device.ip))
            .set(
                "jumboframe_enabled",
                Dynamic::optional_bool(device.jumboframe_enabled),
            )
            .set("led_override", text(&device.led_override))
            .set("led_override_color", text(&device.led_override_color))
            .set(
                "led_override_color_brightness",
                number(device.led_override_color_brightness),
            )
            .set("mgmt_network_id", text(&device.mgmt_network_id))
            .set("model", text(&device.model))
            .set("name", text(&device.name))
            .set("port_overrides", Dynamic::Map(port_overrides))
            .set("snmp_contact", text(&device.snmp_contact))
            .set("snmp_location", text(&device.snmp_location))
            .set("state", Dynamic::string(device.state_name()))
            .set("stp_priority", text(&device.stp_priority))
            .set("stp_version", text(&device.stp_version))
            .set("type", text(&device.device_type))
            .build(),
    )
}

#[async_trait]
impl DataSource for DeviceSwitchDataSource {
    fn type_name(&self) -> &str {
        "unifi_device_switch"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: switch_data_source_schema(),
            diagnostics: vec![],
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                };
            }
        };

        let fields = Fields::new(&request.config);
        let mac = fields.string("mac").unwrap_or_default();
        let config_site = fields.string("site");
        let site = provider_data.site_or_default(config_site.as_deref());

        match provider_data.client.devices(site).get_by_mac(&mac).await {
            Ok(device) => {
                debug!(site_id = ?device.site_id, "switch site");
                trace!(mac = %mac, "switch read");
                ReadDataSourceResponse {
                    state: switch_state(&device, &mac, site),
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Client Error",
                    format!("Unable to read device, got error: {}", e),
                ));
                ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                }
            }
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for DeviceSwitchDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let mut diagnostics = vec![];

        if let Some(data) = request.provider_data {
            if let Some(provider_data) = data.downcast_ref::<crate::UnifiProviderData>() {
                self.provider_data = Some(provider_data.clone());
            } else {
                diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract UnifiProviderData from provider data",
                ));
            }
        } else {
            diagnostics.push(Diagnostic::error(
                "No provider data",
                "No provider data was provided to the data source",
            ));
        }

        ConfigureDataSourceResponse { diagnostics }
    }
}
