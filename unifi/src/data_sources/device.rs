//! Device data source, looked up by MAC

use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tracing::trace;

use crate::api::{Device, DevicePortOverride};
use crate::mac::MacValidator;
use crate::values::{string_list, Fields, ObjectBuilder};

#[derive(Default)]
pub struct DeviceDataSource {
    provider_data: Option<crate::UnifiProviderData>,
}

impl DeviceDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn string_list_type() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

pub fn device_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Get information about a Unifi device")
        .attribute(
            AttributeBuilder::string("mac")
                .description("The MAC address of the device")
                .required()
                .validator(MacValidator)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("site")
                .description(
                    "The site of the device. When set this overrides the default provider site",
                )
                .optional()
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("id")
                .description("Device identifier")
                .computed()
                .build(),
        )
        .attribute(AttributeBuilder::bool("adopted").computed().build())
        .attribute(AttributeBuilder::bool("disabled").computed().build())
        .attribute(AttributeBuilder::string("name").computed().build())
        .attribute(
            AttributeBuilder::map_nested(
                "port_overrides",
                vec![
                    AttributeBuilder::number("aggregate_num_ports")
                        .computed()
                        .build(),
                    AttributeBuilder::new("excluded_network_ids", string_list_type())
                        .computed()
                        .build(),
                    AttributeBuilder::string("name").computed().build(),
                    AttributeBuilder::string("native_network_id")
                        .description(
                            "The native network used for VLAN traffic, i.e. not tagged with a VLAN ID. Untagged traffic from devices connected to this port will be placed on to the selected VLAN",
                        )
                        .computed()
                        .build(),
                    AttributeBuilder::string("op_mode").computed().build(),
                    AttributeBuilder::string("poe_mode").computed().build(),
                    AttributeBuilder::string("port_profile_id").computed().build(),
                    AttributeBuilder::bool("port_security_enabled")
                        .computed()
                        .build(),
                    AttributeBuilder::new("port_security_mac_addresses", string_list_type())
                        .computed()
                        .build(),
                ],
            )
            .computed()
            .build(),
        )
        .attribute(AttributeBuilder::string("state").computed().build())
        .attribute(AttributeBuilder::string("type").computed().build())
        .build()
}

fn port_override_state(port: &DevicePortOverride) -> Dynamic {
    ObjectBuilder::new()
        .set(
            "aggregate_num_ports",
            Dynamic::Number(port.aggregate_num_ports.unwrap_or(0) as f64),
        )
        .set(
            "excluded_network_ids",
            string_list(port.excluded_network_ids.as_ref()),
        )
        .set("name", Dynamic::string(port.name.clone().unwrap_or_default()))
        .set(
            "native_network_id",
            Dynamic::string(port.native_network_id.clone().unwrap_or_default()),
        )
        .set("op_mode", Dynamic::string(port.op_mode.clone().unwrap_or_default()))
        .set("poe_mode", Dynamic::string(port.poe_mode.clone().unwrap_or_default()))
        .set(
            "port_profile_id",
            Dynamic::string(port.port_profile_id.clone().unwrap_or_default()),
        )
        .set(
            "port_security_enabled",
            Dynamic::Bool(port.port_security_enabled.unwrap_or(false)),
        )
        .set(
            "port_security_mac_addresses",
            string_list(port.port_security_mac_addresses.as_ref()),
        )
        .build()
}

pub fn device_state(device: &Device, mac: &str, site: &str) -> DynamicValue {
    let port_overrides: HashMap<String, Dynamic> = device
        .port_overrides
        .iter()
        .map(|p| (p.port_idx.unwrap_or(0).to_string(), port_override_state(p)))
        .collect();

    DynamicValue::new(
        ObjectBuilder::new()
            .set("mac", Dynamic::string(mac))
            .set("site", Dynamic::string(site))
            .set("id", Dynamic::string(device.id.clone().unwrap_or_default()))
            .set("adopted", Dynamic::Bool(device.adopted.unwrap_or(false)))
            .set("disabled", Dynamic::Bool(device.disabled.unwrap_or(false)))
            .set("name", Dynamic::string(device.name.clone().unwrap_or_default()))
            .set("port_overrides", Dynamic::Map(port_overrides))
            .set("state", Dynamic::string(device.state_name()))
            .set(
                "type",
                Dynamic::string(device.device_type.clone().unwrap_or_default()),
            )
            .build(),
    )
}

#[async_trait]
impl DataSource for DeviceDataSource {
    fn type_name(&self) -> &str {
        "unifi_device"
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
            schema: device_schema(),
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
                trace!(mac = %mac, "device read");
                ReadDataSourceResponse {
                    state: device_state(&device, &mac, site),
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
impl DataSourceWithConfigure for DeviceDataSource {
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
