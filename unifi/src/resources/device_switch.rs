//! Switch device resource
//!
//! A switch can't be created through the controller API. It has to be adopted
//! first, after which this resource manages its settings. Destroying the
//! resource forgets it in state and leaves the device alone.

use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import_state_passthrough_id;
use tfplug::path::PathExpression;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, UpdateResourceRequest,
    UpdateResourceResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Diagnostics, Dynamic, DynamicValue};
use tfplug::validator::{
    AlsoRequires, ConflictsWith, Ipv4AddressValidator, NumberOneOf, NumberRangeValidator,
    StringLengthValidator, StringOneOf, StringPatternValidator, StringValueWithPaths,
};
use tracing::{debug, trace};

use crate::api::{ApiError, Device, DeviceConfigNetwork, DevicePortOverride};
use crate::mac::MacValidator;
use crate::plan_modifiers;
use crate::values::{number, string_list, Fields, ObjectBuilder};

const LED_OVERRIDE_ON: &str = "on";
const LED_OVERRIDE_OFF: &str = "off";
const LED_OVERRIDE_DEFAULT: &str = "default";

const CONFIG_NETWORK_DHCP: &str = "dhcp";
const CONFIG_NETWORK_STATIC: &str = "static";

const SETTING_PREFERENCE_AUTO: &str = "auto";
const SETTING_PREFERENCE_MANUAL: &str = "manual";

const LINK_SPEEDS: [f64; 11] = [
    10.0, 100.0, 1000.0, 2500.0, 5000.0, 10000.0, 20000.0, 25000.0, 40000.0, 50000.0, 100000.0,
];

const COLOR_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3}){1,2}$";
const NETMASK_PATTERN: &str = r"^((128|192|224|240|248|252|254)\.0\.0\.0)|(255\.(((0|128|192|224|240|248|252|254)\.0\.0)|(255\.(((0|128|192|224|240|248|252|254)\.0)|255\.(0|128|192|224|240|248|252|254)))))$";

#[derive(Default)]
pub struct DeviceSwitchResource {
    provider_data: Option<crate::UnifiProviderData>,
}

impl DeviceSwitchResource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sibling(name: &str) -> PathExpression {
    PathExpression::relative().at_parent().at_name(name)
}

pub fn switch_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("A Unifi switch device.")
        .attribute(
            AttributeBuilder::string("id")
                .description("The Unifi switch device identifier")
                .computed()
                .plan_modifier(UseStateForUnknown)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("model")
                .computed()
                .plan_modifier(UseStateForUnknown)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("site_id")
                .description("The Unifi internal ID of the site.")
                .computed()
                .plan_modifier(UseStateForUnknown)
                .build(),
        )
        .attribute(
            AttributeBuilder::bool("disabled")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(led_settings_attribute())
        .attribute(
            AttributeBuilder::string("mac")
                .description("The MAC address of the device")
                .required()
                .validator(MacValidator)
                .plan_modifier(RequiresReplace)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("management_network_id")
                .description(
                    "The ID of the VLAN to use as the management VLAN instead of the default tagged network from the upstream device.",
                )
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("name")
                .description("A name to assign to the device")
                .required()
                .validator(StringLengthValidator::max(128))
                .build(),
        )
        .attribute(
            AttributeBuilder::map_nested("port_overrides", port_override_attributes())
                .optional()
                .computed()
                .default(StaticDefault::empty_map())
                .build(),
        )
        .attribute(
            AttributeBuilder::string("site")
                .description(
                    "The site the switch belongs to. Setting this overrides the default site set in the provider",
                )
                .optional()
                .computed()
                .plan_modifier(UseStateForUnknown)
                .plan_modifier(RequiresReplace)
                .build(),
        )
        .attribute(
            AttributeBuilder::string("snmp_contact")
                .optional()
                .computed()
                .default(StaticDefault::string(""))
                .validator(StringLengthValidator::max(255))
                .build(),
        )
        .attribute(
            AttributeBuilder::string("snmp_location")
                .optional()
                .computed()
                .default(StaticDefault::string(""))
                .validator(StringLengthValidator::max(255))
                .build(),
        )
        .attribute(static_ip_settings_attribute())
        .build()
}

fn led_settings_attribute() -> Attribute {
    let default = HashMap::from([("enabled".to_string(), Dynamic::Bool(true))]);
    AttributeBuilder::single_nested(
        "led_settings",
        vec![
            AttributeBuilder::number("brightness")
                .optional()
                .validator(NumberRangeValidator::between(0.0, 100.0))
                .build(),
            AttributeBuilder::string("color")
                .optional()
                .validator(StringPatternValidator::new(COLOR_PATTERN, "invalid color code"))
                .build(),
            AttributeBuilder::bool("enabled")
                .optional()
                .computed()
                .default(StaticDefault::bool(true))
                .build(),
        ],
    )
    .description("Overrides for the switch LEDs.")
    .optional()
    .computed()
    .default(StaticDefault::object(default))
    .build()
}

fn static_ip_settings_attribute() -> Attribute {
    AttributeBuilder::single_nested(
        "static_ip_settings",
        vec![
            AttributeBuilder::string("alternative_dns")
                .optional()
                .validator(Ipv4AddressValidator)
                .build(),
            AttributeBuilder::bool("bonding_enabled")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
            AttributeBuilder::string("dns_suffix")
                .optional()
                .computed()
                .default(StaticDefault::string(""))
                .build(),
            AttributeBuilder::string("gateway")
                .required()
                .validator(Ipv4AddressValidator)
                .build(),
            AttributeBuilder::string("ip")
                .required()
                .validator(Ipv4AddressValidator)
                .build(),
            AttributeBuilder::string("netmask")
                .required()
                .validator(Ipv4AddressValidator)
                .validator(StringPatternValidator::new(NETMASK_PATTERN, "invalid net mask"))
                .build(),
            AttributeBuilder::string("preferred_dns")
                .required()
                .validator(Ipv4AddressValidator)
                .build(),
        ],
    )
    .description("Force the switch to use a static IP address instead of one assigned by DHCP.")
    .optional()
    .build()
}

fn port_override_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::number("aggregate_num_ports")
            .optional()
            .validator(NumberRangeValidator::between(1.0, 8.0))
            .validator(AlsoRequires::new(vec![sibling("operation")]))
            .build(),
        AttributeBuilder::new(
            "excluded_tagged_network_ids",
            AttributeType::List(Box::new(AttributeType::String)),
        )
        .description("One or more VLANs that are tagged on this port.")
        .optional()
        .validator(AlsoRequires::new(vec![sibling("tagged_vlan_management")]))
        .build(),
        AttributeBuilder::bool("full_duplex")
            .optional()
            .validator(AlsoRequires::new(vec![sibling("link_speed")]))
            .build(),
        AttributeBuilder::number("link_speed")
            .description("An override for the link speed of the port.")
            .optional()
            .validator(NumberOneOf::new(&LINK_SPEEDS))
            .validator(AlsoRequires::new(vec![sibling("full_duplex")]))
            .build(),
        AttributeBuilder::number("mirror_port_index")
            .description("The index of the port to mirror traffic to.")
            .optional()
            .validator(NumberRangeValidator::between(1.0, 52.0))
            .validator(AlsoRequires::new(vec![sibling("operation")]))
            .build(),
        AttributeBuilder::string("name")
            .required()
            .validator(StringLengthValidator::between(0, 128))
            .build(),
        AttributeBuilder::string("native_network_id")
            .description(
                "The native network used for VLAN traffic, i.e. not tagged with a VLAN ID. Untagged traffic from devices connected to this port will be placed on to the selected VLAN.",
            )
            .optional()
            .computed()
            .plan_modifier(UseStateForUnknown)
            .plan_modifier(plan_modifiers::port_profile_id())
            .validator(ConflictsWith::new(vec![sibling("port_profile_id")]))
            .build(),
        AttributeBuilder::string("operation")
            .optional()
            .computed()
            .default(StaticDefault::string("switch"))
            .plan_modifier(plan_modifiers::port_profile_id())
            .validator(StringOneOf::new(&["switch", "mirror", "aggregate"]))
            .validator(ConflictsWith::new(vec![sibling("port_profile_id")]))
            .validator(StringValueWithPaths::new(
                "aggregate",
                vec![sibling("aggregate_num_ports")],
            ))
            .validator(StringValueWithPaths::new(
                "mirror",
                vec![sibling("mirror_port_index")],
            ))
            .build(),
        AttributeBuilder::string("poe_mode")
            .optional()
            .computed()
            .default(StaticDefault::string("auto"))
            .validator(StringOneOf::new(&["auto", "pasv24", "passthrough", "off"]))
            .build(),
        AttributeBuilder::string("port_profile_id")
            .description(
                "The ID of a port profile to assign to the port. This will override nearly all local settings of the port.",
            )
            .optional()
            .build(),
        AttributeBuilder::string("tagged_vlan_management")
            .optional()
            .computed()
            .default(StaticDefault::string("auto"))
            .plan_modifier(plan_modifiers::port_profile_id())
            .validator(StringOneOf::new(&["auto", "block_all", "custom"]))
            .validator(ConflictsWith::new(vec![sibling("port_profile_id")]))
            .validator(StringValueWithPaths::new(
                "custom",
                vec![sibling("excluded_tagged_network_ids")],
            ))
            .build(),
    ]
}

/// Builds the controller payload from a planned model. Port keys that are not
/// numbers are skipped with a warning.
pub fn device_from_model(model: &DynamicValue, diagnostics: &mut Diagnostics) -> Device {
    let fields = Fields::new(model);

    let mut port_overrides = Vec::new();
    let mut entries: Vec<(String, Dynamic)> = fields
        .map("port_overrides")
        .unwrap_or_default()
        .into_iter()
        .collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (index, entry) in entries {
        match index.parse::<i64>() {
            Ok(port_idx) => {
                port_overrides.push(port_override_to_api(&DynamicValue::new(entry), port_idx))
            }
            Err(e) => diagnostics.add_attribute_warning(
                AttributePath::new("port_overrides"),
                "Invalid Port Index",
                format!(
                    "Expected a number for the port index instead got {}: {}",
                    index, e
                ),
            ),
        }
    }
    port_overrides.sort_by_key(|p| p.port_idx);

    let management_network_id = fields.string("management_network_id").unwrap_or_default();
    if management_network_id.is_empty() {
        diagnostics.add_attribute_error(
            AttributePath::new("management_network_id"),
            "Invalid ID",
            "The ID of the management network must not be empty",
        );
    }

    let led = fields.object("led_settings");
    let led_fields = led.as_ref().map(Fields::new);
    let led_enabled = led_fields
        .as_ref()
        .map(|led| led.bool("enabled").unwrap_or(false))
        .unwrap_or(true);

    Device {
        config_network: Some(config_network_from_model(fields.object("static_ip_settings"))),
        disabled: fields.bool("disabled"),
        led_override: Some(
            if led_enabled {
                LED_OVERRIDE_ON
            } else {
                LED_OVERRIDE_OFF
            }
            .to_string(),
        ),
        led_override_color: led_fields.as_ref().and_then(|led| led.string("color")),
        led_override_color_brightness: led_fields.as_ref().and_then(|led| led.int("brightness")),
        mac: fields.string("mac"),
        mgmt_network_id: Some(management_network_id),
        name: fields.string("name"),
        port_overrides,
        snmp_contact: fields.string("snmp_contact"),
        snmp_location: fields.string("snmp_location"),
        ..Default::default()
    }
}

fn config_network_from_model(settings: Option<DynamicValue>) -> DeviceConfigNetwork {
    let Some(settings) = settings else {
        return DeviceConfigNetwork {
            network_type: Some(CONFIG_NETWORK_DHCP.to_string()),
            ..Default::default()
        };
    };
    let fields = Fields::new(&settings);

    DeviceConfigNetwork {
        network_type: Some(CONFIG_NETWORK_STATIC.to_string()),
        ip: fields.string("ip"),
        netmask: fields.string("netmask"),
        gateway: fields.string("gateway"),
        dns1: fields.string("preferred_dns"),
        dns2: fields.string("alternative_dns"),
        dnssuffix: fields.string("dns_suffix"),
        bonding_enabled: fields.bool("bonding_enabled"),
    }
}

fn port_override_to_api(entry: &DynamicValue, port_idx: i64) -> DevicePortOverride {
    let fields = Fields::new(entry);
    let link_speed = fields.int("link_speed");

    DevicePortOverride {
        port_idx: Some(port_idx),
        autoneg: Some(link_speed.is_none()),
        setting_preference: Some(
            if link_speed.is_some() {
                SETTING_PREFERENCE_MANUAL
            } else {
                SETTING_PREFERENCE_AUTO
            }
            .to_string(),
        ),
        aggregate_num_ports: fields.int("aggregate_num_ports"),
        excluded_network_ids: fields.string_list("excluded_tagged_network_ids"),
        full_duplex: fields.bool("full_duplex"),
        mirror_port_idx: fields.int("mirror_port_index"),
        name: fields.string("name"),
        // unknown stays absent so the controller keeps its value
        native_network_id: fields.string("native_network_id"),
        op_mode: fields.string("operation"),
        poe_mode: fields.string("poe_mode"),
        port_profile_id: fields.string("port_profile_id"),
        speed: link_speed,
        tagged_vlan_mgmt: fields.string("tagged_vlan_management"),
        ..Default::default()
    }
}

/// Rebuilds the model from the controller's view of the device. `prior` supplies
/// the LED and static IP values the controller doesn't echo back.
pub fn model_from_device(device: &Device, site: &str, prior: &DynamicValue) -> DynamicValue {
    let prior_fields = Fields::new(prior);

    let id = device
        .id
        .clone()
        .map(Dynamic::String)
        .unwrap_or_else(|| prior_fields.get("id"));

    let port_overrides: HashMap<String, Dynamic> = device
        .port_overrides
        .iter()
        .filter_map(|p| p.port_idx.map(|idx| (idx.to_string(), port_override_from_api(p))))
        .collect();

    DynamicValue::new(
        ObjectBuilder::new()
            .set("id", id)
            .set("model", Dynamic::optional_string(device.model.clone()))
            .set("site", Dynamic::string(site))
            .set("site_id", Dynamic::optional_string(device.site_id.clone()))
            .set("disabled", Dynamic::optional_bool(device.disabled))
            .set(
                "led_settings",
                led_settings_from_api(device, prior_fields.object("led_settings")),
            )
            .set("mac", Dynamic::optional_string(device.mac.clone()))
            .set(
                "management_network_id",
                Dynamic::optional_string(device.mgmt_network_id.clone()),
            )
            .set("name", Dynamic::optional_string(device.name.clone()))
            .set("port_overrides", Dynamic::Map(port_overrides))
            .set(
                "snmp_contact",
                Dynamic::optional_string(device.snmp_contact.clone()),
            )
            .set(
                "snmp_location",
                Dynamic::optional_string(device.snmp_location.clone()),
            )
            .set(
                "static_ip_settings",
                static_ip_settings_from_api(
                    device.config_network.as_ref(),
                    prior_fields.object("static_ip_settings"),
                ),
            )
            .build(),
    )
}

fn led_settings_from_api(device: &Device, prior: Option<DynamicValue>) -> Dynamic {
    let prior = prior.unwrap_or_else(DynamicValue::object);
    let prior_fields = Fields::new(&prior);

    match device.led_override.as_deref() {
        None | Some(LED_OVERRIDE_DEFAULT) => ObjectBuilder::new()
            .set("brightness", prior_fields.get("brightness"))
            .set("color", prior_fields.get("color"))
            .set("enabled", Dynamic::Bool(true))
            .build(),
        Some(state) => ObjectBuilder::new()
            .set("brightness", number(device.led_override_color_brightness))
            .set(
                "color",
                Dynamic::optional_string(device.led_override_color.clone()),
            )
            .set("enabled", Dynamic::Bool(state == LED_OVERRIDE_ON))
            .build(),
    }
}

fn static_ip_settings_from_api(
    network: Option<&DeviceConfigNetwork>,
    prior: Option<DynamicValue>,
) -> Dynamic {
    let Some(network) = network else {
        return Dynamic::Null;
    };
    if network.network_type.as_deref() == Some(CONFIG_NETWORK_DHCP) {
        return Dynamic::Null;
    }

    let alternative_dns = match network.dns2.as_deref() {
        Some(dns) if !dns.is_empty() => Dynamic::string(dns),
        _ => prior
            .as_ref()
            .map(|prior| Fields::new(prior).get("alternative_dns"))
            .unwrap_or(Dynamic::Null),
    };

    ObjectBuilder::new()
        .set("alternative_dns", alternative_dns)
        .set("bonding_enabled", Dynamic::optional_bool(network.bonding_enabled))
        .set("dns_suffix", Dynamic::optional_string(network.dnssuffix.clone()))
        .set("gateway", Dynamic::optional_string(network.gateway.clone()))
        .set("ip", Dynamic::optional_string(network.ip.clone()))
        .set("netmask", Dynamic::optional_string(network.netmask.clone()))
        .set("preferred_dns", Dynamic::optional_string(network.dns1.clone()))
        .build()
}

fn port_override_from_api(port: &DevicePortOverride) -> Dynamic {
    ObjectBuilder::new()
        .set("aggregate_num_ports", number(port.aggregate_num_ports))
        .set(
            "excluded_tagged_network_ids",
            string_list(port.excluded_network_ids.as_ref()),
        )
        .set("full_duplex", Dynamic::optional_bool(port.full_duplex))
        .set("link_speed", number(port.speed))
        .set("mirror_port_index", number(port.mirror_port_idx))
        .set("name", Dynamic::optional_string(port.name.clone()))
        .set(
            "native_network_id",
            Dynamic::optional_string(port.native_network_id.clone()),
        )
        .set("operation", Dynamic::optional_string(port.op_mode.clone()))
        .set("poe_mode", Dynamic::optional_string(port.poe_mode.clone()))
        .set(
            "port_profile_id",
            Dynamic::optional_string(port.port_profile_id.clone()),
        )
        .set(
            "tagged_vlan_management",
            Dynamic::optional_string(port.tagged_vlan_mgmt.clone()),
        )
        .build()
}

fn null_unknowns(value: Dynamic) -> Dynamic {
    match value {
        Dynamic::Unknown => Dynamic::Null,
        Dynamic::List(items) => Dynamic::List(items.into_iter().map(null_unknowns).collect()),
        Dynamic::Map(fields) => Dynamic::Map(
            fields
                .into_iter()
                .map(|(name, value)| (name, null_unknowns(value)))
                .collect(),
        ),
        other => other,
    }
}

/// The plan as stored when the controller accepted an update without echoing
/// the device. Values still unknown are taken from `known`, and whatever is
/// left unknown after that is stored as null.
fn settle_plan(planned: &DynamicValue, site: &str, known: Option<&Device>) -> DynamicValue {
    let mut state = planned.clone();
    let mut settle = |name: &str, value: Option<String>| {
        let path = AttributePath::new(name);
        if state.get_attribute(&path).is_ok_and(|v| v.is_unknown()) {
            let _ = state.set_value(&path, Dynamic::optional_string(value));
        }
    };
    settle("site", Some(site.to_string()));
    if let Some(device) = known {
        settle("id", device.id.clone());
        settle("model", device.model.clone());
        settle("site_id", device.site_id.clone());
    }
    DynamicValue::new(null_unknowns(state.value))
}

impl DeviceSwitchResource {
    /// Pushes `planned` to the controller and returns the state to store
    async fn apply(
        &self,
        provider_data: &crate::UnifiProviderData,
        id: &str,
        planned: &DynamicValue,
        known: Option<&Device>,
        diagnostics: &mut Diagnostics,
    ) -> Option<DynamicValue> {
        let planned_site = Fields::new(planned).string("site");
        let site = provider_data.site_or_default(planned_site.as_deref());

        let mut device = device_from_model(planned, diagnostics);
        if diagnostics.has_error() {
            return None;
        }
        device.id = Some(id.to_string());

        match provider_data.client.devices(site).update(id, &device).await {
            Ok(updated) => {
                debug!(id, site, "switch updated");
                Some(model_from_device(&updated, site, planned))
            }
            // newer controllers answer an update without changes with no device
            Err(ApiError::NotFound) => Some(settle_plan(planned, site, known)),
            Err(e) => {
                diagnostics.add_error(
                    "Client Error",
                    Some(format!("Unable to update switch, got error: {}", e)),
                );
                None
            }
        }
    }
}

#[async_trait]
impl Resource for DeviceSwitchResource {
    fn type_name(&self) -> &str {
        "unifi_device_switch"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: switch_schema(),
            diagnostics: vec![],
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: diagnostics.into_vec(),
                };
            }
        };

        let fields = Fields::new(&request.planned_state);
        let mac = fields.string("mac").unwrap_or_default();
        let planned_site = fields.string("site");
        let site = provider_data.site_or_default(planned_site.as_deref());

        let existing = match provider_data.client.devices(site).get_by_mac(&mac).await {
            Ok(device) => device,
            Err(e) => {
                let detail = if e.is_not_found() {
                    format!(
                        "No device with MAC {} exists in site {}. Switches must be adopted by the controller before they can be managed.",
                        mac, site
                    )
                } else {
                    format!("Unable to read switch, got error: {}", e)
                };
                diagnostics.add_attribute_error(AttributePath::new("mac"), "Client Error", detail);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: diagnostics.into_vec(),
                };
            }
        };

        let Some(id) = existing.id.clone() else {
            diagnostics.add_error(
                "Client Error",
                Some(format!("The controller returned switch {} without an ID", mac)),
            );
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics: diagnostics.into_vec(),
            };
        };

        let new_state = self
            .apply(
                provider_data,
                &id,
                &request.planned_state,
                Some(&existing),
                &mut diagnostics,
            )
            .await;
        trace!(mac = %mac, id = %id, "switch adopted into state");

        CreateResourceResponse {
            new_state: new_state.unwrap_or(request.planned_state),
            diagnostics: diagnostics.into_vec(),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let fields = Fields::new(&request.current_state);
        let Some(id) = fields.string("id") else {
            return ReadResourceResponse {
                new_state: None,
                diagnostics,
            };
        };
        let state_site = fields.string("site");
        let site = provider_data.site_or_default(state_site.as_deref());

        match provider_data.client.devices(site).get(&id).await {
            Ok(device) => {
                trace!(id = %id, site, "switch read");
                ReadResourceResponse {
                    new_state: Some(model_from_device(&device, site, &request.current_state)),
                    diagnostics,
                }
            }
            Err(ApiError::NotFound) => {
                debug!(id = %id, site, "switch no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Client Error",
                    format!("Unable to read switch, got error: {}", e),
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                }
            }
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return UpdateResourceResponse {
                    new_state: Some(request.prior_state),
                    diagnostics: diagnostics.into_vec(),
                };
            }
        };

        let id = Fields::new(&request.planned_state)
            .string("id")
            .or_else(|| Fields::new(&request.prior_state).string("id"))
            .unwrap_or_default();

        let new_state = self
            .apply(
                provider_data,
                &id,
                &request.planned_state,
                None,
                &mut diagnostics,
            )
            .await;

        UpdateResourceResponse {
            new_state: Some(new_state.unwrap_or(request.prior_state)),
            diagnostics: diagnostics.into_vec(),
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mac = Fields::new(&request.prior_state).string("mac");
        debug!(mac = ?mac, "switch removed from state, device left on controller");
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }

    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        response
    }
}

#[async_trait]
impl ResourceWithConfigure for DeviceSwitchResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
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
                "No provider data was provided to the resource",
            ));
        }

        ConfigureResourceResponse { diagnostics }
    }
}
