//! Controller object models.
//!
//! The API is inconsistent about field presence across firmware versions, so
//! almost everything is optional and absent fields are left out of requests.

use serde::{Deserialize, Serialize};

/// Network device (switch, access point, gateway) from `stat/device`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_override_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_override_color_brightness: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgmt_network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmp_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmp_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stp_priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stp_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowctrl_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jumboframe_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot1x_portctrl_enabled: Option<bool>,
    #[serde(
        rename = "dot1x_fallback_networkconf_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dot1x_fallback_network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_network: Option<DeviceConfigNetwork>,
    /// Always sent so that an empty list clears overrides on the controller
    #[serde(default)]
    pub port_overrides: Vec<DevicePortOverride>,
}

/// Management interface addressing. `type` is `dhcp` or `static`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfigNetwork {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssuffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonding_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicePortOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_idx: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_num_ports: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoneg: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot1x_ctrl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot1x_idle_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_rate_limit_kbps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_rate_limit_kbps_enabled: Option<bool>,
    #[serde(
        rename = "excluded_networkconf_ids",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub excluded_network_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_duplex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lldpmed_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_port_idx: Option<i64>,
    #[serde(
        rename = "native_networkconf_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub native_network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_keepalive_enabled: Option<bool>,
    #[serde(
        rename = "portconf_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub port_profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_security_enabled: Option<bool>,
    #[serde(
        rename = "port_security_mac_address",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub port_security_mac_addresses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stp_port_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged_vlan_mgmt: Option<String>,
    #[serde(
        rename = "voice_networkconf_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_network_id: Option<String>,
}

/// Connection state reported in `Device::state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Disconnected,
    Connected,
    Pending,
    FirmwareMismatch,
    Upgrading,
    Provisioning,
    HeartbeatMissed,
    Adopting,
    Deleting,
    InformError,
    AdoptionFailed,
    Isolated,
    Unknown,
}

impl DeviceState {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => DeviceState::Disconnected,
            1 => DeviceState::Connected,
            2 => DeviceState::Pending,
            3 => DeviceState::FirmwareMismatch,
            4 => DeviceState::Upgrading,
            5 => DeviceState::Provisioning,
            6 => DeviceState::HeartbeatMissed,
            7 => DeviceState::Adopting,
            8 => DeviceState::Deleting,
            9 => DeviceState::InformError,
            10 => DeviceState::AdoptionFailed,
            11 => DeviceState::Isolated,
            _ => DeviceState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Disconnected => "DISCONNECTED",
            DeviceState::Connected => "CONNECTED",
            DeviceState::Pending => "PENDING",
            DeviceState::FirmwareMismatch => "FIRMWARE_MISMATCH",
            DeviceState::Upgrading => "UPGRADING",
            DeviceState::Provisioning => "PROVISIONING",
            DeviceState::HeartbeatMissed => "HEARTBEAT_MISSED",
            DeviceState::Adopting => "ADOPTING",
            DeviceState::Deleting => "DELETING",
            DeviceState::InformError => "INFORM_ERROR",
            DeviceState::AdoptionFailed => "ADOPTION_FAILED",
            DeviceState::Isolated => "ISOLATED",
            DeviceState::Unknown => "UNKNOWN",
        }
    }
}

impl Device {
    pub fn state_name(&self) -> &'static str {
        self.state
            .map(DeviceState::from_code)
            .unwrap_or(DeviceState::Unknown)
            .as_str()
    }
}

/// Known client ("user" in the controller's vocabulary)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub site_id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "usergroup_id", default)]
    pub user_group_id: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub fixed_ip: String,
    #[serde(default)]
    pub use_fixedip: bool,
    #[serde(default)]
    pub network_id: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub dev_id_override: i64,

    // Maintained by the controller
    #[serde(rename = "attr_hidden", default, skip_serializing)]
    pub hidden: bool,
    #[serde(rename = "attr_hidden_id", default, skip_serializing)]
    pub hidden_id: String,
    #[serde(rename = "attr_no_delete", default, skip_serializing)]
    pub no_delete: bool,
    #[serde(rename = "attr_no_edit", default, skip_serializing)]
    pub no_edit: bool,
    #[serde(default, skip_serializing)]
    pub ip: String,
    #[serde(default, skip_serializing)]
    pub fixed_ap_enabled: bool,
    #[serde(default, skip_serializing)]
    pub fixed_ap_mac: String,
    #[serde(default, skip_serializing)]
    pub hostname: String,
    #[serde(default, skip_serializing)]
    pub local_dns_record: String,
    #[serde(default, skip_serializing)]
    pub local_dns_record_enabled: bool,
    #[serde(default, skip_serializing)]
    pub virtual_network_override_enabled: bool,
    #[serde(default, skip_serializing)]
    pub virtual_network_override_id: String,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
