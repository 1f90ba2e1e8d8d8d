use std::collections::HashMap;

use tfplug::plan::validate_config;
use tfplug::types::{AttributePath, Diagnostics, Dynamic, DynamicValue};
use unifi::resources::device_switch::switch_schema;

fn validate_port(port: &[(&str, Dynamic)]) -> Diagnostics {
    validate_ports(&[("1", port)])
}

fn validate_ports(ports: &[(&str, &[(&str, Dynamic)])]) -> Diagnostics {
    let ports: HashMap<String, Dynamic> = ports
        .iter()
        .map(|(key, port)| {
            let entry: HashMap<String, Dynamic> = port
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            (key.to_string(), Dynamic::Map(entry))
        })
        .collect();

    let mut config = DynamicValue::object();
    config.set_string(&AttributePath::new("mac"), "f0:9f:c2:00:00:30".to_string()).unwrap();
    config.set_string(&AttributePath::new("name"), "edge".to_string()).unwrap();
    config.set_string(&AttributePath::new("management_network_id"), "net1".to_string()).unwrap();
    config.set_value(&AttributePath::new("port_overrides"), Dynamic::Map(ports)).unwrap();
    validate_config(&switch_schema(), &config)
}

fn port_path(attribute: &str) -> AttributePath {
    AttributePath::new("port_overrides").key("1").attribute(attribute)
}

#[test]
fn each_missing_member_count_is_reported_on_its_port() {
    let lag: &[(&str, Dynamic)] = &[
        ("name", Dynamic::string("lag")),
        ("operation", Dynamic::string("aggregate")),
    ];
    let diagnostics = validate_ports(&[("1", lag), ("2", lag)]);

    assert_eq!(diagnostics.errors.len(), 2);
    for key in ["1", "2"] {
        let operation = AttributePath::new("port_overrides")
            .key(key)
            .attribute("operation");
        let expected = format!(
            r#"Attribute "port_overrides["{key}"].aggregate_num_ports" must be specified when "{operation}" is "aggregate""#
        );
        assert!(diagnostics
            .errors
            .iter()
            .any(|e| e.attribute.as_ref() == Some(&operation) && e.detail == expected));
    }
}

#[test]
fn aggregate_needs_member_count() {
    let diagnostics = validate_port(&[
        ("name", Dynamic::string("lag")),
        ("operation", Dynamic::string("aggregate")),
    ]);
    assert_eq!(diagnostics.errors.len(), 1);
    assert_eq!(diagnostics.errors[0].attribute, Some(port_path("operation")));
    assert!(diagnostics.errors[0].detail.contains("aggregate_num_ports"));

    let diagnostics = validate_port(&[
        ("name", Dynamic::string("lag")),
        ("operation", Dynamic::string("aggregate")),
        ("aggregate_num_ports", Dynamic::Number(2.0)),
    ]);
    assert!(diagnostics.is_empty());
}

#[test]
fn custom_tagging_needs_excluded_networks() {
    let diagnostics = validate_port(&[
        ("name", Dynamic::string("trunk")),
        ("tagged_vlan_management", Dynamic::string("custom")),
    ]);
    assert_eq!(diagnostics.errors.len(), 1);
    assert!(diagnostics.errors[0]
        .detail
        .contains("excluded_tagged_network_ids"));

    let diagnostics = validate_port(&[
        ("name", Dynamic::string("trunk")),
        ("tagged_vlan_management", Dynamic::string("custom")),
        ("native_network_id", Dynamic::string("lan")),
    ]);
    assert_eq!(diagnostics.errors.len(), 1);
}

#[test]
fn unknown_member_count_postpones_check() {
    let diagnostics = validate_port(&[
        ("name", Dynamic::string("lag")),
        ("operation", Dynamic::string("aggregate")),
        ("aggregate_num_ports", Dynamic::Unknown),
    ]);
    assert!(diagnostics.is_empty());
}

#[test]
fn port_profile_excludes_local_settings() {
    let diagnostics = validate_port(&[
        ("name", Dynamic::string("ap")),
        ("port_profile_id", Dynamic::string("profile")),
        ("operation", Dynamic::string("switch")),
    ]);
    assert_eq!(diagnostics.errors.len(), 1);
    assert_eq!(diagnostics.errors[0].attribute, Some(port_path("operation")));
}

#[test]
fn unknown_port_profile_postpones_exclusion() {
    let diagnostics = validate_port(&[
        ("name", Dynamic::string("ap")),
        ("port_profile_id", Dynamic::Unknown),
        ("native_network_id", Dynamic::string("lan")),
        ("operation", Dynamic::string("switch")),
        ("tagged_vlan_management", Dynamic::string("auto")),
    ]);
    assert!(diagnostics.is_empty());
}

#[test]
fn link_speed_must_be_supported() {
    let diagnostics = validate_port(&[
        ("name", Dynamic::string("wan")),
        ("link_speed", Dynamic::Number(123.0)),
        ("full_duplex", Dynamic::Bool(true)),
    ]);
    assert_eq!(diagnostics.errors.len(), 1);
    assert_eq!(diagnostics.errors[0].attribute, Some(port_path("link_speed")));
}
