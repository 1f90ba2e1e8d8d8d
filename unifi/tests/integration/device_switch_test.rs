use std::collections::HashMap;

use mockito::{Matcher, Server};
use tfplug::context::Context;
use tfplug::plan::plan_resource_change;
use tfplug::resource::{
    CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest, Resource,
    UpdateResourceRequest,
};
use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use unifi::resources::device_switch::switch_schema;

use crate::support;

const MAC: &str = "f0:9f:c2:00:00:10";

fn switch_config(name: &str) -> DynamicValue {
    let uplink = HashMap::from([
        ("name".to_string(), Dynamic::string("uplink")),
        ("operation".to_string(), Dynamic::string("aggregate")),
        ("aggregate_num_ports".to_string(), Dynamic::Number(2.0)),
    ]);
    let ports = HashMap::from([("1".to_string(), Dynamic::Map(uplink))]);

    let mut config = DynamicValue::object();
    config.set_string(&AttributePath::new("mac"), MAC.to_string()).unwrap();
    config.set_string(&AttributePath::new("name"), name.to_string()).unwrap();
    config.set_string(&AttributePath::new("management_network_id"), "net1".to_string()).unwrap();
    config.set_value(&AttributePath::new("port_overrides"), Dynamic::Map(ports)).unwrap();
    config
}

fn device_body(name: &str) -> String {
    format!(
        r#"{{"meta":{{"rc":"ok"}},"data":[{{
            "_id":"sw1","site_id":"s1","mac":"{MAC}","model":"US24P250","name":"{name}",
            "mgmt_network_id":"net1","led_override":"on","disabled":false,
            "snmp_contact":"","snmp_location":"",
            "config_network":{{"type":"dhcp"}},
            "port_overrides":[{{"port_idx":1,"name":"uplink","op_mode":"aggregate",
                "aggregate_num_ports":2,"poe_mode":"auto","tagged_vlan_mgmt":"auto",
                "native_networkconf_id":"lan"}}]
        }}]}}"#
    )
}

async fn create_switch(server: &mut mockito::ServerGuard) -> DynamicValue {
    let resource = support::resource("unifi_device_switch", &server.url()).await;

    let config = switch_config("core");
    let plan = plan_resource_change(&switch_schema(), &config, &DynamicValue::null());
    assert!(plan.diagnostics.is_empty());

    let _lookup = server
        .mock("GET", format!("/api/s/default/stat/device/{MAC}").as_str())
        .with_body(
            r#"{"meta":{"rc":"ok"},"data":[{"_id":"sw1","site_id":"s1","model":"US24P250"}]}"#,
        )
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/s/default/rest/device/sw1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "_id": "sw1",
            "name": "core",
            "mgmt_network_id": "net1",
            "led_override": "on",
            "config_network": {"type": "dhcp"},
            "port_overrides": [{
                "port_idx": 1,
                "op_mode": "aggregate",
                "aggregate_num_ports": 2,
                "autoneg": true,
                "setting_preference": "auto"
            }]
        })))
        .with_body(device_body("core"))
        .create_async()
        .await;

    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "unifi_device_switch".to_string(),
                planned_state: plan.planned_state,
                config,
            },
        )
        .await;
    assert!(created.diagnostics.is_empty());
    update.assert_async().await;
    created.new_state
}

#[tokio::test]
async fn adopted_switch_is_taken_into_state() {
    let mut server = Server::new_async().await;
    let state = create_switch(&mut server).await;

    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "sw1");
    assert_eq!(
        state.get_string(&AttributePath::new("model")).unwrap(),
        "US24P250"
    );
    assert_eq!(state.get_string(&AttributePath::new("site")).unwrap(), "default");
    assert_eq!(
        state
            .get_attribute(&AttributePath::new("static_ip_settings"))
            .unwrap(),
        Dynamic::Null
    );

    let native = state
        .get_attribute(
            &AttributePath::new("port_overrides")
                .key("1")
                .attribute("native_network_id"),
        )
        .unwrap();
    assert_eq!(native, Dynamic::string("lan"));
}

#[tokio::test]
async fn unadopted_switch_cannot_be_created() {
    let mut server = Server::new_async().await;
    let resource = support::resource("unifi_device_switch", &server.url()).await;

    let _lookup = server
        .mock("GET", format!("/api/s/default/stat/device/{MAC}").as_str())
        .with_body(r#"{"meta":{"rc":"ok"},"data":[]}"#)
        .create_async()
        .await;

    let config = switch_config("core");
    let plan = plan_resource_change(&switch_schema(), &config, &DynamicValue::null());
    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "unifi_device_switch".to_string(),
                planned_state: plan.planned_state,
                config,
            },
        )
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(created.diagnostics[0].summary, "Client Error");
    assert_eq!(
        created.diagnostics[0].attribute,
        Some(AttributePath::new("mac"))
    );
    assert!(created.diagnostics[0].detail.contains("adopted"));
}

#[tokio::test]
async fn update_without_echo_keeps_plan() {
    let mut server = Server::new_async().await;
    let prior = create_switch(&mut server).await;
    let resource = support::resource("unifi_device_switch", &server.url()).await;

    let config = switch_config("core-renamed");
    let plan = plan_resource_change(&switch_schema(), &config, &prior);
    assert!(plan.requires_replace.is_empty());

    let _update = server
        .mock("PUT", "/api/s/default/rest/device/sw1")
        .match_body(Matcher::PartialJson(
            serde_json::json!({"name": "core-renamed"}),
        ))
        .with_body(r#"{"meta":{"rc":"ok"},"data":[]}"#)
        .create_async()
        .await;

    let updated = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "unifi_device_switch".to_string(),
                prior_state: prior,
                planned_state: plan.planned_state,
                config,
            },
        )
        .await;

    assert!(updated.diagnostics.is_empty());
    let state = updated.new_state.unwrap();
    assert_eq!(
        state.get_string(&AttributePath::new("name")).unwrap(),
        "core-renamed"
    );
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "sw1");
}

#[tokio::test]
async fn missing_switch_is_removed_on_read() {
    let mut server = Server::new_async().await;
    let resource = support::resource("unifi_device_switch", &server.url()).await;

    let _list = server
        .mock("GET", "/api/s/default/stat/device")
        .with_body(r#"{"meta":{"rc":"ok"},"data":[{"_id":"other"}]}"#)
        .create_async()
        .await;

    let mut state = switch_config("core");
    state.set_string(&AttributePath::new("id"), "sw1".to_string()).unwrap();

    let read = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "unifi_device_switch".to_string(),
                current_state: state,
            },
        )
        .await;

    assert!(read.diagnostics.is_empty());
    assert!(read.new_state.is_none());
}

#[tokio::test]
async fn delete_leaves_device_alone() {
    let server = Server::new_async().await;
    let resource = support::resource("unifi_device_switch", &server.url()).await;

    let mut state = switch_config("core");
    state.set_string(&AttributePath::new("id"), "sw1".to_string()).unwrap();

    let deleted = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "unifi_device_switch".to_string(),
                prior_state: state,
            },
        )
        .await;

    assert!(deleted.diagnostics.is_empty());
}

#[test]
fn resource_reports_when_unconfigured() {
    let resource = unifi::resources::DeviceSwitchResource::new();
    let response = tokio_test::block_on(resource.read(
        Context::new(),
        ReadResourceRequest {
            type_name: "unifi_device_switch".to_string(),
            current_state: switch_config("core"),
        },
    ));

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(response.diagnostics[0].summary, "Provider not configured");
}
