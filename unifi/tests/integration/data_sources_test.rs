use mockito::Server;
use tfplug::context::Context;
use tfplug::data_source::{DataSource, ReadDataSourceRequest};
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

use crate::support;

fn lookup(mac: &str, site: Option<&str>) -> DynamicValue {
    let mut config = DynamicValue::object();
    config.set_string(&AttributePath::new("mac"), mac.to_string()).unwrap();
    if let Some(site) = site {
        config.set_string(&AttributePath::new("site"), site.to_string()).unwrap();
    }
    config
}

#[tokio::test]
async fn switch_read_from_configured_site() {
    let mut server = Server::new_async().await;
    let data_source = support::data_source("unifi_device_switch", &server.url()).await;

    let mock = server
        .mock("GET", "/api/s/lab/stat/device/f0:9f:c2:00:00:20")
        .with_body(
            r#"{"meta":{"rc":"ok"},"data":[{
                "_id":"sw2","mac":"f0:9f:c2:00:00:20","model":"USL8LP","type":"usw",
                "adopted":true,"state":5,"ip":"10.0.0.3","stp_priority":"32768",
                "config_network":{"type":"static","ip":"10.0.0.3","netmask":"255.255.255.0",
                    "gateway":"10.0.0.1","dns1":"1.1.1.1"},
                "port_overrides":[
                    {"port_idx":3,"name":"ap","poe_mode":"auto","portconf_id":"profile",
                     "excluded_networkconf_ids":["iot"]}
                ]
            }]}"#,
        )
        .create_async()
        .await;

    let read = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "unifi_device_switch".to_string(),
                config: lookup("f0:9f:c2:00:00:20", Some("lab")),
            },
        )
        .await;
    mock.assert_async().await;

    assert!(read.diagnostics.is_empty());
    let state = read.state;
    assert_eq!(state.get_string(&AttributePath::new("site")).unwrap(), "lab");
    assert_eq!(
        state.get_string(&AttributePath::new("state")).unwrap(),
        "PROVISIONING"
    );
    assert_eq!(
        state.get_string(&AttributePath::new("stp_priority")).unwrap(),
        "32768"
    );
    assert_eq!(
        state
            .get_string(&AttributePath::new("config_network").attribute("gateway"))
            .unwrap(),
        "10.0.0.1"
    );
    assert_eq!(
        state
            .get_attribute(&AttributePath::new("config_network").attribute("alternative_dns"))
            .unwrap(),
        Dynamic::Null
    );

    let port = AttributePath::new("port_overrides").key("3");
    assert_eq!(
        state
            .get_string(&port.clone().attribute("port_profile_id"))
            .unwrap(),
        "profile"
    );
    assert_eq!(
        state
            .get_attribute(&port.clone().attribute("excluded_network_ids"))
            .unwrap(),
        Dynamic::string_list(["iot"])
    );
    assert_eq!(
        state
            .get_attribute(&port.attribute("port_security_mac_addresses"))
            .unwrap(),
        Dynamic::Null
    );
}

#[tokio::test]
async fn device_read_error_is_a_client_error() {
    let mut server = Server::new_async().await;
    let data_source = support::data_source("unifi_device", &server.url()).await;

    let _mock = server
        .mock("GET", "/api/s/default/stat/device/f0:9f:c2:00:00:21")
        .with_body(r#"{"meta":{"rc":"error","msg":"api.err.NoSiteContext"},"data":[]}"#)
        .create_async()
        .await;

    let read = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "unifi_device".to_string(),
                config: lookup("f0:9f:c2:00:00:21", None),
            },
        )
        .await;

    assert_eq!(read.diagnostics.len(), 1);
    assert_eq!(read.diagnostics[0].summary, "Client Error");
    assert!(read.diagnostics[0]
        .detail
        .starts_with("Unable to read device, got error:"));
    assert!(read.state.is_null());
}

#[tokio::test]
async fn device_lists_port_overrides_by_index() {
    let mut server = Server::new_async().await;
    let data_source = support::data_source("unifi_device", &server.url()).await;

    let _mock = server
        .mock("GET", "/api/s/default/stat/device/f0:9f:c2:00:00:22")
        .with_body(
            r#"{"meta":{"rc":"ok"},"data":[{
                "_id":"ap1","name":"hall","type":"uap","adopted":true,"state":0,
                "port_overrides":[
                    {"port_idx":1,"name":"lan","op_mode":"switch","port_security_enabled":true,
                     "port_security_mac_address":["aa:bb:cc:dd:ee:01"]},
                    {"port_idx":2,"name":"poe-out","poe_mode":"off"}
                ]
            }]}"#,
        )
        .create_async()
        .await;

    let read = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "unifi_device".to_string(),
                config: lookup("f0:9f:c2:00:00:22", None),
            },
        )
        .await;

    assert!(read.diagnostics.is_empty());
    let state = read.state;
    assert_eq!(
        state.get_string(&AttributePath::new("state")).unwrap(),
        "DISCONNECTED"
    );

    let lan = AttributePath::new("port_overrides").key("1");
    assert!(state
        .get_bool(&lan.clone().attribute("port_security_enabled"))
        .unwrap());
    assert_eq!(
        state
            .get_attribute(&lan.attribute("port_security_mac_addresses"))
            .unwrap(),
        Dynamic::string_list(["aa:bb:cc:dd:ee:01"])
    );
    assert_eq!(
        state
            .get_string(
                &AttributePath::new("port_overrides")
                    .key("2")
                    .attribute("poe_mode")
            )
            .unwrap(),
        "off"
    );
}
