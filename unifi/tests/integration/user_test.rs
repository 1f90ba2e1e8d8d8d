use mockito::{Matcher, Server};
use tfplug::context::Context;
use tfplug::plan::plan_resource_change;
use tfplug::resource::{
    CreateResourceRequest, DeleteResourceRequest, ImportResourceStateRequest, ReadResourceRequest,
    Resource, UpdateResourceRequest,
};
use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use unifi::resources::user::user_schema;

use crate::support;

fn user_config(name: &str) -> DynamicValue {
    let mut config = DynamicValue::object();
    config.set_string(&AttributePath::new("mac"), "aa:bb:cc:dd:ee:ff".to_string()).unwrap();
    config.set_string(&AttributePath::new("name"), name.to_string()).unwrap();
    config.set_string(&AttributePath::new("fixed_ip"), "10.0.0.20".to_string()).unwrap();
    config
}

const CREATED_USER: &str = r#"{"meta":{"rc":"ok"},"data":[
    {"meta":{"rc":"ok"},"data":[{
        "_id":"u1","site_id":"s1","mac":"aa:bb:cc:dd:ee:ff","name":"tv",
        "fixed_ip":"10.0.0.20","use_fixedip":true,"hostname":"living-room-tv"
    }]}
]}"#;

#[tokio::test]
async fn user_lifecycle() {
    let mut server = Server::new_async().await;
    let resource = support::resource("unifi_user", &server.url()).await;
    let schema = user_schema();

    let config = user_config("tv");
    let plan = plan_resource_change(&schema, &config, &DynamicValue::null());
    assert!(plan.diagnostics.is_empty());
    assert!(plan
        .planned_state
        .get_attribute(&AttributePath::new("id"))
        .unwrap()
        .is_unknown());

    let create_mock = server
        .mock("POST", "/api/s/default/group/user")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "objects": [{"data": {
                "mac": "aa:bb:cc:dd:ee:ff",
                "name": "tv",
                "fixed_ip": "10.0.0.20",
                "use_fixedip": true
            }}]
        })))
        .with_body(CREATED_USER)
        .create_async()
        .await;

    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "unifi_user".to_string(),
                planned_state: plan.planned_state,
                config: config.clone(),
            },
        )
        .await;
    assert!(created.diagnostics.is_empty());
    create_mock.assert_async().await;

    let state = created.new_state;
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "u1");
    assert_eq!(
        state.get_string(&AttributePath::new("hostname")).unwrap(),
        "living-room-tv"
    );
    assert!(state.get_bool(&AttributePath::new("use_fixedip")).unwrap());

    let _read_mock = server
        .mock("GET", "/api/s/default/rest/user/u1")
        .with_body(
            r#"{"meta":{"rc":"ok"},"data":[{
                "_id":"u1","mac":"aa:bb:cc:dd:ee:ff","name":"tv",
                "fixed_ip":"10.0.0.20","use_fixedip":true,"note":""
            }]}"#,
        )
        .create_async()
        .await;

    let read = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "unifi_user".to_string(),
                current_state: state.clone(),
            },
        )
        .await;
    assert!(read.diagnostics.is_empty());
    let read_state = read.new_state.unwrap();
    assert_eq!(
        read_state.get_attribute(&AttributePath::new("note")).unwrap(),
        Dynamic::Null
    );
    assert_eq!(
        read_state
            .get_attribute(&AttributePath::new("device_icon_id"))
            .unwrap(),
        Dynamic::Null
    );

    let renamed = user_config("bedroom-tv");
    let update_plan = plan_resource_change(&schema, &renamed, &read_state);
    assert!(update_plan.requires_replace.is_empty());

    let update_mock = server
        .mock("PUT", "/api/s/default/rest/user/u1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "_id": "u1",
            "name": "bedroom-tv"
        })))
        .with_body(
            r#"{"meta":{"rc":"ok"},"data":[{
                "_id":"u1","mac":"aa:bb:cc:dd:ee:ff","name":"bedroom-tv",
                "fixed_ip":"10.0.0.20","use_fixedip":true
            }]}"#,
        )
        .create_async()
        .await;

    let updated = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "unifi_user".to_string(),
                prior_state: read_state.clone(),
                planned_state: update_plan.planned_state,
                config: renamed,
            },
        )
        .await;
    assert!(updated.diagnostics.is_empty());
    update_mock.assert_async().await;
    let updated_state = updated.new_state.unwrap();
    assert_eq!(
        updated_state.get_string(&AttributePath::new("name")).unwrap(),
        "bedroom-tv"
    );

    let delete_mock = server
        .mock("POST", "/api/s/default/cmd/stamgr")
        .match_body(Matcher::Json(serde_json::json!({
            "cmd": "forget-sta",
            "macs": ["aa:bb:cc:dd:ee:ff"]
        })))
        .with_body(r#"{"meta":{"rc":"ok"},"data":[]}"#)
        .create_async()
        .await;

    let deleted = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "unifi_user".to_string(),
                prior_state: updated_state,
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty());
    delete_mock.assert_async().await;
}

#[tokio::test]
async fn vanished_user_is_removed_from_state() {
    let mut server = Server::new_async().await;
    let resource = support::resource("unifi_user", &server.url()).await;

    let _mock = server
        .mock("GET", "/api/s/default/rest/user/gone")
        .with_body(r#"{"meta":{"rc":"error","msg":"api.err.NotFound"},"data":[]}"#)
        .create_async()
        .await;

    let mut state = user_config("tv");
    state.set_string(&AttributePath::new("id"), "gone".to_string()).unwrap();

    let read = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "unifi_user".to_string(),
                current_state: state,
            },
        )
        .await;
    assert!(read.diagnostics.is_empty());
    assert!(read.new_state.is_none());
}

#[tokio::test]
async fn controller_error_on_create_is_reported() {
    let mut server = Server::new_async().await;
    let resource = support::resource("unifi_user", &server.url()).await;

    let _mock = server
        .mock("POST", "/api/s/default/group/user")
        .with_body(
            r#"{"meta":{"rc":"ok"},"data":[
                {"meta":{"rc":"error","msg":"api.err.MacUsed"},"data":[]}
            ]}"#,
        )
        .create_async()
        .await;

    let config = user_config("tv");
    let plan = plan_resource_change(&user_schema(), &config, &DynamicValue::null());
    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "unifi_user".to_string(),
                planned_state: plan.planned_state,
                config,
            },
        )
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(created.diagnostics[0].summary, "Create user error");
    assert!(created.diagnostics[0].detail.contains("api.err.MacUsed"));
}

#[tokio::test]
async fn import_sets_id() {
    let server = Server::new_async().await;
    let resource = support::resource("unifi_user", &server.url()).await;

    let imported = resource
        .import_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: "unifi_user".to_string(),
                id: "u42".to_string(),
            },
        )
        .await;

    assert!(imported.diagnostics.is_empty());
    assert_eq!(imported.imported_resources.len(), 1);
    assert_eq!(
        imported.imported_resources[0]
            .state
            .get_string(&AttributePath::new("id"))
            .unwrap(),
        "u42"
    );
}
