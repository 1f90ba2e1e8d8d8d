use std::any::Any;
use std::sync::Arc;

use tfplug::context::Context;
use tfplug::data_source::{ConfigureDataSourceRequest, DataSourceWithConfigure};
use tfplug::provider::Provider;
use tfplug::resource::{ConfigureResourceRequest, ResourceWithConfigure};
use unifi::api::Client;
use unifi::{UnifiProvider, UnifiProviderData};

/// Provider data for a client that talks to `url` without logging in
pub fn provider_data(url: &str) -> Arc<dyn Any + Send + Sync> {
    let client = Client::new(url, "admin", "secret", true).unwrap();
    Arc::new(UnifiProviderData::new(client, "default"))
}

pub async fn resource(type_name: &str, url: &str) -> Box<dyn ResourceWithConfigure> {
    let factories = UnifiProvider::new().resources();
    let mut resource = factories.get(type_name).unwrap()();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(provider_data(url)),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

pub async fn data_source(type_name: &str, url: &str) -> Box<dyn DataSourceWithConfigure> {
    let factories = UnifiProvider::new().data_sources();
    let mut data_source = factories.get(type_name).unwrap()();
    let response = data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: Some(provider_data(url)),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    data_source
}
