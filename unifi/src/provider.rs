//! UniFi provider: connection settings and the resource/data source registry

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostics, Dynamic, DynamicValue};
use tracing::debug;

use crate::api::Client;
use crate::data_sources::{DeviceDataSource, DeviceSwitchDataSource};
use crate::provider_data::UnifiProviderData;
use crate::resources::{DeviceSwitchResource, UserResource};

pub const ENV_URL: &str = "UNIFI_URL";
pub const ENV_USERNAME: &str = "UNIFI_USERNAME";
pub const ENV_PASSWORD: &str = "UNIFI_PASSWORD";
pub const ENV_SITE: &str = "UNIFI_SITE";
pub const ENV_INSECURE: &str = "UNIFI_INSECURE";

pub const DEFAULT_SITE: &str = "default";

#[derive(Default)]
pub struct UnifiProvider {
    provider_data: Option<Arc<UnifiProviderData>>,
}

impl UnifiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider_data(&self) -> Option<&Arc<UnifiProviderData>> {
        self.provider_data.as_ref()
    }

    pub fn provider_schema() -> Schema {
        SchemaBuilder::new()
            .description("Manage UniFi network controller objects")
            .attribute(
                AttributeBuilder::string("url")
                    .description(
                        "URL of the controller without the API path. Can be specified with the UNIFI_URL environment variable.",
                    )
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("username")
                    .description(
                        "Local user name for the API. Can be specified with the UNIFI_USERNAME environment variable.",
                    )
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("password")
                    .description(
                        "Password for the API user. Can be specified with the UNIFI_PASSWORD environment variable.",
                    )
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("site")
                    .description(
                        "The site this provider manages. Can be specified with the UNIFI_SITE environment variable. Default: default",
                    )
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("insecure")
                    .description(
                        "Skip verification of TLS certificates. Can be specified with the UNIFI_INSECURE environment variable.",
                    )
                    .optional()
                    .build(),
            )
            .build()
    }
}

/// Connection settings after merging configuration and environment
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub site: String,
    pub insecure: bool,
}

impl ProviderSettings {
    /// Configuration wins over the environment. Every problem is reported
    /// before giving up.
    pub fn resolve(
        config: &DynamicValue,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        let setting = |name: &str, var: &str| {
            config_string(config, name)
                .or_else(|| env(var))
                .unwrap_or_default()
        };
        let url = setting("url", ENV_URL);
        let username = setting("username", ENV_USERNAME);
        let password = setting("password", ENV_PASSWORD);
        let mut site = setting("site", ENV_SITE);

        let insecure = match config
            .get_attribute(&AttributePath::new("insecure"))
            .unwrap_or(Dynamic::Null)
        {
            Dynamic::Bool(insecure) => insecure,
            _ => {
                let raw = env(ENV_INSECURE).unwrap_or_default();
                match parse_bool(&raw) {
                    Some(insecure) => insecure,
                    None => {
                        diagnostics.add_attribute_error(
                            AttributePath::new("insecure"),
                            "Invalid insecure value",
                            "The provider cannot create the Unifi client as the value for UNIFI_INSECURE is invalid.",
                        );
                        false
                    }
                }
            }
        };

        if url.is_empty() {
            diagnostics.add_attribute_error(
                AttributePath::new("url"),
                "Missing Controller URL",
                "The provider cannot create the Unifi API client as there is a missing or empty value for the Unifi url. \
                 Set the url value in the configuration or use the UNIFI_URL environment variable. \
                 If either is already set, ensure the value is not empty.",
            );
        }

        if username.is_empty() {
            diagnostics.add_attribute_error(
                AttributePath::new("username"),
                "Missing Controller username",
                "The provider cannot create the Unifi API client as there is a missing or empty value for the Unifi username. \
                 Set the username value in the configuration or use the UNIFI_USERNAME environment variable. \
                 If either is already set, ensure the value is not empty.",
            );
        }

        if password.is_empty() {
            diagnostics.add_attribute_error(
                AttributePath::new("password"),
                "Missing Controller Password",
                "The provider cannot create the Unifi API client as there is a missing or empty value for the Unifi password. \
                 Set the password value in the configuration or use the UNIFI_PASSWORD environment variable. \
                 If either is already set, ensure the value is not empty.",
            );
        }

        if site.is_empty() {
            site = DEFAULT_SITE.to_string();
        }

        if diagnostics.has_error() {
            return Err(diagnostics);
        }

        Ok(Self {
            url,
            username,
            password,
            site,
            insecure,
        })
    }
}

/// A set configuration value, even an empty one, overrides the environment.
/// Unknown values count as set and empty.
fn config_string(config: &DynamicValue, name: &str) -> Option<String> {
    match config.get_attribute(&AttributePath::new(name)) {
        Ok(Dynamic::Null) | Err(_) => None,
        Ok(value) => Some(value.as_str().unwrap_or_default().to_string()),
    }
}

/// Boolean spellings accepted for UNIFI_INSECURE. Empty means false.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "" => Some(false),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[async_trait]
impl Provider for UnifiProvider {
    fn type_name(&self) -> &str {
        "unifi"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: Self::provider_schema(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let settings = match ProviderSettings::resolve(&request.config, |var| std::env::var(var).ok())
        {
            Ok(settings) => settings,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    diagnostics: diagnostics.into_vec(),
                    provider_data: None,
                }
            }
        };

        let mut diagnostics = Diagnostics::new();
        let client = match Client::new(
            &settings.url,
            &settings.username,
            &settings.password,
            settings.insecure,
        ) {
            Ok(client) => client,
            Err(e) => {
                diagnostics.add_attribute_error(
                    AttributePath::new("url"),
                    "Unable to Create Unifi API Client",
                    format!("An unexpected error occurred when creating the Unifi API client: {}", e),
                );
                return ConfigureProviderResponse {
                    diagnostics: diagnostics.into_vec(),
                    provider_data: None,
                };
            }
        };

        if let Err(e) = client.login().await {
            diagnostics.add_error(
                "Unable to Login to Unifi Controller",
                Some(format!("The controller rejected the login: {}", e)),
            );
            return ConfigureProviderResponse {
                diagnostics: diagnostics.into_vec(),
                provider_data: None,
            };
        }

        debug!(url = %settings.url, site = %settings.site, "provider configured");

        let provider_data = Arc::new(UnifiProviderData::new(client, settings.site));
        self.provider_data = Some(provider_data.clone());

        ConfigureProviderResponse {
            diagnostics: diagnostics.into_vec(),
            provider_data: Some(provider_data as Arc<dyn Any + Send + Sync>),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
        resources.insert(
            "unifi_device_switch".to_string(),
            Box::new(|| Box::new(DeviceSwitchResource::new()) as Box<dyn ResourceWithConfigure>),
        );
        resources.insert(
            "unifi_user".to_string(),
            Box::new(|| Box::new(UserResource::new()) as Box<dyn ResourceWithConfigure>),
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();
        data_sources.insert(
            "unifi_device".to_string(),
            Box::new(|| Box::new(DeviceDataSource::new()) as Box<dyn DataSourceWithConfigure>),
        );
        data_sources.insert(
            "unifi_device_switch".to_string(),
            Box::new(|| {
                Box::new(DeviceSwitchDataSource::new()) as Box<dyn DataSourceWithConfigure>
            }),
        );
        data_sources
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]
    use super::*;

    fn config(values: &[(&str, Dynamic)]) -> DynamicValue {
        let mut config = DynamicValue::object();
        for (name, value) in values {
            config
                .set_value(&AttributePath::new(name), value.clone())
                .unwrap();
        }
        config
    }

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    fn summaries(diagnostics: &Diagnostics) -> Vec<&str> {
        diagnostics.errors.iter().map(|d| d.summary.as_str()).collect()
    }

    #[test]
    fn environment_fills_missing_configuration() {
        let settings = ProviderSettings::resolve(
            &DynamicValue::object(),
            env(&[
                (ENV_URL, "https://unifi.local:8443"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "secret"),
                (ENV_INSECURE, "true"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.url, "https://unifi.local:8443");
        assert_eq!(settings.site, DEFAULT_SITE);
        assert!(settings.insecure);
    }

    #[test]
    fn configuration_wins_over_environment() {
        let settings = ProviderSettings::resolve(
            &config(&[
                ("url", Dynamic::String("https://config".to_string())),
                ("site", Dynamic::String("lab".to_string())),
                ("password", Dynamic::String("from-config".to_string())),
                ("insecure", Dynamic::Bool(false)),
            ]),
            env(&[
                (ENV_URL, "https://env"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "from-env"),
                (ENV_SITE, "other"),
                (ENV_INSECURE, "not-a-bool"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.url, "https://config");
        assert_eq!(settings.username, "admin");
        assert_eq!(settings.password, "from-config");
        assert_eq!(settings.site, "lab");
        assert!(!settings.insecure);
    }

    #[test]
    fn every_missing_credential_is_reported() {
        let diagnostics = ProviderSettings::resolve(&DynamicValue::object(), env(&[])).unwrap_err();
        assert_eq!(
            summaries(&diagnostics),
            vec![
                "Missing Controller URL",
                "Missing Controller username",
                "Missing Controller Password"
            ]
        );
        assert_eq!(
            diagnostics.errors[0].attribute,
            Some(AttributePath::new("url"))
        );
    }

    #[test]
    fn empty_configuration_value_is_missing() {
        let diagnostics = ProviderSettings::resolve(
            &config(&[("url", Dynamic::String(String::new()))]),
            env(&[
                (ENV_URL, "https://env"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "secret"),
            ]),
        )
        .unwrap_err();
        assert_eq!(summaries(&diagnostics), vec!["Missing Controller URL"]);
    }

    #[test]
    fn invalid_insecure_environment_value() {
        let diagnostics = ProviderSettings::resolve(
            &DynamicValue::object(),
            env(&[
                (ENV_URL, "https://env"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "secret"),
                (ENV_INSECURE, "sometimes"),
            ]),
        )
        .unwrap_err();
        assert_eq!(summaries(&diagnostics), vec!["Invalid insecure value"]);
        assert_eq!(
            diagnostics.errors[0].attribute,
            Some(AttributePath::new("insecure"))
        );
    }

    #[test]
    fn insecure_spellings() {
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("F"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn registers_resources_and_data_sources() {
        let provider = UnifiProvider::new();
        let mut resources: Vec<String> = provider.resources().into_keys().collect();
        resources.sort();
        assert_eq!(resources, vec!["unifi_device_switch", "unifi_user"]);

        let mut data_sources: Vec<String> = provider.data_sources().into_keys().collect();
        data_sources.sort();
        assert_eq!(data_sources, vec!["unifi_device", "unifi_device_switch"]);

        let factories = provider.resources();
        let resource = (factories["unifi_user"])();
        assert_eq!(resource.type_name(), "unifi_user");
    }

    #[test]
    fn password_is_sensitive() {
        let schema = UnifiProvider::provider_schema();
        assert!(schema.attribute("password").unwrap().sensitive);
        assert!(schema.block.attributes.iter().all(|a| a.optional));
    }
}
