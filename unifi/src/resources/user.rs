//! Known client resource

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import_state_passthrough_id;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure, UpdateResourceRequest,
    UpdateResourceResponse,
};
use tfplug::schema::{AttributeBuilder, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tfplug::AttributePath;
use tracing::{debug, trace};

use crate::api::{ApiError, User};
use crate::mac::MacValidator;
use crate::values::{string_or_null, Fields};

#[derive(Default)]
pub struct UserResource {
    provider_data: Option<crate::UnifiProviderData>,
}

impl UserResource {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn user_schema() -> Schema {
    let computed_bool = |name: &str| {
        AttributeBuilder::bool(name)
            .computed()
            .default(StaticDefault::bool(false))
            .build()
    };
    let computed_string = |name: &str| {
        AttributeBuilder::string(name)
            .computed()
            .default(StaticDefault::string(""))
            .build()
    };

    SchemaBuilder::new()
        .version(0)
        .description("A client known to the controller.")
        .attribute(
            AttributeBuilder::string("mac")
                .description("The MAC address of the client")
                .required()
                .validator(MacValidator)
                .plan_modifier(RequiresReplace)
                .build(),
        )
        .attribute(AttributeBuilder::string("name").required().build())
        .attribute(AttributeBuilder::string("user_group_id").optional().build())
        .attribute(AttributeBuilder::string("note").optional().build())
        .attribute(AttributeBuilder::string("fixed_ip").optional().build())
        .attribute(AttributeBuilder::string("network_id").optional().build())
        .attribute(
            AttributeBuilder::bool("blocked")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(
            AttributeBuilder::number("device_icon_id")
                .description("ID of the the icon to assign to the device")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::string("id")
                .computed()
                .plan_modifier(UseStateForUnknown)
                .build(),
        )
        .attribute(computed_bool("attr_hidden"))
        .attribute(computed_string("attr_hidden_id"))
        .attribute(computed_bool("attr_no_delete"))
        .attribute(computed_bool("attr_no_edit"))
        .attribute(computed_string("ip"))
        .attribute(computed_bool("fixed_ap_enabled"))
        .attribute(computed_string("fixed_ap_mac"))
        .attribute(computed_string("hostname"))
        .attribute(computed_string("local_dns_record"))
        .attribute(computed_bool("local_dns_record_enabled"))
        .attribute(AttributeBuilder::bool("use_fixedip").computed().build())
        .attribute(computed_bool("virtual_network_override_enabled"))
        .attribute(computed_string("virtual_network_override_id"))
        .build()
}

/// Controller payload for a planned user
pub fn user_from_model(model: &DynamicValue) -> User {
    let fields = Fields::new(model);
    let fixed_ip = fields.string("fixed_ip").unwrap_or_default();

    User {
        id: fields.string("id").unwrap_or_default(),
        mac: fields.string("mac").unwrap_or_default(),
        name: fields.string("name").unwrap_or_default(),
        user_group_id: fields.string("user_group_id").unwrap_or_default(),
        note: fields.string("note").unwrap_or_default(),
        use_fixedip: !fixed_ip.is_empty(),
        fixed_ip,
        network_id: fields.string("network_id").unwrap_or_default(),
        blocked: fields.bool("blocked").unwrap_or(false),
        dev_id_override: fields.int("device_icon_id").unwrap_or(0),
        ..Default::default()
    }
}

/// Copies the controller-maintained fields into `model`
fn set_computed(user: &User, model: &mut DynamicValue) {
    let values = [
        ("attr_hidden", Dynamic::Bool(user.hidden)),
        ("attr_hidden_id", Dynamic::string(&user.hidden_id)),
        ("attr_no_delete", Dynamic::Bool(user.no_delete)),
        ("attr_no_edit", Dynamic::Bool(user.no_edit)),
        ("ip", Dynamic::string(&user.ip)),
        ("fixed_ap_enabled", Dynamic::Bool(user.fixed_ap_enabled)),
        ("fixed_ap_mac", Dynamic::string(&user.fixed_ap_mac)),
        ("hostname", Dynamic::string(&user.hostname)),
        ("local_dns_record", Dynamic::string(&user.local_dns_record)),
        (
            "local_dns_record_enabled",
            Dynamic::Bool(user.local_dns_record_enabled),
        ),
        ("use_fixedip", Dynamic::Bool(user.use_fixedip)),
        (
            "virtual_network_override_enabled",
            Dynamic::Bool(user.virtual_network_override_enabled),
        ),
        (
            "virtual_network_override_id",
            Dynamic::string(&user.virtual_network_override_id),
        ),
    ];
    for (name, value) in values {
        let _ = model.set_value(&AttributePath::new(name), value);
    }
}

/// Copies the user-settable fields into `model`
fn set_configured(user: &User, model: &mut DynamicValue) {
    let device_icon_id = match user.dev_id_override {
        0 => Dynamic::Null,
        id => Dynamic::Number(id as f64),
    };
    let values = [
        ("mac", Dynamic::string(&user.mac)),
        ("name", Dynamic::string(&user.name)),
        ("user_group_id", string_or_null(&user.user_group_id)),
        ("note", string_or_null(&user.note)),
        ("fixed_ip", string_or_null(&user.fixed_ip)),
        ("network_id", string_or_null(&user.network_id)),
        ("blocked", Dynamic::Bool(user.blocked)),
        ("device_icon_id", device_icon_id),
    ];
    for (name, value) in values {
        let _ = model.set_value(&AttributePath::new(name), value);
    }
}

#[async_trait]
impl Resource for UserResource {
    fn type_name(&self) -> &str {
        "unifi_user"
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
            schema: user_schema(),
            diagnostics: vec![],
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let user = user_from_model(&request.planned_state);
        match provider_data
            .client
            .users(&provider_data.site)
            .create(&user)
            .await
        {
            Ok(created) => {
                trace!(id = %created.id, mac = %created.mac, "user created");
                let mut new_state = request.planned_state;
                let _ = new_state.set_string(&AttributePath::new("id"), created.id.clone());
                set_computed(&created, &mut new_state);
                CreateResourceResponse {
                    new_state,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Create user error",
                    format!("Unable to create user, got error: {}", e),
                ));
                CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                }
            }
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

        let id = Fields::new(&request.current_state)
            .string("id")
            .unwrap_or_default();

        match provider_data.client.users(&provider_data.site).get(&id).await {
            Ok(user) => {
                let mut new_state = request.current_state;
                set_computed(&user, &mut new_state);
                set_configured(&user, &mut new_state);
                ReadResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                }
            }
            Err(ApiError::NotFound) => {
                debug!(id = %id, "user no longer exists, removing from state");
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Read user error",
                    format!("Unable to read user, got error: {}", e),
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
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return UpdateResourceResponse {
                    new_state: Some(request.prior_state),
                    diagnostics,
                };
            }
        };

        let mut user = user_from_model(&request.planned_state);
        if user.id.is_empty() {
            user.id = Fields::new(&request.prior_state)
                .string("id")
                .unwrap_or_default();
        }

        match provider_data
            .client
            .users(&provider_data.site)
            .update(&user)
            .await
        {
            Ok(updated) => {
                let mut new_state = request.planned_state;
                let _ = new_state.set_string(&AttributePath::new("id"), user.id.clone());
                set_computed(&updated, &mut new_state);
                UpdateResourceResponse {
                    new_state: Some(new_state),
                    diagnostics,
                }
            }
            Err(ApiError::NotFound) => {
                debug!(id = %user.id, "user no longer exists, removing from state");
                UpdateResourceResponse {
                    new_state: None,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Update user error",
                    format!("Unable to update user, got error: {}", e),
                ));
                UpdateResourceResponse {
                    new_state: Some(request.prior_state),
                    diagnostics,
                }
            }
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                ));
                return DeleteResourceResponse { diagnostics };
            }
        };

        let mac = Fields::new(&request.prior_state)
            .string("mac")
            .unwrap_or_default();

        match provider_data
            .client
            .users(&provider_data.site)
            .delete_by_mac(&mac)
            .await
        {
            Ok(()) | Err(ApiError::NotFound) => DeleteResourceResponse { diagnostics },
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Delete user error",
                    format!("Unable to delete user, got error: {}", e),
                ));
                DeleteResourceResponse { diagnostics }
            }
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
impl ResourceWithConfigure for UserResource {
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
