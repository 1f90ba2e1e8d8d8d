//! Validation and planning passes driven by a schema
//!
//! These run the same steps Terraform's plugin runtime runs around a provider:
//! required/read-only checks and validators during `validate_config`, then
//! defaults, computed-value marking and plan modifiers during
//! `plan_resource_change`.

use crate::path::PathExpression;
use crate::schema::{
    Attribute, DefaultRequest, NestedType, ObjectNestingMode, PlanModifierRequest, Schema,
    ValidatorRequest,
};
use crate::types::{AttributePath, Diagnostics, Dynamic, DynamicValue};
use std::collections::HashMap;

/// Runs required-attribute checks and every validator, parents before children.
pub fn validate_config(schema: &Schema, config: &DynamicValue) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    if config.is_null() || config.is_unknown() {
        return diagnostics;
    }
    validate_attributes(
        &schema.block.attributes,
        config,
        &AttributePath::root(),
        &mut diagnostics,
    );
    diagnostics
}

fn validate_attributes(
    attributes: &[Attribute],
    config: &DynamicValue,
    parent: &AttributePath,
    diagnostics: &mut Diagnostics,
) {
    for attr in attributes {
        let path = parent.clone().attribute(&attr.name);
        let value = match config.get_attribute(&path) {
            Ok(value) => value,
            Err(e) => {
                diagnostics.add_attribute_error(path, "Invalid Configuration", e.to_string());
                continue;
            }
        };

        if attr.required && value.is_null() {
            diagnostics.add_attribute_error(
                path.clone(),
                "Missing Configuration for Required Attribute",
                format!(
                    "Must set a configuration value for the {} attribute as the provider has marked it as required.",
                    path
                ),
            );
        }

        if attr.computed && !attr.optional && !attr.required && !value.is_null() {
            diagnostics.add_attribute_error(
                path.clone(),
                "Invalid Configuration for Read-Only Attribute",
                format!(
                    "Cannot set value for the {} attribute as the provider has marked it as read-only. Remove the configuration line setting the value.",
                    path
                ),
            );
        }

        let expression = PathExpression::from_path(&path);
        for validator in &attr.validators {
            let response = validator.validate(ValidatorRequest {
                config,
                config_value: &value,
                path: &path,
                path_expression: &expression,
            });
            diagnostics.append(response.diagnostics);
        }

        if let Some(nested) = &attr.nested_type {
            for element in nested_element_paths(&path, nested, &value) {
                validate_attributes(&nested.attributes, config, &element, diagnostics);
            }
        }
    }
}

/// Paths of the objects held by a nested attribute value
fn nested_element_paths(
    path: &AttributePath,
    nested: &NestedType,
    value: &Dynamic,
) -> Vec<AttributePath> {
    match (nested.nesting, value) {
        (ObjectNestingMode::Single, Dynamic::Map(_)) => vec![path.clone()],
        (ObjectNestingMode::List, Dynamic::List(items)) => (0..items.len())
            .map(|i| path.clone().index(i as i64))
            .collect(),
        (ObjectNestingMode::Map, Dynamic::Map(entries)) => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            keys.into_iter().map(|k| path.clone().key(k)).collect()
        }
        _ => Vec::new(),
    }
}

/// Outcome of planning one resource
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Diagnostics,
}

/// Proposes the new state for a resource.
///
/// A null `config` plans a destroy. A null `prior_state` plans a create, in which
/// case computed attributes without a value become unknown. On update they keep
/// their prior value unless something else changed, in which case they also
/// become unknown so that modifiers such as `UseStateForUnknown` can decide.
pub fn plan_resource_change(
    schema: &Schema,
    config: &DynamicValue,
    prior_state: &DynamicValue,
) -> PlannedChange {
    let mut diagnostics = Diagnostics::new();

    if config.is_null() {
        return PlannedChange {
            planned_state: DynamicValue::null(),
            requires_replace: Vec::new(),
            diagnostics,
        };
    }

    let creating = prior_state.is_null();
    let attributes = &schema.block.attributes;

    let mut planned = DynamicValue::new(plan_object(
        attributes,
        &config.value,
        &prior_state.value,
        &AttributePath::root(),
        creating,
    ));
    if !creating && planned != *prior_state {
        planned = DynamicValue::new(plan_object(
            attributes,
            &config.value,
            &prior_state.value,
            &AttributePath::root(),
            true,
        ));
    }

    let mut requires_replace = Vec::new();
    modify_attributes(
        attributes,
        &AttributePath::root(),
        config,
        prior_state,
        &mut planned,
        &mut requires_replace,
        &mut diagnostics,
    );

    if creating {
        requires_replace.clear();
    }

    PlannedChange {
        planned_state: planned,
        requires_replace,
        diagnostics,
    }
}

fn child(value: &Dynamic, name: &str) -> Dynamic {
    match value {
        Dynamic::Map(fields) => fields.get(name).cloned().unwrap_or(Dynamic::Null),
        Dynamic::Unknown => Dynamic::Unknown,
        _ => Dynamic::Null,
    }
}

fn plan_object(
    attributes: &[Attribute],
    config: &Dynamic,
    prior: &Dynamic,
    path: &AttributePath,
    mark_unknown: bool,
) -> Dynamic {
    let fields = attributes
        .iter()
        .map(|attr| {
            let value = plan_attribute(
                attr,
                child(config, &attr.name),
                child(prior, &attr.name),
                path.clone().attribute(&attr.name),
                mark_unknown,
            );
            (attr.name.clone(), value)
        })
        .collect::<HashMap<_, _>>();
    Dynamic::Map(fields)
}

fn plan_attribute(
    attr: &Attribute,
    config: Dynamic,
    prior: Dynamic,
    path: AttributePath,
    mark_unknown: bool,
) -> Dynamic {
    let base = if !config.is_null() {
        config
    } else if let Some(default) = &attr.default {
        default
            .default_value(DefaultRequest { path: path.clone() })
            .value
    } else if attr.computed {
        if mark_unknown {
            Dynamic::Unknown
        } else {
            prior.clone()
        }
    } else {
        Dynamic::Null
    };

    let Some(nested) = &attr.nested_type else {
        return base;
    };

    match (nested.nesting, base) {
        (ObjectNestingMode::Single, object @ Dynamic::Map(_)) => {
            plan_object(&nested.attributes, &object, &prior, &path, mark_unknown)
        }
        (ObjectNestingMode::List, Dynamic::List(items)) => Dynamic::List(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let prior_item = match &prior {
                        Dynamic::List(prior_items) => {
                            prior_items.get(i).cloned().unwrap_or(Dynamic::Null)
                        }
                        _ => Dynamic::Null,
                    };
                    plan_object(
                        &nested.attributes,
                        item,
                        &prior_item,
                        &path.clone().index(i as i64),
                        mark_unknown,
                    )
                })
                .collect(),
        ),
        (ObjectNestingMode::Map, Dynamic::Map(entries)) => Dynamic::Map(
            entries
                .iter()
                .map(|(key, item)| {
                    let planned = plan_object(
                        &nested.attributes,
                        item,
                        &child(&prior, key),
                        &path.clone().key(key),
                        mark_unknown,
                    );
                    (key.clone(), planned)
                })
                .collect(),
        ),
        (_, other) => other,
    }
}

fn modify_attributes(
    attributes: &[Attribute],
    parent: &AttributePath,
    config: &DynamicValue,
    prior_state: &DynamicValue,
    planned: &mut DynamicValue,
    requires_replace: &mut Vec<AttributePath>,
    diagnostics: &mut Diagnostics,
) {
    for attr in attributes {
        let path = parent.clone().attribute(&attr.name);

        let mut plan_value = match planned.get_attribute(&path) {
            Ok(value) => value,
            Err(e) => {
                diagnostics.add_attribute_error(path, "Invalid Plan", e.to_string());
                continue;
            }
        };

        if !attr.plan_modifiers.is_empty() {
            let config_value = config.get_attribute(&path).unwrap_or(Dynamic::Null);
            let state_value = prior_state.get_attribute(&path).unwrap_or(Dynamic::Null);
            let expression = PathExpression::from_path(&path);

            for modifier in &attr.plan_modifiers {
                let response = modifier.modify(PlanModifierRequest {
                    config,
                    plan: &*planned,
                    state: prior_state,
                    config_value: config_value.clone(),
                    plan_value: plan_value.clone(),
                    state_value: state_value.clone(),
                    path: &path,
                    path_expression: &expression,
                });
                plan_value = response.plan_value;
                if response.requires_replace && !requires_replace.contains(&path) {
                    requires_replace.push(path.clone());
                }
                diagnostics.append(response.diagnostics);
            }

            if let Err(e) = planned.set_value(&path, plan_value.clone()) {
                diagnostics.add_attribute_error(path.clone(), "Invalid Plan", e.to_string());
                continue;
            }
        }

        if let Some(nested) = &attr.nested_type {
            for element in nested_element_paths(&path, nested, &plan_value) {
                modify_attributes(
                    &nested.attributes,
                    &element,
                    config,
                    prior_state,
                    planned,
                    requires_replace,
                    diagnostics,
                );
            }
        }
    }
}
