//! Port override plan modifiers

use tfplug::path::PathExpression;
use tfplug::plan_modifier::{SiblingCondition, ValueWhenSibling};
use tfplug::types::Dynamic;

/// Plans null once the sibling `port_profile_id` is set, since a port profile
/// replaces the port's local settings.
pub fn port_profile_id() -> ValueWhenSibling {
    ValueWhenSibling::null_when(
        vec![PathExpression::relative().at_parent().at_name("port_profile_id")],
        SiblingCondition::NonEmptyString,
        "The value will be set to null when the port_profile_id attribute is set.",
    )
}

/// Plans `value` when the sibling `disabled` is true
pub fn disabled(value: &str) -> ValueWhenSibling {
    ValueWhenSibling::value_when(
        Dynamic::String(value.to_string()),
        vec![PathExpression::relative().at_parent().at_name("disabled")],
        SiblingCondition::BoolTrue,
        &format!(
            "The value will be set to {:?} when the disabled attribute is true.",
            value
        ),
    )
}
