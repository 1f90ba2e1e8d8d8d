//! Attribute validators
//!
//! Value validators inspect only the attribute they are attached to. Path
//! validators ([`ConflictsWith`], [`AlsoRequires`], [`StringValueWithPaths`],
//! [`StringValueConflictsWithPaths`]) resolve sibling expressions against the
//! whole configuration and defer while any sibling is still unknown.

use crate::path::{format_expressions, PathExpression};
use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{AttributePath, Diagnostics, Dynamic};
use std::net::Ipv4Addr;

pub const INVALID_ATTRIBUTE_COMBINATION: &str = "Invalid Attribute Combination";
pub const INVALID_ATTRIBUTE_VALUE: &str = "Invalid Attribute Value";
pub const INVALID_PATH_EXPRESSION: &str = "Invalid Path Expression";

pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl StringLengthValidator {
    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl Validator for StringLengthValidator {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("string length must be between {} and {}", min, max),
            (Some(min), None) => format!("string length must be at least {}", min),
            (None, Some(max)) => format!("string length must be at most {}", max),
            (None, None) => "any string length".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if let Some(s) = request.config_value.as_str() {
            let len = s.chars().count();
            let too_short = self.min.is_some_and(|min| len < min);
            let too_long = self.max.is_some_and(|max| len > max);
            if too_short || too_long {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    "Invalid Attribute Value Length",
                    format!(
                        "Attribute {} {}, got: {}",
                        request.path,
                        self.description(),
                        len
                    ),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Regex match on string values. An invalid pattern is reported when validating.
pub struct StringPatternValidator {
    pattern: Result<regex::Regex, String>,
    description: String,
}

impl StringPatternValidator {
    pub fn new(pattern: &str, description: &str) -> Self {
        Self {
            pattern: regex::Regex::new(pattern).map_err(|e| e.to_string()),
            description: description.to_string(),
        }
    }
}

impl Validator for StringPatternValidator {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        let Some(s) = request.config_value.as_str() else {
            return ValidatorResponse { diagnostics };
        };

        match &self.pattern {
            Ok(pattern) if pattern.is_match(s) => {}
            Ok(_) => diagnostics.add_attribute_error(
                request.path.clone(),
                INVALID_ATTRIBUTE_VALUE,
                format!("Attribute {} {}, got: {}", request.path, self.description, s),
            ),
            Err(e) => diagnostics.add_attribute_error(
                request.path.clone(),
                "Invalid Validator Pattern",
                e.clone(),
            ),
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct NumberRangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRangeValidator {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

impl Validator for NumberRangeValidator {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("value must be between {} and {}", min, max),
            (Some(min), None) => format!("value must be at least {}", min),
            (None, Some(max)) => format!("value must be at most {}", max),
            (None, None) => "any number".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if let Some(n) = request.config_value.as_number() {
            let below = self.min.is_some_and(|min| n < min);
            let above = self.max.is_some_and(|max| n > max);
            if below || above {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    INVALID_ATTRIBUTE_VALUE,
                    format!("Attribute {} {}, got: {}", request.path, self.description(), n),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct ListLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for ListLengthValidator {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("list must contain between {} and {} items", min, max),
            (Some(min), None) => format!("list must contain at least {} items", min),
            (None, Some(max)) => format!("list must contain at most {} items", max),
            (None, None) => "any number of items".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if let Dynamic::List(items) = request.config_value {
            let too_few = self.min.is_some_and(|min| items.len() < min);
            let too_many = self.max.is_some_and(|max| items.len() > max);
            if too_few || too_many {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    "Invalid Attribute Value",
                    format!(
                        "Attribute {} {}, got: {}",
                        request.path,
                        self.description(),
                        items.len()
                    ),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct StringOneOf {
    values: Vec<String>,
}

impl StringOneOf {
    pub fn new(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        let quoted: Vec<String> = self.values.iter().map(|v| format!("{:?}", v)).collect();
        format!("value must be one of: [{}]", quoted.join(" "))
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if let Some(s) = request.config_value.as_str() {
            if !self.values.iter().any(|v| v == s) {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    INVALID_ATTRIBUTE_VALUE,
                    format!(
                        "Attribute {} {}, got: {:?}",
                        request.path,
                        self.description(),
                        s
                    ),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct NumberOneOf {
    values: Vec<f64>,
}

impl NumberOneOf {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }
}

impl Validator for NumberOneOf {
    fn description(&self) -> String {
        let listed: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        format!("value must be one of: [{}]", listed.join(" "))
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if let Some(n) = request.config_value.as_number() {
            if !self.values.contains(&n) {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    INVALID_ATTRIBUTE_VALUE,
                    format!("Attribute {} {}, got: {}", request.path, self.description(), n),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// Dotted-quad IPv4 address
pub struct Ipv4AddressValidator;

impl Validator for Ipv4AddressValidator {
    fn description(&self) -> String {
        "value must be a valid IPv4 address".to_string()
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if let Some(s) = request.config_value.as_str() {
            if let Err(e) = s.parse::<Ipv4Addr>() {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    "Invalid IPv4 Address String Value",
                    format!("A string value was provided that is not a valid IPv4 address. Given value: {:?}, error: {}", s, e),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

/// What a path validator demands of each matched sibling
#[derive(Clone, Copy)]
enum SiblingRule {
    MustBeSet,
    MustBeNull,
}

/// Walks the merged sibling expressions and reports siblings that break `rule`.
///
/// Resolution failures are reported and the next expression is tried. Sibling
/// errors are only reported once every matched sibling is known; a single
/// unknown sibling drops them all.
fn check_siblings(
    request: &ValidatorRequest<'_>,
    expressions: &[PathExpression],
    rule: SiblingRule,
    detail: impl Fn(&AttributePath) -> String,
    diagnostics: &mut Diagnostics,
) {
    let mut sibling_errors = Diagnostics::new();

    for expression in request.path_expression.merge_expressions(expressions) {
        let matches = match request.config.resolve(&expression) {
            Ok(matches) => matches,
            Err(e) => {
                diagnostics.add_attribute_error(
                    request.path.clone(),
                    INVALID_PATH_EXPRESSION,
                    e.to_string(),
                );
                continue;
            }
        };

        for (matched, value) in matches {
            if &matched == request.path {
                continue;
            }

            if value.is_unknown() {
                tracing::debug!(
                    path = %request.path,
                    sibling = %matched,
                    "sibling value unknown, postponing validation"
                );
                return;
            }

            let broken = match rule {
                SiblingRule::MustBeSet => value.is_null(),
                SiblingRule::MustBeNull => !value.is_null(),
            };
            if broken {
                sibling_errors.add_attribute_error(
                    request.path.clone(),
                    INVALID_ATTRIBUTE_COMBINATION,
                    detail(&matched),
                );
            }
        }
    }

    diagnostics.append(sibling_errors);
}

/// Siblings must be null whenever this attribute is set
pub struct ConflictsWith {
    paths: Vec<PathExpression>,
}

impl ConflictsWith {
    pub fn new(paths: Vec<PathExpression>) -> Self {
        Self { paths }
    }
}

impl Validator for ConflictsWith {
    fn description(&self) -> String {
        format!(
            "Ensure that if an attribute is set, these are not set: {}",
            format_expressions(&self.paths)
        )
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if request.config_value.is_known() {
            check_siblings(
                &request,
                &self.paths,
                SiblingRule::MustBeNull,
                |matched| {
                    format!(
                        "Attribute \"{}\" cannot be specified when \"{}\" is specified",
                        matched, request.path
                    )
                },
                &mut diagnostics,
            );
        }
        ValidatorResponse { diagnostics }
    }
}

/// Siblings must be set whenever this attribute is set
pub struct AlsoRequires {
    paths: Vec<PathExpression>,
}

impl AlsoRequires {
    pub fn new(paths: Vec<PathExpression>) -> Self {
        Self { paths }
    }
}

impl Validator for AlsoRequires {
    fn description(&self) -> String {
        format!(
            "Ensure that if an attribute is set, also these are set: {}",
            format_expressions(&self.paths)
        )
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if request.config_value.is_known() {
            check_siblings(
                &request,
                &self.paths,
                SiblingRule::MustBeSet,
                |matched| {
                    format!(
                        "Attribute \"{}\" must be specified when \"{}\" is specified",
                        matched, request.path
                    )
                },
                &mut diagnostics,
            );
        }
        ValidatorResponse { diagnostics }
    }
}

/// When the string equals `value`, every sibling in `paths` must be set
pub struct StringValueWithPaths {
    value: String,
    paths: Vec<PathExpression>,
}

impl StringValueWithPaths {
    pub fn new(value: &str, paths: Vec<PathExpression>) -> Self {
        Self {
            value: value.to_string(),
            paths,
        }
    }
}

impl Validator for StringValueWithPaths {
    fn description(&self) -> String {
        format!(
            "when value {:?} is set these paths must also be set: {}",
            self.value,
            format_expressions(&self.paths)
        )
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if request.config_value.as_str() == Some(self.value.as_str()) {
            check_siblings(
                &request,
                &self.paths,
                SiblingRule::MustBeSet,
                |matched| {
                    format!(
                        "Attribute \"{}\" must be specified when \"{}\" is \"{}\"",
                        matched, request.path, self.value
                    )
                },
                &mut diagnostics,
            );
        }
        ValidatorResponse { diagnostics }
    }
}

/// When the string equals `value`, every sibling in `paths` must be null
pub struct StringValueConflictsWithPaths {
    value: String,
    paths: Vec<PathExpression>,
}

impl StringValueConflictsWithPaths {
    pub fn new(value: &str, paths: Vec<PathExpression>) -> Self {
        Self {
            value: value.to_string(),
            paths,
        }
    }
}

impl Validator for StringValueConflictsWithPaths {
    fn description(&self) -> String {
        format!(
            "when value {:?} is set these paths must not be set: {}",
            self.value,
            format_expressions(&self.paths)
        )
    }

    fn validate(&self, request: ValidatorRequest<'_>) -> ValidatorResponse {
        let mut diagnostics = Diagnostics::new();
        if request.config_value.as_str() == Some(self.value.as_str()) {
            check_siblings(
                &request,
                &self.paths,
                SiblingRule::MustBeNull,
                |matched| {
                    format!(
                        "Attribute \"{}\" must not be specified when \"{}\" is \"{}\"",
                        matched, request.path, self.value
                    )
                },
                &mut diagnostics,
            );
        }
        ValidatorResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]
    use super::*;
    use crate::types::DynamicValue;

    /// Runs `validator` against a top-level attribute of `config`
    fn run(validator: &dyn Validator, config: &DynamicValue, name: &str) -> Diagnostics {
        let path = AttributePath::new(name);
        let expression = PathExpression::from_path(&path);
        let value = config.get_attribute(&path).unwrap();
        validator
            .validate(ValidatorRequest {
                config,
                config_value: &value,
                path: &path,
                path_expression: &expression,
            })
            .diagnostics
    }

    fn single(name: &str, value: Dynamic) -> DynamicValue {
        let mut config = DynamicValue::object();
        config
            .set_value(&AttributePath::new(name), value)
            .unwrap();
        config
    }

    #[test]
    fn string_length_validator_accepts_valid_length() {
        let config = single("name", Dynamic::string("hello"));
        let diags = run(&StringLengthValidator::between(3, 10), &config, "name");
        assert_eq!(diags.errors.len(), 0);
    }

    #[test]
    fn string_length_validator_rejects_too_long() {
        let config = single("name", Dynamic::string("hello world"));
        let diags = run(&StringLengthValidator::max(5), &config, "name");

        assert_eq!(diags.errors.len(), 1);
        assert!(diags.errors[0].detail.contains("at most 5"));
        assert_eq!(diags.errors[0].attribute, Some(AttributePath::new("name")));
    }

    #[test]
    fn string_pattern_validator_checks_colors() {
        let validator =
            StringPatternValidator::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$", "must be a hex color");

        let ok = single("color", Dynamic::string("#1a2B3c"));
        assert!(run(&validator, &ok, "color").is_empty());

        let bad = single("color", Dynamic::string("red"));
        let diags = run(&validator, &bad, "color");
        assert_eq!(diags.errors.len(), 1);
        assert!(diags.errors[0].detail.contains("hex color"));
    }

    #[test]
    fn string_pattern_validator_reports_broken_pattern() {
        let validator = StringPatternValidator::new("(", "unbalanced");
        let config = single("x", Dynamic::string("anything"));
        let diags = run(&validator, &config, "x");
        assert_eq!(diags.errors[0].summary, "Invalid Validator Pattern");
    }

    #[test]
    fn number_range_validator_bounds_are_inclusive() {
        let validator = NumberRangeValidator::between(1.0, 8.0);
        assert!(run(&validator, &single("n", Dynamic::Number(1.0)), "n").is_empty());
        assert!(run(&validator, &single("n", Dynamic::Number(8.0)), "n").is_empty());
        assert_eq!(
            run(&validator, &single("n", Dynamic::Number(9.0)), "n")
                .errors
                .len(),
            1
        );
    }

    #[test]
    fn list_length_validator_rejects_too_many() {
        let validator = ListLengthValidator {
            min: None,
            max: Some(1),
        };
        let config = single(
            "ids",
            Dynamic::string_list(["a", "b"]),
        );
        assert_eq!(run(&validator, &config, "ids").errors.len(), 1);
    }

    #[test]
    fn one_of_validators() {
        let strings = StringOneOf::new(&["auto", "off"]);
        assert!(run(&strings, &single("poe", Dynamic::string("auto")), "poe").is_empty());
        let diags = run(&strings, &single("poe", Dynamic::string("on")), "poe");
        assert!(diags.errors[0].detail.contains(r#"["auto" "off"]"#));

        let numbers = NumberOneOf::new(&[10.0, 100.0, 1000.0]);
        assert!(run(&numbers, &single("speed", Dynamic::Number(100.0)), "speed").is_empty());
        assert_eq!(
            run(&numbers, &single("speed", Dynamic::Number(42.0)), "speed")
                .errors
                .len(),
            1
        );
    }

    #[test]
    fn ipv4_validator() {
        let ok = single("ip", Dynamic::string("10.0.0.1"));
        assert!(run(&Ipv4AddressValidator, &ok, "ip").is_empty());

        let bad = single("ip", Dynamic::string("10.0.0"));
        let diags = run(&Ipv4AddressValidator, &bad, "ip");
        assert_eq!(diags.errors[0].summary, "Invalid IPv4 Address String Value");
    }

    #[test]
    fn value_validators_ignore_null_and_unknown() {
        let validator = StringLengthValidator::min(3);
        assert!(run(&validator, &single("name", Dynamic::Null), "name").is_empty());
        assert!(run(&validator, &single("name", Dynamic::Unknown), "name").is_empty());
    }

    #[test]
    fn conflicts_with_reports_set_sibling() {
        let mut config = single("port_profile_id", Dynamic::string("profile"));
        config
            .set_string(&AttributePath::new("operation"), "switch")
            .unwrap();

        let validator = ConflictsWith::new(vec![PathExpression::relative()
            .at_parent()
            .at_name("port_profile_id")]);
        let diags = run(&validator, &config, "operation");

        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, INVALID_ATTRIBUTE_COMBINATION);
        assert_eq!(
            diags.errors[0].detail,
            r#"Attribute "port_profile_id" cannot be specified when "operation" is specified"#
        );
    }

    // An unknown sibling ends the whole check, even when a later sibling conflicts
    #[test]
    fn conflicts_with_unknown_sibling_skips_remaining_siblings() {
        let mut config = single("operation", Dynamic::string("switch"));
        config
            .set_value(&AttributePath::new("port_profile_id"), Dynamic::Unknown)
            .unwrap();
        config
            .set_string(&AttributePath::new("native_network_id"), "lan")
            .unwrap();

        let validator = ConflictsWith::new(vec![
            PathExpression::relative().at_parent().at_name("port_profile_id"),
            PathExpression::relative()
                .at_parent()
                .at_name("native_network_id"),
        ]);
        assert!(run(&validator, &config, "operation").is_empty());

        config
            .set_null(&AttributePath::new("port_profile_id"))
            .unwrap();
        assert_eq!(run(&validator, &config, "operation").errors.len(), 1);
    }

    #[test]
    fn also_requires_postpones_on_unknown_sibling() {
        let mut config = single("full_duplex", Dynamic::Bool(true));
        config
            .set_value(&AttributePath::new("link_speed"), Dynamic::Unknown)
            .unwrap();

        let validator = AlsoRequires::new(vec![PathExpression::relative()
            .at_parent()
            .at_name("link_speed")]);
        assert!(run(&validator, &config, "full_duplex").is_empty());

        config.set_null(&AttributePath::new("link_speed")).unwrap();
        assert_eq!(run(&validator, &config, "full_duplex").errors.len(), 1);
    }

    #[test]
    fn string_value_with_paths_description() {
        let validator = StringValueWithPaths::new(
            "aggregate",
            vec![PathExpression::relative()
                .at_parent()
                .at_name("aggregate_num_ports")],
        );
        assert_eq!(
            validator.description(),
            r#"when value "aggregate" is set these paths must also be set: [<.aggregate_num_ports]"#
        );

        let conflicts = StringValueConflictsWithPaths::new(
            "custom",
            vec![PathExpression::relative().at_parent().at_name("native_network_id")],
        );
        assert_eq!(
            conflicts.description(),
            r#"when value "custom" is set these paths must not be set: [<.native_network_id]"#
        );
    }

    #[test]
    fn string_value_with_paths_skips_own_path() {
        let config = single("operation", Dynamic::string("mirror"));
        let validator = StringValueWithPaths::new(
            "mirror",
            vec![PathExpression::relative().at_parent().at_name("operation")],
        );
        assert!(run(&validator, &config, "operation").is_empty());
    }

    #[test]
    fn bad_expression_is_reported_and_next_expression_still_runs() {
        let config = single("operation", Dynamic::string("mirror"));
        let validator = StringValueWithPaths::new(
            "mirror",
            vec![
                PathExpression::relative().at_parent().at_parent().at_name("x"),
                PathExpression::relative()
                    .at_parent()
                    .at_name("mirror_port_index"),
            ],
        );
        let diags = run(&validator, &config, "operation");

        assert_eq!(diags.errors.len(), 2);
        assert_eq!(diags.errors[0].summary, INVALID_PATH_EXPRESSION);
        assert_eq!(
            diags.errors[1].detail,
            r#"Attribute "mirror_port_index" must be specified when "operation" is "mirror""#
        );
    }

    fn sibling(name: &str) -> PathExpression {
        PathExpression::relative().at_parent().at_name(name)
    }

    // A null sibling seen before an unknown one is not reported either
    #[test]
    fn string_value_with_paths_reports_nothing_while_any_sibling_unknown() {
        let mut config = single("operation", Dynamic::string("aggregate"));
        config.set_null(&AttributePath::new("a")).unwrap();
        config
            .set_value(&AttributePath::new("b"), Dynamic::Unknown)
            .unwrap();

        let validator = StringValueWithPaths::new("aggregate", vec![sibling("a"), sibling("b")]);
        assert!(run(&validator, &config, "operation").is_empty());

        config.set_null(&AttributePath::new("b")).unwrap();
        assert_eq!(run(&validator, &config, "operation").errors.len(), 2);
    }

    #[test]
    fn string_value_with_paths_reports_each_null_sibling() {
        let mut config = single("operation", Dynamic::string("mirror"));
        config
            .set_string(&AttributePath::new("mirror_port_index"), "4")
            .unwrap();

        let validator = StringValueWithPaths::new(
            "mirror",
            vec![
                sibling("mirror_port_index"),
                sibling("mirror_target"),
                sibling("mirror_source"),
            ],
        );
        let diags = run(&validator, &config, "operation");

        assert_eq!(diags.errors.len(), 2);
        assert_eq!(
            diags.errors[0].detail,
            r#"Attribute "mirror_target" must be specified when "operation" is "mirror""#
        );
        assert_eq!(
            diags.errors[1].detail,
            r#"Attribute "mirror_source" must be specified when "operation" is "mirror""#
        );
        assert!(diags
            .errors
            .iter()
            .all(|e| e.attribute == Some(AttributePath::new("operation"))));
    }

    #[test]
    fn string_value_with_paths_wildcard_reports_each_null_element() {
        let mut config = single("operation", Dynamic::string("aggregate"));
        config
            .set_list(
                &AttributePath::new("members"),
                vec![Dynamic::Null, Dynamic::string("2"), Dynamic::Null],
            )
            .unwrap();

        let validator = StringValueWithPaths::new(
            "aggregate",
            vec![sibling("members").at_any_element()],
        );
        let diags = run(&validator, &config, "operation");

        assert_eq!(diags.errors.len(), 2);
        assert!(diags.errors[0].detail.contains(r#""members[0]""#));
        assert!(diags.errors[1].detail.contains(r#""members[2]""#));
    }

    fn custom_tagging() -> StringValueConflictsWithPaths {
        StringValueConflictsWithPaths::new("custom", vec![sibling("native_network_id")])
    }

    #[test]
    fn string_value_conflicts_reports_set_sibling() {
        let mut config = single("tagged_vlan_management", Dynamic::string("custom"));
        config
            .set_string(&AttributePath::new("native_network_id"), "lan")
            .unwrap();

        let diags = run(&custom_tagging(), &config, "tagged_vlan_management");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, INVALID_ATTRIBUTE_COMBINATION);
        assert_eq!(
            diags.errors[0].attribute,
            Some(AttributePath::new("tagged_vlan_management"))
        );
        assert_eq!(
            diags.errors[0].detail,
            r#"Attribute "native_network_id" must not be specified when "tagged_vlan_management" is "custom""#
        );
    }

    #[test]
    fn string_value_conflicts_ignores_other_values() {
        let mut config = single("tagged_vlan_management", Dynamic::string("auto"));
        config
            .set_string(&AttributePath::new("native_network_id"), "lan")
            .unwrap();
        assert!(run(&custom_tagging(), &config, "tagged_vlan_management").is_empty());
    }

    #[test]
    fn string_value_conflicts_accepts_null_sibling() {
        let mut config = single("tagged_vlan_management", Dynamic::string("custom"));
        config
            .set_null(&AttributePath::new("native_network_id"))
            .unwrap();
        assert!(run(&custom_tagging(), &config, "tagged_vlan_management").is_empty());
    }

    // An unknown sibling ends the whole check, even when another sibling conflicts
    #[test]
    fn string_value_conflicts_postpones_on_unknown_sibling() {
        let mut config = single("tagged_vlan_management", Dynamic::string("custom"));
        config
            .set_string(&AttributePath::new("native_network_id"), "lan")
            .unwrap();
        config
            .set_value(&AttributePath::new("voice_network_id"), Dynamic::Unknown)
            .unwrap();

        let validator = StringValueConflictsWithPaths::new(
            "custom",
            vec![sibling("native_network_id"), sibling("voice_network_id")],
        );
        assert!(run(&validator, &config, "tagged_vlan_management").is_empty());

        config
            .set_null(&AttributePath::new("voice_network_id"))
            .unwrap();
        assert_eq!(
            run(&validator, &config, "tagged_vlan_management").errors.len(),
            1
        );
    }
}
