use crate::path::PathExpression;
use crate::schema::{PlanModifier, PlanModifierRequest, PlanModifierResponse};
use crate::types::Dynamic;

/// Marks an attribute as requiring replacement when it changes
pub struct RequiresReplace;

impl PlanModifier for RequiresReplace {
    fn description(&self) -> String {
        "If the value of this attribute changes, Terraform will destroy and recreate the resource."
            .to_string()
    }

    fn modify(&self, request: PlanModifierRequest<'_>) -> PlanModifierResponse {
        let mut response = PlanModifierResponse::unchanged(&request);
        response.requires_replace = !matches!(
            (&request.state_value, &request.plan_value),
            (Dynamic::Null, Dynamic::Null) | (Dynamic::Unknown, _) | (_, Dynamic::Unknown)
        ) && request.state_value != request.plan_value;
        response
    }
}

/// Copies the prior state into the plan while the planned value is unknown
///
/// Use this on computed attributes that never change after creation, such as
/// controller-assigned ids, so every plan does not show them as "known after apply".
pub struct UseStateForUnknown;

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "Once set, the value of this attribute in state will not change.".to_string()
    }

    fn modify(&self, request: PlanModifierRequest<'_>) -> PlanModifierResponse {
        let mut response = PlanModifierResponse::unchanged(&request);
        if request.plan_value.is_unknown() && !request.state_value.is_null() {
            response.plan_value = request.state_value.clone();
        }
        response
    }
}

/// Predicate applied to a sibling's configured value
#[derive(Debug, Clone, PartialEq)]
pub enum SiblingCondition {
    BoolTrue,
    NonEmptyString,
    StringEquals(String),
}

impl SiblingCondition {
    /// Null and unknown siblings never satisfy a condition
    pub fn holds(&self, value: &Dynamic) -> bool {
        match self {
            SiblingCondition::BoolTrue => value.as_bool() == Some(true),
            SiblingCondition::NonEmptyString => value.as_str().is_some_and(|s| !s.is_empty()),
            SiblingCondition::StringEquals(expected) => value.as_str() == Some(expected.as_str()),
        }
    }
}

/// Replaces the planned value with a fixed one as soon as any sibling matched by
/// `expressions` satisfies the condition. The first hit wins.
pub struct ValueWhenSibling {
    expressions: Vec<PathExpression>,
    condition: SiblingCondition,
    value: Dynamic,
    description: String,
}

impl ValueWhenSibling {
    /// Plans null when the condition holds
    pub fn null_when(
        expressions: Vec<PathExpression>,
        condition: SiblingCondition,
        description: &str,
    ) -> Self {
        Self::value_when(Dynamic::Null, expressions, condition, description)
    }

    pub fn value_when(
        value: Dynamic,
        expressions: Vec<PathExpression>,
        condition: SiblingCondition,
        description: &str,
    ) -> Self {
        Self {
            expressions,
            condition,
            value,
            description: description.to_string(),
        }
    }
}

impl PlanModifier for ValueWhenSibling {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn modify(&self, request: PlanModifierRequest<'_>) -> PlanModifierResponse {
        let mut response = PlanModifierResponse::unchanged(&request);

        for expression in request.path_expression.merge_expressions(&self.expressions) {
            let matches = match request.config.resolve(&expression) {
                Ok(matches) => matches,
                Err(e) => {
                    response.diagnostics.add_attribute_error(
                        request.path.clone(),
                        crate::validator::INVALID_PATH_EXPRESSION,
                        e.to_string(),
                    );
                    continue;
                }
            };

            if let Some((matched, _)) = matches
                .iter()
                .find(|(_, value)| self.condition.holds(value))
            {
                tracing::trace!(path = %request.path, sibling = %matched, "sibling condition met");
                response.plan_value = self.value.clone();
                return response;
            }
        }

        response
    }
}
