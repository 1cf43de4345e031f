//! Structural invariants for definitions.

use crate::core::definition::DefinitionBuilder;

/// Check structural invariants of a raw definition:
/// - Non-empty name
/// - `initial` is declared and in `states`
/// - `terminal` is a subset of `states`
/// - Every transition endpoint is in `states`
/// - Every predicate/priority key names a declared transition
///
/// Returns a list of stable error messages (empty on success).
pub fn validate_structure(raw: &DefinitionBuilder) -> Vec<String> {
    let mut errors = Vec::new();

    if raw.name.trim().is_empty() {
        errors.push("definition name must not be empty".to_string());
    }

    match &raw.initial {
        None => errors.push("initial state is not set".to_string()),
        Some(initial) if !raw.states.contains(initial) => {
            errors.push(format!("initial state '{}' is not a declared state", initial));
        }
        Some(_) => {}
    }

    for state in &raw.terminal {
        if !raw.states.contains(state) {
            errors.push(format!("terminal state '{}' is not a declared state", state));
        }
    }

    for (source, targets) in &raw.transitions {
        if !raw.states.contains(source) {
            errors.push(format!(
                "transition source '{}' is not a declared state",
                source
            ));
        }
        for target in targets {
            if !raw.states.contains(target) {
                errors.push(format!(
                    "transition {} -> {}: target '{}' is not a declared state",
                    source, target, target
                ));
            }
        }
    }

    let declared = |source: &str, target: &str| {
        raw.transitions
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    };

    for (source, target) in raw.predicates.keys() {
        if !declared(source, target) {
            errors.push(format!(
                "predicates given for undeclared transition {} -> {}",
                source, target
            ));
        }
    }

    for (source, target) in raw.priorities.keys() {
        if !declared(source, target) {
            errors.push(format!(
                "priority given for undeclared transition {} -> {}",
                source, target
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::definition::Definition;

    fn valid() -> DefinitionBuilder {
        Definition::builder("ok")
            .states(["a", "b"])
            .initial("a")
            .terminal(["b"])
            .transition("a", "b")
    }

    #[test]
    fn valid_definition_has_no_errors() {
        assert!(validate_structure(&valid()).is_empty());
    }

    #[test]
    fn reports_every_violation_in_order() {
        let raw = Definition::builder(" ")
            .states(["a"])
            .terminal(["z"])
            .transition("x", "a")
            .require("a", "b", "flag", true)
            .priority("a", "c", 3);

        let errors = validate_structure(&raw);
        assert_eq!(
            errors,
            vec![
                "definition name must not be empty".to_string(),
                "initial state is not set".to_string(),
                "terminal state 'z' is not a declared state".to_string(),
                "transition source 'x' is not a declared state".to_string(),
                "predicates given for undeclared transition a -> b".to_string(),
                "priority given for undeclared transition a -> c".to_string(),
            ]
        );
    }

    #[test]
    fn reports_unknown_target() {
        let raw = valid().transition("b", "c");
        let errors = validate_structure(&raw);
        assert_eq!(
            errors,
            vec!["transition b -> c: target 'c' is not a declared state".to_string()]
        );
    }
}
