//! `${VAR}` placeholder substitution over a deserialized configuration tree
//! (spec.md §6.4). Runs after the layered merge, before the tree is
//! deserialized into [`crate::AppConfig`].

use std::collections::HashMap;

use serde_json::Value;

/// Replace every `${VAR}` occurrence in string leaves with the value of
/// `VAR` from `env`. A placeholder whose variable is unset is left
/// untouched — callers can still surface a clear deserialization error
/// downstream rather than silently substituting an empty string.
pub fn substitute_placeholders(value: Value, env: &HashMap<String, String>) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_string(&s, env)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| substitute_placeholders(v, env))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, substitute_placeholders(v, env)))
                .collect(),
        ),
        other => other,
    }
}

fn substitute_string(input: &str, env: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var_name = &after[..end];
                match env.get(var_name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(var_name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str("${");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_variable() {
        let env = env(&[("API_KEY", "secret-123")]);
        assert_eq!(
            substitute_string("${API_KEY}", &env),
            "secret-123".to_string()
        );
    }

    #[test]
    fn leaves_unknown_variable_untouched() {
        let env = env(&[]);
        assert_eq!(substitute_string("${MISSING}", &env), "${MISSING}");
    }

    #[test]
    fn substitutes_nested_object_values() {
        let env = env(&[("HOST", "credit.example.com")]);
        let tree = serde_json::json!({
            "services": { "credit_bureau": { "base_url": "https://${HOST}/v1" } }
        });
        let result = substitute_placeholders(tree, &env);
        assert_eq!(
            result["services"]["credit_bureau"]["base_url"],
            "https://credit.example.com/v1"
        );
    }
}
