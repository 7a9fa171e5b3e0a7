use std::collections::BTreeMap;

/// Replaces every `{{key}}` placeholder with its value. Unknown placeholders
/// are left untouched so a template author can spot them in the output.
pub fn render_placeholders(input: &str, values: &BTreeMap<String, String>) -> String {
    let mut rendered = input.to_string();
    for (key, value) in values {
        let placeholder = format!("{{{{{key}}}}}");
        if rendered.contains(&placeholder) {
            rendered = rendered.replace(&placeholder, value);
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn replaces_known_placeholders() {
        let rendered = render_placeholders(
            "Hello {{name}}, your profile is {{profile_final}}.",
            &values(&[("name", "Ada"), ("profile_final", "X")]),
        );
        assert_eq!(rendered, "Hello Ada, your profile is X.");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let rendered = render_placeholders("{{x}} and {{x}}", &values(&[("x", "1")]));
        assert_eq!(rendered, "1 and 1");
    }

    #[test]
    fn unknown_placeholders_survive() {
        let rendered = render_placeholders("{{missing}}", &values(&[("x", "1")]));
        assert_eq!(rendered, "{{missing}}");
    }
}
