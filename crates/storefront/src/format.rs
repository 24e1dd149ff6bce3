//! Message templating.
//!
//! Templates use `{name}` placeholders. Placeholders without a value, and
//! braces that do not form a placeholder, are copied through untouched.

/// Substitute `{name}` placeholders in `template` with values from `vars`.
///
/// # Example
///
/// ```rust
/// use goodstock_storefront::format::render_template;
///
/// let text = render_template("Hi {name}, total {total}", &[("name", "Ayu"), ("total", "Rp 5.000")]);
/// assert_eq!(text, "Hi Ayu, total Rp 5.000");
/// ```
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((before, after_open)) = rest.split_once('{') {
        out.push_str(before);

        let Some((name, after_close)) = after_open.split_once('}') else {
            out.push('{');
            out.push_str(after_open);
            return out;
        };

        let value = vars
            .iter()
            .find(|(key, _)| *key == name && is_placeholder_name(name))
            .map(|(_, value)| *value);
        if let Some(value) = value {
            out.push_str(value);
            rest = after_close;
        } else {
            out.push('{');
            rest = after_open;
        }
    }

    out.push_str(rest);
    out
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
