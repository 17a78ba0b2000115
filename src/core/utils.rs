//! String transformation utilities for engine naming

/// Converts a string to snake_case, the Rails `underscore` form.
///
/// Handles camelCase, PascalCase, kebab-case and space-separated input.
///
/// # Examples
/// ```
/// use enginex::core::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("MyEngine"), "my_engine");
/// assert_eq!(to_snake_case("my-engine"), "my_engine");
/// assert_eq!(to_snake_case("admin panel"), "admin_panel");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
        } else if (ch == '-' || ch == '_' || ch == ' ' || ch == '.')
            && !result.is_empty()
            && !result.ends_with('_')
        {
            result.push('_');
            prev_is_lowercase = false;
        } else {
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Converts a string to UpperCamelCase, the Rails `camelize` form.
///
/// # Examples
/// ```
/// use enginex::core::utils::to_camel_case;
///
/// assert_eq!(to_camel_case("my_engine"), "MyEngine");
/// assert_eq!(to_camel_case("my-engine"), "MyEngine");
/// ```
pub fn to_camel_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("my_engine"), "my_engine");
        assert_eq!(to_snake_case("MyEngine"), "my_engine");
        assert_eq!(to_snake_case("myEngine"), "my_engine");
        assert_eq!(to_snake_case("my-engine"), "my_engine");
        assert_eq!(to_snake_case("Blog2Engine"), "blog2_engine");
        assert_eq!(to_snake_case("--weird--name--"), "weird_name");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("my_engine"), "MyEngine");
        assert_eq!(to_camel_case("MyEngine"), "MyEngine");
        assert_eq!(to_camel_case("my-engine"), "MyEngine");
        assert_eq!(to_camel_case("blog"), "Blog");
    }
}
