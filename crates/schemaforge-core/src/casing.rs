//! Pure string transforms used to derive every generated identifier.
//!
//! All functions are deterministic and idempotent on input that is already
//! in the requested casing. Words are split on `_`, `-`, whitespace and
//! camel boundaries (`userId` → `user|Id`, `HTTPServer` → `HTTP|Server`).

use crate::config::Casing;

/// Split an identifier into its words.
pub fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn to_camel_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if index == 0 {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

pub fn to_pascal_case(input: &str) -> String {
    split_words(input).iter().map(|word| capitalize(word)).collect()
}

pub fn to_snake_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// UPPER_SNAKE spelling used for exported constants.
pub fn to_constant_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Heuristic singular form of the last word; no dictionary involved.
pub fn singularize(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let strip = |count: usize| input[..input.len() - count].to_string();

    if lower.len() > 3 && lower.ends_with("ies") {
        let replacement = if input.ends_with("IES") { "Y" } else { "y" };
        return format!("{}{replacement}", &input[..input.len() - 3]);
    }
    if ["sses", "xes", "ches", "shes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return strip(2);
    }
    if ["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix)) {
        return input.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return strip(1);
    }
    input.to_string()
}

/// Apply a configured casing to free text.
pub fn apply_casing(input: &str, casing: Casing) -> String {
    match casing {
        Casing::CamelCase => to_camel_case(input),
        Casing::SnakeCase => to_snake_case(input),
        Casing::PascalCase => to_pascal_case(input),
        Casing::Passthrough => input.to_string(),
    }
}

/// Join identifier parts (skipping empty ones) and case the result.
pub fn compose_identifier(parts: &[&str], casing: Casing) -> String {
    let joined = parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_");
    apply_casing(&joined, casing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separators_and_camel_boundaries() {
        assert_eq!(split_words("user_account-id name"), vec!["user", "account", "id", "name"]);
        assert_eq!(split_words("userAccountId"), vec!["user", "Account", "Id"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("v2Lite"), vec!["v2", "Lite"]);
    }

    #[test]
    fn converts_between_casings() {
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_pascal_case("user_accounts"), "UserAccounts");
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_constant_case("user status"), "USER_STATUS");
    }

    #[test]
    fn casing_is_idempotent() {
        for input in ["createdAt", "userId", "httpServer"] {
            assert_eq!(to_camel_case(input), input);
        }
        for input in ["UserAccount", "TableUserSchema"] {
            assert_eq!(to_pascal_case(input), input);
        }
        for input in ["created_at", "user_account_id"] {
            assert_eq!(to_snake_case(input), input);
        }
        assert_eq!(to_constant_case("USER_STATUS"), "USER_STATUS");
    }

    #[test]
    fn singularizes_common_suffixes() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("analysis"), "analysis");
        assert_eq!(singularize("user_accounts"), "user_account");
        assert_eq!(singularize("person"), "person");
        assert_eq!(singularize(singularize("users").as_str()), "user");
    }

    #[test]
    fn composes_identifiers_from_parts() {
        assert_eq!(
            compose_identifier(&["table", "user", "insert", "schema"], Casing::PascalCase),
            "TableUserInsertSchema"
        );
        assert_eq!(
            compose_identifier(&["", "active_user", "schema"], Casing::CamelCase),
            "activeUserSchema"
        );
        assert_eq!(compose_identifier(&["first_name"], Casing::Passthrough), "first_name");
    }
}
