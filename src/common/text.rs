//! Identifier helpers shared by the scanner, the generators and the façade.

/// Capitalizes the first character of a string
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Case-folds an identifier for lookup. Class and method names resolve
/// case-insensitively, so every map key goes through here.
pub fn fold_identifier(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Whether `s` is a valid class or method identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
