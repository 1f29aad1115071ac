//! Display names derived from organisation email addresses.

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Turns the local part of an address into a display name.
///
/// `jane.doe` becomes `Jane Doe`, `jane` becomes `Jane`.
pub fn display_name(local_part: &str) -> String {
    local_part
        .split('.')
        .filter(|s| !s.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the display name for `email` when it belongs to `org_domain`.
///
/// The domain comparison is exact and case-insensitive, so subdomains and
/// look-alike domains are rejected.
pub fn org_display_name(email: &str, org_domain: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || !domain.eq_ignore_ascii_case(org_domain) {
        return None;
    }
    let name = display_name(local);
    (!name.is_empty()).then_some(name)
}
