//! Blocklist normalization and matching.
//!
//! Entries are normalized hostnames: lowercase, no scheme, no leading
//! `www.`. A hostname matches an entry when it equals the entry or is a
//! subdomain of it.

/// Normalize a raw user-supplied domain for insertion. Returns `None` when
/// nothing usable remains.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let stripped = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let stripped = stripped.strip_prefix("www.").unwrap_or(stripped);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Exact match or subdomain match (suffix on `"." + entry`).
pub fn host_matches(hostname: &str, entry: &str) -> bool {
    hostname == entry || hostname.ends_with(&format!(".{entry}"))
}

pub fn is_blocked(hostname: &str, blocklist: &[String]) -> bool {
    if hostname.is_empty() {
        return false;
    }
    blocklist.iter().any(|entry| host_matches(hostname, entry))
}

/// Normalize and insert, enforcing uniqueness. Returns whether the list
/// changed.
pub fn insert(list: &mut Vec<String>, raw: &str) -> bool {
    match normalize_domain(raw) {
        Some(domain) if !list.contains(&domain) => {
            list.push(domain);
            true
        }
        _ => false,
    }
}

/// Remove an exact entry. Returns whether the list changed.
pub fn remove(list: &mut Vec<String>, domain: &str) -> bool {
    let before = list.len();
    list.retain(|entry| entry != domain);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_strips_scheme_and_www() {
        assert_eq!(
            normalize_domain("HTTPS://WWW.Example.com").as_deref(),
            Some("example.com")
        );
        assert_eq!(
            normalize_domain("http://reddit.com").as_deref(),
            Some("reddit.com")
        );
        assert_eq!(
            normalize_domain("www.news.ycombinator.com").as_deref(),
            Some("news.ycombinator.com")
        );
        assert_eq!(normalize_domain("  "), None);
        assert_eq!(normalize_domain("https://www."), None);
    }

    #[test]
    fn subdomains_match_but_lookalikes_do_not() {
        let list = vec!["youtube.com".to_string()];
        assert!(is_blocked("youtube.com", &list));
        assert!(is_blocked("m.youtube.com", &list));
        assert!(!is_blocked("notyoutube.com", &list));
        assert!(!is_blocked("", &list));
    }

    #[test]
    fn insert_dedupes_after_normalization() {
        let mut list = Vec::new();
        assert!(insert(&mut list, "HTTPS://WWW.Example.com"));
        assert!(!insert(&mut list, "example.com"));
        assert_eq!(list, vec!["example.com".to_string()]);
    }

    #[test]
    fn remove_is_exact_match_only() {
        let mut list = vec!["youtube.com".to_string(), "reddit.com".to_string()];
        assert!(remove(&mut list, "reddit.com"));
        assert!(!remove(&mut list, "m.youtube.com"));
        assert_eq!(list, vec!["youtube.com".to_string()]);
    }

    proptest! {
        #[test]
        fn normalization_ignores_scheme_and_www_prefixes(
            scheme in prop::sample::select(vec!["", "http://", "https://", "HTTP://", "HTTPS://"]),
            www in prop::sample::select(vec!["", "www.", "WWW."]),
            domain in "[a-z0-9]([a-z0-9-]{0,8}\\.){0,2}[a-z]{2,5}"
        ) {
            prop_assume!(!domain.starts_with("www."));
            let raw = format!("{scheme}{www}{domain}");
            prop_assert_eq!(normalize_domain(&raw), Some(domain));
        }

        #[test]
        fn subdomain_always_matches(
            label in "[a-z0-9]{1,10}",
            entry in "[a-z0-9]{1,10}\\.[a-z]{2,5}"
        ) {
            let list = vec![entry.clone()];
            let with_dot = format!("{}.{}", label, entry);
            prop_assert!(is_blocked(&with_dot, &list));
            // Concatenation without a dot boundary never matches.
            let without_dot = format!("{}{}", label, entry);
            prop_assert!(!is_blocked(&without_dot, &list));
        }
    }
}
