//! Blocking gate applied to top-level navigations.
//!
//! Evaluated once per navigation event against the current session, the
//! blocklist and the bypass map. The gate only bites during an active focus
//! session; a valid bypass wins over a blocklist match so a snoozed domain
//! is never redirected even when blocklisted.

use std::collections::HashMap;

use url::Url;

use crate::blocklist;
use crate::session::{Session, SessionKind};

/// Frame id of the top frame in a navigation event.
pub const TOP_FRAME: u32 = 0;

/// Outcome of evaluating one navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the navigation proceed.
    Allow,
    /// Let it proceed, and pause the running session: the user chose to
    /// step away, so the countdown should not keep running unseen.
    AllowAndPause,
    /// Redirect the tab to the interstitial page.
    Block,
}

/// Hostname of a URL with a leading `www.` stripped. `None` when the URL
/// is malformed or has no host.
pub fn hostname_from_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

pub fn evaluate(
    url: &str,
    session: &Session,
    blocklist: &[String],
    bypass: &HashMap<String, i64>,
    now_ms: i64,
) -> Verdict {
    let Ok(parsed) = Url::parse(url) else {
        return Verdict::Allow;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Verdict::Allow;
    }
    let Some(hostname) = hostname_from_url(url) else {
        return Verdict::Allow;
    };

    if !session.active || session.kind != SessionKind::Focus {
        return Verdict::Allow;
    }

    if let Some(&until) = bypass.get(&hostname) {
        if until > now_ms {
            return if session.paused {
                Verdict::Allow
            } else {
                Verdict::AllowAndPause
            };
        }
    }

    if blocklist::is_blocked(&hostname, blocklist) {
        Verdict::Block
    } else {
        Verdict::Allow
    }
}

/// Interstitial page location carrying the original destination as a query
/// parameter.
pub fn interstitial_url(base: &str, original: &str) -> String {
    format!("{base}?url={}", urlencoding::encode(original))
}

/// Read the original destination back out of an interstitial URL.
pub fn original_url_from_query(interstitial: &str) -> Option<String> {
    let parsed = Url::parse(interstitial).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}
