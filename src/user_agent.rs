//! Shared User-Agent string for remote store requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/ReviversMC/the-mod-index";

/// Default User-Agent for index requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("modindex/{version} (index-client; +{PROJECT_UA_URL})")
}
