//! Redirect URI resolution

use url::Url;

/// Derive the OAuth redirect URI from the current location
///
/// Returns `scheme://host[:port]` with no path, query or trailing slash. The
/// port appears only when it is not the scheme's default.
#[must_use]
pub fn redirect_uri(current: &Url) -> String {
    current.origin().ascii_serialization()
}
