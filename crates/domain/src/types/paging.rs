//! Offset-paged list envelopes

use serde::{Deserialize, Serialize};

use super::spotify::Artist;

/// One page of an offset-paged list endpoint
///
/// `next` is the provider's absolute URL for the following page, or `None`
/// on the last page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), next: None, total: None, limit: None, offset: None }
    }
}

impl<T> Page<T> {
    /// Whether the provider advertises another page after this one
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|next| !next.is_empty())
    }
}

/// `/me/following?type=artist` nests its page under `artists`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FollowedArtists {
    #[serde(default)]
    pub artists: Page<Artist>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_next_means_last_page() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"items": [1, 2], "next": null, "total": 2}"#).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_next());
    }

    #[test]
    fn followed_artists_unwraps_nested_page() {
        let json = r#"{"artists": {"items": [{"id": "a1", "name": "Air"}],
                       "next": "https://api.spotify.com/v1/me/following?type=artist&after=a1"}}"#;
        let followed: FollowedArtists = serde_json::from_str(json).unwrap();
        assert_eq!(followed.artists.items[0].name, "Air");
        assert!(followed.artists.has_next());
    }
}
