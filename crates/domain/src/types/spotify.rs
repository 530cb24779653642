//! Spotify resource models
//!
//! Only the fields Encore displays are modelled; everything else in the
//! provider payload is ignored. Fields the provider may omit default rather
//! than fail deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Links back to the Spotify web player
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Artwork, ordered by the provider from largest to smallest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

/// Resources that link to Spotify and may carry artwork
pub trait SpotifyResource {
    fn external_urls(&self) -> &ExternalUrls;

    fn images(&self) -> &[Image] {
        &[]
    }

    /// Spotify web URL for this resource, or `"#"` when none is published
    fn spotify_url(&self) -> &str {
        match self.external_urls().spotify.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => "#",
        }
    }

    /// URL of the smallest image (the provider lists it last)
    fn smallest_image_url(&self) -> Option<&str> {
        self.images().last().map(|image| image.url.as_str())
    }
}

/// Current user's profile (`/me`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub followers: Followers,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub followers: Followers,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// Artist reference embedded in tracks and albums
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimplifiedArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    /// Local files have no Spotify id
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistOwner {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// Entry of `/playlists/{id}/tracks`; `track` is null for removed items
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistItem {
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub track: Option<Track>,
}

impl SpotifyResource for Profile {
    fn external_urls(&self) -> &ExternalUrls {
        &self.external_urls
    }

    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl SpotifyResource for Artist {
    fn external_urls(&self) -> &ExternalUrls {
        &self.external_urls
    }

    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl SpotifyResource for Track {
    fn external_urls(&self) -> &ExternalUrls {
        &self.external_urls
    }

    fn images(&self) -> &[Image] {
        match &self.album {
            Some(album) => &album.images,
            None => &[],
        }
    }
}

impl SpotifyResource for Playlist {
    fn external_urls(&self) -> &ExternalUrls {
        &self.external_urls
    }

    fn images(&self) -> &[Image] {
        &self.images
    }
}

impl SpotifyResource for PlaylistOwner {
    fn external_urls(&self) -> &ExternalUrls {
        &self.external_urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, size: u32) -> Image {
        Image { url: url.to_string(), height: Some(size), width: Some(size) }
    }

    #[test]
    fn spotify_url_falls_back_to_hash() {
        let artist = Artist { id: "1".into(), name: "Daft Punk".into(), ..Artist::default() };
        assert_eq!(artist.spotify_url(), "#");

        let linked = Artist {
            external_urls: ExternalUrls {
                spotify: Some("https://open.spotify.com/artist/1".into()),
            },
            ..artist
        };
        assert_eq!(linked.spotify_url(), "https://open.spotify.com/artist/1");
    }

    #[test]
    fn smallest_image_is_last() {
        let playlist = Playlist {
            id: "p".into(),
            name: "Road trip".into(),
            images: vec![image("big", 640), image("medium", 300), image("small", 60)],
            ..Playlist::default()
        };
        assert_eq!(playlist.smallest_image_url(), Some("small"));
        assert_eq!(Profile::default().smallest_image_url(), None);
    }

    #[test]
    fn track_artwork_comes_from_album() {
        let track = Track {
            name: "Aerodynamic".into(),
            album: Some(Album {
                name: "Discovery".into(),
                images: vec![image("cover-640", 640), image("cover-64", 64)],
                ..Album::default()
            }),
            ..Track::default()
        };
        assert_eq!(track.smallest_image_url(), Some("cover-64"));
    }

    #[test]
    fn playlist_item_tolerates_removed_track() {
        let item: PlaylistItem =
            serde_json::from_str(r#"{"added_at": "2024-03-01T10:00:00Z", "track": null}"#)
                .unwrap();
        assert!(item.track.is_none());
        assert!(item.added_at.is_some());
    }
}
