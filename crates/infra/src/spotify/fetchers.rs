//! Typed fetchers for the resources Encore displays

use encore_domain::constants::{PAGED_LIST_LIMIT, TOP_ITEMS_LIMIT};
use encore_domain::{Artist, FollowedArtists, Page, Playlist, PlaylistItem, Profile, Track};
use url::form_urlencoded;

use super::client::SpotifyClient;
use super::errors::ApiError;

impl SpotifyClient {
    /// Current user's profile (`/me`)
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.fetch_api("/me", &[]).await
    }

    /// Every artist the user follows
    pub async fn followed_artists(&self) -> Result<Vec<Artist>, ApiError> {
        self.paginate_with(
            "/me/following",
            &[("type", "artist".to_string())],
            PAGED_LIST_LIMIT,
            |body: FollowedArtists| body.artists,
        )
        .await
    }

    /// The user's ten top artists (single page)
    pub async fn top_artists(&self) -> Result<Vec<Artist>, ApiError> {
        self.top_items("/me/top/artists").await
    }

    /// The user's ten top tracks (single page)
    pub async fn top_tracks(&self) -> Result<Vec<Track>, ApiError> {
        self.top_items("/me/top/tracks").await
    }

    /// Every playlist owned or followed by the user
    pub async fn playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        self.paginate("/me/playlists", &[], PAGED_LIST_LIMIT).await
    }

    /// Every item of one playlist; removed tracks come back with `track: None`
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, ApiError> {
        let id: String = form_urlencoded::byte_serialize(playlist_id.as_bytes()).collect();
        self.paginate(&format!("/playlists/{id}/tracks"), &[], PAGED_LIST_LIMIT).await
    }

    async fn top_items<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>, ApiError> {
        let query = [("limit", TOP_ITEMS_LIMIT.to_string()), ("offset", "0".to_string())];
        let page: Page<T> = self.fetch_api(endpoint, &query).await?;
        Ok(page.items)
    }
}
