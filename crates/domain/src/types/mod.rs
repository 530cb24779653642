//! Domain types and models
//!
//! Serde models for the subset of the Spotify Web API that Encore reads.

pub mod paging;
pub mod spotify;

pub use paging::{FollowedArtists, Page};
pub use spotify::{
    Album, Artist, ExternalUrls, Followers, Image, Playlist, PlaylistItem, PlaylistOwner,
    PlaylistTracksRef, Profile, SimplifiedArtist, SpotifyResource, Track,
};
