use async_graphql::{Error, ErrorExtensions, ID, SimpleObject};
use track_api::TrackApiError;

pub mod graphql {
    use super::*;

    /// A track is a group of Modules that teaches about a specific topic
    #[derive(SimpleObject, Debug, Clone)]
    #[graphql(complex)]
    pub struct Track {
        pub id: ID,
        /// The track's title
        pub title: String,
        /// The track's main illustration to display in track card or track page detail
        pub thumbnail: Option<String>,
        /// The track's approximate length to complete, in minutes
        pub length: Option<i32>,
        /// The number of modules this track contains
        pub modules_count: Option<i32>,
        /// The track's complete description, can be in Markdown format
        pub description: Option<String>,
        /// The number of times a track has been viewed
        pub number_of_views: Option<i32>,
        #[graphql(skip)]
        pub author_id: Option<String>,
    }

    #[derive(SimpleObject, Debug, Clone)]
    #[graphql(complex)]
    pub struct Module {
        pub id: ID,
        /// The Module's title
        pub title: String,
        /// The Module's length in minutes
        pub length: Option<i32>,
        /// The module's text-based description, can be in markdown format. In case of a video, it will be the enriched transcript
        pub content: Option<String>,
        /// The module's video url, for video-based modules
        pub video_url: Option<String>,
    }

    /// Author of a complete Track
    #[derive(SimpleObject, Debug, Clone)]
    pub struct Author {
        pub id: ID,
        /// Author's first and last name
        pub name: String,
        /// Author's profile picture url
        pub photo: Option<String>,
    }

    #[derive(SimpleObject, Debug)]
    pub struct IncrementTrackViewsResponse {
        /// Similar to HTTP status code, represents the status of the mutation
        pub code: i32,
        /// Indicates whether the mutation was successful
        pub success: bool,
        /// Human-readable message for the UI
        pub message: String,
        /// Newly updated track after a successful mutation
        pub track: Option<Track>,
    }
}

impl From<track_api::Track> for graphql::Track {
    fn from(track: track_api::Track) -> Self {
        Self {
            id: track.id.into(),
            title: track.title,
            thumbnail: track.thumbnail,
            length: track.length,
            modules_count: track.modules_count,
            description: track.description,
            number_of_views: track.number_of_views,
            author_id: track.author_id,
        }
    }
}

impl From<track_api::Module> for graphql::Module {
    fn from(module: track_api::Module) -> Self {
        Self {
            id: module.id.into(),
            title: module.title,
            length: module.length,
            content: module.content,
            video_url: module.video_url,
        }
    }
}

impl From<track_api::Author> for graphql::Author {
    fn from(author: track_api::Author) -> Self {
        Self {
            id: author.id.into(),
            name: author.name,
            photo: author.photo,
        }
    }
}

pub fn convert_to_graphql_error(error: TrackApiError) -> Error {
    Error::new(error.to_string()).extend_with(|_, extensions| match &error {
        TrackApiError::Remote(remote) => {
            extensions.set("code", "UPSTREAM_ERROR");
            if let Some(status) = remote.status() {
                extensions.set("status", i32::from(status.as_u16()));
            }
        }
        TrackApiError::Payload { path, .. } => {
            extensions.set("code", "BAD_UPSTREAM_PAYLOAD");
            extensions.set("upstreamPath", path.clone());
        }
    })
}

pub fn missing_upstream_field_error(path: String, field: &str) -> Error {
    Error::new(format!("unexpected payload from {path}: missing field `{field}`")).extend_with(
        |_, extensions| {
            extensions.set("code", "BAD_UPSTREAM_PAYLOAD");
            extensions.set("upstreamPath", path.clone());
        },
    )
}
