use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

mod client;
mod models;
mod utils;

pub use client::{RemoteCallError, RestClient};
pub use models::{Author, Module, Track};
pub use reqwest::{Client, StatusCode, Url};
pub use utils::get_base_http_client;

#[derive(Debug, thiserror::Error)]
pub enum TrackApiError {
    #[error(transparent)]
    Remote(#[from] RemoteCallError),
    #[error("unexpected payload from {path}: {source}")]
    Payload {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Domain operations of the track service. Holds a [`RestClient`], so one
/// instance is meant to serve exactly one GraphQL request.
pub struct TrackApi {
    client: RestClient,
}

impl TrackApi {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client: RestClient::new(client, base_url),
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, TrackApiError> {
        let value = self.client.get(segments).await?;
        decode(segments, &value)
    }

    pub async fn get_tracks_for_home(&self) -> Result<Vec<Track>, TrackApiError> {
        tracing::debug!("Fetching tracks for home");
        self.get(&["tracks"]).await
    }

    pub async fn get_track(&self, track_id: &str) -> Result<Track, TrackApiError> {
        tracing::debug!("Fetching track {}", track_id);
        self.get(&["track", track_id]).await
    }

    pub async fn get_track_modules(&self, track_id: &str) -> Result<Vec<Module>, TrackApiError> {
        tracing::debug!("Fetching modules of track {}", track_id);
        self.get(&["track", track_id, "modules"]).await
    }

    pub async fn get_author(&self, author_id: &str) -> Result<Author, TrackApiError> {
        tracing::debug!("Fetching author {}", author_id);
        self.get(&["author", author_id]).await
    }

    pub async fn get_module(&self, module_id: &str) -> Result<Module, TrackApiError> {
        tracing::debug!("Fetching module {}", module_id);
        self.get(&["module", module_id]).await
    }

    pub async fn increment_track_views(&self, track_id: &str) -> Result<Track, TrackApiError> {
        tracing::debug!("Incrementing views of track {}", track_id);
        let segments = ["track", track_id, "numberOfViews"];
        let value = self.client.patch(&segments).await?;
        decode(&segments, &value)
    }
}

fn decode<T: DeserializeOwned>(segments: &[&str], value: &Value) -> Result<T, TrackApiError> {
    <T as Deserialize>::deserialize(value).map_err(|source| TrackApiError::Payload {
        path: segments.join("/"),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn track_api(server: &MockServer) -> TrackApi {
        TrackApi::new(Client::new(), Url::parse(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn decodes_camel_case_track_with_missing_optionals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/track/c_0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c_0",
                "title": "Cat-stronomy",
                "authorId": "cat-1",
                "length": 1916,
                "modulesCount": 5,
                "numberOfViews": 163,
                "thumbnail": null,
                "someNewField": true
            })))
            .mount(&server)
            .await;

        let track = track_api(&server).get_track("c_0").await.unwrap();
        assert_eq!(
            track,
            Track {
                id: "c_0".to_string(),
                title: "Cat-stronomy".to_string(),
                author_id: Some("cat-1".to_string()),
                thumbnail: None,
                length: Some(1916),
                modules_count: Some(5),
                description: None,
                number_of_views: Some(163),
            }
        );
    }

    #[tokio::test]
    async fn fetches_modules_of_a_track() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/track/c_0/modules"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "l_0", "title": "Exploring Time", "length": 5, "videoUrl": "https://example.com/v.mp4" },
                { "id": "l_1", "title": "Reading the Stars", "length": 7, "content": "# Stars" }
            ])))
            .mount(&server)
            .await;

        let modules = track_api(&server).get_track_modules("c_0").await.unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].video_url.as_deref(), Some("https://example.com/v.mp4"));
        assert_eq!(modules[0].content, None);
        assert_eq!(modules[1].content.as_deref(), Some("# Stars"));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_payload_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/author/cat-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cat-1" })))
            .mount(&server)
            .await;

        let error = track_api(&server).get_author("cat-1").await.unwrap_err();
        match error {
            TrackApiError::Payload { path, .. } => assert_eq!(path, "author/cat-1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn increment_track_views_returns_updated_track() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/track/c_0/numberOfViews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c_0",
                "title": "Cat-stronomy",
                "authorId": "cat-1",
                "numberOfViews": 164
            })))
            .expect(1)
            .mount(&server)
            .await;

        let track = track_api(&server)
            .increment_track_views("c_0")
            .await
            .unwrap();
        assert_eq!(track.number_of_views, Some(164));
    }

    #[tokio::test]
    async fn track_without_author_id_still_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "c_0", "title": "Cat-stronomy", "authorId": "cat-1" },
                { "id": "c_1", "title": "No author yet" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/track/c_1/numberOfViews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c_1",
                "title": "No author yet",
                "numberOfViews": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = track_api(&server);
        let tracks = api.get_tracks_for_home().await.unwrap();
        assert_eq!(tracks[0].author_id.as_deref(), Some("cat-1"));
        assert_eq!(tracks[1].author_id, None);

        let track = api.increment_track_views("c_1").await.unwrap();
        assert_eq!(track.author_id, None);
        assert_eq!(track.number_of_views, Some(1));
    }

    #[tokio::test]
    async fn upstream_failure_is_a_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/module/nope"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let error = track_api(&server).get_module("nope").await.unwrap_err();
        assert!(matches!(
            error,
            TrackApiError::Remote(RemoteCallError::Status { status, .. })
                if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }
}
