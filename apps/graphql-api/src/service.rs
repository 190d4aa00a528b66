use async_graphql::{Request, Response};
use track_api::{Client, RemoteCallError, StatusCode, TrackApi, TrackApiError, Url};

use crate::{models::graphql::IncrementTrackViewsResponse, resolver::AppSchema};

pub struct Service {
    client: Client,
    base_url: Url,
}

impl Service {
    pub async fn new(client: Client, base_url: Url) -> Self {
        tracing::debug!("Initializing GraphQL API service against {}", base_url);
        Self { client, base_url }
    }

    /// A data access layer with an empty memo table. Never share one between
    /// two requests.
    pub fn track_api(&self) -> TrackApi {
        TrackApi::new(self.client.clone(), self.base_url.clone())
    }

    pub async fn execute(&self, schema: &AppSchema, request: Request) -> Response {
        tracing::debug!(
            "Executing GraphQL operation {}",
            request.operation_name.as_deref().unwrap_or("<anonymous>")
        );
        let response = schema.execute(request.data(self.track_api())).await;
        if response.is_err() {
            tracing::warn!(
                "GraphQL operation finished with {} error(s)",
                response.errors.len()
            );
        }
        response
    }

    pub async fn increment_track_views(
        &self,
        track_api: &TrackApi,
        id: &str,
    ) -> IncrementTrackViewsResponse {
        tracing::info!("Received view increment request for track {}", id);

        match track_api.increment_track_views(id).await {
            Ok(track) => {
                tracing::debug!("Track {} now has {:?} views", id, track.number_of_views);
                IncrementTrackViewsResponse {
                    code: 200,
                    success: true,
                    message: format!("Successfully incremented number of views for track {}", id),
                    track: Some(track.into()),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to increment views for track {}: {}", id, e);
                let (status, message) = match e {
                    TrackApiError::Remote(RemoteCallError::Status { status, body }) => {
                        (status, body)
                    }
                    other => (StatusCode::BAD_GATEWAY, other.to_string()),
                };
                IncrementTrackViewsResponse {
                    code: i32::from(status.as_u16()),
                    success: false,
                    message,
                    track: None,
                }
            }
        }
    }
}
