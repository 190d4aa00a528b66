use std::sync::Arc;

use async_graphql::{ComplexObject, Context, EmptySubscription, ID, Object, Result, Schema};
use track_api::TrackApi;

use crate::{
    models::{
        convert_to_graphql_error,
        graphql::{Author, IncrementTrackViewsResponse, Module, Track},
        missing_upstream_field_error,
    },
    service::Service,
};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Resolvers read the request's [`TrackApi`] from the request data, which
/// [`Service::execute`] attaches. A request executed any other way fails its
/// data-backed fields with an error instead of resolving them.
pub fn build_schema(service: Arc<Service>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Query to get tracks array for the homepage grid
    async fn tracks_for_home(&self, gql_ctx: &Context<'_>) -> Result<Vec<Track>> {
        tracing::debug!("GraphQL resolving tracksForHome");
        let track_api = gql_ctx.data::<TrackApi>()?;
        let tracks = track_api
            .get_tracks_for_home()
            .await
            .map_err(convert_to_graphql_error)?;
        tracing::debug!("Resolved {} tracks for home", tracks.len());
        Ok(tracks.into_iter().map(Track::from).collect())
    }

    /// Fetch a specific track, provided a track's ID
    async fn track(&self, gql_ctx: &Context<'_>, id: ID) -> Result<Track> {
        tracing::debug!("GraphQL resolving track {}", id.as_str());
        let track_api = gql_ctx.data::<TrackApi>()?;
        let track = track_api
            .get_track(&id)
            .await
            .map_err(convert_to_graphql_error)?;
        Ok(track.into())
    }

    /// Fetch a specific module, provided a module's ID
    async fn module(&self, gql_ctx: &Context<'_>, id: ID) -> Result<Module> {
        tracing::debug!("GraphQL resolving module {}", id.as_str());
        let track_api = gql_ctx.data::<TrackApi>()?;
        let module = track_api
            .get_module(&id)
            .await
            .map_err(convert_to_graphql_error)?;
        Ok(module.into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn increment_track_views(
        &self,
        gql_ctx: &Context<'_>,
        id: ID,
    ) -> Result<IncrementTrackViewsResponse> {
        let service = gql_ctx.data::<Arc<Service>>()?;
        let track_api = gql_ctx.data::<TrackApi>()?;
        let response = service.increment_track_views(track_api, &id).await;

        if response.success {
            tracing::info!("Incremented views for track {}", id.as_str());
        } else {
            tracing::error!(
                "View increment for track {} failed with code {}",
                id.as_str(),
                response.code
            );
        }

        Ok(response)
    }
}

#[ComplexObject]
impl Track {
    /// The track's main author
    async fn author(&self, gql_ctx: &Context<'_>) -> Result<Author> {
        let Some(author_id) = self.author_id.as_deref() else {
            tracing::warn!("Track {} has no authorId", self.id.as_str());
            return Err(missing_upstream_field_error(
                format!("track/{}", self.id.as_str()),
                "authorId",
            ));
        };
        let track_api = gql_ctx.data::<TrackApi>()?;
        let author = track_api
            .get_author(author_id)
            .await
            .map_err(convert_to_graphql_error)?;
        Ok(author.into())
    }

    /// The track's complete array of Modules
    async fn modules(&self, gql_ctx: &Context<'_>) -> Result<Vec<Module>> {
        let track_api = gql_ctx.data::<TrackApi>()?;
        let modules = track_api
            .get_track_modules(&self.id)
            .await
            .map_err(convert_to_graphql_error)?;
        Ok(modules.into_iter().map(Module::from).collect())
    }

    /// The track's approximate length to complete, in seconds
    async fn duration_in_seconds(&self) -> Option<i32> {
        self.length
    }
}

#[ComplexObject]
impl Module {
    /// The Module's length, in seconds
    async fn duration_in_seconds(&self) -> Option<i32> {
        self.length
    }
}
