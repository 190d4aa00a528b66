use serde::{Deserialize, Serialize};

/// A track as returned by the REST service. The author and the modules are
/// not embedded; they are fetched separately through `authorId` and `id`.
/// A missing `authorId` only matters to whoever asks for the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub author_id: Option<String>,
    pub thumbnail: Option<String>,
    pub length: Option<i32>,
    pub modules_count: Option<i32>,
    pub description: Option<String>,
    pub number_of_views: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub length: Option<i32>,
    pub content: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub photo: Option<String>,
}
