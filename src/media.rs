//! Request and response shapes of the Photos Library `mediaItems:search` call.
//!
//! Field names follow the API's lowerCamelCase. Every optional or empty field
//! is left out of the encoded request, and anything the server omits from a
//! response decodes to its empty value.

use std::str::FromStr;

use serde::de::IntoDeserializer;
use serde::de::value::Error as ValueError;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Body of a `mediaItems:search` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Continuation token from a previous response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

impl SearchRequest {
    /// Empty request: first page, server-chosen page size, whole library
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of items per page
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Resume from the continuation token of an earlier response
    pub fn page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    /// Restrict the search to one album; the API rejects this combined with filters
    pub fn album_id(mut self, album_id: impl Into<String>) -> Self {
        self.album_id = Some(album_id.into());
        self
    }

    /// Set the filter tree
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// The request for the page after `response`, or `None` on the last page
    pub fn next_page(&self, response: &SearchResponse) -> Option<SearchRequest> {
        let token = response.next_page_token.as_deref()?;
        if token.is_empty() {
            return None;
        }
        Some(self.clone().page_token(token))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<DateFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_filter: Option<ContentFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type_filter: Option<MediaTypeFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_filter: Option<FeatureFilter>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_archived_media: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_non_app_created_data: bool,
}

impl Filters {
    /// Only media in any of `categories`
    pub fn including_categories(categories: impl IntoIterator<Item = ContentCategory>) -> Self {
        Self {
            content_filter: Some(ContentFilter {
                included_content_categories: categories.into_iter().collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Matches media taken on any of the dates or inside any of the ranges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<DateRange>,
}

/// Calendar date; a missing component acts as a wildcard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Date {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl Date {
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_content_categories: Vec<ContentCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_content_categories: Vec<ContentCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_features: Vec<Feature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentCategory {
    None,
    Landscapes,
    Receipts,
    Cityscapes,
    Landmarks,
    Selfies,
    People,
    Pets,
    Weddings,
    Birthdays,
    Documents,
    Travel,
    Animals,
    Food,
    Sport,
    Night,
    Performances,
    Whiteboards,
    Screenshots,
    Utility,
    Arts,
    Crafts,
    Fashion,
    Houses,
    Gardens,
    Flowers,
    Holidays,
}

impl FromStr for ContentCategory {
    type Err = ValueError;

    /// Parse a wire name such as `PETS`, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ContentCategory::deserialize(upper.as_str().into_deserializer())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    AllMedia,
    Video,
    Photo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    None,
    Favorites,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Present when more results are available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::types::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub media_items: Vec<MediaItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaItem {
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    /// Link to the item in the Google Photos UI
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub product_url: String,
    /// Base URL for the bytes; append size parameters before fetching
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub base_url: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub mime_type: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_metadata: Option<MediaMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_info: Option<ContributorInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaMetadata {
    /// RFC 3339 timestamp
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub creation_time: String,
    /// Pixel width, encoded as a decimal string by the API
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub width: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub height: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub camera_make: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub camera_model: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub focal_length: f64,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub aperture_f_number: f64,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub iso_equivalent: f64,
    /// Duration string such as "0.008s"
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub exposure_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub camera_make: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub camera_model: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub fps: f64,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub status: VideoProcessingStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoProcessingStatus {
    Processing,
    Ready,
    Failed,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributorInfo {
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub profile_picture_base_url: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub display_name: String,
}
