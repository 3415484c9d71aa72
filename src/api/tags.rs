//! The unauthenticated tag catalog fetch.

use serde::Deserialize;

use crate::{
    Error,
    transaction::model::{Tag, TagId},
};

use super::client::ApiClient;

/// The remote path for the global tag list.
const TAGS_PATH: &str = "/api/tags";

#[derive(Debug, Deserialize)]
struct TagListResponse {
    data: Vec<WireTag>,
}

#[derive(Debug, Deserialize)]
struct WireTag {
    id: TagId,
    nome: String,
}

/// Fetch the global tag catalog, used to populate the tag picker on the
/// create and edit forms.
///
/// This endpoint requires no authentication.
///
/// # Errors
///
/// Returns an [Error::ApiUnreachable], [Error::ApiStatus], or
/// [Error::MalformedResponse] depending on where the request failed.
pub async fn fetch_tags(api: &ApiClient) -> Result<Vec<Tag>, Error> {
    let response = api.http().get(api.url(TAGS_PATH)).send().await?;

    if !response.status().is_success() {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    let body: TagListResponse = response.json().await?;

    Ok(body
        .data
        .into_iter()
        .map(|tag| Tag {
            id: tag.id,
            name: tag.nome,
        })
        .collect())
}
