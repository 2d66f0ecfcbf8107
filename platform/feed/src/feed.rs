use serde_json::{json, Value};

use crate::cache::Cache;
use crate::client::GqlTransport;
use crate::error::ClientError;
use crate::photo::{MutationResponse, Photo, PhotoCard, PHOTO_FRAGMENT};

const SEE_FEED_QUERY: &str = r#"
query seeFeed($offset: Int!) {
    seeFeed(offset: $offset) {
        ...PhotoFragment
    }
}
"#;

/// The home feed of the logged in user, backed by a normalized [`Cache`].
///
/// Pages are appended in the order they are loaded. Photos are always read
/// back from the cache, so fragment writes made by a card show up on the
/// next call to [`Feed::photos`].
#[derive(Debug, Default)]
pub struct Feed {
    cache: Cache,
    entries: Vec<String>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Number of photos loaded so far, the offset of the next page.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetches the page starting at `offset` and returns how many photos it held.
    pub async fn load(&mut self, transport: &dyn GqlTransport, offset: usize) -> Result<usize, ClientError> {
        let query = format!("{SEE_FEED_QUERY}\n{PHOTO_FRAGMENT}");
        let data = transport.execute(&query, json!({ "offset": offset })).await?;

        let page = match data.get("seeFeed") {
            Some(Value::Array(page)) => page.clone(),
            _ => return Err(ClientError::MissingData("seeFeed")),
        };

        let mut ids = Vec::with_capacity(page.len());
        for photo in &page {
            let id = photo
                .get("id")
                .and_then(Value::as_i64)
                .ok_or(ClientError::MissingData("photo id"))?;
            ids.push(Cache::identify("Photo", id));
        }

        self.cache.write_query_result(json!({ "seeFeed": page }));

        // reloading a page must not duplicate photos
        self.entries.truncate(offset.min(self.entries.len()));
        self.entries.extend(ids);

        tracing::debug!(offset, count = page.len(), "loaded feed page");

        Ok(page.len())
    }

    /// Loads the page after the last loaded photo.
    pub async fn load_more(&mut self, transport: &dyn GqlTransport) -> Result<usize, ClientError> {
        let offset = self.len();
        self.load(transport, offset).await
    }

    pub fn photos(&self) -> Result<Vec<Photo>, ClientError> {
        self.entries
            .iter()
            .filter_map(|cache_id| self.cache.read_fragment(cache_id))
            .map(|value| serde_json::from_value(value).map_err(ClientError::from))
            .collect()
    }

    pub fn cards(&self) -> Result<Vec<PhotoCard>, ClientError> {
        Ok(self.photos()?.into_iter().map(PhotoCard::new).collect())
    }

    /// Toggles the like of a loaded photo from its current cached state.
    pub async fn toggle_like(&mut self, transport: &dyn GqlTransport, photo_id: i32) -> Result<MutationResponse, ClientError> {
        let card = PhotoCard::from_cache(&self.cache, photo_id)?;
        card.toggle_like(transport, &mut self.cache).await
    }
}
