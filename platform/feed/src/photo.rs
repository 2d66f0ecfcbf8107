use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::cache::Cache;
use crate::client::GqlTransport;
use crate::error::ClientError;

pub const TOGGLE_LIKE_PHOTO_MUTATION: &str = r#"
mutation toggleLikePhoto($id: Int!) {
    toggleLikePhoto(id: $id) {
        ok
        error
    }
}
"#;

/// Selection a `PhotoCard` renders from.
pub const PHOTO_FRAGMENT: &str = r#"
fragment PhotoFragment on Photo {
    __typename
    id
    file
    caption
    likes
    commentNumber
    isLiked
    isMine
    user {
        __typename
        id
        username
        avatar
    }
    comments {
        __typename
        id
        payload
        isMine
        user {
            __typename
            id
            username
            avatar
        }
    }
}
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoOwner {
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoComment {
    pub id: i32,
    pub payload: String,
    pub user: PhotoOwner,
    #[serde(default)]
    pub is_mine: bool,
}

/// Props of a feed photo as selected by [`PHOTO_FRAGMENT`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i32,
    pub user: PhotoOwner,
    pub file: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub likes: i64,
    pub comment_number: i64,
    #[serde(default)]
    pub comments: Vec<PhotoComment>,
    pub is_liked: bool,
    #[serde(default)]
    pub is_mine: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MutationResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartStyle {
    Solid,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heart {
    pub style: HeartStyle,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub author: String,
    pub payload: String,
}

/// What a card shows, computed from its props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoView {
    pub username: String,
    pub avatar: Option<String>,
    pub file: String,
    pub heart: Heart,
    pub likes_label: Option<String>,
    pub caption: Option<String>,
    pub comments_label: Option<String>,
    pub comments: Vec<CommentView>,
}

pub struct PhotoCard {
    photo: Photo,
}

impl PhotoCard {
    pub fn new(photo: Photo) -> Self {
        Self { photo }
    }

    /// Builds the card from the current cache entry `Photo:<id>`.
    pub fn from_cache(cache: &Cache, id: i32) -> Result<Self, ClientError> {
        let cache_id = Cache::identify("Photo", id);
        let value = cache.read_fragment(&cache_id).ok_or(ClientError::NotCached(cache_id))?;
        Ok(Self::new(serde_json::from_value(value)?))
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn render(&self) -> PhotoView {
        let photo = &self.photo;

        let heart = if photo.is_liked {
            Heart {
                style: HeartStyle::Solid,
                color: "tomato",
            }
        } else {
            Heart {
                style: HeartStyle::Regular,
                color: "inherit",
            }
        };

        PhotoView {
            username: photo.user.username.clone(),
            avatar: photo.user.avatar.clone(),
            file: photo.file.clone(),
            heart,
            likes_label: (photo.likes != 0).then(|| format!("좋아요 {}개", photo.likes)),
            caption: photo.caption.clone(),
            comments_label: (photo.comment_number != 0).then(|| format!("댓글 {}개 모두 보기", photo.comment_number)),
            comments: photo
                .comments
                .iter()
                .map(|comment| CommentView {
                    author: comment.user.username.clone(),
                    payload: comment.payload.clone(),
                })
                .collect(),
        }
    }

    /// Fields written to `Photo:<id>` once the server accepted the toggle.
    pub fn like_patch(&self) -> Map<String, Value> {
        let likes = if self.photo.is_liked {
            self.photo.likes - 1
        } else {
            self.photo.likes + 1
        };

        let mut patch = Map::new();
        patch.insert("isLiked".to_string(), Value::Bool(!self.photo.is_liked));
        patch.insert("likes".to_string(), Value::from(likes));
        patch
    }

    /// Handler for a click on the image or on the heart.
    pub async fn toggle_like(&self, transport: &dyn GqlTransport, cache: &mut Cache) -> Result<MutationResponse, ClientError> {
        let data = transport
            .execute(TOGGLE_LIKE_PHOTO_MUTATION, json!({ "id": self.photo.id }))
            .await?;

        let response: MutationResponse = serde_json::from_value(
            data.get("toggleLikePhoto")
                .cloned()
                .ok_or(ClientError::MissingData("toggleLikePhoto"))?,
        )?;

        if response.ok {
            cache.write_fragment(&Cache::identify("Photo", self.photo.id), self.like_patch());
        } else {
            tracing::debug!(photo_id = self.photo.id, error = ?response.error, "toggle like rejected");
        }

        Ok(response)
    }
}
