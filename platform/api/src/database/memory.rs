use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{Store, StoreError, StoreResult};
use super::{Comment, NewUser, Photo, User, UserUpdate};

#[derive(Default)]
struct State {
    users: BTreeMap<i32, User>,
    /// `(follower_id, following_id)` -> sequence at which the follow was made
    follows: BTreeMap<(i32, i32), u64>,
    photos: BTreeMap<i32, Photo>,
    /// `(user_id, photo_id)` -> sequence at which the like was made
    likes: BTreeMap<(i32, i32), u64>,
    comments: BTreeMap<i32, Comment>,
    next_seq: u64,
    next_user_id: i32,
    next_photo_id: i32,
    next_comment_id: i32,
}

impl State {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn username_or_email_taken(&self, username: Option<&str>, email: Option<&str>, except: Option<i32>) -> bool {
        self.users.values().any(|u| {
            Some(u.id) != except && (Some(u.username.as_str()) == username || Some(u.email.as_str()) == email)
        })
    }

    fn users_in(&self, ids: impl Iterator<Item = i32>) -> Vec<User> {
        ids.filter_map(|id| self.users.get(&id).cloned()).collect()
    }
}

/// Ids ordered like `ORDER BY created_at DESC, id DESC`.
fn newest_first(entries: impl Iterator<Item = (i32, u64)>) -> Vec<i32> {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by(|(a_id, a_seq), (b_id, b_seq)| b_seq.cmp(a_seq).then(b_id.cmp(a_id)));
    entries.into_iter().map(|(id, _)| id).collect()
}

/// A store kept in process memory. Used by the tests and by the `memory`
/// database backend for local development.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(items: impl Iterator<Item = T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn user_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn users_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users_in(ids.iter().copied()))
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn users_by_usernames(&self, usernames: &[String]) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| usernames.contains(&u.username))
            .cloned()
            .collect())
    }

    async fn user_by_username_or_email(&self, username: &str, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.username_or_email_taken(Some(&user.username), Some(&user.email), None) {
            return Err(StoreError::Conflict("username or email"));
        }

        let now = Utc::now();
        let user = User {
            id: State::next_id(&mut state.next_user_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.username_or_email_taken(update.username.as_deref(), update.email.as_deref(), Some(id)) {
            return Err(StoreError::Conflict("username or email"));
        }

        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound("user"))?;

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if update.last_name.is_some() {
            user.last_name = update.last_name;
        }
        if update.bio.is_some() {
            user.bio = update.bio;
        }
        if update.avatar.is_some() {
            user.avatar = update.avatar;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn follow(&self, follower_id: i32, following_id: i32) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        state.follows.entry((follower_id, following_id)).or_insert(seq);
        Ok(())
    }

    async fn unfollow(&self, follower_id: i32, following_id: i32) -> StoreResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .follows
            .remove(&(follower_id, following_id))
            .is_some())
    }

    async fn is_following(&self, follower_id: i32, following_id: i32) -> StoreResult<bool> {
        Ok(self.state.read().await.follows.contains_key(&(follower_id, following_id)))
    }

    async fn count_followers(&self, user_id: i32) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state.follows.keys().filter(|(_, to)| *to == user_id).count() as i64)
    }

    async fn count_following(&self, user_id: i32) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state.follows.keys().filter(|(from, _)| *from == user_id).count() as i64)
    }

    async fn followers(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let ids = newest_first(
            state
                .follows
                .iter()
                .filter(|((_, to), _)| *to == user_id)
                .map(|((from, _), seq)| (*from, *seq)),
        );
        Ok(page(state.users_in(ids.into_iter()).into_iter(), offset, limit))
    }

    async fn following(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let ids = newest_first(
            state
                .follows
                .iter()
                .filter(|((from, _), _)| *from == user_id)
                .map(|((_, to), seq)| (*to, *seq)),
        );
        Ok(page(state.users_in(ids.into_iter()).into_iter(), offset, limit))
    }

    async fn create_photo(&self, user_id: i32, file: &str, caption: Option<&str>) -> StoreResult<Photo> {
        let mut state = self.state.write().await;

        let now = Utc::now();
        let photo = Photo {
            id: State::next_id(&mut state.next_photo_id),
            user_id,
            file: file.to_string(),
            caption: caption.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        state.photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn photo_by_id(&self, id: i32) -> StoreResult<Option<Photo>> {
        Ok(self.state.read().await.photos.get(&id).cloned())
    }

    async fn photos_by_user(&self, user_id: i32) -> StoreResult<Vec<Photo>> {
        let state = self.state.read().await;
        Ok(state
            .photos
            .values()
            .rev()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_photo_caption(&self, id: i32, caption: Option<&str>) -> StoreResult<Photo> {
        let mut state = self.state.write().await;
        let photo = state.photos.get_mut(&id).ok_or(StoreError::NotFound("photo"))?;

        photo.caption = caption.map(str::to_string);
        photo.updated_at = Utc::now();

        Ok(photo.clone())
    }

    async fn delete_photo(&self, id: i32) -> StoreResult<()> {
        let mut state = self.state.write().await;

        state.photos.remove(&id);
        state.likes.retain(|(_, photo_id), _| *photo_id != id);
        state.comments.retain(|_, c| c.photo_id != id);

        Ok(())
    }

    async fn feed(&self, user_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<Photo>> {
        let state = self.state.read().await;

        // ids grow with creation time, so walking them backwards is newest first
        let photos = state
            .photos
            .values()
            .rev()
            .filter(|p| p.user_id == user_id || state.follows.contains_key(&(user_id, p.user_id)))
            .cloned();

        Ok(page(photos, offset, limit))
    }

    async fn like_exists(&self, user_id: i32, photo_id: i32) -> StoreResult<bool> {
        Ok(self.state.read().await.likes.contains_key(&(user_id, photo_id)))
    }

    async fn create_like(&self, user_id: i32, photo_id: i32) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        state.likes.entry((user_id, photo_id)).or_insert(seq);
        Ok(())
    }

    async fn delete_like(&self, user_id: i32, photo_id: i32) -> StoreResult<()> {
        self.state.write().await.likes.remove(&(user_id, photo_id));
        Ok(())
    }

    async fn count_likes(&self, photo_id: i32) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state.likes.keys().filter(|(_, p)| *p == photo_id).count() as i64)
    }

    async fn photo_likers(&self, photo_id: i32) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let ids = newest_first(
            state
                .likes
                .iter()
                .filter(|((_, p), _)| *p == photo_id)
                .map(|((user_id, _), seq)| (*user_id, *seq)),
        );
        Ok(state.users_in(ids.into_iter()))
    }

    async fn create_comment(&self, user_id: i32, photo_id: i32, payload: &str) -> StoreResult<Comment> {
        let mut state = self.state.write().await;

        if !state.photos.contains_key(&photo_id) {
            return Err(StoreError::NotFound("photo"));
        }

        let now = Utc::now();
        let comment = Comment {
            id: State::next_id(&mut state.next_comment_id),
            user_id,
            photo_id,
            payload: payload.to_string(),
            created_at: now,
            updated_at: now,
        };

        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn comment_by_id(&self, id: i32) -> StoreResult<Option<Comment>> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn update_comment(&self, id: i32, payload: &str) -> StoreResult<Comment> {
        let mut state = self.state.write().await;
        let comment = state.comments.get_mut(&id).ok_or(StoreError::NotFound("comment"))?;

        comment.payload = payload.to_string();
        comment.updated_at = Utc::now();

        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: i32) -> StoreResult<()> {
        self.state.write().await.comments.remove(&id);
        Ok(())
    }

    async fn comments_for_photo(&self, photo_id: i32, offset: i64, limit: i64) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        let comments = state.comments.values().filter(|c| c.photo_id == photo_id).cloned();
        Ok(page(comments, offset, limit))
    }

    async fn count_comments(&self, photo_id: i32) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state.comments.values().filter(|c| c.photo_id == photo_id).count() as i64)
    }
}
