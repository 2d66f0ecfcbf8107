use std::{collections::HashMap, sync::Arc};

use async_graphql::{
    async_trait::async_trait,
    dataloader::{DataLoader, Loader},
};

use crate::database::{Store, StoreError, User};

pub struct UserByUsernameLoader {
    db: Arc<dyn Store>,
}

impl UserByUsernameLoader {
    pub fn new(db: Arc<dyn Store>) -> DataLoader<Self> {
        DataLoader::new(Self { db }, tokio::spawn)
    }
}

#[async_trait]
impl Loader<String> for UserByUsernameLoader {
    type Value = User;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        let results = self.db.users_by_usernames(keys).await.map_err(|e| {
            tracing::error!("Failed to fetch users by username: {}", e);
            Arc::new(e)
        })?;

        Ok(results
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect())
    }
}

pub struct UserByIdLoader {
    db: Arc<dyn Store>,
}

impl UserByIdLoader {
    pub fn new(db: Arc<dyn Store>) -> DataLoader<Self> {
        DataLoader::new(Self { db }, tokio::spawn)
    }
}

#[async_trait]
impl Loader<i32> for UserByIdLoader {
    type Value = User;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        let results = self.db.users_by_ids(keys).await.map_err(|e| {
            tracing::error!("Failed to fetch users by id: {}", e);
            Arc::new(e)
        })?;

        Ok(results.into_iter().map(|u| (u.id, u)).collect())
    }
}
