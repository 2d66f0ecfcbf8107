use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use common::context::Context;

use crate::config::AppConfig;
use crate::database::Store;
use crate::dataloader::user::{UserByIdLoader, UserByUsernameLoader};

pub struct GlobalState {
    pub config: AppConfig,
    pub db: Arc<dyn Store>,
    pub ctx: Context,

    pub user_by_username_loader: DataLoader<UserByUsernameLoader>,
    pub user_by_id_loader: DataLoader<UserByIdLoader>,
}

impl GlobalState {
    pub fn new(config: AppConfig, db: Arc<dyn Store>, ctx: Context) -> Self {
        Self {
            config,
            ctx,

            user_by_username_loader: UserByUsernameLoader::new(db.clone()),
            user_by_id_loader: UserByIdLoader::new(db.clone()),

            db,
        }
    }
}
