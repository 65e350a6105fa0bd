use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{RecipeStore, UserStore};

pub type UserStoreType = Arc<RwLock<dyn UserStore + Send + Sync>>;
pub type RecipeStoreType = Arc<RwLock<dyn RecipeStore + Send + Sync>>;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStoreType,
    pub recipe_store: RecipeStoreType,
}

impl AppState {
    pub fn new(user_store: UserStoreType, recipe_store: RecipeStoreType) -> Self {
        Self {
            user_store,
            recipe_store,
        }
    }
}
