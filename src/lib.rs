pub mod appresult;
pub mod index;
pub mod mock;
pub mod res;
pub mod rooms;
pub mod store;
pub mod token;
pub mod types;

use axum::extract::FromRef;

pub use appresult::{AppError, AppResult};
pub use store::LocalStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: LocalStore,
}
