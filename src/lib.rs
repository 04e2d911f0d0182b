use std::sync::Arc;

use config::Config;
use deck::DeckWorker;
use session::SessionStore;
use store::Stores;

pub mod catalog;
pub mod config;
pub mod deck;
pub mod error;
pub mod middleware;
pub mod session;
pub mod store;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stores: Arc<Stores>,
    pub sessions: SessionStore,
    pub deck_worker: Arc<DeckWorker>,
}
