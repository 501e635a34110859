use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{spotify, types::AuthOutcome};

pub async fn auth(shared_state: Arc<Mutex<Option<AuthOutcome>>>) {
    let store = Arc::new(super::open_store().await);
    spotify::auth::authorize(store, shared_state).await;
}
