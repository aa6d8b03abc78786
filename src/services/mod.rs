// Lokal Jobs services
// Stateless functionality: the feed client, bookmark reconciliation and settings.

pub mod feed_client;
pub mod reconcile;
pub mod settings_engine;
