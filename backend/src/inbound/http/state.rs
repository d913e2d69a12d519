//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`, so they depend
//! only on the driving ports and stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CollectionsCommand, CollectionsQuery, SnippetsCommand, SnippetsQuery, UsersCommand,
    UsersQuery,
};
use crate::domain::{CollectionsService, SnippetsService, UsersService};
use crate::outbound::persistence::MemoryStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_query: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub snippets_query: Arc<dyn SnippetsQuery>,
    pub snippets_command: Arc<dyn SnippetsCommand>,
    pub collections_query: Arc<dyn CollectionsQuery>,
    pub collections_command: Arc<dyn CollectionsCommand>,
}

impl HttpState {
    /// Wire every service over one shared [`MemoryStore`].
    pub fn with_memory_store(store: MemoryStore, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(store);
        let snippets = Arc::new(SnippetsService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        ));
        let collections = Arc::new(CollectionsService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        ));
        let users = Arc::new(UsersService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            clock,
        ));
        Self {
            users_query: Arc::clone(&users) as Arc<dyn UsersQuery>,
            users_command: users,
            snippets_query: Arc::clone(&snippets) as Arc<dyn SnippetsQuery>,
            snippets_command: snippets,
            collections_query: Arc::clone(&collections) as Arc<dyn CollectionsQuery>,
            collections_command: collections,
        }
    }
}
