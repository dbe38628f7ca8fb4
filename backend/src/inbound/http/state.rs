//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AttributesCommand, AttributesQuery, LoginService, MediaStore, RecipesCommand, RecipesQuery,
    UserAccounts,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccounts>,
    pub attributes: Arc<dyn AttributesCommand>,
    pub attributes_query: Arc<dyn AttributesQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub media: Arc<dyn MediaStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn UserAccounts>,
    pub attributes: Arc<dyn AttributesCommand>,
    pub attributes_query: Arc<dyn AttributesQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub media: Arc<dyn MediaStore>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureAttributesCommand, FixtureAttributesQuery, FixtureLoginService,
    ///     FixtureMediaStore, FixtureRecipesQuery,
    /// };
    /// use backend::domain::{RecipesService, UserAccountsService};
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let media = Arc::new(FixtureMediaStore);
    /// let recipes = RecipesService::new(store.clone(), store.clone(), media);
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     accounts: Arc::new(UserAccountsService::new(store)),
    ///     attributes: Arc::new(FixtureAttributesCommand),
    ///     attributes_query: Arc::new(FixtureAttributesQuery),
    ///     recipes: Arc::new(recipes),
    ///     recipes_query: Arc::new(FixtureRecipesQuery),
    ///     media: Arc::new(FixtureMediaStore),
    /// };
    /// let state = HttpState::new(ports);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            attributes,
            attributes_query,
            recipes,
            recipes_query,
            media,
        } = ports;
        Self {
            login,
            accounts,
            attributes,
            attributes_query,
            recipes,
            recipes_query,
            media,
        }
    }
}
