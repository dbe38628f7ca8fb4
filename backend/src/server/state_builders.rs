//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use backend::domain::ports::{AttributeRepository, RecipeRepository, UserRepository};
use backend::domain::{AttributesService, RecipesService, UserAccountsService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::media::DirMediaStore;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{
    DieselAttributeRepository, DieselRecipeRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wrap the three repositories in domain services and expose them as ports.
fn assemble_ports<U, A, R>(
    users: Arc<U>,
    attributes: Arc<A>,
    recipes: Arc<R>,
    media: Arc<DirMediaStore>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    A: AttributeRepository + 'static,
    R: RecipeRepository + 'static,
{
    let accounts = Arc::new(UserAccountsService::new(users));
    let attribute_service = Arc::new(AttributesService::new(attributes.clone()));
    let recipe_service = Arc::new(RecipesService::new(recipes, attributes, media.clone()));

    HttpStatePorts {
        login: accounts.clone(),
        accounts,
        attributes: attribute_service.clone(),
        attributes_query: attribute_service,
        recipes: recipe_service.clone(),
        recipes_query: recipe_service,
        media,
    }
}

/// Build the HTTP state for the configured storage backend.
///
/// With a database pool every repository is Diesel-backed; otherwise one
/// [`InMemoryStore`] serves users, attributes and recipes alike. Uploaded
/// images always go to the media directory.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the media directory cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let media = Arc::new(DirMediaStore::open(&config.media_root)?);

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            assemble_ports(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselAttributeRepository::new(pool.clone())),
                Arc::new(DieselRecipeRepository::new(pool.clone())),
                media,
            )
        }
        None => {
            info!("no database configured; data is kept in memory");
            let store = Arc::new(InMemoryStore::default());
            assemble_ports(store.clone(), store.clone(), store, media)
        }
    };

    Ok(web::Data::new(HttpState::new(ports)))
}
