//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`], [`UserAccounts`])
//! are called by inbound adapters. Driven ports (`*Repository`,
//! [`MediaStore`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod attribute_repository;
mod attributes_command;
mod attributes_query;
mod login_service;
mod media_store;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use attribute_repository::MockAttributeRepository;
pub use attribute_repository::{AttributeRepository, AttributeRepositoryError};
#[cfg(test)]
pub use attributes_command::MockAttributesCommand;
pub use attributes_command::{AttributesCommand, FixtureAttributesCommand};
#[cfg(test)]
pub use attributes_query::MockAttributesQuery;
pub use attributes_query::{AttributesQuery, FixtureAttributesQuery};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_USER_ID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{FixtureMediaStore, MediaStore, MediaStoreError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
pub use recipes_command::{RecipeImage, RecipesCommand};
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
pub use recipes_query::{FixtureRecipesQuery, RecipesQuery};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{RegisterUserRequest, UserAccounts};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
