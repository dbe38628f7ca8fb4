//! Port for tag and ingredient persistence.
//!
//! Every call carries the owner scope; adapters never return rows owned by
//! another user.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Attribute, AttributeId, AttributeKind, AttributeName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attribute repository adapters.
    pub enum AttributeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "attribute repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "attribute repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// Attributes of `kind` owned by `owner`.
    ///
    /// With `assigned_only`, only attributes attached to at least one of the
    /// owner's recipes are returned. Ordering is left to the caller.
    async fn list(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError>;

    /// The subset of `ids` that exist and belong to `owner`.
    async fn find_many(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        ids: &BTreeSet<AttributeId>,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError>;

    /// Insert a new attribute and return it with its assigned id.
    async fn create(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Attribute, AttributeRepositoryError>;

    /// Rename an attribute. Returns `None` when it is not in the owner's scope.
    async fn rename(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
        name: &AttributeName,
    ) -> Result<Option<Attribute>, AttributeRepositoryError>;

    /// Delete an attribute together with its recipe associations.
    ///
    /// Returns `Ok(false)` when nothing in the owner's scope matched.
    async fn delete(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
    ) -> Result<bool, AttributeRepositoryError>;
}
