//! Driving port for tag and ingredient listings.

use async_trait::async_trait;

use crate::domain::{Attribute, AttributeKind, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributesQuery: Send + Sync {
    /// Attributes owned by `owner`, name descending.
    async fn list(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, Error>;
}

/// Query that always returns an empty listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttributesQuery;

#[async_trait]
impl AttributesQuery for FixtureAttributesQuery {
    async fn list(
        &self,
        _kind: AttributeKind,
        _owner: &UserId,
        _assigned_only: bool,
    ) -> Result<Vec<Attribute>, Error> {
        Ok(Vec::new())
    }
}
