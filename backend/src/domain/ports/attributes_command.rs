//! Driving port for tag and ingredient writes.

use async_trait::async_trait;

use crate::domain::{Attribute, AttributeId, AttributeKind, AttributeName, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributesCommand: Send + Sync {
    /// Create an attribute owned by `owner`.
    async fn create(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        name: AttributeName,
    ) -> Result<Attribute, Error>;

    /// Rename an attribute in the owner's scope.
    async fn update(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
        name: AttributeName,
    ) -> Result<Attribute, Error>;

    /// Delete an attribute in the owner's scope, detaching it from recipes.
    async fn delete(&self, kind: AttributeKind, owner: &UserId, id: AttributeId)
    -> Result<(), Error>;
}

/// Command that echoes creates and reports every existing id as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAttributesCommand;

#[async_trait]
impl AttributesCommand for FixtureAttributesCommand {
    async fn create(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        name: AttributeName,
    ) -> Result<Attribute, Error> {
        Ok(Attribute {
            id: AttributeId::new(1),
            kind,
            name,
            owner: *owner,
        })
    }

    async fn update(
        &self,
        kind: AttributeKind,
        _owner: &UserId,
        _id: AttributeId,
        _name: AttributeName,
    ) -> Result<Attribute, Error> {
        Err(Error::not_found(format!("{kind} not found")))
    }

    async fn delete(
        &self,
        kind: AttributeKind,
        _owner: &UserId,
        _id: AttributeId,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!("{kind} not found")))
    }
}
