//! Tag and ingredient services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AttributeRepository, AttributeRepositoryError, AttributesCommand, AttributesQuery,
};
use crate::domain::{
    Attribute, AttributeId, AttributeKind, AttributeName, Error, UserId, sort_for_listing,
};

/// Owner-scoped attribute service implementing both attribute ports.
#[derive(Clone)]
pub struct AttributesService<A> {
    attributes: Arc<A>,
}

impl<A> AttributesService<A> {
    pub fn new(attributes: Arc<A>) -> Self {
        Self { attributes }
    }
}

/// Translate attribute adapter failures into domain errors.
pub(crate) fn map_attribute_error(error: AttributeRepositoryError) -> Error {
    match error {
        AttributeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("attribute repository unavailable: {message}"))
        }
        AttributeRepositoryError::Query { message } => {
            Error::internal(format!("attribute repository error: {message}"))
        }
    }
}

fn not_found(kind: AttributeKind) -> Error {
    Error::not_found(format!("{kind} not found"))
}

#[async_trait]
impl<A> AttributesQuery for AttributesService<A>
where
    A: AttributeRepository,
{
    async fn list(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, Error> {
        let mut attributes = self
            .attributes
            .list(kind, owner, assigned_only)
            .await
            .map_err(map_attribute_error)?;
        sort_for_listing(&mut attributes);
        Ok(attributes)
    }
}

#[async_trait]
impl<A> AttributesCommand for AttributesService<A>
where
    A: AttributeRepository,
{
    async fn create(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        name: AttributeName,
    ) -> Result<Attribute, Error> {
        let attribute = self
            .attributes
            .create(kind, owner, &name)
            .await
            .map_err(map_attribute_error)?;
        info!(%owner, %kind, id = %attribute.id, "attribute created");
        Ok(attribute)
    }

    async fn update(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
        name: AttributeName,
    ) -> Result<Attribute, Error> {
        let attribute = self
            .attributes
            .rename(kind, owner, id, &name)
            .await
            .map_err(map_attribute_error)?
            .ok_or_else(|| not_found(kind))?;
        info!(%owner, %kind, %id, "attribute renamed");
        Ok(attribute)
    }

    async fn delete(
        &self,
        kind: AttributeKind,
        owner: &UserId,
        id: AttributeId,
    ) -> Result<(), Error> {
        let deleted = self
            .attributes
            .delete(kind, owner, id)
            .await
            .map_err(map_attribute_error)?;
        if !deleted {
            return Err(not_found(kind));
        }
        info!(%owner, %kind, %id, "attribute deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockAttributeRepository;
    use rstest::rstest;

    fn service(repo: MockAttributeRepository) -> AttributesService<MockAttributeRepository> {
        AttributesService::new(Arc::new(repo))
    }

    fn attribute(id: i64, name: &str, owner: UserId) -> Attribute {
        Attribute {
            id: AttributeId::new(id),
            kind: AttributeKind::Tag,
            name: AttributeName::new(name).expect("name"),
            owner,
        }
    }

    #[tokio::test]
    async fn list_sorts_by_name_descending() {
        let owner = UserId::random();
        let rows = vec![
            attribute(1, "Dessert", owner),
            attribute(2, "Vegan", owner),
        ];
        let mut repo = MockAttributeRepository::new();
        repo.expect_list()
            .withf(move |kind, scope, assigned| {
                *kind == AttributeKind::Tag && *scope == owner && !*assigned
            })
            .times(1)
            .return_once(move |_, _, _| Ok(rows));

        let listed = service(repo)
            .list(AttributeKind::Tag, &owner, false)
            .await
            .expect("list");

        let names: Vec<_> = listed.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Vegan", "Dessert"]);
    }

    #[tokio::test]
    async fn create_stamps_the_caller_as_owner() {
        let owner = UserId::random();
        let mut repo = MockAttributeRepository::new();
        repo.expect_create()
            .withf(move |_, scope, name| *scope == owner && name.as_ref() == "Cabbage")
            .times(1)
            .return_once(move |kind, scope, name| {
                Ok(Attribute {
                    id: AttributeId::new(9),
                    kind,
                    name: name.clone(),
                    owner: *scope,
                })
            });

        let created = service(repo)
            .create(
                AttributeKind::Ingredient,
                &owner,
                AttributeName::new("Cabbage").expect("name"),
            )
            .await
            .expect("created");

        assert_eq!(created.owner, owner);
        assert_eq!(created.kind, AttributeKind::Ingredient);
    }

    #[rstest]
    #[case(AttributeKind::Tag, "tag not found")]
    #[case(AttributeKind::Ingredient, "ingredient not found")]
    #[tokio::test]
    async fn deleting_outside_scope_is_not_found(
        #[case] kind: AttributeKind,
        #[case] message: &str,
    ) {
        let mut repo = MockAttributeRepository::new();
        repo.expect_delete().return_once(|_, _, _| Ok(false));

        let err = service(repo)
            .delete(kind, &UserId::random(), AttributeId::new(1))
            .await
            .expect_err("not found");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn rename_outside_scope_is_not_found() {
        let mut repo = MockAttributeRepository::new();
        repo.expect_rename().return_once(|_, _, _, _| Ok(None));

        let err = service(repo)
            .update(
                AttributeKind::Tag,
                &UserId::random(),
                AttributeId::new(4),
                AttributeName::new("Brunch").expect("name"),
            )
            .await
            .expect_err("not found");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn query_failures_are_internal() {
        let mut repo = MockAttributeRepository::new();
        repo.expect_list()
            .return_once(|_, _, _| Err(AttributeRepositoryError::query("boom")));

        let err = service(repo)
            .list(AttributeKind::Tag, &UserId::random(), true)
            .await
            .expect_err("internal");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
