use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, stores, users};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

/// Payload for creating or replacing a store entry.
#[derive(Clone, Debug)]
pub struct StoreDraft {
    pub name: String,
    pub address: String,
    pub region: String,
    pub weekday_hours: Option<String>,
    pub saturday_hours: Option<String>,
    pub sunday_hours: Option<String>,
    pub map_link: Option<String>,
}

impl StoreDraft {
    fn normalized(self) -> ResultEngine<StoreDraft> {
        Ok(StoreDraft {
            name: normalize_required_text(&self.name, "store name")?,
            address: normalize_required_text(&self.address, "address")?,
            region: normalize_required_text(&self.region, "region")?,
            weekday_hours: normalize_optional_text(self.weekday_hours.as_deref()),
            saturday_hours: normalize_optional_text(self.saturday_hours.as_deref()),
            sunday_hours: normalize_optional_text(self.sunday_hours.as_deref()),
            map_link: normalize_optional_text(self.map_link.as_deref()),
        })
    }
}

impl Engine {
    /// Adds a store to the directory. Admin only.
    pub async fn create_store(
        &self,
        caller: &users::Model,
        draft: StoreDraft,
    ) -> ResultEngine<Uuid> {
        Self::require_admin(caller)?;
        let draft = draft.normalized()?;
        let id = Uuid::new_v4();

        with_tx!(self, |db_tx| {
            let store = stores::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                name: ActiveValue::Set(draft.name.clone()),
                address: ActiveValue::Set(draft.address.clone()),
                region: ActiveValue::Set(draft.region.clone()),
                weekday_hours: ActiveValue::Set(draft.weekday_hours.clone()),
                saturday_hours: ActiveValue::Set(draft.saturday_hours.clone()),
                sunday_hours: ActiveValue::Set(draft.sunday_hours.clone()),
                map_link: ActiveValue::Set(draft.map_link.clone()),
            };
            store.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Replaces every field of a store entry. Admin only.
    pub async fn update_store(
        &self,
        caller: &users::Model,
        store_id: Uuid,
        draft: StoreDraft,
    ) -> ResultEngine<()> {
        Self::require_admin(caller)?;
        let draft = draft.normalized()?;

        with_tx!(self, |db_tx| {
            let store = stores::Entity::find_by_id(store_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;

            let mut active: stores::ActiveModel = store.into();
            active.name = ActiveValue::Set(draft.name.clone());
            active.address = ActiveValue::Set(draft.address.clone());
            active.region = ActiveValue::Set(draft.region.clone());
            active.weekday_hours = ActiveValue::Set(draft.weekday_hours.clone());
            active.saturday_hours = ActiveValue::Set(draft.saturday_hours.clone());
            active.sunday_hours = ActiveValue::Set(draft.sunday_hours.clone());
            active.map_link = ActiveValue::Set(draft.map_link.clone());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Removes a store from the directory. Admin only.
    pub async fn delete_store(&self, caller: &users::Model, store_id: Uuid) -> ResultEngine<()> {
        Self::require_admin(caller)?;

        with_tx!(self, |db_tx| {
            let store = stores::Entity::find_by_id(store_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))?;

            let active: stores::ActiveModel = store.into();
            active.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Returns one store entry.
    pub async fn store(&self, store_id: Uuid) -> ResultEngine<stores::Model> {
        stores::Entity::find_by_id(store_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("store not exists".to_string()))
    }

    /// Lists the whole directory, ordered by name.
    pub async fn list_stores(&self) -> ResultEngine<Vec<stores::Model>> {
        stores::Entity::find()
            .order_by_asc(stores::Column::Name)
            .all(&self.database)
            .await
            .map_err(Into::into)
    }

    /// Case-insensitive substring search over name, address, and region.
    ///
    /// A blank query returns the whole directory.
    pub async fn search_stores(&self, query: &str) -> ResultEngine<Vec<stores::Model>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_stores().await;
        }

        stores::Entity::find()
            .filter(
                Condition::any()
                    .add(stores::Column::Name.contains(query))
                    .add(stores::Column::Address.contains(query))
                    .add(stores::Column::Region.contains(query)),
            )
            .order_by_asc(stores::Column::Name)
            .all(&self.database)
            .await
            .map_err(Into::into)
    }
}
