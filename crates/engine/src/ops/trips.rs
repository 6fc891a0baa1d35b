use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    payout::{self, TripMetrics},
    trips, users,
};

use super::{Engine, normalize_required_text, with_tx};

/// Raw trip submission, before month and payout are derived.
#[derive(Clone, Debug)]
pub struct TripDraft {
    pub date: NaiveDate,
    pub vehicle: String,
    pub stops: f64,
    pub km: f64,
    pub loaded_pallets: f64,
    pub empty_crates: f64,
    pub returned_pallets: f64,
    pub weekend: bool,
}

impl Engine {
    fn validated_vehicle(&self, vehicle: &str) -> ResultEngine<String> {
        let vehicle = normalize_required_text(vehicle, "vehicle")?;
        if !self.fleet.is_empty() && !self.fleet.iter().any(|known| known == &vehicle) {
            return Err(EngineError::Validation(format!(
                "unknown vehicle: {vehicle}"
            )));
        }
        Ok(vehicle)
    }

    fn validated_metrics(draft: &TripDraft) -> ResultEngine<TripMetrics> {
        let metrics = TripMetrics {
            km: draft.km,
            stops: draft.stops,
            loaded_pallets: draft.loaded_pallets,
            empty_crates: draft.empty_crates,
            returned_pallets: draft.returned_pallets,
            weekend: draft.weekend,
        };

        let labelled = [
            ("km", metrics.km),
            ("stops", metrics.stops),
            ("loaded_pallets", metrics.loaded_pallets),
            ("empty_crates", metrics.empty_crates),
            ("returned_pallets", metrics.returned_pallets),
        ];
        for (label, value) in labelled {
            if !value.is_finite() {
                return Err(EngineError::Validation(format!(
                    "{label} must be a finite number"
                )));
            }
            if value < 0.0 {
                return Err(EngineError::Validation(format!(
                    "{label} must not be negative"
                )));
            }
        }
        Ok(metrics)
    }

    fn resolve_month(month: Option<&str>) -> ResultEngine<String> {
        let Some(month) = month else {
            return Ok(payout::month_key(Utc::now().date_naive()));
        };
        let month = normalize_required_text(month, "month")?;
        // Accept exactly `YYYY-MM`.
        if NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_err()
            || month.len() != 7
        {
            return Err(EngineError::Validation(format!(
                "invalid month scope: {month}"
            )));
        }
        Ok(month)
    }

    async fn find_trip(&self, trip_id: Uuid) -> ResultEngine<trips::Model> {
        trips::Entity::find_by_id(trip_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))
    }

    /// Creates a trip record for `user_id`.
    ///
    /// Month and payout are derived here and committed together with the raw
    /// fields, in one transaction.
    pub async fn create_trip(&self, user_id: &str, draft: TripDraft) -> ResultEngine<Uuid> {
        let vehicle = self.validated_vehicle(&draft.vehicle)?;
        let metrics = Self::validated_metrics(&draft)?;
        let id = Uuid::new_v4();

        with_tx!(self, |db_tx| {
            let owner_exists = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .is_some();
            if !owner_exists {
                return Err(EngineError::KeyNotFound("user not exists".to_string()));
            }

            let trip = trips::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                date: ActiveValue::Set(draft.date),
                vehicle: ActiveValue::Set(vehicle.clone()),
                stops: ActiveValue::Set(metrics.stops),
                km: ActiveValue::Set(metrics.km),
                loaded_pallets: ActiveValue::Set(metrics.loaded_pallets),
                empty_crates: ActiveValue::Set(metrics.empty_crates),
                returned_pallets: ActiveValue::Set(metrics.returned_pallets),
                weekend: ActiveValue::Set(metrics.weekend),
                month: ActiveValue::Set(payout::month_key(draft.date)),
                payout: ActiveValue::Set(metrics.payout()),
            };
            trip.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Replaces every raw field of a trip and re-derives month and payout.
    ///
    /// Owner only.
    pub async fn update_trip(
        &self,
        caller: &users::Model,
        trip_id: Uuid,
        draft: TripDraft,
    ) -> ResultEngine<()> {
        let vehicle = self.validated_vehicle(&draft.vehicle)?;
        let metrics = Self::validated_metrics(&draft)?;

        with_tx!(self, |db_tx| {
            let trip = trips::Entity::find_by_id(trip_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
            if trip.user_id != caller.id {
                return Err(EngineError::Forbidden(
                    "trip belongs to another user".to_string(),
                ));
            }

            let mut active: trips::ActiveModel = trip.into();
            active.date = ActiveValue::Set(draft.date);
            active.vehicle = ActiveValue::Set(vehicle.clone());
            active.stops = ActiveValue::Set(metrics.stops);
            active.km = ActiveValue::Set(metrics.km);
            active.loaded_pallets = ActiveValue::Set(metrics.loaded_pallets);
            active.empty_crates = ActiveValue::Set(metrics.empty_crates);
            active.returned_pallets = ActiveValue::Set(metrics.returned_pallets);
            active.weekend = ActiveValue::Set(metrics.weekend);
            active.month = ActiveValue::Set(payout::month_key(draft.date));
            active.payout = ActiveValue::Set(metrics.payout());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a trip. Owner or admin; there is no recovery.
    pub async fn delete_trip(&self, caller: &users::Model, trip_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let trip = trips::Entity::find_by_id(trip_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
            if trip.user_id != caller.id && !caller.is_admin {
                return Err(EngineError::Forbidden(
                    "trip belongs to another user".to_string(),
                ));
            }

            let active: trips::ActiveModel = trip.into();
            active.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Returns one trip record. Owner or admin.
    pub async fn trip(&self, caller: &users::Model, trip_id: Uuid) -> ResultEngine<trips::Model> {
        let trip = self.find_trip(trip_id).await?;
        if trip.user_id != caller.id && !caller.is_admin {
            return Err(EngineError::Forbidden(
                "trip belongs to another user".to_string(),
            ));
        }
        Ok(trip)
    }

    /// Lists the caller's trips in a month scope, primary-key order.
    ///
    /// `month` defaults to the current calendar month. Returns the resolved
    /// month together with the records.
    pub async fn list_trips(
        &self,
        user_id: &str,
        month: Option<&str>,
    ) -> ResultEngine<(String, Vec<trips::Model>)> {
        let month = Self::resolve_month(month)?;
        let records = trips::Entity::find()
            .filter(trips::Column::UserId.eq(user_id.to_string()))
            .filter(trips::Column::Month.eq(month.clone()))
            .order_by_asc(trips::Column::Id)
            .all(&self.database)
            .await?;
        Ok((month, records))
    }
}
