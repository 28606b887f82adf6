//! Bookings repository

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::booking::Booking,
};

use super::{DocumentStore, QueryFilter};

const COLLECTION: &str = "bookings";

#[derive(Clone)]
pub struct BookingsRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookingsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a new booking document.
    pub async fn create(&self, booking: &Booking) -> AppResult<()> {
        let document = serde_json::to_value(booking)?;
        self.store.create(COLLECTION, &booking.id, document).await
    }

    /// Get a booking by id.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Booking> {
        let document = self
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;
        Ok(serde_json::from_value(document)?)
    }

    /// Find an existing booking by its duplicate-check hash.
    pub async fn find_by_hash(&self, hash: &str) -> AppResult<Option<Booking>> {
        let hits = self
            .store
            .query(
                COLLECTION,
                &QueryFilter::new().field("duplicate_check_hash", hash),
            )
            .await?;
        hits.into_iter()
            .next()
            .map(|document| serde_json::from_value(document).map_err(AppError::from))
            .transpose()
    }

    /// Replace the stored booking with its current state.
    pub async fn save(&self, booking: &Booking) -> AppResult<()> {
        let document = serde_json::to_value(booking)?;
        self.store.update(COLLECTION, &booking.id, document).await
    }

    /// All bookings that overlap `[check_in, check_out)` for a property name,
    /// excluding `exclude_id`. Used by conflict detection.
    pub async fn find_overlapping(
        &self,
        property_name: &str,
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
        exclude_id: &str,
    ) -> AppResult<Vec<Booking>> {
        let hits = self
            .store
            .query(
                COLLECTION,
                &QueryFilter::new().field("property_name", property_name),
            )
            .await?;
        let mut overlapping = Vec::new();
        for document in hits {
            let booking: Booking = serde_json::from_value(document)?;
            if booking.id != exclude_id
                && booking.check_in < check_out
                && check_in < booking.check_out
            {
                overlapping.push(booking);
            }
        }
        Ok(overlapping)
    }
}
