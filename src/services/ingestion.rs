//! Dedup and ingestion service
//!
//! Turns raw third-party booking payloads into persisted booking documents.
//! Re-delivery of the same logical event is recognised through a content
//! hash and answered with the existing record instead of a second write.

use std::time::Duration;

use validator::Validate;

use crate::{
    config::IngestionConfig,
    error::{AppError, AppResult},
    models::booking::{Booking, IncomingBooking, IngestReceipt},
    repository::bookings::BookingsRepository,
};

#[derive(Clone)]
pub struct IngestionService {
    bookings: BookingsRepository,
    config: IngestionConfig,
}

impl IngestionService {
    pub fn new(bookings: BookingsRepository, config: IngestionConfig) -> Self {
        Self { bookings, config }
    }

    /// Ingest one booking payload.
    ///
    /// Validates the payload, computes the dedup hash and short-circuits with
    /// the existing record when one carries the same hash. Otherwise writes a
    /// single new document, retrying transient store failures with
    /// exponential backoff up to the configured attempt budget.
    ///
    /// The duplicate check is a read-then-write sequence, not an atomic
    /// upsert: two concurrent deliveries of the same event can both pass the
    /// check and land twice. Callers needing strict dedup must back the
    /// store's `create` with a uniqueness constraint.
    pub async fn create_booking(&self, incoming: IncomingBooking) -> AppResult<IngestReceipt> {
        incoming.validate()?;

        let hash = Self::dedup_hash(&incoming);
        if let Some(existing) = self.bookings.find_by_hash(&hash).await? {
            tracing::info!(
                booking_id = %existing.id,
                hash = %hash,
                "Duplicate booking event, returning existing record"
            );
            return Ok(IngestReceipt {
                booking_id: existing.id,
                is_duplicate: true,
                retry_count: 0,
            });
        }

        let booking = Booking::from_incoming(incoming, hash);
        let mut failed_attempts = 0u32;
        loop {
            match self.bookings.create(&booking).await {
                Ok(()) => {
                    tracing::info!(
                        booking_id = %booking.id,
                        retries = failed_attempts,
                        "Booking persisted"
                    );
                    return Ok(IngestReceipt {
                        booking_id: booking.id.clone(),
                        is_duplicate: false,
                        retry_count: failed_attempts,
                    });
                }
                Err(err) => {
                    failed_attempts += 1;
                    if failed_attempts >= self.config.max_write_attempts {
                        return Err(AppError::StorageExhausted {
                            attempts: failed_attempts,
                            message: err.to_string(),
                        });
                    }
                    let delay = Duration::from_millis(
                        self.config.retry_base_delay_ms << failed_attempts,
                    );
                    tracing::warn!(
                        booking_id = %booking.id,
                        attempt = failed_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Booking write failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Content-addressing key over the fields that identify a logical
    /// booking event. Guest and property names are lower-cased and trimmed so
    /// cosmetic differences between deliveries do not defeat deduplication.
    /// Not a cryptographic hash.
    pub fn dedup_hash(incoming: &IncomingBooking) -> String {
        let canonical = serde_json::json!({
            "guest_name": incoming.guest_name.trim().to_lowercase(),
            "property_name": incoming.property_name.trim().to_lowercase(),
            "check_in": incoming.check_in.to_string(),
            "check_out": incoming.check_out.to_string(),
            "price": incoming.price,
        })
        .to_string();

        let mut hash: i32 = 0;
        for ch in canonical.chars() {
            hash = hash.wrapping_mul(31).wrapping_add(ch as i32);
        }
        base36(hash.unsigned_abs())
    }
}

fn base36(mut value: u32) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.iter().rev().collect()
}
