//! Financial reporting collaborator contract

use async_trait::async_trait;
use serde::Serialize;

use crate::{error::AppResult, models::booking::Booking};

/// Outcome of handing one booking's financial deltas to the reporting side.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialOutcome {
    pub success: bool,
    pub report_id: Option<String>,
    pub error: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinancialReporting: Send + Sync {
    /// Feed a booking's revenue into periodic reporting, scoped to the
    /// matched owner when one is known. The lifetime on `owner_id` is
    /// named so the generated mock can refer to it.
    async fn process_booking_financials<'a>(
        &self,
        booking: &Booking,
        owner_id: Option<&'a str>,
    ) -> AppResult<FinancialOutcome>;
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::booking::IncomingBooking;

    #[tokio::test]
    async fn mock_passes_owner_scope_through() {
        let mut financial = MockFinancialReporting::new();
        financial
            .expect_process_booking_financials()
            .returning(|_, owner_id| {
                Ok(FinancialOutcome {
                    success: true,
                    report_id: owner_id.map(|id| format!("report_{}", id)),
                    error: None,
                })
            });

        let booking = Booking::from_incoming(
            IncomingBooking {
                guest_name: "A. Smith".to_string(),
                guest_email: "guest@example.com".to_string(),
                property_name: "Sunset Villa".to_string(),
                check_in: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                check_out: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                price: 2000.0,
                currency: "EUR".to_string(),
                source: "airbnb".to_string(),
                special_requests: None,
            },
            "hash".to_string(),
        );

        let outcome = financial
            .process_booking_financials(&booking, Some("owner_1"))
            .await
            .unwrap();
        assert_eq!(outcome.report_id.as_deref(), Some("report_owner_1"));

        let unscoped = financial
            .process_booking_financials(&booking, None)
            .await
            .unwrap();
        assert!(unscoped.report_id.is_none());
    }
}
