use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::models::driver::{Driver, DriverStatus, GeoPoint};
use crate::models::review::{Review, ReviewDraft};
use crate::store::events::StoreEvent;
use crate::store::{Store, new_id};

impl Store {
    pub fn update_driver_status(
        &mut self,
        driver_id: &str,
        status: DriverStatus,
    ) -> Result<Driver, AppError> {
        let driver = self
            .drivers
            .get_mut(driver_id)
            .ok_or_else(|| AppError::not_found("driver", driver_id))?;

        driver.status = status;

        let updated = driver.clone();
        self.emit(StoreEvent::DriverUpdated(updated.clone()));
        Ok(updated)
    }

    pub fn update_driver_location(
        &mut self,
        driver_id: &str,
        lat: f64,
        lng: f64,
    ) -> Result<Driver, AppError> {
        let driver = self
            .drivers
            .get_mut(driver_id)
            .ok_or_else(|| AppError::not_found("driver", driver_id))?;

        driver.current_location = GeoPoint { lat, lng };

        let updated = driver.clone();
        self.emit(StoreEvent::DriverUpdated(updated.clone()));
        Ok(updated)
    }

    /// Records a review and recomputes the driver's rating as the mean of all
    /// their reviews, rounded to one decimal.
    pub fn add_review(&mut self, draft: ReviewDraft) -> Result<Review, AppError> {
        if !self.drivers.contains(&draft.driver_id) {
            return Err(AppError::not_found("driver", &draft.driver_id));
        }

        let review = Review {
            id: new_id("review"),
            customer_id: draft.customer_id,
            driver_id: draft.driver_id,
            stop_id: draft.stop_id,
            rating: draft.rating,
            comment: draft.comment,
            created_at: Utc::now(),
        };
        self.reviews.insert(review.clone());

        let (sum, count) = self
            .reviews
            .iter()
            .filter(|r| r.driver_id == review.driver_id)
            .fold((0u32, 0u32), |(sum, count), r| (sum + u32::from(r.rating), count + 1));

        if let Some(driver) = self.drivers.get_mut(&review.driver_id) {
            driver.rating = round_one_decimal(f64::from(sum) / f64::from(count));
            driver.total_ratings = count;
            let driver = driver.clone();
            info!(driver_id = %driver.id, rating = driver.rating, total_ratings = driver.total_ratings, "driver rating updated");
            self.emit(StoreEvent::DriverUpdated(driver));
        }

        Ok(review)
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::round_one_decimal;
    use crate::error::AppError;
    use crate::models::driver::DriverStatus;
    use crate::models::review::ReviewDraft;
    use crate::store::Store;

    fn review(driver_id: &str, rating: u8) -> ReviewDraft {
        ReviewDraft {
            customer_id: "customer-5".to_string(),
            driver_id: driver_id.to_string(),
            stop_id: "stop-5".to_string(),
            rating,
            comment: None,
        }
    }

    #[test]
    fn one_star_after_five_and_three_drops_mean_to_three() {
        let mut store = Store::seeded();
        let existing: Vec<u8> = store
            .reviews_for_driver("driver-2")
            .iter()
            .map(|r| r.rating)
            .collect();
        assert_eq!(existing, vec![5, 3]);

        store.add_review(review("driver-2", 1)).unwrap();

        let driver = store.drivers().get("driver-2").unwrap();
        assert_eq!(driver.rating, 3.0);
        assert_eq!(driver.total_ratings, 3);
    }

    #[test]
    fn review_for_unknown_driver_is_not_recorded() {
        let mut store = Store::seeded();
        let before = store.reviews().len();

        let result = store.add_review(review("driver-404", 4));

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.reviews().len(), before);
    }

    #[test]
    fn rating_rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(4.0 / 3.0), 1.3);
        assert_eq!(round_one_decimal(14.0 / 3.0), 4.7);
    }

    #[test]
    fn status_and_location_updates_touch_only_their_field() {
        let mut store = Store::seeded();
        let before = store.drivers().get("driver-2").unwrap().clone();

        store
            .update_driver_status("driver-2", DriverStatus::EnRoute)
            .unwrap();
        let after = store
            .update_driver_location("driver-2", 37.8, -122.42)
            .unwrap();

        assert_eq!(after.status, DriverStatus::EnRoute);
        assert_eq!(after.current_location.lat, 37.8);
        assert_eq!(after.current_location.lng, -122.42);
        assert_eq!(after.completed_stops, before.completed_stops);
        assert_eq!(after.rating, before.rating);
    }

    #[test]
    fn unknown_driver_status_update_is_not_found() {
        let mut store = Store::seeded();
        assert!(matches!(
            store.update_driver_status("driver-404", DriverStatus::Offline),
            Err(AppError::NotFound(_))
        ));
    }
}
