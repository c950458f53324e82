use chrono::Local;
use serde_json::json;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::message::MessageDraft;
use crate::models::notification::{NotificationDraft, NotificationType};
use crate::models::route::{Stop, StopDraft, StopStatus};
use crate::store::events::StoreEvent;
use crate::store::{Store, new_id};

impl Store {
    /// Schedules a new stop on an existing route, then tells the customer and
    /// the route's driver about it.
    pub fn add_stop(&mut self, draft: StopDraft) -> Result<Stop, AppError> {
        let driver_id = self
            .routes
            .get(&draft.route_id)
            .map(|route| route.driver_id.clone())
            .ok_or_else(|| AppError::not_found("route", &draft.route_id))?;

        let stop = draft.into_stop(new_id("stop"));

        if let Some(route) = self.routes.get_mut(&stop.route_id) {
            route.stop_ids.push(stop.id.clone());
        }
        self.stops.insert(stop.clone());
        self.emit(StoreEvent::StopUpdated(stop.clone()));

        if self.customers.contains(&stop.customer_id) {
            self.add_notification(NotificationDraft {
                user_id: stop.customer_id.clone(),
                kind: NotificationType::RouteChange,
                title: "New Pickup Added".to_string(),
                message: "A new pickup has been scheduled at your address".to_string(),
                data: None,
            });
        } else {
            warn!(stop_id = %stop.id, customer_id = %stop.customer_id, "stop added for unknown customer");
        }

        self.send_message(MessageDraft::from_dispatch_to_driver(
            &driver_id,
            format!("New stop added to your route: {}", stop.address),
        ));

        info!(stop_id = %stop.id, route_id = %stop.route_id, "stop added");
        Ok(stop)
    }

    /// Drops a stop from the stop table and from its route, then tells the
    /// route's driver.
    pub fn remove_stop(&mut self, stop_id: &str) -> Result<Stop, AppError> {
        let stop = self
            .stops
            .remove(stop_id)
            .ok_or_else(|| AppError::not_found("stop", stop_id))?;

        let driver_id = match self.routes.get_mut(&stop.route_id) {
            Some(route) => {
                route.stop_ids.retain(|id| id != stop_id);
                Some(route.driver_id.clone())
            }
            None => None,
        };

        self.emit(StoreEvent::StopRemoved(stop.clone()));

        if let Some(driver_id) = driver_id {
            self.send_message(MessageDraft::from_dispatch_to_driver(
                &driver_id,
                format!("Stop removed from your route: {}", stop.address),
            ));
        }

        info!(stop_id = %stop.id, route_id = %stop.route_id, "stop removed");
        Ok(stop)
    }

    /// Sets the status; a non-empty `notes` replaces the issue note, otherwise
    /// the previous note stays.
    pub fn update_stop_status(
        &mut self,
        stop_id: &str,
        status: StopStatus,
        notes: Option<String>,
    ) -> Result<Stop, AppError> {
        let stop = self
            .stops
            .get_mut(stop_id)
            .ok_or_else(|| AppError::not_found("stop", stop_id))?;

        stop.status = status;
        if let Some(note) = notes.filter(|note| !note.is_empty()) {
            stop.issue_note = Some(note);
        }

        let updated = stop.clone();
        self.emit(StoreEvent::StopUpdated(updated.clone()));
        Ok(updated)
    }

    /// Marks the pickup done, credits the route's driver and offers the
    /// customer a review.
    ///
    /// A stop that is already completed is refused with `Conflict` so the
    /// driver's `completed_stops` is never counted twice.
    pub fn complete_stop(
        &mut self,
        stop_id: &str,
        photo_url: Option<String>,
    ) -> Result<Stop, AppError> {
        let stop = self
            .stops
            .get_mut(stop_id)
            .ok_or_else(|| AppError::not_found("stop", stop_id))?;

        if stop.status == StopStatus::Completed {
            return Err(AppError::Conflict(format!("stop {stop_id} already completed")));
        }

        stop.status = StopStatus::Completed;
        stop.actual_time = Some(Local::now().format("%H:%M").to_string());
        stop.photo_url = photo_url;
        let completed = stop.clone();
        self.emit(StoreEvent::StopUpdated(completed.clone()));

        let driver_id = self
            .routes
            .get(&completed.route_id)
            .map(|route| route.driver_id.clone());
        match driver_id.as_deref().and_then(|id| self.drivers.get_mut(id)) {
            Some(driver) => {
                driver.completed_stops += 1;
                let driver = driver.clone();
                self.emit(StoreEvent::DriverUpdated(driver));
            }
            None => {
                warn!(stop_id = %completed.id, route_id = %completed.route_id, "completed stop has no driver to credit");
            }
        }

        self.add_notification(NotificationDraft {
            user_id: completed.customer_id.clone(),
            kind: NotificationType::Completed,
            title: "Pickup Completed".to_string(),
            message: format!(
                "Your waste pickup at {} has been completed",
                completed.address
            ),
            data: Some(json!({ "stopId": completed.id, "canReview": true })),
        });

        info!(stop_id = %completed.id, "stop completed");
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::models::customer::ServiceType;
    use crate::models::driver::GeoPoint;
    use crate::models::message::Party;
    use crate::models::notification::NotificationType;
    use crate::models::route::{StopDraft, StopStatus};
    use crate::store::Store;

    fn draft(route_id: &str, customer_id: &str) -> StopDraft {
        StopDraft {
            route_id: route_id.to_string(),
            customer_id: customer_id.to_string(),
            address: "77 Harbor Lane".to_string(),
            coordinates: GeoPoint {
                lat: 37.79,
                lng: -122.41,
            },
            scheduled_time: "11:30".to_string(),
            status: StopStatus::Pending,
            service_type: ServiceType::Residential,
            notes: None,
            bin_location: Some("Side gate".to_string()),
            access_code: None,
            sequence: 9,
        }
    }

    #[test]
    fn added_stop_is_stored_once_and_listed_once_on_its_route() {
        let mut store = Store::seeded();

        let stop = store.add_stop(draft("route-1", "customer-1")).unwrap();

        let in_table: Vec<_> = store.stops().iter().filter(|s| s.id == stop.id).collect();
        assert_eq!(in_table, vec![&stop]);

        let route = store.routes().get("route-1").unwrap();
        let listed = route.stop_ids.iter().filter(|id| **id == stop.id).count();
        assert_eq!(listed, 1);

        let joined = store.stops_for_route("route-1");
        assert_eq!(joined.last(), Some(&&stop));
    }

    #[test]
    fn adding_a_stop_notifies_customer_and_messages_driver() {
        let mut store = Store::seeded();

        let stop = store.add_stop(draft("route-1", "customer-1")).unwrap();

        let notification = store.notifications().iter().last().unwrap();
        assert_eq!(notification.user_id, "customer-1");
        assert_eq!(notification.kind, NotificationType::RouteChange);
        assert!(!notification.read);

        let message = store.messages().iter().last().unwrap();
        assert_eq!(message.sender_type, Party::Dispatch);
        assert_eq!(message.receiver_id, "driver-1");
        assert_eq!(
            message.content,
            format!("New stop added to your route: {}", stop.address)
        );
    }

    #[test]
    fn adding_to_unknown_route_creates_nothing() {
        let mut store = Store::seeded();
        let stops_before = store.stops().clone();
        let messages_before = store.messages().len();

        let result = store.add_stop(draft("route-404", "customer-1"));

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.stops(), &stops_before);
        assert_eq!(store.messages().len(), messages_before);
    }

    #[test]
    fn add_then_remove_restores_stops_and_routes() {
        let mut store = Store::seeded();
        let stops_before = store.stops().clone();
        let routes_before = store.routes().clone();

        let stop = store.add_stop(draft("route-2", "customer-3")).unwrap();
        store.remove_stop(&stop.id).unwrap();

        assert_eq!(store.stops(), &stops_before);
        assert_eq!(store.routes(), &routes_before);

        let message = store.messages().iter().last().unwrap();
        assert_eq!(
            message.content,
            "Stop removed from your route: 77 Harbor Lane"
        );
    }

    #[test]
    fn removing_unknown_stop_is_not_found() {
        let mut store = Store::seeded();
        assert!(matches!(
            store.remove_stop("stop-404"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn status_update_keeps_previous_note_when_none_given() {
        let mut store = Store::seeded();

        store
            .update_stop_status("stop-2", StopStatus::Problematic, Some("Gate locked".to_string()))
            .unwrap();
        let stop = store
            .update_stop_status("stop-2", StopStatus::Skipped, Some(String::new()))
            .unwrap();

        assert_eq!(stop.status, StopStatus::Skipped);
        assert_eq!(stop.issue_note.as_deref(), Some("Gate locked"));
        assert_eq!(store.stops().get("stop-2"), Some(&stop));
    }

    #[test]
    fn completing_stamps_time_credits_driver_and_offers_review() {
        let mut store = Store::seeded();
        let before = store.drivers().get("driver-1").unwrap().completed_stops;

        let stop = store
            .complete_stop("stop-3", Some("photo://bin".to_string()))
            .unwrap();

        assert_eq!(stop.status, StopStatus::Completed);
        assert_eq!(stop.photo_url.as_deref(), Some("photo://bin"));
        let time = stop.actual_time.as_deref().unwrap();
        assert_eq!(time.len(), 5);
        assert_eq!(&time[2..3], ":");

        let after = store.drivers().get("driver-1").unwrap().completed_stops;
        assert_eq!(after, before + 1);

        let notification = store.notifications().iter().last().unwrap();
        assert_eq!(notification.kind, NotificationType::Completed);
        assert_eq!(notification.user_id, stop.customer_id);
        let data = notification.data.as_ref().unwrap();
        assert_eq!(data["canReview"], true);
        assert_eq!(data["stopId"], "stop-3");
    }

    #[test]
    fn completing_twice_counts_the_driver_once() {
        let mut store = Store::seeded();
        let before = store.drivers().get("driver-1").unwrap().completed_stops;

        store.complete_stop("stop-3", None).unwrap();
        let second = store.complete_stop("stop-3", None);

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(
            store.stops().get("stop-3").unwrap().status,
            StopStatus::Completed
        );
        assert_eq!(
            store.drivers().get("driver-1").unwrap().completed_stops,
            before + 1
        );
    }
}
