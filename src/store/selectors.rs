//! Read-only projections. Nothing here is cached; every call filters the
//! current collections.

use crate::models::chat::ChatThread;
use crate::models::customer::Customer;
use crate::models::driver::Driver;
use crate::models::message::Message;
use crate::models::notification::Notification;
use crate::models::review::Review;
use crate::models::route::{Route, Stop};
use crate::store::Store;

impl Store {
    pub fn current_driver(&self) -> Option<&Driver> {
        self.current_driver_id
            .as_deref()
            .and_then(|id| self.drivers.get(id))
    }

    pub fn current_customer(&self) -> Option<&Customer> {
        self.current_customer_id
            .as_deref()
            .and_then(|id| self.customers.get(id))
    }

    pub fn routes_for_driver(&self, driver_id: &str) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|route| route.driver_id == driver_id)
            .collect()
    }

    pub fn notifications_for_customer(&self, customer_id: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|notification| notification.user_id == customer_id)
            .collect()
    }

    /// Messages the driver sent or received.
    pub fn messages_for_driver(&self, driver_id: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|message| message.involves(driver_id))
            .collect()
    }

    pub fn reviews_for_driver(&self, driver_id: &str) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|review| review.driver_id == driver_id)
            .collect()
    }

    /// The route's stops in visiting order: by `sequence`, ties in the order
    /// they joined the route. Unknown routes have no stops.
    pub fn stops_for_route(&self, route_id: &str) -> Vec<&Stop> {
        let Some(route) = self.routes.get(route_id) else {
            return Vec::new();
        };
        let mut stops: Vec<&Stop> = route
            .stop_ids
            .iter()
            .filter_map(|id| self.stops.get(id))
            .collect();
        stops.sort_by_key(|stop| stop.sequence);
        stops
    }

    pub fn chat_thread_for_customer(&self, customer_id: &str) -> Option<&ChatThread> {
        self.chat_threads
            .iter()
            .find(|thread| thread.customer_id == customer_id)
    }
}
