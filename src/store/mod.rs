//! The shared domain store.
//!
//! One [`Store`] holds every collection the customer app, the driver app and
//! the dispatch console work against, plus the two "acting as" pointers. All
//! mutations go through the methods in the submodules; each one either applies
//! completely or returns an error without touching anything.

pub mod chat;
pub mod drivers;
pub mod events;
pub mod inbox;
pub mod routes;
pub mod selectors;
pub mod stops;
pub mod table;
pub mod views;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::alert::Alert;
use crate::models::chat::ChatThread;
use crate::models::customer::Customer;
use crate::models::driver::Driver;
use crate::models::message::Message;
use crate::models::notification::Notification;
use crate::models::review::Review;
use crate::models::route::{Route, Stop};
use crate::seed;
use crate::store::events::StoreEvent;
use crate::store::table::Table;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    drivers: Table<Driver>,
    customers: Table<Customer>,
    routes: Table<Route>,
    stops: Table<Stop>,
    reviews: Table<Review>,
    messages: Table<Message>,
    notifications: Table<Notification>,
    alerts: Table<Alert>,
    chat_threads: Table<ChatThread>,
    current_driver_id: Option<String>,
    current_customer_id: Option<String>,
    #[serde(skip)]
    outbox: Vec<StoreEvent>,
}

impl Store {
    /// A store populated with the demo seed.
    pub fn seeded() -> Self {
        let data = seed::generate();

        Self {
            drivers: data.drivers.into(),
            customers: data.customers.into(),
            routes: data.routes.into(),
            stops: data.stops.into(),
            reviews: data.reviews.into(),
            messages: data.messages.into(),
            notifications: data.notifications.into(),
            alerts: data.alerts.into(),
            chat_threads: data.chat_threads.into(),
            current_driver_id: Some(seed::DEFAULT_DRIVER_ID.to_string()),
            current_customer_id: Some(seed::DEFAULT_CUSTOMER_ID.to_string()),
            outbox: Vec::new(),
        }
    }

    pub fn drivers(&self) -> &Table<Driver> {
        &self.drivers
    }

    pub fn customers(&self) -> &Table<Customer> {
        &self.customers
    }

    pub fn routes(&self) -> &Table<Route> {
        &self.routes
    }

    pub fn stops(&self) -> &Table<Stop> {
        &self.stops
    }

    pub fn reviews(&self) -> &Table<Review> {
        &self.reviews
    }

    pub fn messages(&self) -> &Table<Message> {
        &self.messages
    }

    pub fn notifications(&self) -> &Table<Notification> {
        &self.notifications
    }

    pub fn alerts(&self) -> &Table<Alert> {
        &self.alerts
    }

    pub fn chat_threads(&self) -> &Table<ChatThread> {
        &self.chat_threads
    }

    pub fn current_driver_id(&self) -> Option<&str> {
        self.current_driver_id.as_deref()
    }

    pub fn current_customer_id(&self) -> Option<&str> {
        self.current_customer_id.as_deref()
    }

    pub fn set_current_driver(&mut self, driver_id: Option<String>) -> Result<(), AppError> {
        if let Some(id) = driver_id.as_deref() {
            if !self.drivers.contains(id) {
                return Err(AppError::not_found("driver", id));
            }
        }
        self.current_driver_id = driver_id;
        Ok(())
    }

    pub fn set_current_customer(&mut self, customer_id: Option<String>) -> Result<(), AppError> {
        if let Some(id) = customer_id.as_deref() {
            if !self.customers.contains(id) {
                return Err(AppError::not_found("customer", id));
            }
        }
        self.current_customer_id = customer_id;
        Ok(())
    }

    /// Throws away every mutation and reloads the demo seed. The acting-as
    /// pointers are kept.
    pub fn reset_data(&mut self) {
        let seeded = Store::seeded();
        self.drivers = seeded.drivers;
        self.customers = seeded.customers;
        self.routes = seeded.routes;
        self.stops = seeded.stops;
        self.reviews = seeded.reviews;
        self.messages = seeded.messages;
        self.notifications = seeded.notifications;
        self.alerts = seeded.alerts;
        self.chat_threads = seeded.chat_threads;
        self.outbox.push(StoreEvent::Reset);
    }

    /// Events produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, event: StoreEvent) {
        self.outbox.push(event);
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::seeded()
    }
}

/// `<prefix>-<uuid>` identifiers for records created at runtime.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
