//! Composite views the three front-ends render: the customer home card, the
//! driver dashboard and ratings tab, and the dispatch overview and analytics.

use serde::Serialize;

use crate::error::AppError;
use crate::models::customer::{Customer, ServiceType};
use crate::models::driver::{Driver, DriverStatus};
use crate::models::message::Message;
use crate::models::review::Review;
use crate::models::route::{Route, RouteStatus, Stop, StopStatus};
use crate::store::Store;
use crate::store::drivers::round_one_decimal;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HomeState {
    /// A pickup is still ahead and the customer has a driver to follow.
    Tracking {
        stop: Stop,
        driver: Driver,
        eta: String,
        driver_distance_km: f64,
    },
    Completed {
        stop: Stop,
        can_review: bool,
    },
    NoUpcomingService,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerHome {
    pub customer: Customer,
    pub assigned_driver: Option<Driver>,
    pub unread_notifications: usize,
    pub state: HomeState,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteProgress {
    pub route_id: String,
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverDashboard {
    pub driver: Driver,
    pub active_route: Option<Route>,
    pub stops: Vec<Stop>,
    pub current_stop: Option<Stop>,
    pub upcoming: Vec<Stop>,
    pub progress: Option<RouteProgress>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DispatchOverview {
    pub active_drivers: usize,
    pub total_drivers: usize,
    pub completed_stops: usize,
    pub pending_stops: usize,
    pub active_routes: usize,
    pub total_routes: usize,
    pub unresolved_alerts: usize,
    pub recent_completions: Vec<Stop>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceTypeCount {
    pub service_type: ServiceType,
    pub stops: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StarShare {
    pub rating: u8,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverPerformance {
    pub driver_id: String,
    pub name: String,
    pub on_time_rate: f64,
    pub completed_stops: u32,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Analytics {
    pub total_stops: usize,
    pub completed_stops: usize,
    pub completion_rate: f64,
    pub average_rating: Option<f64>,
    pub service_types: Vec<ServiceTypeCount>,
    pub rating_distribution: Vec<StarShare>,
    pub drivers: Vec<DriverPerformance>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewEntry {
    pub review: Review,
    pub customer_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingBreakdown {
    pub driver_id: String,
    pub rating: f64,
    pub total_ratings: u32,
    pub distribution: Vec<StarShare>,
    pub reviews: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Conversation {
    pub customer_id: String,
    pub customer_name: String,
    pub messages: Vec<Message>,
}

const RECENT_COMPLETIONS: usize = 5;

impl Store {
    /// Picks which card the customer home screen shows: live tracking of an
    /// open pickup, the last completed pickup, or nothing scheduled.
    pub fn customer_home(&self, customer_id: &str) -> Result<CustomerHome, AppError> {
        let customer = self
            .customers
            .get(customer_id)
            .ok_or_else(|| AppError::not_found("customer", customer_id))?;

        let assigned_driver = customer
            .assigned_driver_id
            .as_deref()
            .and_then(|id| self.drivers.get(id));

        let active_stop = self
            .stops
            .iter()
            .find(|stop| stop.customer_id == customer_id && stop.status.is_open());
        let completed_stop = self
            .stops
            .iter()
            .find(|stop| stop.customer_id == customer_id && stop.status == StopStatus::Completed);

        let state = match (active_stop, assigned_driver, completed_stop) {
            (Some(stop), Some(driver), _) => HomeState::Tracking {
                stop: stop.clone(),
                driver: driver.clone(),
                eta: stop.scheduled_time.clone(),
                driver_distance_km: round_one_decimal(
                    driver.current_location.distance_km(&customer.coordinates),
                ),
            },
            (_, _, Some(stop)) => HomeState::Completed {
                stop: stop.clone(),
                can_review: !self.reviews.iter().any(|review| review.stop_id == stop.id),
            },
            _ => HomeState::NoUpcomingService,
        };

        let unread_notifications = self
            .notifications
            .iter()
            .filter(|n| n.user_id == customer_id && !n.read)
            .count();

        Ok(CustomerHome {
            customer: customer.clone(),
            assigned_driver: assigned_driver.cloned(),
            unread_notifications,
            state,
        })
    }

    pub fn route_progress(&self, route_id: &str) -> Result<RouteProgress, AppError> {
        if !self.routes.contains(route_id) {
            return Err(AppError::not_found("route", route_id));
        }
        Ok(progress_of(route_id, &self.stops_for_route(route_id)))
    }

    /// The driver's in-progress route with the stop they should work next.
    pub fn driver_dashboard(&self, driver_id: &str) -> Result<DriverDashboard, AppError> {
        let driver = self
            .drivers
            .get(driver_id)
            .ok_or_else(|| AppError::not_found("driver", driver_id))?;

        let active_route = self
            .routes
            .iter()
            .find(|route| route.driver_id == driver_id && route.status == RouteStatus::InProgress);

        let stops: Vec<Stop> = active_route
            .map(|route| self.stops_for_route(&route.id).into_iter().cloned().collect())
            .unwrap_or_default();
        let current_stop = stops.iter().find(|stop| stop.status.is_open()).cloned();
        let upcoming = stops
            .iter()
            .filter(|stop| {
                stop.status == StopStatus::Pending
                    && current_stop.as_ref().is_none_or(|current| current.id != stop.id)
            })
            .cloned()
            .collect();
        let progress = active_route.map(|route| {
            let refs: Vec<&Stop> = stops.iter().collect();
            progress_of(&route.id, &refs)
        });

        Ok(DriverDashboard {
            driver: driver.clone(),
            active_route: active_route.cloned(),
            stops,
            current_stop,
            upcoming,
            progress,
        })
    }

    pub fn dispatch_overview(&self) -> DispatchOverview {
        let completed: Vec<&Stop> = self
            .stops
            .iter()
            .filter(|stop| stop.status == StopStatus::Completed)
            .collect();
        let recent_completions = completed
            .iter()
            .skip(completed.len().saturating_sub(RECENT_COMPLETIONS))
            .map(|stop| (*stop).clone())
            .collect();

        DispatchOverview {
            active_drivers: self
                .drivers
                .iter()
                .filter(|driver| driver.status != DriverStatus::Offline)
                .count(),
            total_drivers: self.drivers.len(),
            completed_stops: completed.len(),
            pending_stops: self
                .stops
                .iter()
                .filter(|stop| stop.status == StopStatus::Pending)
                .count(),
            active_routes: self
                .routes
                .iter()
                .filter(|route| route.status == RouteStatus::InProgress)
                .count(),
            total_routes: self.routes.len(),
            unresolved_alerts: self.alerts.iter().filter(|alert| !alert.resolved).count(),
            recent_completions,
        }
    }

    pub fn analytics(&self) -> Analytics {
        let total_stops = self.stops.len();
        let completed_stops = self
            .stops
            .iter()
            .filter(|stop| stop.status == StopStatus::Completed)
            .count();

        let completion_rate = if total_stops > 0 {
            (completed_stops as f64 / total_stops as f64 * 100.0).round()
        } else {
            0.0
        };

        let ratings: Vec<u8> = self.reviews.iter().map(|review| review.rating).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
            Some(round_one_decimal(f64::from(sum) / ratings.len() as f64))
        };

        let service_types = ServiceType::ALL
            .into_iter()
            .map(|service_type| ServiceTypeCount {
                service_type,
                stops: self
                    .stops
                    .iter()
                    .filter(|stop| stop.service_type == service_type)
                    .count(),
            })
            .filter(|entry| entry.stops > 0)
            .collect();

        let drivers = self
            .drivers
            .iter()
            .map(|driver| DriverPerformance {
                driver_id: driver.id.clone(),
                name: driver.name.clone(),
                on_time_rate: driver.on_time_rate,
                completed_stops: driver.completed_stops,
                rating: driver.rating,
            })
            .collect();

        Analytics {
            total_stops,
            completed_stops,
            completion_rate,
            average_rating,
            service_types,
            rating_distribution: star_shares(&ratings, [1, 2, 3, 4, 5]),
            drivers,
        }
    }

    /// What the driver's ratings tab shows: stars from five down to one.
    pub fn rating_breakdown(&self, driver_id: &str) -> Result<RatingBreakdown, AppError> {
        let driver = self
            .drivers
            .get(driver_id)
            .ok_or_else(|| AppError::not_found("driver", driver_id))?;

        let reviews = self.reviews_for_driver(driver_id);
        let ratings: Vec<u8> = reviews.iter().map(|review| review.rating).collect();

        Ok(RatingBreakdown {
            driver_id: driver.id.clone(),
            rating: driver.rating,
            total_ratings: driver.total_ratings,
            distribution: star_shares(&ratings, [5, 4, 3, 2, 1]),
            reviews: reviews
                .into_iter()
                .map(|review| ReviewEntry {
                    review: review.clone(),
                    customer_name: self.customer_name(&review.customer_id),
                })
                .collect(),
        })
    }

    /// The driver's messages with customers, one conversation per customer in
    /// order of first contact.
    pub fn customer_conversations(&self, driver_id: &str) -> Vec<Conversation> {
        let mut conversations: Vec<Conversation> = Vec::new();

        for message in self.messages_for_driver(driver_id) {
            let customer_id = if message.sender_id == driver_id {
                &message.receiver_id
            } else {
                &message.sender_id
            };
            if !self.customers.contains(customer_id) {
                continue;
            }

            match conversations
                .iter_mut()
                .find(|conversation| &conversation.customer_id == customer_id)
            {
                Some(conversation) => conversation.messages.push(message.clone()),
                None => conversations.push(Conversation {
                    customer_id: customer_id.clone(),
                    customer_name: self.customer_name(customer_id),
                    messages: vec![message.clone()],
                }),
            }
        }

        conversations
    }

    fn customer_name(&self, customer_id: &str) -> String {
        self.customers
            .get(customer_id)
            .map(|customer| customer.name.clone())
            .unwrap_or_else(|| "Customer".to_string())
    }
}

fn progress_of(route_id: &str, stops: &[&Stop]) -> RouteProgress {
    let total = stops.len();
    let completed = stops
        .iter()
        .filter(|stop| stop.status == StopStatus::Completed)
        .count();

    RouteProgress {
        route_id: route_id.to_string(),
        completed,
        total,
        percent: completed as f64 / total.max(1) as f64 * 100.0,
    }
}

fn star_shares(ratings: &[u8], order: [u8; 5]) -> Vec<StarShare> {
    order
        .into_iter()
        .map(|rating| {
            let count = ratings.iter().filter(|&&r| r == rating).count();
            let percentage = if ratings.is_empty() {
                0.0
            } else {
                count as f64 / ratings.len() as f64 * 100.0
            };
            StarShare {
                rating,
                count,
                percentage,
            }
        })
        .collect()
}
