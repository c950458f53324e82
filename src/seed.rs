//! Demo population used at first start and by `reset_data`.
//!
//! Everything is fixed: ids, dates and timestamps never depend on the clock,
//! so two calls to [`generate`] return equal data.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::models::alert::{Alert, AlertType, Severity};
use crate::models::chat::{ChatMessage, ChatRole, ChatThread};
use crate::models::customer::{Customer, ServiceType};
use crate::models::driver::{Driver, DriverStatus, GeoPoint};
use crate::models::message::{Message, Party};
use crate::models::notification::{Notification, NotificationType};
use crate::models::review::Review;
use crate::models::route::{Route, RouteStatus, Stop, StopStatus};

pub const DEFAULT_DRIVER_ID: &str = "driver-1";
pub const DEFAULT_CUSTOMER_ID: &str = "customer-2";

pub struct SeedData {
    pub drivers: Vec<Driver>,
    pub customers: Vec<Customer>,
    pub routes: Vec<Route>,
    pub stops: Vec<Stop>,
    pub reviews: Vec<Review>,
    pub messages: Vec<Message>,
    pub notifications: Vec<Notification>,
    pub alerts: Vec<Alert>,
    pub chat_threads: Vec<ChatThread>,
}

pub fn generate() -> SeedData {
    let stops = stops();
    let routes = routes(&stops);

    SeedData {
        drivers: drivers(),
        customers: customers(),
        routes,
        stops,
        reviews: reviews(),
        messages: messages(),
        notifications: notifications(),
        alerts: alerts(),
        chat_threads: chat_threads(),
    }
}

fn service_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 18).unwrap_or_default()
}

/// A fixed instant on `day` days after the service day, UTC.
fn at(day: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    service_day()
        .checked_add_signed(chrono::Duration::days(day))
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint { lat, lng }
}

#[allow(clippy::too_many_arguments)]
fn driver(
    n: u32,
    name: &str,
    plate: &str,
    status: DriverStatus,
    location: GeoPoint,
    rating: f64,
    total_ratings: u32,
    completed_stops: u32,
    total_stops: u32,
    on_time_rate: f64,
) -> Driver {
    let first = name.split(' ').next().unwrap_or(name).to_lowercase();
    Driver {
        id: format!("driver-{n}"),
        name: name.to_string(),
        email: format!("{first}@poobel.com"),
        phone: format!("(415) 555-01{n:02}"),
        avatar: format!("https://i.pravatar.cc/150?u=driver-{n}"),
        vehicle_id: format!("truck-{n}"),
        vehicle_plate: plate.to_string(),
        status,
        current_location: location,
        rating,
        total_ratings,
        completed_stops,
        total_stops,
        on_time_rate,
        early_count: total_stops / 10,
        late_count: total_stops / 20,
        missed_count: n % 2,
    }
}

fn drivers() -> Vec<Driver> {
    vec![
        driver(
            1,
            "Marcus Johnson",
            "PBL-1042",
            DriverStatus::EnRoute,
            point(37.7793, -122.4193),
            4.8,
            156,
            1,
            4,
            96.0,
        ),
        driver(
            2,
            "Sarah Chen",
            "PBL-2087",
            DriverStatus::Available,
            point(37.7599, -122.4148),
            4.0,
            2,
            0,
            2,
            92.5,
        ),
        driver(
            3,
            "David Rodriguez",
            "PBL-3315",
            DriverStatus::AtStop,
            point(37.7694, -122.4862),
            4.6,
            98,
            1,
            2,
            89.0,
        ),
        driver(
            4,
            "Emily Watson",
            "PBL-4120",
            DriverStatus::Offline,
            point(37.7849, -122.4094),
            4.9,
            64,
            0,
            0,
            98.0,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn customer(
    n: u32,
    name: &str,
    address: &str,
    coordinates: GeoPoint,
    service_type: ServiceType,
    bin_location: &str,
    access_code: Option<&str>,
    schedule_days: &[&str],
    assigned_driver: Option<u32>,
) -> Customer {
    let first = name.split(' ').next().unwrap_or(name).to_lowercase();
    Customer {
        id: format!("customer-{n}"),
        name: name.to_string(),
        email: format!("{first}@example.com"),
        phone: format!("(415) 555-02{n:02}"),
        address: address.to_string(),
        coordinates,
        service_type,
        bin_location: bin_location.to_string(),
        access_code: access_code.map(str::to_string),
        notes: None,
        schedule_days: schedule_days.iter().map(|d| d.to_string()).collect(),
        next_pickup_date: service_day(),
        assigned_driver_id: assigned_driver.map(|d| format!("driver-{d}")),
    }
}

fn customers() -> Vec<Customer> {
    vec![
        customer(
            1,
            "Alice Thompson",
            "1200 Market St, San Francisco, CA",
            point(37.7775, -122.4167),
            ServiceType::Commercial,
            "Loading dock, rear alley",
            Some("4471"),
            &["Monday", "Wednesday", "Friday"],
            Some(1),
        ),
        customer(
            2,
            "Brian Patel",
            "845 Valencia St, San Francisco, CA",
            point(37.7587, -122.4214),
            ServiceType::Residential,
            "Left side of garage",
            None,
            &["Wednesday", "Saturday"],
            Some(1),
        ),
        customer(
            3,
            "Carmen Ortiz",
            "2150 Fillmore St, San Francisco, CA",
            point(37.7890, -122.4336),
            ServiceType::Recycling,
            "Front curb",
            None,
            &["Wednesday"],
            Some(1),
        ),
        customer(
            4,
            "Daniel Kim",
            "3401 Irving St, San Francisco, CA",
            point(37.7637, -122.4927),
            ServiceType::Residential,
            "Behind side gate",
            Some("1290"),
            &["Tuesday", "Friday"],
            Some(3),
        ),
        customer(
            5,
            "Evelyn Brooks",
            "600 Judah St, San Francisco, CA",
            point(37.7621, -122.4670),
            ServiceType::Bulk,
            "Driveway",
            None,
            &["Thursday"],
            Some(2),
        ),
        customer(
            6,
            "Frank Moreno",
            "77 Harbor Lane, San Francisco, CA",
            point(37.8060, -122.4103),
            ServiceType::Residential,
            "Next to mailbox",
            None,
            &["Monday"],
            Some(1),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn stop(
    n: u32,
    route: u32,
    customer: &Customer,
    scheduled_time: &str,
    actual_time: Option<&str>,
    status: StopStatus,
    service_type: ServiceType,
    sequence: u32,
) -> Stop {
    Stop {
        id: format!("stop-{n}"),
        route_id: format!("route-{route}"),
        customer_id: customer.id.clone(),
        address: customer.address.clone(),
        coordinates: customer.coordinates,
        scheduled_time: scheduled_time.to_string(),
        actual_time: actual_time.map(str::to_string),
        status,
        service_type,
        notes: customer.notes.clone(),
        bin_location: Some(customer.bin_location.clone()),
        access_code: customer.access_code.clone(),
        photo_url: None,
        issue_note: None,
        sequence,
    }
}

fn stops() -> Vec<Stop> {
    let customers = customers();
    let by_number = |n: usize| &customers[n - 1];

    vec![
        stop(
            1,
            1,
            by_number(1),
            "07:45",
            Some("07:41"),
            StopStatus::Completed,
            ServiceType::Commercial,
            1,
        ),
        stop(
            2,
            1,
            by_number(2),
            "08:30",
            None,
            StopStatus::InProgress,
            ServiceType::Residential,
            2,
        ),
        stop(
            3,
            1,
            by_number(3),
            "09:15",
            None,
            StopStatus::Pending,
            ServiceType::Recycling,
            3,
        ),
        stop(
            4,
            1,
            by_number(4),
            "10:00",
            None,
            StopStatus::Pending,
            ServiceType::Residential,
            4,
        ),
        stop(
            5,
            2,
            by_number(5),
            "08:00",
            None,
            StopStatus::Pending,
            ServiceType::Bulk,
            1,
        ),
        stop(
            6,
            2,
            by_number(1),
            "09:30",
            None,
            StopStatus::Pending,
            ServiceType::Recycling,
            2,
        ),
        stop(
            7,
            3,
            by_number(4),
            "07:30",
            Some("07:52"),
            StopStatus::Completed,
            ServiceType::Recycling,
            1,
        ),
        stop(
            8,
            3,
            by_number(5),
            "08:45",
            None,
            StopStatus::Pending,
            ServiceType::Bulk,
            2,
        ),
    ]
}

fn routes(stops: &[Stop]) -> Vec<Route> {
    let stop_ids = |route_id: &str| -> Vec<String> {
        stops
            .iter()
            .filter(|stop| stop.route_id == route_id)
            .map(|stop| stop.id.clone())
            .collect()
    };

    vec![
        Route {
            id: "route-1".to_string(),
            name: "Downtown Morning".to_string(),
            driver_id: "driver-1".to_string(),
            date: service_day(),
            start_time: "07:30".to_string(),
            end_time: None,
            status: RouteStatus::InProgress,
            stop_ids: stop_ids("route-1"),
            total_distance: 18.4,
            estimated_duration: 210,
        },
        Route {
            id: "route-2".to_string(),
            name: "Mission Midday".to_string(),
            driver_id: "driver-2".to_string(),
            date: service_day(),
            start_time: "07:45".to_string(),
            end_time: None,
            status: RouteStatus::Scheduled,
            stop_ids: stop_ids("route-2"),
            total_distance: 9.7,
            estimated_duration: 120,
        },
        Route {
            id: "route-3".to_string(),
            name: "Sunset District".to_string(),
            driver_id: "driver-3".to_string(),
            date: service_day(),
            start_time: "07:15".to_string(),
            end_time: None,
            status: RouteStatus::InProgress,
            stop_ids: stop_ids("route-3"),
            total_distance: 14.2,
            estimated_duration: 150,
        },
    ]
}

fn reviews() -> Vec<Review> {
    let review = |n: u32, customer: u32, driver: u32, stop: u32, rating: u8, comment: &str, day: i64| Review {
        id: format!("review-{n}"),
        customer_id: format!("customer-{customer}"),
        driver_id: format!("driver-{driver}"),
        stop_id: format!("stop-{stop}"),
        rating,
        comment: Some(comment.to_string()),
        created_at: at(day, 16, 0),
    };

    vec![
        review(1, 1, 1, 1, 5, "Always on time and very careful with the bins.", -7),
        review(2, 4, 3, 7, 4, "Good service, a little later than usual.", -3),
        review(3, 5, 2, 5, 5, "Took the old couch without any fuss.", -14),
        review(4, 6, 2, 6, 3, "Left the lid open.", -10),
    ]
}

fn messages() -> Vec<Message> {
    let message = |n: u32,
                   (sender_id, sender_type): (&str, Party),
                   (receiver_id, receiver_type): (&str, Party),
                   content: &str,
                   (hour, minute): (u32, u32),
                   read: bool| Message {
        id: format!("msg-{n}"),
        sender_id: sender_id.to_string(),
        sender_type,
        receiver_id: receiver_id.to_string(),
        receiver_type,
        content: content.to_string(),
        timestamp: at(0, hour, minute),
        read,
    };

    vec![
        message(
            1,
            ("dispatch", Party::Dispatch),
            ("driver-1", Party::Driver),
            "Good morning Marcus, Market St loading dock is open early today.",
            (7, 10),
            true,
        ),
        message(
            2,
            ("driver-1", Party::Driver),
            ("dispatch", Party::Dispatch),
            "Thanks, heading there first.",
            (7, 12),
            true,
        ),
        message(
            3,
            ("customer-2", Party::Customer),
            ("driver-1", Party::Driver),
            "The bin is by the garage, gate is unlocked.",
            (8, 5),
            false,
        ),
        message(
            4,
            ("driver-1", Party::Driver),
            ("customer-2", Party::Customer),
            "Got it, see you soon!",
            (8, 7),
            false,
        ),
        message(
            5,
            ("dispatch", Party::Dispatch),
            ("driver-3", Party::Driver),
            "Traffic on 19th Ave, expect delays.",
            (7, 40),
            false,
        ),
    ]
}

fn notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "notif-1".to_string(),
            user_id: "customer-2".to_string(),
            kind: NotificationType::Approaching,
            title: "Driver Approaching".to_string(),
            message: "Marcus is 2 stops away from your address".to_string(),
            timestamp: at(0, 8, 0),
            read: false,
            data: None,
        },
        Notification {
            id: "notif-2".to_string(),
            user_id: "customer-1".to_string(),
            kind: NotificationType::Completed,
            title: "Pickup Completed".to_string(),
            message: "Your waste pickup at 1200 Market St, San Francisco, CA has been completed"
                .to_string(),
            timestamp: at(0, 7, 41),
            read: true,
            data: Some(json!({ "stopId": "stop-1", "canReview": true })),
        },
        Notification {
            id: "notif-3".to_string(),
            user_id: "customer-2".to_string(),
            kind: NotificationType::Message,
            title: "New Message".to_string(),
            message: "Marcus: Got it, see you soon!".to_string(),
            timestamp: at(0, 8, 7),
            read: false,
            data: None,
        },
    ]
}

fn alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "alert-1".to_string(),
            kind: AlertType::Delay,
            severity: Severity::Medium,
            title: "Route running late".to_string(),
            message: "Sunset District is 20 minutes behind schedule".to_string(),
            driver_id: Some("driver-3".to_string()),
            route_id: Some("route-3".to_string()),
            timestamp: at(0, 7, 55),
            resolved: false,
        },
        Alert {
            id: "alert-2".to_string(),
            kind: AlertType::Deviation,
            severity: Severity::Low,
            title: "Route deviation".to_string(),
            message: "Truck PBL-1042 left the planned route near Van Ness".to_string(),
            driver_id: Some("driver-1".to_string()),
            route_id: Some("route-1".to_string()),
            timestamp: at(0, 8, 2),
            resolved: false,
        },
        Alert {
            id: "alert-3".to_string(),
            kind: AlertType::Info,
            severity: Severity::Low,
            title: "Depot reopened".to_string(),
            message: "North depot is accepting drop-offs again".to_string(),
            driver_id: None,
            route_id: None,
            timestamp: at(-1, 17, 30),
            resolved: true,
        },
    ]
}

fn chat_threads() -> Vec<ChatThread> {
    let opened = at(-1, 18, 0);
    let answered = at(-1, 18, 1);

    vec![ChatThread {
        id: "chat-1".to_string(),
        customer_id: "customer-2".to_string(),
        title: "Support Chat".to_string(),
        messages: vec![
            ChatMessage {
                id: "chat-msg-1".to_string(),
                role: ChatRole::User,
                content: "Do you take pizza boxes in recycling?".to_string(),
                timestamp: opened,
            },
            ChatMessage {
                id: "chat-msg-2".to_string(),
                role: ChatRole::Assistant,
                content: "Clean pizza boxes are fine in recycling. Greasy parts go in the trash."
                    .to_string(),
                timestamp: answered,
            },
        ],
        created_at: opened,
        updated_at: answered,
    }]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::generate;

    #[test]
    fn foreign_keys_resolve_within_the_seed() {
        let seed = generate();
        let drivers: HashSet<&str> = seed.drivers.iter().map(|d| d.id.as_str()).collect();
        let customers: HashSet<&str> = seed.customers.iter().map(|c| c.id.as_str()).collect();
        let routes: HashSet<&str> = seed.routes.iter().map(|r| r.id.as_str()).collect();
        let stops: HashSet<&str> = seed.stops.iter().map(|s| s.id.as_str()).collect();

        for route in &seed.routes {
            assert!(drivers.contains(route.driver_id.as_str()));
            assert!(route.stop_ids.iter().all(|id| stops.contains(id.as_str())));
        }
        for stop in &seed.stops {
            assert!(routes.contains(stop.route_id.as_str()));
            assert!(customers.contains(stop.customer_id.as_str()));
        }
        for review in &seed.reviews {
            assert!(drivers.contains(review.driver_id.as_str()));
            assert!(customers.contains(review.customer_id.as_str()));
            assert!(stops.contains(review.stop_id.as_str()));
        }
        for thread in &seed.chat_threads {
            assert!(customers.contains(thread.customer_id.as_str()));
        }
    }

    #[test]
    fn some_customer_has_no_stops() {
        let seed = generate();
        assert!(
            seed.customers
                .iter()
                .any(|c| seed.stops.iter().all(|s| s.customer_id != c.id))
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let first = generate();
        let second = generate();
        assert_eq!(first.stops, second.stops);
        assert_eq!(first.reviews, second.reviews);
        assert_eq!(first.chat_threads, second.chat_threads);
    }
}
