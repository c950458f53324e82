use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Identified;
use crate::models::customer::ServiceType;
use crate::models::driver::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A driver's day of pickups. Stops live in the stop table; the route only
/// keeps their ids in visiting order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub driver_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: RouteStatus,
    pub stop_ids: Vec<String>,
    pub total_distance: f64,
    pub estimated_duration: u32,
}

impl Identified for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
    Problematic,
}

impl StopStatus {
    /// Pending and in-progress stops are still ahead of the driver.
    pub fn is_open(self) -> bool {
        matches!(self, StopStatus::Pending | StopStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    pub id: String,
    pub route_id: String,
    pub customer_id: String,
    pub address: String,
    pub coordinates: GeoPoint,
    pub scheduled_time: String,
    pub actual_time: Option<String>,
    pub status: StopStatus,
    pub service_type: ServiceType,
    pub notes: Option<String>,
    pub bin_location: Option<String>,
    pub access_code: Option<String>,
    pub photo_url: Option<String>,
    pub issue_note: Option<String>,
    pub sequence: u32,
}

impl Identified for Stop {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Everything a dispatcher supplies for a new stop; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StopDraft {
    pub route_id: String,
    pub customer_id: String,
    pub address: String,
    pub coordinates: GeoPoint,
    pub scheduled_time: String,
    pub status: StopStatus,
    pub service_type: ServiceType,
    pub notes: Option<String>,
    pub bin_location: Option<String>,
    pub access_code: Option<String>,
    pub sequence: u32,
}

impl StopDraft {
    pub fn into_stop(self, id: String) -> Stop {
        Stop {
            id,
            route_id: self.route_id,
            customer_id: self.customer_id,
            address: self.address,
            coordinates: self.coordinates,
            scheduled_time: self.scheduled_time,
            actual_time: None,
            status: self.status,
            service_type: self.service_type,
            notes: self.notes,
            bin_location: self.bin_location,
            access_code: self.access_code,
            photo_url: None,
            issue_note: None,
            sequence: self.sequence,
        }
    }
}
