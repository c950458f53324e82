use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Identified;
use crate::models::driver::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Residential,
    Commercial,
    Recycling,
    Bulk,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Residential,
        ServiceType::Commercial,
        ServiceType::Recycling,
        ServiceType::Bulk,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub coordinates: GeoPoint,
    pub service_type: ServiceType,
    pub bin_location: String,
    pub access_code: Option<String>,
    pub notes: Option<String>,
    pub schedule_days: Vec<String>,
    pub next_pickup_date: NaiveDate,
    pub assigned_driver_id: Option<String>,
}

impl Identified for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}
