use serde::{Deserialize, Serialize};

use crate::models::Identified;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

const EARTH_RADIUS_KM: f64 = 6_371.0;

impl GeoPoint {
    /// Straight-line (great-circle) kilometres to `other`, the figure the
    /// customer app shows as "driver is N km away".
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (from_lat, to_lat) = (self.lat.to_radians(), other.lat.to_radians());
        let half_dlat = (to_lat - from_lat) / 2.0;
        let half_dlng = (other.lng - self.lng).to_radians() / 2.0;

        let chord = half_dlat.sin().powi(2)
            + from_lat.cos() * to_lat.cos() * half_dlng.sin().powi(2);
        2.0 * EARTH_RADIUS_KM * chord.sqrt().atan2((1.0 - chord).sqrt())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    EnRoute,
    AtStop,
    Completed,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub vehicle_id: String,
    pub vehicle_plate: String,
    pub status: DriverStatus,
    pub current_location: GeoPoint,
    pub rating: f64,
    pub total_ratings: u32,
    pub completed_stops: u32,
    pub total_stops: u32,
    pub on_time_rate: f64,
    pub early_count: u32,
    pub late_count: u32,
    pub missed_count: u32,
}

impl Identified for Driver {
    fn id(&self) -> &str {
        &self.id
    }
}
