use tracing::info;

use crate::error::AppError;
use crate::models::route::{Route, RouteStatus};
use crate::store::Store;

impl Store {
    pub fn assign_route(&mut self, route_id: &str, driver_id: &str) -> Result<Route, AppError> {
        if !self.drivers.contains(driver_id) {
            return Err(AppError::not_found("driver", driver_id));
        }

        let route = self
            .routes
            .get_mut(route_id)
            .ok_or_else(|| AppError::not_found("route", route_id))?;
        route.driver_id = driver_id.to_string();

        info!(route_id = %route_id, driver_id = %driver_id, "route assigned");
        Ok(route.clone())
    }

    pub fn update_route_status(
        &mut self,
        route_id: &str,
        status: RouteStatus,
    ) -> Result<Route, AppError> {
        let route = self
            .routes
            .get_mut(route_id)
            .ok_or_else(|| AppError::not_found("route", route_id))?;
        route.status = status;
        Ok(route.clone())
    }
}
