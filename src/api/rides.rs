use log::warn;
use reqwest::Method;

use super::{
    listing, reply, ApiReply, DashboardReport, DispatchClient, Listing, Pagination, RidePage, VehiclePricingUpdate,
};
use crate::error::Result;
use crate::normalize::{normalize_ride, normalize_vehicle, DashboardStats, Vehicle};

impl DispatchClient {
    /// One page of rides, paged by the backend
    pub async fn list_rides(&self, page: u64, limit: u64) -> RidePage {
        let response = self
            .request(Method::GET, "/ride/all-rides")
            .query("page", page)
            .query("limit", limit)
            .execute()
            .await;

        let pagination = match &response {
            Ok(response) => response
                .body
                .as_json()
                .and_then(|body| body.get("pagination"))
                .map(|value| Pagination::from_value(Some(value), page, limit)),
            Err(_) => None,
        };

        let rides = listing(response, "rides", normalize_ride);
        let pagination = match (rides.status, pagination) {
            (true, Some(pagination)) => pagination,
            (true, None) => Pagination::empty(page, limit),
            (false, _) => Pagination::empty(1, limit),
        };

        RidePage {
            status: rides.status,
            data: rides.data,
            pagination,
            message: rides.message,
        }
    }

    /// Dashboard counters computed from every ride. A failed fetch is
    /// reported with `status: false` and zeroed counters.
    pub async fn dashboard_stats(&self) -> DashboardReport {
        let response = self.request(Method::GET, "/ride/all-rider-rides").execute().await;

        let rides = listing(response, "dashboard rides", normalize_ride);
        if !rides.status {
            warn!("Dashboard stats unavailable");
        }

        DashboardReport {
            status: rides.status,
            data: DashboardStats::from_rides(&rides.data),
            message: rides.message,
        }
    }

    /// Vehicle classes and their fares
    pub async fn list_vehicles(&self) -> Listing<Vehicle> {
        let response = self.request(Method::GET, "/vehicles").execute().await;
        listing(response, "vehicles", normalize_vehicle)
    }

    pub async fn update_vehicle_pricing(&self, vehicle_id: &str, update: &VehiclePricingUpdate) -> Result<ApiReply> {
        update.validate()?;

        let response = self
            .request(Method::PUT, &format!("/vehicles/{}", vehicle_id))
            .json(update)?
            .execute()
            .await?;

        reply(response, "update vehicle pricing")
    }
}
