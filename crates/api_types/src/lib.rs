use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub id: String,
    }

    /// A user as exposed to clients -- no password hash.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub username: String,
        pub email: String,
        pub is_admin: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<UserView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordResetRequest {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordReset {
        pub token: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SetAdmin {
        pub is_admin: bool,
    }
}

pub mod trip {
    use super::*;

    /// Raw trip submission. Month and payout are derived server-side.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripDraft {
        pub date: NaiveDate,
        pub vehicle: String,
        pub stops: f64,
        pub km: f64,
        pub loaded_pallets: f64,
        pub empty_crates: f64,
        pub returned_pallets: f64,
        #[serde(default)]
        pub weekend: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub vehicle: String,
        pub stops: f64,
        pub km: f64,
        pub loaded_pallets: f64,
        pub empty_crates: f64,
        pub returned_pallets: f64,
        pub weekend: bool,
        /// Month scope, `YYYY-MM`.
        pub month: String,
        pub payout: f64,
    }

    /// Query parameters for listing trips.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TripListQuery {
        /// `YYYY-MM`; defaults to the current calendar month.
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripListResponse {
        pub month: String,
        pub trips: Vec<TripView>,
        pub totals: TotalsView,
    }

    /// Sums of the six numeric trip fields over the month scope.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TotalsView {
        pub stops: f64,
        pub km: f64,
        pub loaded_pallets: f64,
        pub empty_crates: f64,
        pub returned_pallets: f64,
        pub payout: f64,
    }
}

pub mod store {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreDraft {
        pub name: String,
        pub address: String,
        pub region: String,
        pub weekday_hours: Option<String>,
        pub saturday_hours: Option<String>,
        pub sunday_hours: Option<String>,
        pub map_link: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreView {
        pub id: Uuid,
        pub name: String,
        pub address: String,
        pub region: String,
        pub weekday_hours: Option<String>,
        pub saturday_hours: Option<String>,
        pub sunday_hours: Option<String>,
        pub map_link: Option<String>,
    }

    /// Query parameters for the directory listing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StoreListQuery {
        /// Substring matched against name, address, and region.
        pub query: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoresResponse {
        pub stores: Vec<StoreView>,
    }
}

pub mod fleet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FleetResponse {
        pub vehicles: Vec<String>,
    }
}
