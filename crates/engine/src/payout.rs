//! Payout arithmetic for a single trip and monthly aggregation.
//!
//! The payout of a trip is derived once at write time and stored on the
//! record. Readers never recompute it; edits run the full derivation again.
//!
//! Rates are per unit of each metric. The weekend surcharge uplifts every
//! component except the empty-crate one:
//!
//! ```text
//! base    = km * 0.10 + stops * 1.70 + loaded * 0.64 + crates * 0.50 + returned * 0.64
//! weekend = (base - crates * 0.50) * 1.20 + crates * 0.50
//! ```

use chrono::NaiveDate;

use crate::trips;

pub const KM_RATE: f64 = 0.10;
pub const STOP_RATE: f64 = 1.70;
pub const LOADED_PALLET_RATE: f64 = 0.64;
pub const EMPTY_CRATE_RATE: f64 = 0.50;
pub const RETURNED_PALLET_RATE: f64 = 0.64;
pub const WEEKEND_FACTOR: f64 = 1.20;

/// The raw numeric metrics of one trip.
///
/// Total over finite inputs; the write path validates that metrics are
/// finite and non-negative before anything reaches this type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripMetrics {
    pub km: f64,
    pub stops: f64,
    pub loaded_pallets: f64,
    pub empty_crates: f64,
    pub returned_pallets: f64,
    pub weekend: bool,
}

impl TripMetrics {
    fn base(&self) -> f64 {
        self.km * KM_RATE
            + self.stops * STOP_RATE
            + self.loaded_pallets * LOADED_PALLET_RATE
            + self.empty_crates * EMPTY_CRATE_RATE
            + self.returned_pallets * RETURNED_PALLET_RATE
    }

    /// Derived payout amount for the trip.
    pub fn payout(&self) -> f64 {
        let base = self.base();
        if self.weekend {
            let crate_part = self.empty_crates * EMPTY_CRATE_RATE;
            (base - crate_part) * WEEKEND_FACTOR + crate_part
        } else {
            base
        }
    }
}

/// The `YYYY-MM` month scope a date falls into.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sums of the six numeric trip fields over a record set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonthTotals {
    pub stops: f64,
    pub km: f64,
    pub loaded_pallets: f64,
    pub empty_crates: f64,
    pub returned_pallets: f64,
    pub payout: f64,
}

impl MonthTotals {
    pub fn add(&mut self, trip: &trips::Model) {
        self.stops += trip.stops;
        self.km += trip.km;
        self.loaded_pallets += trip.loaded_pallets;
        self.empty_crates += trip.empty_crates;
        self.returned_pallets += trip.returned_pallets;
        self.payout += trip.payout;
    }

    pub fn merge(&mut self, other: &MonthTotals) {
        self.stops += other.stops;
        self.km += other.km;
        self.loaded_pallets += other.loaded_pallets;
        self.empty_crates += other.empty_crates;
        self.returned_pallets += other.returned_pallets;
        self.payout += other.payout;
    }
}

/// Folds a pre-filtered record set into its totals.
///
/// An empty set yields all-zero totals.
pub fn aggregate<'a, I>(records: I) -> MonthTotals
where
    I: IntoIterator<Item = &'a trips::Model>,
{
    let mut totals = MonthTotals::default();
    for record in records {
        totals.add(record);
    }
    totals
}
