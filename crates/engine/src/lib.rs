pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, NewUser, StoreDraft, TripDraft};
pub use payout::{MonthTotals, TripMetrics, month_key};

pub mod auth;
mod error;
mod ops;
pub mod payout;
pub mod stores;
pub mod trips;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
