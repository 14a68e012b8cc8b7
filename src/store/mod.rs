/// Persistent parcel records (PostgreSQL)
pub mod database;
pub mod model;

pub use database::Database;
pub use model::{NewParcel, Parcel, ParcelStatus};
