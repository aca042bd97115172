pub mod health;
pub mod reports;
pub mod reputation;
pub mod stats;
pub mod version;
