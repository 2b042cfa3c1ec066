//! Domain layer - core business logic and entities

pub mod geo;
pub mod interfaces;
pub mod price;
pub mod recovery;
