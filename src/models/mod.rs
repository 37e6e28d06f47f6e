//! Data models for the clinic dashboard backend.
//!
//! Field names match the JSON the dashboard has always written to storage.

mod consultation;
mod doctor;
mod identity;
mod inventory;

pub use consultation::*;
pub use doctor::*;
pub use identity::*;
pub use inventory::*;
