//! # BookSlot Core
//!
//! Domain types and the availability engine shared by the database and API
//! crates. Nothing in this crate performs I/O except through the
//! [`engine::AppointmentStore`] trait.

pub mod clock;
pub mod engine;
pub mod errors;
pub mod models;
