//! # Tutorslot Core
//!
//! Domain types shared by every crate in the workspace: the error taxonomy,
//! availability windows, bookings, and the slot calculator that turns weekly
//! availability into bookable session start times.
//!
//! Nothing in this crate performs I/O.

pub mod errors;
pub mod models;
pub mod slots;
