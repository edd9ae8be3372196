//! Types shared between the schedule poll backend and its clients.

pub mod api;
pub mod models;
