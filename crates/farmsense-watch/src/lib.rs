//! Terminal client for the FarmSense read API.
//!
//! The client polls `GET /api/animals`, renders the herd as text cards and
//! raises a notification whenever an animal newly enters the critical set.

pub mod client;
pub mod config;
pub mod notify;
pub mod render;
pub mod screen;
pub mod tracker;

#[cfg(test)]
mod tests;
