//! Types shared by every FarmSense crate.
//!
//! [`types::AnimalRecord`] is the stored shape of an animal,
//! [`types::Alert`] is what the rule engine derives from it, and
//! [`types::EnrichedAnimal`] is what the read API serves.

pub mod types;
