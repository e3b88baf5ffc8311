//! Data models for the Obras checklist application.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod checklist;
mod material;
mod version;

pub use checklist::*;
pub use material::*;
pub use version::*;
