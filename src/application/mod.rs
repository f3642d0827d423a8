//! Application services layer: pure transforms, access decisions, and the
//! collaborator contracts they depend on.

pub mod access;
pub mod error;
pub mod gate;
pub mod repos;
pub mod transform;
