//! Models Module
//!
//! Request and response DTOs for the admin/diagnostics API.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
