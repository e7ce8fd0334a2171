// Template and response structures, organized by concern.

mod api;
mod common;

pub use api::*;
pub use common::*;
