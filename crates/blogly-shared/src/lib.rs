//! # Blogly Shared
//!
//! Types exchanged between the HTTP layer and the templates:
//! submitted forms, view models and error pages.

pub mod dto;
pub mod response;
pub mod view;

pub use response::ErrorResponse;
