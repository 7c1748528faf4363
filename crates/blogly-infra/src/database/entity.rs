//! SeaORM entities for the four Blogly tables.

pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;
