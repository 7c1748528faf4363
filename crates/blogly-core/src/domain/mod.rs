//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{FRIENDLY_DATE_FORMAT, NewPost, Post, PostUpdate, format_friendly};
pub use tag::{NewTag, Tag};
pub use user::{DEFAULT_IMAGE_URL, NewUser, User};
