use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// `strftime` pattern for [`Post::friendly_date`], e.g. `Sat Oct 17 2026, 3:04 PM`.
pub const FRIENDLY_DATE_FORMAT: &str = "%a %b %-d %Y, %-I:%M %p";

/// Post entity - a blog post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Human-friendly creation date in the server's local time zone.
    pub fn friendly_date(&self) -> String {
        format_friendly(&self.created_at.with_timezone(&Local))
    }
}

/// Format a timestamp with [`FRIENDLY_DATE_FORMAT`] in its own offset.
pub fn format_friendly<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format(FRIENDLY_DATE_FORMAT).to_string()
}

/// Fields required to create a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a post for `user_id`, stamped with the current time.
    pub fn new(user_id: i32, title: String, content: String) -> Self {
        Self {
            user_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Replacement values for the mutable fields of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_friendly_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 17, 15, 4, 0).unwrap();
        assert_eq!(format_friendly(&at), "Sat Oct 17 2026, 3:04 PM");

        let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        assert_eq!(format_friendly(&at), "Tue Mar 5 2024, 9:30 AM");
    }

    #[test]
    fn test_friendly_format_uses_offset() {
        let utc = Utc.with_ymd_and_hms(2026, 10, 17, 15, 4, 0).unwrap();
        let pacific = FixedOffset::west_opt(7 * 3600).unwrap();

        assert_eq!(
            format_friendly(&utc.with_timezone(&pacific)),
            "Sat Oct 17 2026, 8:04 AM"
        );
    }

    #[test]
    fn test_friendly_date_shows_local_time() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        let post = Post {
            id: 2,
            user_id: 1,
            title: "Early".to_string(),
            content: "Coffee".to_string(),
            created_at,
        };

        assert_eq!(
            post.friendly_date(),
            format_friendly(&created_at.with_timezone(&Local))
        );
    }
}
