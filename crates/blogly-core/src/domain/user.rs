use serde::{Deserialize, Serialize};

/// Avatar used when a user is created without an image.
pub const DEFAULT_IMAGE_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/2/2c/Default_pfp.svg";

/// User entity - a person who writes posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl User {
    /// Display name, `"{first} {last}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields required to create a user. The id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl NewUser {
    /// Build a new user; a blank `image_url` falls back to [`DEFAULT_IMAGE_URL`].
    pub fn new(first_name: String, last_name: String, image_url: Option<String>) -> Self {
        let image_url = image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

        Self {
            first_name,
            last_name,
            image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let user = User {
            id: 1,
            first_name: "Alan".to_string(),
            last_name: "Alda".to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
        };
        assert_eq!(user.full_name(), "Alan Alda");
    }

    #[test]
    fn test_blank_image_url_uses_default() {
        let user = NewUser::new("Joel".into(), "Burton".into(), Some("   ".into()));
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);

        let user = NewUser::new("Joel".into(), "Burton".into(), None);
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_explicit_image_url_is_kept() {
        let user = NewUser::new(
            "Jane".into(),
            "Smith".into(),
            Some("https://example.com/jane.png".into()),
        );
        assert_eq!(user.image_url, "https://example.com/jane.png");
    }
}
