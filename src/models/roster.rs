use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub user_id: String,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub user_id: String,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub name: Option<PersonName>,
    pub email_address: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub full_name: Option<String>,
}

impl Student {
    /// Full display name when the platform supplied one.
    pub fn full_name(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.name.as_ref())
            .and_then(|n| n.full_name.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.email_address.as_deref())
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.photo_url.as_deref())
    }
}
