use serde::Serialize;
use sqlx::FromRow;

use crate::auth::services::Credentialed;
#[cfg(test)]
use crate::patch::apply;

/// Stored teacher row, secrets included; never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Teacher {
    pub teacher_id: String,
    pub first_name: String,
    pub preferred_name: String,
    pub last_name: String,
    pub native_language: String,
    pub preferred_language: String,
    pub email_address: String,
    pub password_hash: String,
    pub salt: String,
    pub profile_picture_url: String,
    pub profile_picture_path: String,
    pub theme_mode: String,
    pub font_style: String,
    pub time_zone: String,
    pub lessons_taught: i64,
}

impl Credentialed for Teacher {
    fn account_id(&self) -> &str {
        &self.teacher_id
    }

    fn salt(&self) -> &str {
        &self.salt
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeacherSummary {
    #[serde(rename = "teacherID")]
    pub teacher_id: String,
    pub first_name: String,
    pub preferred_name: String,
    pub last_name: String,
    pub email_address: String,
    pub profile_picture_url: String,
}

impl From<&Teacher> for TeacherSummary {
    fn from(t: &Teacher) -> Self {
        Self {
            teacher_id: t.teacher_id.clone(),
            first_name: t.first_name.clone(),
            preferred_name: t.preferred_name.clone(),
            last_name: t.last_name.clone(),
            email_address: t.email_address.clone(),
            profile_picture_url: t.profile_picture_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeacherPatch {
    pub first_name: Option<String>,
    pub preferred_name: Option<String>,
    pub last_name: Option<String>,
    pub native_language: Option<String>,
    pub preferred_language: Option<String>,
    pub profile_picture_url: Option<String>,
    pub profile_picture_path: Option<String>,
    pub theme_mode: Option<String>,
    pub font_style: Option<String>,
    pub time_zone: Option<String>,
    pub lessons_taught: Option<i64>,
}

#[cfg(test)]
impl TeacherPatch {
    pub fn apply_to(&self, t: &mut Teacher) {
        apply(&mut t.first_name, self.first_name.clone());
        apply(&mut t.preferred_name, self.preferred_name.clone());
        apply(&mut t.last_name, self.last_name.clone());
        apply(&mut t.native_language, self.native_language.clone());
        apply(&mut t.preferred_language, self.preferred_language.clone());
        apply(&mut t.profile_picture_url, self.profile_picture_url.clone());
        apply(&mut t.profile_picture_path, self.profile_picture_path.clone());
        apply(&mut t.theme_mode, self.theme_mode.clone());
        apply(&mut t.font_style, self.font_style.clone());
        apply(&mut t.time_zone, self.time_zone.clone());
        apply(&mut t.lessons_taught, self.lessons_taught);
    }
}

/// Exact-match filter for the custom lookup. Every `Some` field must match.
#[derive(Debug, Clone, Default)]
pub struct TeacherFilter {
    pub teacher_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_name: Option<String>,
    pub email_address: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl TeacherFilter {
    pub fn is_empty(&self) -> bool {
        self.teacher_id.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.preferred_name.is_none()
            && self.email_address.is_none()
            && self.profile_picture_url.is_none()
    }

    #[cfg(test)]
    pub fn matches(&self, t: &Teacher) -> bool {
        fn ok(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }
        ok(&self.teacher_id, &t.teacher_id)
            && ok(&self.first_name, &t.first_name)
            && ok(&self.last_name, &t.last_name)
            && ok(&self.preferred_name, &t.preferred_name)
            && ok(&self.email_address, &t.email_address)
            && ok(&self.profile_picture_url, &t.profile_picture_url)
    }
}
