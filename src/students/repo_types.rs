use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::services::Credentialed;
#[cfg(test)]
use crate::patch::apply;

/// Full stored row. Carries secrets, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub student_id: String,
    pub first_name: String,
    pub preferred_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: String,
    pub salt: String,
    pub native_language: String,
    pub preferred_language: String,
    pub student_since: OffsetDateTime,
    pub profile_picture_url: String,
    pub profile_picture_path: String,
    pub theme_mode: String,
    pub font_style: String,
    pub time_zone: String,
    pub lessons_remaining: i64,
    pub lessons_completed: i64,
}

impl Credentialed for Student {
    fn account_id(&self) -> &str {
        &self.student_id
    }

    fn salt(&self) -> &str {
        &self.salt
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// List projection.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentSummary {
    pub student_id: String,
    pub first_name: String,
    pub preferred_name: String,
    pub last_name: String,
    pub email_address: String,
    pub profile_picture_url: String,
}

impl From<&Student> for StudentSummary {
    fn from(s: &Student) -> Self {
        Self {
            student_id: s.student_id.clone(),
            first_name: s.first_name.clone(),
            preferred_name: s.preferred_name.clone(),
            last_name: s.last_name.clone(),
            email_address: s.email_address.clone(),
            profile_picture_url: s.profile_picture_url.clone(),
        }
    }
}

/// Fields an update may touch. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
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
    pub lessons_remaining: Option<i64>,
    pub lessons_completed: Option<i64>,
}

#[cfg(test)]
impl StudentPatch {
    pub fn apply_to(&self, s: &mut Student) {
        apply(&mut s.first_name, self.first_name.clone());
        apply(&mut s.preferred_name, self.preferred_name.clone());
        apply(&mut s.last_name, self.last_name.clone());
        apply(&mut s.native_language, self.native_language.clone());
        apply(&mut s.preferred_language, self.preferred_language.clone());
        apply(&mut s.profile_picture_url, self.profile_picture_url.clone());
        apply(&mut s.profile_picture_path, self.profile_picture_path.clone());
        apply(&mut s.theme_mode, self.theme_mode.clone());
        apply(&mut s.font_style, self.font_style.clone());
        apply(&mut s.time_zone, self.time_zone.clone());
        apply(&mut s.lessons_remaining, self.lessons_remaining);
        apply(&mut s.lessons_completed, self.lessons_completed);
    }
}
