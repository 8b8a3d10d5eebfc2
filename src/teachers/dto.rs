use serde::{Deserialize, Serialize};

use super::repo_types::{Teacher, TeacherFilter, TeacherPatch, TeacherSummary};
use crate::{auth::services::normalize_email, patch::non_empty};

#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    /// Generated when empty.
    #[serde(default, rename = "teacherID")]
    pub teacher_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub preferred_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub native_language: String,
    #[serde(default)]
    pub preferred_language: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub profile_picture_url: String,
    #[serde(default)]
    pub profile_picture_path: String,
    #[serde(default)]
    pub theme_mode: String,
    #[serde(default)]
    pub font_style: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherInfo {
    #[serde(rename = "teacherID")]
    pub teacher_id: String,
    pub first_name: String,
    pub preferred_name: String,
    pub last_name: String,
    pub native_language: String,
    pub preferred_language: String,
    pub email_address: String,
    pub profile_picture_url: String,
    pub profile_picture_path: String,
    pub theme_mode: String,
    pub font_style: String,
    pub time_zone: String,
    pub lessons_taught: i64,
}

impl From<Teacher> for TeacherInfo {
    fn from(t: Teacher) -> Self {
        Self {
            teacher_id: t.teacher_id,
            first_name: t.first_name,
            preferred_name: t.preferred_name,
            last_name: t.last_name,
            native_language: t.native_language,
            preferred_language: t.preferred_language,
            email_address: t.email_address,
            profile_picture_url: t.profile_picture_url,
            profile_picture_path: t.profile_picture_path,
            theme_mode: t.theme_mode,
            font_style: t.font_style,
            time_zone: t.time_zone,
            lessons_taught: t.lessons_taught,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetTeacherResponse {
    pub teacher: TeacherInfo,
}

#[derive(Debug, Deserialize)]
pub struct TeacherIdQuery {
    #[serde(default, rename = "teacherID")]
    pub teacher_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeacherRequest {
    #[serde(rename = "teacherID")]
    pub teacher_id: Option<String>,
    pub email_address: Option<String>,
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
    pub public_key: Option<String>,
}

impl UpdateTeacherRequest {
    pub fn patch(&self) -> TeacherPatch {
        TeacherPatch {
            first_name: non_empty(self.first_name.clone()),
            preferred_name: non_empty(self.preferred_name.clone()),
            last_name: non_empty(self.last_name.clone()),
            native_language: non_empty(self.native_language.clone()),
            preferred_language: non_empty(self.preferred_language.clone()),
            profile_picture_url: non_empty(self.profile_picture_url.clone()),
            profile_picture_path: non_empty(self.profile_picture_path.clone()),
            theme_mode: non_empty(self.theme_mode.clone()),
            font_style: non_empty(self.font_style.clone()),
            time_zone: non_empty(self.time_zone.clone()),
            lessons_taught: self.lessons_taught,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomGetTeacherRequest {
    #[serde(rename = "teacherID")]
    pub teacher_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_name: Option<String>,
}

impl From<CustomGetTeacherRequest> for TeacherFilter {
    fn from(r: CustomGetTeacherRequest) -> Self {
        Self {
            teacher_id: non_empty(r.teacher_id),
            first_name: non_empty(r.first_name),
            last_name: non_empty(r.last_name),
            preferred_name: non_empty(r.preferred_name),
            ..Default::default()
        }
    }
}

/// Removes one teacher matching every non-empty field.
#[derive(Debug, Default, Deserialize)]
pub struct CustomDeleteTeacherRequest {
    #[serde(rename = "teacherID")]
    pub teacher_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_name: Option<String>,
    pub email_address: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<CustomDeleteTeacherRequest> for TeacherFilter {
    fn from(r: CustomDeleteTeacherRequest) -> Self {
        Self {
            teacher_id: non_empty(r.teacher_id),
            first_name: non_empty(r.first_name),
            last_name: non_empty(r.last_name),
            preferred_name: non_empty(r.preferred_name),
            email_address: non_empty(r.email_address.map(|e| normalize_email(&e))),
            profile_picture_url: non_empty(r.profile_picture_url),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTeachersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListTeachersResponse {
    pub teachers: Vec<TeacherSummary>,
    pub page: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteTeacherResponse {
    pub is_deleted: bool,
}
