use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{Student, StudentPatch, StudentSummary};
use crate::patch::non_empty;

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub preferred_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub native_language: String,
    #[serde(default)]
    pub preferred_language: String,
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

#[derive(Debug, Serialize)]
pub struct CreateStudentResponse {
    pub student_id: String,
}

/// Non-secret view of a student.
#[derive(Debug, Clone, Serialize)]
pub struct StudentInfo {
    pub student_id: String,
    pub first_name: String,
    pub preferred_name: String,
    pub last_name: String,
    pub email_address: String,
    pub native_language: String,
    pub preferred_language: String,
    #[serde(with = "time::serde::rfc3339")]
    pub student_since: OffsetDateTime,
    pub profile_picture_url: String,
    pub profile_picture_path: String,
    pub theme_mode: String,
    pub font_style: String,
    pub time_zone: String,
    pub lessons_remaining: i64,
    pub lessons_completed: i64,
}

impl From<Student> for StudentInfo {
    fn from(s: Student) -> Self {
        Self {
            student_id: s.student_id,
            first_name: s.first_name,
            preferred_name: s.preferred_name,
            last_name: s.last_name,
            email_address: s.email_address,
            native_language: s.native_language,
            preferred_language: s.preferred_language,
            student_since: s.student_since,
            profile_picture_url: s.profile_picture_url,
            profile_picture_path: s.profile_picture_path,
            theme_mode: s.theme_mode,
            font_style: s.font_style,
            time_zone: s.time_zone,
            lessons_remaining: s.lessons_remaining,
            lessons_completed: s.lessons_completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetStudentResponse {
    pub student: StudentInfo,
}

#[derive(Debug, Deserialize)]
pub struct GetStudentQuery {
    #[serde(default)]
    pub student_id: String,
}

/// Partial update. `student_id` wins over `email_address` for the lookup.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub student_id: Option<String>,
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
    pub lessons_remaining: Option<i64>,
    pub lessons_completed: Option<i64>,
    pub public_key: Option<String>,
}

impl UpdateStudentRequest {
    pub fn patch(&self) -> StudentPatch {
        StudentPatch {
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
            lessons_remaining: self.lessons_remaining,
            lessons_completed: self.lessons_completed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListStudentsResponse {
    pub students: Vec<StudentSummary>,
    pub page: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteStudentRequest {
    #[serde(default)]
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteStudentResponse {
    pub is_deleted: bool,
}
