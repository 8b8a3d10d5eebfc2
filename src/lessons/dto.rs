use serde::{Deserialize, Serialize};

use super::repo_types::{Lesson, LessonFilter, LessonPatch};
use crate::patch::non_empty;

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    #[serde(default, rename = "teacherID")]
    pub teacher_id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub scheduled_date_time: i64,
    #[serde(default)]
    pub room: i64,
}

#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub lesson: Lesson,
}

#[derive(Debug, Deserialize)]
pub struct LessonIdQuery {
    #[serde(default, rename = "lessonID")]
    pub lesson_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLessonRequest {
    #[serde(default, rename = "lessonID")]
    pub lesson_id: String,
    pub subject: Option<String>,
    pub scheduled_date_time: Option<i64>,
    pub room: Option<i64>,
    pub is_canceled: Option<bool>,
    pub is_completed: Option<bool>,
    pub times_rescheduled: Option<i64>,
    pub is_student_late: Option<bool>,
    pub is_teacher_late: Option<bool>,
    pub is_connection_lost: Option<bool>,
}

impl UpdateLessonRequest {
    pub fn patch(&self) -> LessonPatch {
        LessonPatch {
            subject: non_empty(self.subject.clone()),
            scheduled_date_time: self.scheduled_date_time,
            room: self.room,
            is_canceled: self.is_canceled,
            is_completed: self.is_completed,
            times_rescheduled: self.times_rescheduled,
            is_student_late: self.is_student_late,
            is_teacher_late: self.is_teacher_late,
            is_connection_lost: self.is_connection_lost,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteLessonRequest {
    #[serde(default, rename = "lessonID")]
    pub lesson_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteLessonResponse {
    pub is_deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListLessonsQuery {
    #[serde(rename = "isCanceled")]
    pub is_canceled: Option<bool>,
    #[serde(rename = "isCompleted")]
    pub is_completed: Option<bool>,
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListLessonsQuery {
    pub fn filter(&self) -> LessonFilter {
        LessonFilter {
            is_canceled: self.is_canceled,
            is_completed: self.is_completed,
            participant: non_empty(self.id.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListLessonsResponse {
    pub lessons: Vec<Lesson>,
    pub page: i64,
}
