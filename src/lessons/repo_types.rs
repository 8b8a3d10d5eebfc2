use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Lesson {
    #[serde(rename = "lessonID")]
    pub lesson_id: String,
    #[serde(rename = "teacherID")]
    pub teacher_id: String,
    pub student_id: String,
    pub subject: String,
    /// Unix seconds.
    pub scheduled_date_time: i64,
    pub room: i64,
    pub is_canceled: bool,
    pub is_completed: bool,
    pub times_rescheduled: i64,
    pub is_student_late: bool,
    pub is_teacher_late: bool,
    pub is_connection_lost: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LessonPatch {
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

#[cfg(test)]
impl LessonPatch {
    pub fn apply_to(&self, l: &mut Lesson) {
        use crate::patch::apply;

        apply(&mut l.subject, self.subject.clone());
        apply(&mut l.scheduled_date_time, self.scheduled_date_time);
        apply(&mut l.room, self.room);
        apply(&mut l.is_canceled, self.is_canceled);
        apply(&mut l.is_completed, self.is_completed);
        apply(&mut l.times_rescheduled, self.times_rescheduled);
        apply(&mut l.is_student_late, self.is_student_late);
        apply(&mut l.is_teacher_late, self.is_teacher_late);
        apply(&mut l.is_connection_lost, self.is_connection_lost);
    }
}

/// Optional list filters; `participant` matches teacher or student id.
#[derive(Debug, Clone, Default)]
pub struct LessonFilter {
    pub is_canceled: Option<bool>,
    pub is_completed: Option<bool>,
    pub participant: Option<String>,
}

#[cfg(test)]
impl LessonFilter {
    pub fn matches(&self, l: &Lesson) -> bool {
        self.is_canceled.map_or(true, |c| l.is_canceled == c)
            && self.is_completed.map_or(true, |c| l.is_completed == c)
            && self
                .participant
                .as_deref()
                .map_or(true, |id| l.teacher_id == id || l.student_id == id)
    }
}
