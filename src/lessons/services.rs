use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateLessonRequest, UpdateLessonRequest},
    repo_types::{Lesson, LessonFilter},
};
use crate::{
    db::with_deadline,
    error::{AppError, AppResult},
    pagination::Page,
    state::AppState,
};

/// New lessons start uncanceled, uncompleted and never rescheduled.
pub async fn create_lesson(state: &AppState, req: CreateLessonRequest) -> AppResult<Lesson> {
    if req.teacher_id.is_empty() || req.student_id.is_empty() {
        return Err(AppError::bad_request("teacherID and student_id are required"));
    }
    let lesson = Lesson {
        lesson_id: Uuid::new_v4().to_string(),
        teacher_id: req.teacher_id,
        student_id: req.student_id,
        subject: req.subject,
        scheduled_date_time: req.scheduled_date_time,
        room: req.room,
        is_canceled: false,
        is_completed: false,
        times_rescheduled: 0,
        is_student_late: false,
        is_teacher_late: false,
        is_connection_lost: false,
    };
    with_deadline(state.config.db_timeout, state.lessons.insert(&lesson)).await?;
    info!(lesson_id = %lesson.lesson_id, "lesson created");
    Ok(lesson)
}

pub async fn get_lesson(state: &AppState, lesson_id: &str) -> AppResult<Lesson> {
    if lesson_id.is_empty() {
        return Err(AppError::bad_request("lessonID is required"));
    }
    with_deadline(state.config.db_timeout, state.lessons.find_by_id(lesson_id))
        .await?
        .ok_or_else(|| AppError::not_found("Lesson"))
}

pub async fn update_lesson(state: &AppState, req: UpdateLessonRequest) -> AppResult<Lesson> {
    if req.lesson_id.is_empty() {
        return Err(AppError::bad_request("lessonID is required"));
    }
    let patch = req.patch();
    let lesson = with_deadline(
        state.config.db_timeout,
        state.lessons.update(&req.lesson_id, &patch),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Lesson"))?;
    info!(lesson_id = %lesson.lesson_id, "lesson updated");
    Ok(lesson)
}

pub async fn list_lessons(
    state: &AppState,
    filter: LessonFilter,
    page: Page,
) -> AppResult<Vec<Lesson>> {
    Ok(with_deadline(state.config.db_timeout, state.lessons.list(&filter, page)).await?)
}

pub async fn delete_lesson(state: &AppState, lesson_id: &str) -> AppResult<bool> {
    if lesson_id.is_empty() {
        return Err(AppError::bad_request("lessonID is required"));
    }
    let deleted = with_deadline(state.config.db_timeout, state.lessons.delete(lesson_id)).await?;
    info!(%lesson_id, deleted, "lesson delete");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(teacher: &str, student: &str, at: i64) -> CreateLessonRequest {
        CreateLessonRequest {
            teacher_id: teacher.into(),
            student_id: student.into(),
            subject: "English".into(),
            scheduled_date_time: at,
            room: 7,
        }
    }

    #[tokio::test]
    async fn create_starts_with_clean_flags() {
        let state = AppState::fake();
        let lesson = create_lesson(&state, create_req("t1", "s1", 1_700_000_000))
            .await
            .unwrap();
        assert!(!lesson.is_canceled && !lesson.is_completed);
        assert_eq!(lesson.times_rescheduled, 0);
        assert_eq!(get_lesson(&state, &lesson.lesson_id).await.unwrap(), lesson);

        let err = create_lesson(&state, create_req("", "s1", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_applies_explicit_false_and_keeps_the_rest() {
        let state = AppState::fake();
        let lesson = create_lesson(&state, create_req("t1", "s1", 100)).await.unwrap();

        let canceled = update_lesson(
            &state,
            UpdateLessonRequest {
                lesson_id: lesson.lesson_id.clone(),
                is_canceled: Some(true),
                times_rescheduled: Some(2),
                subject: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(canceled.is_canceled);
        assert_eq!(canceled.times_rescheduled, 2);
        assert_eq!(canceled.subject, "English");
        assert_eq!(canceled.room, 7);

        let restored = update_lesson(
            &state,
            UpdateLessonRequest {
                lesson_id: lesson.lesson_id.clone(),
                is_canceled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!restored.is_canceled);
        assert_eq!(restored.times_rescheduled, 2);

        let err = update_lesson(
            &state,
            UpdateLessonRequest {
                lesson_id: "missing".into(),
                room: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_flags_and_participant() {
        let state = AppState::fake();
        let a = create_lesson(&state, create_req("t1", "s1", 100)).await.unwrap();
        let b = create_lesson(&state, create_req("t1", "s2", 300)).await.unwrap();
        let c = create_lesson(&state, create_req("t2", "s1", 200)).await.unwrap();
        update_lesson(
            &state,
            UpdateLessonRequest {
                lesson_id: c.lesson_id.clone(),
                is_completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let page = Page::new(None, None).unwrap();
        let all = list_lessons(&state, LessonFilter::default(), page).await.unwrap();
        let order: Vec<_> = all.iter().map(|l| l.lesson_id.clone()).collect();
        assert_eq!(order, [b.lesson_id.clone(), c.lesson_id.clone(), a.lesson_id.clone()]);

        let s1 = list_lessons(
            &state,
            LessonFilter {
                participant: Some("s1".into()),
                ..Default::default()
            },
            page,
        )
        .await
        .unwrap();
        assert_eq!(s1.len(), 2);

        let upcoming = list_lessons(
            &state,
            LessonFilter {
                is_canceled: Some(false),
                is_completed: Some(false),
                participant: Some("t1".into()),
            },
            page,
        )
        .await
        .unwrap();
        let ids: Vec<_> = upcoming.iter().map(|l| l.lesson_id.clone()).collect();
        assert_eq!(ids, [b.lesson_id, a.lesson_id]);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let state = AppState::fake();
        let lesson = create_lesson(&state, create_req("t1", "s1", 100)).await.unwrap();
        assert!(delete_lesson(&state, &lesson.lesson_id).await.unwrap());
        assert!(!delete_lesson(&state, &lesson.lesson_id).await.unwrap());
        assert!(matches!(
            get_lesson(&state, &lesson.lesson_id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
