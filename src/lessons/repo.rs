use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Lesson, LessonFilter, LessonPatch};
use crate::{db::StoreResult, pagination::Page};

#[async_trait]
pub trait LessonRepo: Send + Sync {
    async fn insert(&self, lesson: &Lesson) -> StoreResult<()>;
    async fn find_by_id(&self, lesson_id: &str) -> StoreResult<Option<Lesson>>;
    async fn update(&self, lesson_id: &str, patch: &LessonPatch) -> StoreResult<Option<Lesson>>;
    /// Latest scheduled first.
    async fn list(&self, filter: &LessonFilter, page: Page) -> StoreResult<Vec<Lesson>>;
    async fn delete(&self, lesson_id: &str) -> StoreResult<bool>;
}

const COLUMNS: &str = r#"
    lesson_id, teacher_id, student_id, subject, scheduled_date_time, room,
    is_canceled, is_completed, times_rescheduled, is_student_late,
    is_teacher_late, is_connection_lost
"#;

pub struct PgLessonRepo {
    db: PgPool,
}

impl PgLessonRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LessonRepo for PgLessonRepo {
    async fn insert(&self, l: &Lesson) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO lessons ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
        ))
        .bind(&l.lesson_id)
        .bind(&l.teacher_id)
        .bind(&l.student_id)
        .bind(&l.subject)
        .bind(l.scheduled_date_time)
        .bind(l.room)
        .bind(l.is_canceled)
        .bind(l.is_completed)
        .bind(l.times_rescheduled)
        .bind(l.is_student_late)
        .bind(l.is_teacher_late)
        .bind(l.is_connection_lost)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, lesson_id: &str) -> StoreResult<Option<Lesson>> {
        let row = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {COLUMNS} FROM lessons WHERE lesson_id = $1"
        ))
        .bind(lesson_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, lesson_id: &str, p: &LessonPatch) -> StoreResult<Option<Lesson>> {
        let row = sqlx::query_as::<_, Lesson>(&format!(
            r#"
            UPDATE lessons SET
                subject = COALESCE($2, subject),
                scheduled_date_time = COALESCE($3, scheduled_date_time),
                room = COALESCE($4, room),
                is_canceled = COALESCE($5, is_canceled),
                is_completed = COALESCE($6, is_completed),
                times_rescheduled = COALESCE($7, times_rescheduled),
                is_student_late = COALESCE($8, is_student_late),
                is_teacher_late = COALESCE($9, is_teacher_late),
                is_connection_lost = COALESCE($10, is_connection_lost)
            WHERE lesson_id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(lesson_id)
        .bind(&p.subject)
        .bind(p.scheduled_date_time)
        .bind(p.room)
        .bind(p.is_canceled)
        .bind(p.is_completed)
        .bind(p.times_rescheduled)
        .bind(p.is_student_late)
        .bind(p.is_teacher_late)
        .bind(p.is_connection_lost)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self, f: &LessonFilter, page: Page) -> StoreResult<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, Lesson>(&format!(
            r#"
            SELECT {COLUMNS} FROM lessons
            WHERE ($1::BOOLEAN IS NULL OR is_canceled = $1)
              AND ($2::BOOLEAN IS NULL OR is_completed = $2)
              AND ($3::TEXT IS NULL OR teacher_id = $3 OR student_id = $3)
            ORDER BY scheduled_date_time DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(f.is_canceled)
        .bind(f.is_completed)
        .bind(&f.participant)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, lesson_id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM lessons WHERE lesson_id = $1")
            .bind(lesson_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
pub mod memory {
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryLessonRepo {
        rows: Mutex<Vec<Lesson>>,
    }

    #[async_trait]
    impl LessonRepo for MemoryLessonRepo {
        async fn insert(&self, lesson: &Lesson) -> StoreResult<()> {
            self.rows.lock().await.push(lesson.clone());
            Ok(())
        }

        async fn find_by_id(&self, lesson_id: &str) -> StoreResult<Option<Lesson>> {
            let rows = self.rows.lock().await;
            Ok(rows.iter().find(|l| l.lesson_id == lesson_id).cloned())
        }

        async fn update(&self, lesson_id: &str, patch: &LessonPatch) -> StoreResult<Option<Lesson>> {
            let mut rows = self.rows.lock().await;
            Ok(rows.iter_mut().find(|l| l.lesson_id == lesson_id).map(|l| {
                patch.apply_to(l);
                l.clone()
            }))
        }

        async fn list(&self, filter: &LessonFilter, page: Page) -> StoreResult<Vec<Lesson>> {
            let mut hits: Vec<Lesson> = self
                .rows
                .lock()
                .await
                .iter()
                .filter(|l| filter.matches(l))
                .cloned()
                .collect();
            hits.sort_by(|a, b| b.scheduled_date_time.cmp(&a.scheduled_date_time));
            Ok(page.apply(hits))
        }

        async fn delete(&self, lesson_id: &str) -> StoreResult<bool> {
            let mut rows = self.rows.lock().await;
            let before = rows.len();
            rows.retain(|l| l.lesson_id != lesson_id);
            Ok(rows.len() != before)
        }
    }
}
