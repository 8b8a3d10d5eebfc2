use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Student, StudentPatch, StudentSummary};
use crate::{
    db::{on_unique_violation, StoreResult},
    pagination::Page,
    patch::AccountLookup,
};

#[async_trait]
pub trait StudentRepo: Send + Sync {
    async fn insert(&self, student: &Student) -> StoreResult<()>;
    async fn find_by_id(&self, student_id: &str) -> StoreResult<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Student>>;
    /// Applies `patch` to the looked-up row and returns it as stored afterwards.
    async fn update(
        &self,
        lookup: &AccountLookup,
        patch: &StudentPatch,
    ) -> StoreResult<Option<Student>>;
    /// Sorted by preferred name.
    async fn list(&self, page: Page) -> StoreResult<Vec<StudentSummary>>;
    async fn delete(&self, student_id: &str) -> StoreResult<bool>;
}

const COLUMNS: &str = r#"
    student_id, first_name, preferred_name, last_name, email_address,
    password_hash, salt, native_language, preferred_language, student_since,
    profile_picture_url, profile_picture_path, theme_mode, font_style, time_zone,
    lessons_remaining, lessons_completed
"#;

pub struct PgStudentRepo {
    db: PgPool,
}

impl PgStudentRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentRepo for PgStudentRepo {
    async fn insert(&self, s: &Student) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO students ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
        ))
        .bind(&s.student_id)
        .bind(&s.first_name)
        .bind(&s.preferred_name)
        .bind(&s.last_name)
        .bind(&s.email_address)
        .bind(&s.password_hash)
        .bind(&s.salt)
        .bind(&s.native_language)
        .bind(&s.preferred_language)
        .bind(s.student_since)
        .bind(&s.profile_picture_url)
        .bind(&s.profile_picture_path)
        .bind(&s.theme_mode)
        .bind(&s.font_style)
        .bind(&s.time_zone)
        .bind(s.lessons_remaining)
        .bind(s.lessons_completed)
        .execute(&self.db)
        .await
        .map_err(|e| on_unique_violation(e, "students_pkey", "student_id"))?;
        Ok(())
    }

    async fn find_by_id(&self, student_id: &str) -> StoreResult<Option<Student>> {
        let row = sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM students WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Student>> {
        let row = sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM students WHERE email_address = $1 LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        lookup: &AccountLookup,
        p: &StudentPatch,
    ) -> StoreResult<Option<Student>> {
        let (target, key) = match lookup {
            AccountLookup::Id(id) => ("$1", id),
            AccountLookup::Email(email) => (
                "(SELECT student_id FROM students WHERE email_address = $1 LIMIT 1)",
                email,
            ),
        };
        let row = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students SET
                first_name = COALESCE($2, first_name),
                preferred_name = COALESCE($3, preferred_name),
                last_name = COALESCE($4, last_name),
                native_language = COALESCE($5, native_language),
                preferred_language = COALESCE($6, preferred_language),
                profile_picture_url = COALESCE($7, profile_picture_url),
                profile_picture_path = COALESCE($8, profile_picture_path),
                theme_mode = COALESCE($9, theme_mode),
                font_style = COALESCE($10, font_style),
                time_zone = COALESCE($11, time_zone),
                lessons_remaining = COALESCE($12, lessons_remaining),
                lessons_completed = COALESCE($13, lessons_completed)
            WHERE student_id = {target}
            RETURNING {COLUMNS}
            "#
        ))
        .bind(key)
        .bind(&p.first_name)
        .bind(&p.preferred_name)
        .bind(&p.last_name)
        .bind(&p.native_language)
        .bind(&p.preferred_language)
        .bind(&p.profile_picture_url)
        .bind(&p.profile_picture_path)
        .bind(&p.theme_mode)
        .bind(&p.font_style)
        .bind(&p.time_zone)
        .bind(p.lessons_remaining)
        .bind(p.lessons_completed)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<StudentSummary>> {
        let rows = sqlx::query_as::<_, StudentSummary>(
            r#"
            SELECT student_id, first_name, preferred_name, last_name, email_address, profile_picture_url
            FROM students
            ORDER BY preferred_name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, student_id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(student_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
