use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Teacher, TeacherFilter, TeacherPatch, TeacherSummary};
use crate::{
    db::{on_unique_violation, StoreResult},
    pagination::Page,
    patch::AccountLookup,
};

#[async_trait]
pub trait TeacherRepo: Send + Sync {
    async fn insert(&self, teacher: &Teacher) -> StoreResult<()>;
    async fn find_by_id(&self, teacher_id: &str) -> StoreResult<Option<Teacher>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Teacher>>;
    /// First teacher matching every field set in `filter`.
    async fn find_by_fields(&self, filter: &TeacherFilter) -> StoreResult<Option<Teacher>>;
    async fn update(
        &self,
        lookup: &AccountLookup,
        patch: &TeacherPatch,
    ) -> StoreResult<Option<Teacher>>;
    async fn list(&self, page: Page) -> StoreResult<Vec<TeacherSummary>>;
    async fn delete(&self, teacher_id: &str) -> StoreResult<bool>;
    /// Deletes at most one teacher matching every field set in `filter`.
    async fn delete_by_fields(&self, filter: &TeacherFilter) -> StoreResult<bool>;
}

const FILTER: &str = r#"
    ($1::TEXT IS NULL OR teacher_id = $1)
    AND ($2::TEXT IS NULL OR first_name = $2)
    AND ($3::TEXT IS NULL OR last_name = $3)
    AND ($4::TEXT IS NULL OR preferred_name = $4)
    AND ($5::TEXT IS NULL OR email_address = $5)
    AND ($6::TEXT IS NULL OR profile_picture_url = $6)
"#;

const COLUMNS: &str = r#"
    teacher_id, first_name, preferred_name, last_name, native_language,
    preferred_language, email_address, password_hash, salt, profile_picture_url,
    profile_picture_path, theme_mode, font_style, time_zone, lessons_taught
"#;

pub struct PgTeacherRepo {
    db: PgPool,
}

impl PgTeacherRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeacherRepo for PgTeacherRepo {
    async fn insert(&self, t: &Teacher) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO teachers ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
        ))
        .bind(&t.teacher_id)
        .bind(&t.first_name)
        .bind(&t.preferred_name)
        .bind(&t.last_name)
        .bind(&t.native_language)
        .bind(&t.preferred_language)
        .bind(&t.email_address)
        .bind(&t.password_hash)
        .bind(&t.salt)
        .bind(&t.profile_picture_url)
        .bind(&t.profile_picture_path)
        .bind(&t.theme_mode)
        .bind(&t.font_style)
        .bind(&t.time_zone)
        .bind(t.lessons_taught)
        .execute(&self.db)
        .await
        .map_err(|e| on_unique_violation(e, "teachers_pkey", "teacherID"))?;
        Ok(())
    }

    async fn find_by_id(&self, teacher_id: &str) -> StoreResult<Option<Teacher>> {
        let row = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {COLUMNS} FROM teachers WHERE teacher_id = $1"
        ))
        .bind(teacher_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Teacher>> {
        let row = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {COLUMNS} FROM teachers WHERE email_address = $1 LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_fields(&self, f: &TeacherFilter) -> StoreResult<Option<Teacher>> {
        let row = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {COLUMNS} FROM teachers WHERE {FILTER} LIMIT 1"
        ))
        .bind(&f.teacher_id)
        .bind(&f.first_name)
        .bind(&f.last_name)
        .bind(&f.preferred_name)
        .bind(&f.email_address)
        .bind(&f.profile_picture_url)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        lookup: &AccountLookup,
        p: &TeacherPatch,
    ) -> StoreResult<Option<Teacher>> {
        let (target, key) = match lookup {
            AccountLookup::Id(id) => ("$1", id),
            AccountLookup::Email(email) => (
                "(SELECT teacher_id FROM teachers WHERE email_address = $1 LIMIT 1)",
                email,
            ),
        };
        let row = sqlx::query_as::<_, Teacher>(&format!(
            r#"
            UPDATE teachers SET
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
                lessons_taught = COALESCE($12, lessons_taught)
            WHERE teacher_id = {target}
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
        .bind(p.lessons_taught)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<TeacherSummary>> {
        let rows = sqlx::query_as::<_, TeacherSummary>(
            r#"
            SELECT teacher_id, first_name, preferred_name, last_name, email_address, profile_picture_url
            FROM teachers
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

    async fn delete(&self, teacher_id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM teachers WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_by_fields(&self, f: &TeacherFilter) -> StoreResult<bool> {
        let res = sqlx::query(&format!(
            "DELETE FROM teachers WHERE teacher_id = \
             (SELECT teacher_id FROM teachers WHERE {FILTER} LIMIT 1)"
        ))
        .bind(&f.teacher_id)
        .bind(&f.first_name)
        .bind(&f.last_name)
        .bind(&f.preferred_name)
        .bind(&f.email_address)
        .bind(&f.profile_picture_url)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
