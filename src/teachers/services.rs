use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateTeacherRequest, TeacherInfo, UpdateTeacherRequest},
    repo_types::{Teacher, TeacherFilter, TeacherSummary},
};
use crate::{
    auth::{
        dto::{LoginOutcome, LoginRequest},
        keys::store_public_key,
        services::{check_login, is_valid_email, issue_credentials, normalize_email},
    },
    db::with_deadline,
    error::{AppError, AppResult},
    pagination::Page,
    patch::AccountLookup,
    state::AppState,
};

/// Inserts a teacher under the supplied `teacherID`, or a fresh UUID when
/// none was given, and returns the stored profile.
pub async fn create_teacher(state: &AppState, req: CreateTeacherRequest) -> AppResult<TeacherInfo> {
    let email = normalize_email(&req.email_address);
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("Invalid email"));
    }
    if req.password.is_empty() {
        return Err(AppError::bad_request("Password is required"));
    }

    let timeout = state.config.db_timeout;
    let teacher_id = if req.teacher_id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        let id = req.teacher_id.trim().to_string();
        if with_deadline(timeout, state.teachers.find_by_id(&id))
            .await?
            .is_some()
        {
            warn!(teacher_id = %id, "teacher id already taken");
            return Err(AppError::Conflict("teacherID already registered".into()));
        }
        id
    };
    if with_deadline(timeout, state.teachers.find_by_email(&email))
        .await?
        .is_some()
    {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let creds = issue_credentials(&state.hasher, req.password, email.clone()).await?;
    let teacher = Teacher {
        teacher_id,
        first_name: req.first_name,
        preferred_name: req.preferred_name,
        last_name: req.last_name,
        native_language: req.native_language,
        preferred_language: req.preferred_language,
        email_address: email,
        password_hash: creds.password_hash,
        salt: creds.salt,
        profile_picture_url: req.profile_picture_url,
        profile_picture_path: req.profile_picture_path,
        theme_mode: req.theme_mode,
        font_style: req.font_style,
        time_zone: req.time_zone,
        lessons_taught: 0,
    };
    // A racing create with the same id or email fails here as a conflict.
    with_deadline(timeout, state.teachers.insert(&teacher)).await?;

    store_public_key(
        state.keys.as_ref(),
        &teacher.teacher_id,
        req.public_key.as_deref(),
    )
    .await;

    info!(teacher_id = %teacher.teacher_id, "teacher created");
    Ok(teacher.into())
}

pub async fn validate_login(
    state: &AppState,
    req: LoginRequest,
) -> AppResult<LoginOutcome<TeacherInfo>> {
    let email = normalize_email(&req.email_address);
    let found = with_deadline(
        state.config.login_timeout,
        state.teachers.find_by_email(&email),
    )
    .await?;
    let outcome = check_login(&state.hasher, found, &email, req.password).await?;
    Ok(LoginOutcome {
        is_valid: outcome.is_valid,
        profile: outcome.profile.map(TeacherInfo::from),
    })
}

pub async fn update_teacher(
    state: &AppState,
    req: UpdateTeacherRequest,
) -> AppResult<TeacherInfo> {
    let lookup = AccountLookup::resolve(req.teacher_id.clone(), req.email_address.clone())?;
    let patch = req.patch();
    let updated = with_deadline(
        state.config.db_timeout,
        state.teachers.update(&lookup, &patch),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Teacher"))?;

    store_public_key(
        state.keys.as_ref(),
        &updated.teacher_id,
        req.public_key.as_deref(),
    )
    .await;

    info!(teacher_id = %updated.teacher_id, "teacher updated");
    Ok(updated.into())
}

pub async fn get_teacher(state: &AppState, teacher_id: &str) -> AppResult<TeacherInfo> {
    if teacher_id.is_empty() {
        return Err(AppError::bad_request("teacherID is required"));
    }
    with_deadline(
        state.config.db_timeout,
        state.teachers.find_by_id(teacher_id),
    )
    .await?
    .map(TeacherInfo::from)
    .ok_or_else(|| AppError::not_found("Teacher"))
}

pub async fn custom_get_teacher(state: &AppState, filter: TeacherFilter) -> AppResult<TeacherInfo> {
    if filter.is_empty() {
        return Err(AppError::bad_request(
            "at least one of teacherID, first_name, last_name, preferred_name is required",
        ));
    }
    with_deadline(
        state.config.db_timeout,
        state.teachers.find_by_fields(&filter),
    )
    .await?
    .map(TeacherInfo::from)
    .ok_or_else(|| AppError::not_found("Teacher"))
}

pub async fn list_teachers(state: &AppState, page: Page) -> AppResult<Vec<TeacherSummary>> {
    Ok(with_deadline(state.config.db_timeout, state.teachers.list(page)).await?)
}

pub async fn delete_teacher(state: &AppState, teacher_id: &str) -> AppResult<bool> {
    if teacher_id.is_empty() {
        return Err(AppError::bad_request("teacherID is required"));
    }
    let deleted = with_deadline(
        state.config.db_timeout,
        state.teachers.delete(teacher_id),
    )
    .await?;
    info!(%teacher_id, deleted, "teacher delete");
    Ok(deleted)
}

pub async fn custom_delete_teacher(state: &AppState, filter: TeacherFilter) -> AppResult<bool> {
    if filter.is_empty() {
        return Err(AppError::bad_request(
            "at least one of teacherID, first_name, last_name, preferred_name, \
             email_address, profile_picture_url is required",
        ));
    }
    let deleted = with_deadline(
        state.config.db_timeout,
        state.teachers.delete_by_fields(&filter),
    )
    .await?;
    info!(deleted, "teacher custom delete");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(teacher_id: &str, email: &str, password: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            teacher_id: teacher_id.into(),
            first_name: "Alina".into(),
            preferred_name: "Alina".into(),
            last_name: "K".into(),
            native_language: "ru".into(),
            preferred_language: "en".into(),
            email_address: email.into(),
            password: password.into(),
            profile_picture_url: String::new(),
            profile_picture_path: String::new(),
            theme_mode: "light".into(),
            font_style: "sans".into(),
            time_zone: "Europe/Berlin".into(),
            public_key: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email_address: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn supplied_id_login_scenario() {
        let state = AppState::fake();
        let created = create_teacher(&state, create_req("t1", "a@b.com", "hunter2"))
            .await
            .unwrap();
        assert_eq!(created.teacher_id, "t1");
        assert_eq!(created.lessons_taught, 0);

        let ok = validate_login(&state, login("a@b.com", "hunter2"))
            .await
            .unwrap();
        assert!(ok.is_valid);
        assert_eq!(ok.profile.unwrap().teacher_id, "t1");

        let bad = validate_login(&state, login("a@b.com", "wrong")).await.unwrap();
        assert!(!bad.is_valid);
        assert!(bad.profile.is_none());
    }

    #[tokio::test]
    async fn empty_id_is_generated_and_taken_id_conflicts() {
        let state = AppState::fake();
        let created = create_teacher(&state, create_req("", "a@b.com", "pw"))
            .await
            .unwrap();
        assert!(Uuid::parse_str(&created.teacher_id).is_ok());

        create_teacher(&state, create_req("t1", "c@d.com", "pw"))
            .await
            .unwrap();
        let err = create_teacher(&state, create_req("t1", "e@f.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_by_email_and_counters() {
        let state = AppState::fake();
        create_teacher(&state, create_req("t1", "a@b.com", "pw"))
            .await
            .unwrap();

        let updated = update_teacher(
            &state,
            UpdateTeacherRequest {
                email_address: Some("a@b.com".into()),
                lessons_taught: Some(12),
                time_zone: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.teacher_id, "t1");
        assert_eq!(updated.lessons_taught, 12);
        assert_eq!(updated.time_zone, "Europe/Berlin");
    }

    #[tokio::test]
    async fn custom_get_matches_all_supplied_fields() {
        let state = AppState::fake();
        create_teacher(&state, create_req("t1", "a@b.com", "pw"))
            .await
            .unwrap();
        let mut other = create_req("t2", "c@d.com", "pw");
        other.last_name = "M".into();
        create_teacher(&state, other).await.unwrap();

        let found = custom_get_teacher(
            &state,
            TeacherFilter {
                first_name: Some("Alina".into()),
                last_name: Some("M".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.teacher_id, "t2");

        let err = custom_get_teacher(
            &state,
            TeacherFilter {
                first_name: Some("Nobody".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = custom_get_teacher(&state, TeacherFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let state = AppState::fake();
        create_teacher(&state, create_req("t1", "a@b.com", "pw"))
            .await
            .unwrap();
        assert!(delete_teacher(&state, "t1").await.unwrap());
        let err = get_teacher(&state, "t1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn custom_delete_removes_one_matching_teacher() {
        let state = AppState::fake();
        create_teacher(&state, create_req("t1", "a@b.com", "pw"))
            .await
            .unwrap();
        create_teacher(&state, create_req("t2", "c@d.com", "pw"))
            .await
            .unwrap();

        let deleted = custom_delete_teacher(
            &state,
            TeacherFilter {
                first_name: Some("Alina".into()),
                email_address: Some("c@d.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(deleted);
        assert!(get_teacher(&state, "t2").await.is_err());
        assert!(get_teacher(&state, "t1").await.is_ok());

        let missed = custom_delete_teacher(
            &state,
            TeacherFilter {
                last_name: Some("Nobody".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!missed);

        let err = custom_delete_teacher(&state, TeacherFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn racing_insert_with_taken_id_or_email_is_a_conflict() {
        let state = AppState::fake();
        create_teacher(&state, create_req("t1", "a@b.com", "pw"))
            .await
            .unwrap();
        let row = |id: &str, email: &str| Teacher {
            teacher_id: id.into(),
            first_name: String::new(),
            preferred_name: String::new(),
            last_name: String::new(),
            native_language: String::new(),
            preferred_language: String::new(),
            email_address: email.into(),
            password_hash: String::new(),
            salt: String::new(),
            profile_picture_url: String::new(),
            profile_picture_path: String::new(),
            theme_mode: String::new(),
            font_style: String::new(),
            time_zone: String::new(),
            lessons_taught: 0,
        };

        let cases = [
            (row("t1", "x@y.com"), "teacherID"),
            (row("t9", "a@b.com"), "Email"),
        ];
        for (teacher, field) in cases {
            let err: AppError = state.teachers.insert(&teacher).await.unwrap_err().into();
            match err {
                AppError::Conflict(msg) => assert_eq!(msg, format!("{field} already registered")),
                other => panic!("expected conflict, got {other:?}"),
            }
        }
    }
}
