use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{chats, config::AppConfig, lessons, registrations, state::AppState, students, teachers};

pub fn build_app(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.uploads_dir);

    Router::new()
        .merge(registrations::router())
        .merge(students::router())
        .merge(teachers::router())
        .merge(lessons::router())
        .merge(chats::router())
        .route("/health", get(|| async { "ok" }))
        .nest_service("/uploads/profileImages", uploads)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn student(email: &str) -> Value {
        json!({
            "first_name": "Ada",
            "preferred_name": "Ada",
            "last_name": "Lovelace",
            "email_address": email,
            "password": "s3cret",
            "theme_mode": "dark",
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        assert_eq!(call(&app, Method::GET, "/health", None).await, (StatusCode::OK, "ok".into()));
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let app = build_app(AppState::fake());
        let (status, _) = call(&app, Method::GET, "/students/create", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _) = call(&app, Method::POST, "/lessons", Some(json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method(Method::POST)
            .uri("/students/create")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::PUT,
            "/lessons/update",
            Some(json!({ "lessonID": "x", "room": "seven" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn student_lifecycle_over_http_never_exposes_secrets() {
        let app = build_app(AppState::fake());

        let (status, body) =
            call(&app, Method::POST, "/students/create", Some(student("ada@example.com"))).await;
        assert_eq!(status, StatusCode::OK);
        let id = serde_json::from_str::<Value>(&body).unwrap()["student_id"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, body) = call(
            &app,
            Method::POST,
            "/validate/login",
            Some(json!({ "email_address": "ada@example.com", "password": "s3cret" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["student_id"], json!(id));
        assert_eq!(v["email_address"], json!("ada@example.com"));
        assert!(v.get("student_info").is_none() && v.get("is_valid").is_none());

        let (status, _) = call(
            &app,
            Method::POST,
            "/validate/login",
            Some(json!({ "email_address": "ada@example.com", "password": "s3cretx" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(
            &app,
            Method::PUT,
            "/students/update",
            Some(json!({ "student_id": id, "theme_mode": "light", "first_name": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["theme_mode"], json!("light"));
        assert_eq!(v["first_name"], json!("Ada"));

        let (status, list) = call(&app, Method::GET, "/students?page=1&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, one) = call(&app, Method::GET, &format!("/students/get?student_id={id}"), None).await;
        for body in [&list, &one] {
            assert!(!body.contains("password"), "{body}");
            assert!(!body.contains("salt"), "{body}");
        }

        let (status, body) = call(
            &app,
            Method::DELETE,
            "/students/delete",
            Some(json!({ "student_id": id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["is_deleted"], json!(true));

        let (status, _) = call(&app, Method::GET, &format!("/students/get?student_id={id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_reports_requested_page_and_rejects_bad_windows() {
        let app = build_app(AppState::fake());
        let (status, body) = call(&app, Method::GET, "/teachers?page=3&limit=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["page"], json!(3));

        for bad in ["limit=0", "limit=101", "page=0", "page=1000001", "limit=ten"] {
            let (status, _) = call(&app, Method::GET, &format!("/lessons?{bad}"), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        }
        let (status, _) = call(&app, Method::GET, "/lessons?page=1000000&limit=100", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn teacher_login_with_supplied_id() {
        let app = build_app(AppState::fake());
        let (status, _) = call(
            &app,
            Method::POST,
            "/teachers/create",
            Some(json!({ "teacherID": "t1", "email_address": "a@b.com", "password": "hunter2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &app,
            Method::POST,
            "/teachers/validate/login",
            Some(json!({ "email_address": "a@b.com", "password": "hunter2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["teacherID"], json!("t1"));
        assert_eq!(v["email_address"], json!("a@b.com"));
        assert!(!body.contains("hash"));

        let (status, _) = call(
            &app,
            Method::POST,
            "/teachers/validate/login",
            Some(json!({ "email_address": "a@b.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, Method::DELETE, "/teachers/delete?teacherID=t1", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::GET, "/teachers/get?teacherID=t1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn teacher_custom_delete_over_http() {
        let app = build_app(AppState::fake());
        for (id, email) in [("t1", "a@b.com"), ("t2", "c@d.com")] {
            let (status, _) = call(
                &app,
                Method::POST,
                "/teachers/create",
                Some(json!({ "teacherID": id, "email_address": email, "password": "pw" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call(
            &app,
            Method::DELETE,
            "/teachers/delete/custom",
            Some(json!({ "email_address": "C@D.com", "first_name": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["is_deleted"], json!(true));
        let (status, _) = call(&app, Method::GET, "/teachers/get?teacherID=t2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::GET, "/teachers/get?teacherID=t1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) =
            call(&app, Method::DELETE, "/teachers/delete/custom", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/teachers/create",
            Some(json!({ "teacherID": "t1", "email_address": "e@f.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn external_login_is_unavailable_without_provider() {
        let app = build_app(AppState::fake());
        let (status, _) = call(
            &app,
            Method::POST,
            "/validate/login/external",
            Some(json!({ "id_token": "anything" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn registration_validation_answers_for_unknown_codes() {
        let app = build_app(AppState::fake());
        let (status, body) = call(
            &app,
            Method::POST,
            "/registration/create",
            Some(json!({
                "registration_code": "abcd-1234",
                "first_name": "Bob",
                "last_name": "Smith",
                "email_address": "bob@example.com",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["is_valid"], json!(true));

        let (_, body) = call(
            &app,
            Method::POST,
            "/validate/registration",
            Some(json!({ "registration_code": "abcd-1234" })),
        )
        .await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["is_valid"], json!(true));
        assert_eq!(v["first_name"], json!("Bob"));

        let (status, body) = call(
            &app,
            Method::POST,
            "/validate/registration",
            Some(json!({ "registration_code": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["is_valid"], json!(false));
        assert_eq!(v["email_address"], json!(""));
    }

    #[tokio::test]
    async fn chat_room_and_messages_over_http() {
        let app = build_app(AppState::fake());
        let (_, body) = call(
            &app,
            Method::POST,
            "/chats/rooms/create",
            Some(json!({ "name": "lesson", "memberIds": ["u1", "u2"] })),
        )
        .await;
        let room: Value = serde_json::from_str(&body).unwrap();
        let room_id = room["room"]["roomId"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            Method::POST,
            "/chats/messages/send",
            Some(json!({ "roomId": room_id, "senderId": "u1", "body": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, Method::GET, &format!("/chats/messages?roomId={room_id}"), None).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["messages"][0]["body"], json!("hi"));
        assert_eq!(v["messages"][0]["editedAt"], Value::Null);
        assert_eq!(v["page"], json!(1));

        let (_, body) = call(&app, Method::GET, "/chats/rooms?userId=u2", None).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["rooms"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lesson_filters_parse_from_query() {
        let app = build_app(AppState::fake());
        let (status, _) = call(
            &app,
            Method::POST,
            "/lessons/create",
            Some(json!({ "teacherID": "t1", "student_id": "s1", "subject": "Math", "scheduled_date_time": 1, "room": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, Method::GET, "/lessons?isCanceled=false&isCompleted=false&ID=s1", None).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["lessons"].as_array().unwrap().len(), 1);
        assert_eq!(v["lessons"][0]["teacherID"], json!("t1"));

        let (_, body) = call(&app, Method::GET, "/lessons?isCanceled=true", None).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert!(v["lessons"].as_array().unwrap().is_empty());
    }
}
