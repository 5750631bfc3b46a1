use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::{json, Value};
use student_management_backend::models::user::{User, UserRole};
use tower::ServiceExt;

mod support;

use support::{
    bearer_for, body_json, empty_request, integration_guard, json_request, seed_user, test_app,
    test_pool,
};

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    actor: &User,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let token = bearer_for(actor);
    let request = match body {
        Some(body) => json_request(method, uri, Some(&token), body),
        None => empty_request(method, uri, Some(&token)),
    };
    let response = app.clone().oneshot(request).await.expect("call app");
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn duplicate_classes_and_subject_codes_conflict() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let admin = seed_user(&pool, UserRole::Admin).await;

    let class = json!({ "name": "Grade 5", "section": "A" });
    let (status, _) = send(&app, Method::POST, "/api/classes", &admin, Some(class.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/api/classes", &admin, Some(class)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/classes",
        &admin,
        Some(json!({ "name": "Grade 5", "section": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let subject = json!({ "name": "Mathematics", "code": "MATH-101" });
    let (status, _) = send(&app, Method::POST, "/api/subjects", &admin, Some(subject)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/subjects",
        &admin,
        Some(json!({ "name": "Maths again", "code": "MATH-101" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn student_profiles_require_a_student_user() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let teacher = seed_user(&pool, UserRole::Teacher).await;
    let student = seed_user(&pool, UserRole::Student).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/students",
        &teacher,
        Some(json!({ "user_id": teacher.id, "roll_no": "R-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/students",
        &teacher,
        Some(json!({ "user_id": uuid::Uuid::new_v4(), "roll_no": "R-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        &teacher,
        Some(json!({ "user_id": student.id, "roll_no": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["errors"], json!(["roll_no: blank"]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        &teacher,
        Some(json!({ "user_id": student.id, "roll_no": "R-1", "gender": "F" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], json!(student.username));
    assert_eq!(body["is_active"], true);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/students",
        &teacher,
        Some(json!({ "user_id": student.id, "roll_no": "R-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn students_only_see_their_own_profile() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let admin = seed_user(&pool, UserRole::Admin).await;
    let alice = seed_user(&pool, UserRole::Student).await;
    let bob = seed_user(&pool, UserRole::Student).await;

    let mut profile_ids = Vec::new();
    for (student, roll_no) in [(&alice, "A-1"), (&bob, "B-1")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/students",
            &admin,
            Some(json!({ "user_id": student.id, "roll_no": roll_no })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        profile_ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(&app, Method::GET, "/api/students", &alice, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["roll_no"], "A-1");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/students/{}", profile_ids[0]),
        &alice,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/students/{}", profile_ids[1]),
        &alice,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{}", profile_ids[0]),
        &alice,
        Some(json!({ "address": "Somewhere" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn enrollments_reject_duplicates_and_unknown_references() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let admin = seed_user(&pool, UserRole::Admin).await;
    let teacher = seed_user(&pool, UserRole::Teacher).await;
    let student_user = seed_user(&pool, UserRole::Student).await;

    let (_, student) = send(
        &app,
        Method::POST,
        "/api/students",
        &admin,
        Some(json!({ "user_id": student_user.id, "roll_no": "E-1" })),
    )
    .await;
    let (_, class) = send(
        &app,
        Method::POST,
        "/api/classes",
        &admin,
        Some(json!({ "name": "Grade 6", "section": "C" })),
    )
    .await;
    let enrollment = json!({ "student_id": student["id"], "class_id": class["id"] });

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/enrollments",
        &teacher,
        Some(enrollment.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["active"], true);

    let (status, _) = send(&app, Method::POST, "/api/enrollments", &teacher, Some(enrollment)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/enrollments",
        &teacher,
        Some(json!({ "student_id": uuid::Uuid::new_v4(), "class_id": class["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/enrollments?class_id={}", class["id"].as_str().unwrap()),
        &teacher,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/enrollments/{}", created["id"].as_str().unwrap()),
        &teacher,
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (status, _) = send(&app, Method::GET, "/api/enrollments", &student_user, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn class_subject_links_follow_reference_rules() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let admin = seed_user(&pool, UserRole::Admin).await;
    let student = seed_user(&pool, UserRole::Student).await;

    let (_, class) = send(
        &app,
        Method::POST,
        "/api/classes",
        &admin,
        Some(json!({ "name": "Grade 7", "section": "A" })),
    )
    .await;
    let (_, subject) = send(
        &app,
        Method::POST,
        "/api/subjects",
        &admin,
        Some(json!({ "name": "Science", "code": "SCI-7" })),
    )
    .await;
    let class_id = class["id"].as_str().unwrap();
    let link_uri = format!("/api/classes/{}/subjects", class_id);

    let (status, link) = send(
        &app,
        Method::POST,
        &link_uri,
        &admin,
        Some(json!({ "subject_id": subject["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["subject_code"], "SCI-7");

    let (status, _) = send(
        &app,
        Method::POST,
        &link_uri,
        &admin,
        Some(json!({ "subject_id": subject["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        &link_uri,
        &admin,
        Some(json!({ "subject_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/classes/{}/subjects", uuid::Uuid::new_v4()),
        &admin,
        Some(json!({ "subject_id": subject["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, &link_uri, &student, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/class-subjects/{}", link["id"].as_str().unwrap()),
        &student,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/class-subjects/{}", link["id"].as_str().unwrap()),
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn reference_writes_are_role_gated_and_missing_records_are_not_found() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let app = test_app(pool.clone());
    let admin = seed_user(&pool, UserRole::Admin).await;
    let teacher = seed_user(&pool, UserRole::Teacher).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/subjects",
        &teacher,
        Some(json!({ "name": "History", "code": "HIS-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/teachers",
        &admin,
        Some(json!({ "user_id": teacher.id, "experience_years": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/teachers",
        &admin,
        Some(json!({ "user_id": teacher.id, "qualification": "MSc" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["experience_years"], 0);

    let (status, body) = send(&app, Method::GET, "/api/teachers", &teacher, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    for uri in [
        format!("/api/subjects/{}", uuid::Uuid::new_v4()),
        format!("/api/classes/{}", uuid::Uuid::new_v4()),
        format!("/api/enrollments/{}", uuid::Uuid::new_v4()),
        format!("/api/class-subjects/{}", uuid::Uuid::new_v4()),
    ] {
        let (status, _) = send(&app, Method::DELETE, &uri, &admin, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}
