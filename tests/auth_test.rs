mod common;

use axum::http::StatusCode;
use uuid::Uuid;

use common::{location, Factory, TestApp, TestSession, TEST_CSRF_TOKEN};

#[tokio::test]
async fn test_sign_in_form_renders_for_visitors() {
    let app = TestApp::new().await;

    let response = app.server.get("/signin").await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("name=\"authenticity_token\""));
    assert!(body.contains("Sign in"));
    // A fresh visitor gets a session carrying the form's token
    assert!(app.session_of(&response).is_some());
}

#[tokio::test]
async fn test_sign_in_success_redirects_to_profile() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.anonymous_session();

    let response = app
        .server
        .post("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .form(&[
            ("authenticity_token", TEST_CSRF_TOKEN),
            ("email", member.user.email.as_str()),
            ("password", member.password.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(location(&response), format!("/users/{}", member.user.id));

    let data = app.session_of(&response).expect("session cookie");
    assert_eq!(data.current_user_id, Some(member.user.id));
    assert_ne!(data.csrf_token, TEST_CSRF_TOKEN);
    assert_eq!(app.flashes_of(&response), vec!["You are logged in."]);
}

#[tokio::test]
async fn test_sign_in_email_is_case_insensitive() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let user = factory
        .create_user_with_email("Casey@Example.com", "secret-pass")
        .await;
    let session = factory.anonymous_session();

    let response = app
        .server
        .post("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("email", "  CASEY@example.COM "), ("password", "secret-pass")])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(location(&response), format!("/users/{}", user.id));
}

#[tokio::test]
async fn test_sign_in_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.anonymous_session();

    let wrong_password = app
        .server
        .post("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("email", member.user.email.as_str()), ("password", "nope")])
        .await;

    let unknown_email = app
        .server
        .post("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("email", "nobody@example.com"), ("password", "nope")])
        .await;

    wrong_password.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    unknown_email.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(wrong_password.text().contains("email: invalid email"));
    assert!(unknown_email.text().contains("email: invalid email"));

    // No login happened
    let data = app.session_of(&wrong_password);
    assert!(data.map_or(true, |d| d.current_user_id.is_none()));
}

#[tokio::test]
async fn test_sign_in_form_sends_signed_in_users_to_their_profile() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .get("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(location(&response), format!("/users/{}", member.user.id));
    assert_eq!(app.flashes_of(&response), vec!["You are logged in"]);
}

#[tokio::test]
async fn test_stale_session_is_treated_as_anonymous() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let session = factory.session_for(Some(Uuid::new_v4()));

    let response = app
        .server
        .get("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .await;

    response.assert_status(StatusCode::OK);
    let data = app.session_of(&response).expect("session rewritten");
    assert_eq!(data.current_user_id, None);
}

#[tokio::test]
async fn test_sign_out_clears_the_session() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post("/signout")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let data = app.session_of(&response).expect("session cookie");
    assert_eq!(data.current_user_id, None);
    assert_eq!(app.flashes_of(&response), vec!["You have been logged out!"]);
}

#[tokio::test]
async fn test_sign_out_accepts_delete() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .delete("/signout")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(app.session_of(&response).unwrap().current_user_id, None);
}

#[tokio::test]
async fn test_unsafe_requests_without_csrf_token_are_forbidden() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.anonymous_session();

    let missing = app
        .server
        .post("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .form(&[
            ("email", member.user.email.as_str()),
            ("password", member.password.as_str()),
        ])
        .await;
    missing.assert_status(StatusCode::FORBIDDEN);

    let wrong = app
        .server
        .post("/signin")
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .form(&[
            ("authenticity_token", "forged"),
            ("email", member.user.email.as_str()),
            ("password", member.password.as_str()),
        ])
        .await;
    wrong.assert_status(StatusCode::FORBIDDEN);
    assert!(wrong.text().contains("Invalid authenticity token"));
}
