mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use time::macros::datetime;

use common::{location, Factory, TestApp, TestSession};
use timesheet::entity::contract;
use timesheet::repositories::{ContractRepository, TaskRepository};

#[tokio::test]
async fn test_create_contract() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!("/users/{}/contracts", member.user.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("boss_id", boss.id.to_string()), ("rate", "45".to_string())])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/users/{}", member.user.id));
    assert_eq!(app.flashes_of(&response), vec!["Contract created."]);

    let contracts = ContractRepository::list_by_user(&app.state.db, member.user.id)
        .await
        .unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].contract.rate, 45);
    assert_eq!(contracts[0].boss.name, "Acme Corp");
}

#[tokio::test]
async fn test_duplicate_contract_is_rejected() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    factory.create_contract(member.user.id, boss.id, 30).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!("/users/{}/contracts", member.user.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("boss_id", boss.id.to_string()), ("rate", "50".to_string())])
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Contract already exists."));
    assert!(body.contains("New contract"));

    let count = contract::Entity::find()
        .filter(contract::Column::UserId.eq(member.user.id))
        .filter(contract::Column::BossId.eq(boss.id))
        .count(&app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_same_boss_may_contract_different_users() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let other = factory.create_user().await;
    let boss = factory.create_boss("Shared Boss").await;
    factory.create_contract(other.user.id, boss.id, 30).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!("/users/{}/contracts", member.user.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("boss_id", boss.id.to_string()), ("rate", "30".to_string())])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_contract_with_unknown_boss_rerenders_form() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!("/users/{}/contracts", member.user.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("boss_id", "9999"), ("rate", "30")])
        .await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("Cannot find that Employer."));
}

#[tokio::test]
async fn test_contract_form_validation() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!("/users/{}/contracts", member.user.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("boss_id", ""), ("rate", "-5")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text();
    assert!(body.contains("Employer can not be blank."));
    assert!(body.contains("Rate can not be negative."));
}

#[tokio::test]
async fn test_new_contract_form_presets_boss() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    factory.create_boss("Alpha").await;
    let boss = factory.create_boss("Beta").await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .get(&format!("/users/{}/contracts/new", member.user.id))
        .add_query_param("bid", boss.id)
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains(&format!("value=\"{}\" selected", boss.id)));
    assert!(body.contains("Alpha"));
}

#[tokio::test]
async fn test_contracts_index_lists_user_contracts() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let other = factory.create_user().await;
    let mine = factory.create_boss("Mine Inc").await;
    let theirs = factory.create_boss("Theirs Ltd").await;
    factory.create_contract(member.user.id, mine.id, 25).await;
    factory.create_contract(other.user.id, theirs.id, 25).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .get(&format!("/users/{}/contracts", member.user.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Mine Inc"));
    assert!(!body.contains("Theirs Ltd"));
}

#[tokio::test]
async fn test_contract_page_lists_tasks_chronologically() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let contract = factory.create_contract(member.user.id, boss.id, 60).await;

    // Inserted out of order
    factory
        .create_task(contract.id, "third task", datetime!(2024-03-03 09:00 UTC), 30)
        .await;
    factory
        .create_task(contract.id, "first task", datetime!(2024-03-01 09:00 UTC), 90)
        .await;
    factory
        .create_task(contract.id, "second task", datetime!(2024-03-02 09:00 UTC), 60)
        .await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .get(&format!("/users/{}/contracts/{}", member.user.id, contract.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.text();
    let first = body.find("first task").unwrap();
    let second = body.find("second task").unwrap();
    let third = body.find("third task").unwrap();
    assert!(first < second && second < third);

    assert!(body.contains("1h 30m"));
    // 180 minutes, each task billed at 20/h
    assert!(body.contains("class=\"total-time\">3h<"));
    assert!(body.contains("class=\"total-earned\">60<"));
}

#[tokio::test]
async fn test_load_contract_orders_tasks_stably() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let contract = factory.create_contract(member.user.id, boss.id, 60).await;

    let late = factory
        .create_task(contract.id, "late", datetime!(2024-05-01 17:00 UTC), 10)
        .await;
    let tie_a = factory
        .create_task(contract.id, "tie a", datetime!(2024-05-01 08:00 UTC), 10)
        .await;
    let tie_b = factory
        .create_task(contract.id, "tie b", datetime!(2024-05-01 08:00 UTC), 10)
        .await;
    let early = factory
        .create_task(contract.id, "early", datetime!(2024-04-30 08:00 UTC), 10)
        .await;

    let detail = ContractRepository::load_contract(&app.state.db, contract.id)
        .await
        .unwrap();

    let ids: Vec<i32> = detail.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![early.id, tie_a.id, tie_b.id, late.id]);
    assert_eq!(detail.user.id, member.user.id);
    assert_eq!(detail.boss.name, "Acme Corp");
}

#[tokio::test]
async fn test_contract_of_another_user_is_not_shown() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let other = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let foreign = factory.create_contract(other.user.id, boss.id, 60).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .get(&format!("/users/{}/contracts/{}", member.user.id, foreign.id))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), format!("/users/{}", member.user.id));
    assert_eq!(app.flashes_of(&response), vec!["Cannot find that contract."]);
}

#[tokio::test]
async fn test_create_task_with_defaults() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let contract = factory.create_contract(member.user.id, boss.id, 35).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!(
            "/users/{}/contracts/{}/task/create",
            member.user.id, contract.id
        ))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("description", "Quick call")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/users/{}/contracts/{}", member.user.id, contract.id)
    );
    assert_eq!(app.flashes_of(&response), vec!["Task created successfully"]);

    let tasks = TaskRepository::list_by_contract(&app.state.db, contract.id)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "Quick call");
    assert_eq!(tasks[0].rate, 35);
    assert_eq!(tasks[0].duration, 0);
}

#[tokio::test]
async fn test_create_task_derives_duration_from_times() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let contract = factory.create_contract(member.user.id, boss.id, 35).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!(
            "/users/{}/contracts/{}/task/create",
            member.user.id, contract.id
        ))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[
            ("description", "Workshop"),
            ("start_time", "2024-06-01T09:00"),
            ("end_time", "2024-06-01T10:30"),
            ("rate", "50"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);

    let tasks = TaskRepository::list_by_contract(&app.state.db, contract.id)
        .await
        .unwrap();
    assert_eq!(tasks[0].duration, 90);
    assert_eq!(tasks[0].rate, 50);
    assert_eq!(tasks[0].start_time, datetime!(2024-06-01 09:00 UTC));
}

#[tokio::test]
async fn test_create_task_with_bad_time_rerenders_contract() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let member = factory.create_user().await;
    let boss = factory.create_boss("Acme Corp").await;
    let contract = factory.create_contract(member.user.id, boss.id, 35).await;
    let session = factory.session_for(Some(member.user.id));

    let response = app
        .server
        .post(&format!(
            "/users/{}/contracts/{}/task/create",
            member.user.id, contract.id
        ))
        .add_header(TestSession::cookie_name(), session.cookie_value())
        .add_header(TestSession::csrf_name(), session.csrf_value())
        .form(&[("description", "Broken"), ("start_time", "yesterday")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response
        .text()
        .contains("Start time is not a valid date and time."));

    let tasks = TaskRepository::list_by_contract(&app.state.db, contract.id)
        .await
        .unwrap();
    assert!(tasks.is_empty());
}
