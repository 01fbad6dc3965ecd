// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use mockito::Matcher;
use orgview_core::domain::config::BackendConfig;
use orgview_core::domain::workflow::TerminateEmployee;
use orgview_core::{
    Backend, BackendError, HttpBackend, ReadRequest, StoreContext, SubmitError, ValidityFilter,
    WriteRequest,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

#[tokio::test]
async fn test_fetch_sends_query_and_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let id = Uuid::new_v4();

    let mock = server
        .mock("GET", format!("/service/e/{}/details/employee", id).as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("validity".into(), "present".into()),
            Matcher::UrlEncoded("at".into(), "2020-01-01".into()),
            Matcher::UrlEncoded("foo".into(), "bar".into()),
        ]))
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{"uuid": id.to_string(), "name": "Anders And"}]).to_string())
        .create_async()
        .await;

    let backend =
        assert_ok!(HttpBackend::new(format!("{}/service/", server.url()))).with_api_token("secret");
    let context = StoreContext::new(Arc::new(backend));
    context
        .as_of()
        .set(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    let employees = context.employee_store().unwrap();

    let record = assert_ok!(
        employees
            .fetch(id, ValidityFilter::Present, &[("foo", "bar")])
            .await
    );

    assert_eq!(record.get("name"), Some(&json!("Anders And")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_terminate_posts_json_body() {
    let mut server = mockito::Server::new_async().await;
    let id = Uuid::new_v4();

    let mock = server
        .mock("POST", format!("/e/{}/terminate", id).as_str())
        .match_body(Matcher::Json(json!({"validity": {"to": "2020-12-31"}})))
        .with_status(200)
        .with_body(json!(id.to_string()).to_string())
        .create_async()
        .await;

    let config = BackendConfig {
        base_url: server.url(),
        api_token: None,
        timeout_seconds: 5,
    };
    let backend = assert_ok!(HttpBackend::from_config(&config));
    let context = StoreContext::new(Arc::new(backend));
    let module = context.workflow::<TerminateEmployee>().unwrap();

    module.update_field("uuid", json!(id)).unwrap();
    module.update_field("validity.to", json!("2020-12-31")).unwrap();
    let response = assert_ok!(module.submit().await);

    assert_eq!(response, json!(id.to_string()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let mut server = mockito::Server::new_async().await;
    let rejection = json!({"error": true, "status": 400, "description": "Missing org_unit"});

    server
        .mock("POST", "/details/edit")
        .with_status(400)
        .with_body(rejection.to_string())
        .create_async()
        .await;

    let backend = assert_ok!(HttpBackend::new(server.url()));
    let err = assert_err!(backend.post(WriteRequest::details_edit(vec![json!({})])).await);

    assert_eq!(
        err,
        BackendError::Status {
            status: 400,
            body: rejection
        }
    );
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept_as_string() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/configuration")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let backend = assert_ok!(HttpBackend::new(server.url()));
    let err = assert_err!(backend.get(ReadRequest::configuration()).await);

    assert_eq!(
        err,
        BackendError::Status {
            status: 502,
            body: Value::String("Bad Gateway".to_string())
        }
    );
}

#[tokio::test]
async fn test_empty_success_body_decodes_to_null() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/details/create")
        .with_status(200)
        .create_async()
        .await;

    let backend = assert_ok!(HttpBackend::new(server.url()));
    let body = assert_ok!(backend.post(WriteRequest::details_create(Vec::new())).await);

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    // Nothing listens on port 9 locally.
    let backend = assert_ok!(HttpBackend::new("http://127.0.0.1:9"));
    let context = StoreContext::new(Arc::new(backend));
    let module = context.workflow::<TerminateEmployee>().unwrap();

    module.update_field("uuid", json!(Uuid::new_v4())).unwrap();
    module.update_field("validity.to", json!("2020-12-31")).unwrap();

    let err = assert_err!(module.submit().await);
    assert!(matches!(err, SubmitError::Backend(BackendError::Transport(_))));
    assert_eq!(context.log().errors().len(), 1);
}
