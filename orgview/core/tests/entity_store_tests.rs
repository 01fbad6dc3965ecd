// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

mod common;

use chrono::NaiveDate;
use common::FakeBackend;
use orgview_core::domain::config::StoreSettings;
use orgview_core::domain::namespace::NamespaceError;
use orgview_core::{
    BackendError, FetchError, FetchPolicy, LogKind, StoreContext, StoreModule, ValidityFilter,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Arc<FakeBackend>, StoreContext) {
    let backend = Arc::new(FakeBackend::new());
    let context = StoreContext::new(backend.clone());
    (backend, context)
}

#[tokio::test]
async fn test_fetch_url_carries_as_of_date_and_extras() {
    let (backend, context) = setup();
    let employees = context.employee_store().unwrap();
    let id = Uuid::new_v4();
    context.as_of().set(date(2020, 1, 1));

    backend.reply_read(Ok(json!([{"uuid": id.to_string(), "name": "Anders And"}])));
    let record = employees.fetch(id, ValidityFilter::Present, &[]).await.unwrap();

    backend.reply_read(Ok(json!({"uuid": id.to_string()})));
    employees
        .fetch(id, ValidityFilter::Present, &[("foo", "bar")])
        .await
        .unwrap();

    let reads = backend.reads();
    assert_eq!(
        reads[0].path_and_query(),
        format!("/e/{}/details/employee?validity=present&at=2020-01-01", id)
    );
    assert_eq!(
        reads[1].path_and_query(),
        format!("/e/{}/details/employee?validity=present&at=2020-01-01&foo=bar", id)
    );
    assert_eq!(record.uuid(), Some(id));
    assert_eq!(record.get("name"), Some(&json!("Anders And")));
}

#[tokio::test]
async fn test_fetch_uses_date_current_at_call_time() {
    let (backend, context) = setup();
    let employees = Arc::new(context.employee_store().unwrap());
    let id = Uuid::new_v4();

    context.as_of().set(date(2020, 1, 1));
    let gate = backend.gate_read();

    let task = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };

    backend.wait_for_reads(1).await;
    context.as_of().set(date(2021, 6, 1));
    gate.send(Ok(json!({"uuid": id.to_string()}))).unwrap();

    task.await.unwrap().unwrap();
    assert_eq!(backend.reads()[0].query_value("at"), Some("2020-01-01"));
    assert_eq!(context.as_of().get(), date(2021, 6, 1));
}

#[tokio::test]
async fn test_patch_field_never_calls_backend() {
    let (backend, context) = setup();
    let units = context.org_unit_store().unwrap();

    units.patch_field("name", json!("Borgmesterens Afdeling"));
    units.patch_field("validity.from", json!("2020-01-01"));

    assert!(backend.reads().is_empty());
    assert!(backend.writes().is_empty());
    assert_eq!(units.current().get("name"), Some(&json!("Borgmesterens Afdeling")));
    assert_eq!(units.current().validity().unwrap().from, Some(date(2020, 1, 1)));
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_record() {
    let (backend, context) = setup();
    let employees = context.employee_store().unwrap();
    let id = Uuid::new_v4();

    backend.reply_read(Ok(json!({"uuid": id.to_string(), "name": "Anders And"})));
    let before = employees.fetch(id, ValidityFilter::Present, &[]).await.unwrap();

    backend.reply_read(Err(BackendError::Transport("connection refused".to_string())));
    let err = employees
        .fetch(id, ValidityFilter::Present, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Backend(BackendError::Transport(_))));
    assert_eq!(employees.current(), before);
    assert_eq!(employees.last_error(), Some(err));
    assert!(!employees.is_loading());

    let errors = context.log().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].tag(), "employee/fetch");
    assert_eq!(errors[0].kind(), LogKind::Error);
    assert!(context.log().works().is_empty());
}

#[tokio::test]
async fn test_domain_rejection_on_fetch_is_a_failure() {
    let (backend, context) = setup();
    let employees = context.employee_store().unwrap();

    let body = json!({"error": true, "description": "No such employee"});
    backend.reply_read(Ok(body.clone()));

    let err = employees
        .fetch(Uuid::new_v4(), ValidityFilter::Present, &[])
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Backend(BackendError::Rejected(body.clone())));
    assert!(employees.current().is_empty());
    assert_eq!(context.log().errors()[0].payload(), &body);
}

#[tokio::test]
async fn test_overlapping_fetches_apply_in_arrival_order() {
    let (backend, context) = setup();
    let employees = Arc::new(context.employee_store().unwrap());
    let id = Uuid::new_v4();

    let first_gate = backend.gate_read();
    let second_gate = backend.gate_read();

    let first = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };
    backend.wait_for_reads(1).await;

    let second = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };
    backend.wait_for_reads(2).await;
    assert!(employees.is_loading());

    second_gate.send(Ok(json!({"name": "newer"}))).unwrap();
    second.await.unwrap().unwrap();
    first_gate.send(Ok(json!({"name": "older"}))).unwrap();
    first.await.unwrap().unwrap();

    // The slow, earlier response arrived last and wins.
    assert_eq!(employees.current().get("name"), Some(&json!("older")));
    assert!(!employees.is_loading());
}

#[tokio::test]
async fn test_discard_stale_policy_fences_old_responses() {
    let backend = Arc::new(FakeBackend::new());
    let settings = StoreSettings {
        fetch_policy: FetchPolicy::DiscardStale,
        ..StoreSettings::default()
    };
    let context = StoreContext::with_settings(backend.clone(), settings);
    let employees = Arc::new(context.employee_store().unwrap());
    let id = Uuid::new_v4();

    let first_gate = backend.gate_read();
    let second_gate = backend.gate_read();

    let first = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };
    backend.wait_for_reads(1).await;

    let second = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };
    backend.wait_for_reads(2).await;

    second_gate.send(Ok(json!({"name": "newer"}))).unwrap();
    second.await.unwrap().unwrap();
    first_gate.send(Ok(json!({"name": "older"}))).unwrap();

    assert_eq!(first.await.unwrap(), Err(FetchError::Superseded));
    assert_eq!(employees.current().get("name"), Some(&json!("newer")));
    assert!(context.log().errors().is_empty());
}

#[tokio::test]
async fn test_discard_stale_policy_drops_late_failures() {
    let backend = Arc::new(FakeBackend::new());
    let settings = StoreSettings {
        fetch_policy: FetchPolicy::DiscardStale,
        ..StoreSettings::default()
    };
    let context = StoreContext::with_settings(backend.clone(), settings);
    let employees = Arc::new(context.employee_store().unwrap());
    let id = Uuid::new_v4();

    let first_gate = backend.gate_read();
    let second_gate = backend.gate_read();

    let first = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };
    backend.wait_for_reads(1).await;

    let second = {
        let employees = Arc::clone(&employees);
        tokio::spawn(async move { employees.fetch(id, ValidityFilter::Present, &[]).await })
    };
    backend.wait_for_reads(2).await;

    second_gate.send(Ok(json!({"name": "newer"}))).unwrap();
    second.await.unwrap().unwrap();
    first_gate
        .send(Err(BackendError::Transport("late".to_string())))
        .unwrap();

    assert_eq!(first.await.unwrap(), Err(FetchError::Superseded));
    assert_eq!(employees.last_error(), None);
    assert!(context.log().errors().is_empty());
    assert_eq!(employees.current().get("name"), Some(&json!("newer")));
    assert!(!employees.is_loading());
}

#[tokio::test]
async fn test_fetch_detail_is_kept_per_validity() {
    let (backend, context) = setup();
    let employees = context.employee_store().unwrap();
    let id = Uuid::new_v4();
    context.as_of().set(date(2020, 1, 1));

    backend.reply_read(Ok(json!([{"type": "engagement"}])));
    employees
        .fetch_detail(id, "engagement", ValidityFilter::Future, &[])
        .await
        .unwrap();

    assert_eq!(
        backend.reads()[0].path_and_query(),
        format!("/e/{}/details/engagement?validity=future&at=2020-01-01", id)
    );
    assert_eq!(
        employees.detail("engagement", ValidityFilter::Future),
        Some(json!([{"type": "engagement"}]))
    );
    assert_eq!(employees.detail("engagement", ValidityFilter::Present), None);

    employees.reset();
    assert_eq!(employees.detail("engagement", ValidityFilter::Future), None);
}

#[tokio::test]
async fn test_reset_clears_record_and_error() {
    let (backend, context) = setup();
    let units = context.org_unit_store().unwrap();

    backend.reply_read(Err(BackendError::Transport("down".to_string())));
    let _ = units.fetch(Uuid::new_v4(), ValidityFilter::Past, &[]).await;
    units.patch_field("name", json!("x"));

    units.reset();
    assert!(units.current().is_empty());
    assert!(units.last_error().is_none());
    assert!(backend.reads()[0].path().starts_with("/ou/"));
}

#[tokio::test]
async fn test_configuration_store_fetches_settings() {
    let (backend, context) = setup();
    let configuration = context.configuration_store().unwrap();

    backend.reply_read(Ok(json!({"show_roles": true, "show_user_key": false})));
    configuration.fetch().await.unwrap();

    assert_eq!(backend.reads()[0].path_and_query(), "/configuration");
    assert_eq!(configuration.setting("show_roles"), Some(json!(true)));

    backend.reply_read(Ok(json!(["not", "an", "object"])));
    assert!(matches!(
        configuration.fetch().await,
        Err(FetchError::UnexpectedShape(_))
    ));
    assert_eq!(configuration.setting("show_roles"), Some(json!(true)));
    assert_eq!(context.log().errors()[0].tag(), "configuration/fetch");
}

#[test]
fn test_module_namespaces_are_unique_per_session() {
    let (_backend, context) = setup();
    let employees = context.employee_store().unwrap();
    let units = context.org_unit_store().unwrap();

    assert_eq!(
        context.employee_store().err(),
        Some(NamespaceError::Duplicate("employee".to_string()))
    );

    let employee_keys: HashSet<String> = employees.keys().all_keys().cloned().collect();
    let unit_keys: HashSet<String> = units.keys().all_keys().cloned().collect();
    assert!(employee_keys.is_disjoint(&unit_keys));
    assert!(employee_keys.contains("employee/fetch"));
    assert!(unit_keys.contains("organisationUnit/patchField"));
}
