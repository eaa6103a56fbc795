/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use integration_test_utils::{FailingConnection, FailureMode, LifecycleJournal, MemoryConnection};
use std::error::Error;
use uns_router::{
    ConnectionRole, ConnectionStatus, ContentType, Event, RouterError, RouterState, UnsRouter,
};

#[tokio::test(flavor = "multi_thread")]
async fn connection_serving_both_roles_is_started_and_stopped_once() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");
    let duplex = MemoryConnection::new("duplex");
    let source = MemoryConnection::new("source");
    router.add_connection(duplex.clone()).await.unwrap();
    router.add_inbound_connection(source.clone()).await.unwrap();

    router.start().await.unwrap();
    assert_eq!(router.state(), RouterState::Running);
    assert_eq!(duplex.start_calls(), 1);
    assert_eq!(source.start_calls(), 1);

    router.stop().await.unwrap();
    assert_eq!(router.state(), RouterState::Stopped);
    assert_eq!(duplex.stop_calls(), 1);
    assert_eq!(source.stop_calls(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_visits_connections_in_registration_order() {
    integration_test_utils::init_logging();

    let journal = LifecycleJournal::default();
    let router = UnsRouter::new("lifecycle-contract");
    router
        .add_inbound_connection(MemoryConnection::with_journal("a", &journal))
        .await
        .unwrap();
    router.add_outbound_connection(MemoryConnection::with_journal("b", &journal));
    router
        .add_connection(MemoryConnection::with_journal("c", &journal))
        .await
        .unwrap();

    router.start().await.unwrap();
    router.stop().await.unwrap();

    assert_eq!(
        *journal.lock(),
        vec!["start:a", "start:b", "start:c", "stop:a", "stop:b", "stop:c"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn start_failure_rolls_back_and_returns_to_stopped() {
    integration_test_utils::init_logging();

    let journal = LifecycleJournal::default();
    let router = UnsRouter::new("lifecycle-contract");
    let healthy = MemoryConnection::with_journal("healthy", &journal);
    router.add_connection(healthy.clone()).await.unwrap();
    router.add_outbound_connection(FailingConnection::with_journal(
        "broken",
        FailureMode::Start,
        &journal,
    ));

    let error = router.start().await.unwrap_err();

    match &error {
        RouterError::ConnectionStart { connection_id, .. } => assert_eq!(connection_id, "broken"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(error.source().is_some());
    assert_eq!(router.state(), RouterState::Stopped);
    assert!(!healthy.is_started());
    assert_eq!(
        *journal.lock(),
        vec!["start:healthy", "start:broken", "stop:healthy"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_misuse_is_rejected_and_stop_is_idempotent() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");

    assert!(router.stop().await.is_ok());
    router.start().await.unwrap();

    let error = router.start().await.unwrap_err();
    assert!(matches!(
        error,
        RouterError::InvalidState {
            operation: "start",
            state: RouterState::Running
        }
    ));

    router.stop().await.unwrap();
    router.start().await.unwrap();
    assert_eq!(router.state(), RouterState::Running);
}

#[tokio::test(flavor = "multi_thread")]
async fn state_watchers_observe_settled_states() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");
    let mut watcher = router.watch_state();
    assert_eq!(*watcher.borrow(), RouterState::Stopped);

    router.start().await.unwrap();
    assert!(watcher.has_changed().unwrap());
    assert_eq!(*watcher.borrow_and_update(), RouterState::Running);

    router.stop().await.unwrap();
    watcher.changed().await.unwrap();
    assert_eq!(*watcher.borrow_and_update(), RouterState::Stopped);
}

#[tokio::test(flavor = "multi_thread")]
async fn listener_registration_failure_leaves_connection_detached() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");
    let refusing = FailingConnection::new("refusing", FailureMode::RegisterListener);

    let error = router.add_inbound_connection(refusing).await.unwrap_err();

    assert!(matches!(error, RouterError::ListenerRegistration { .. }));
    assert!(router.inbound_connection("refusing").is_none());
    assert_eq!(router.connection_role("refusing"), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn replacing_an_inbound_connection_detaches_the_old_listener() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");
    let original = MemoryConnection::new("plc");
    let replacement = MemoryConnection::new("plc");
    router.add_inbound_connection(original.clone()).await.unwrap();
    router
        .add_inbound_connection(replacement.clone())
        .await
        .unwrap();

    assert_eq!(original.listener_count(), 0);
    assert_eq!(replacement.listener_count(), 1);

    let consumer = router.subscribe("#");
    original
        .inject(Event::new("Cell/Temp", ContentType::Double, "1.0"))
        .await;
    replacement
        .inject(Event::new("Cell/Temp", ContentType::Double, "2.0"))
        .await;

    assert_eq!(consumer.delivered_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_connection_reports_roles_and_detaches() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");
    let duplex = MemoryConnection::new("duplex");
    router.add_connection(duplex.clone()).await.unwrap();

    assert_eq!(router.connection_role("duplex"), Some(ConnectionRole::Both));
    assert!(router.outbound_connection("duplex").is_some());

    assert_eq!(
        router.remove_connection("duplex").await,
        Some(ConnectionRole::Both)
    );
    assert_eq!(router.remove_connection("duplex").await, None);
    assert_eq!(duplex.listener_count(), 0);

    router.start().await.unwrap();
    assert_eq!(duplex.start_calls(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_status_reports_are_recorded() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("lifecycle-contract");
    let source = MemoryConnection::new("source");
    router.add_inbound_connection(source.clone()).await.unwrap();

    assert_eq!(router.connection_status("source"), None);

    router.start().await.unwrap();
    assert_eq!(
        router.connection_status("source"),
        Some(ConnectionStatus::Connected)
    );

    source.report_status(ConnectionStatus::Disconnected).await;
    assert_eq!(
        router.connection_status("source"),
        Some(ConnectionStatus::Disconnected)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn inbound_delivery_after_router_drop_is_discarded() {
    integration_test_utils::init_logging();

    let source = MemoryConnection::new("source");
    {
        let router = UnsRouter::new("lifecycle-contract");
        router.add_inbound_connection(source.clone()).await.unwrap();
    }

    // The listener only holds the router weakly; delivery after drop is discarded.
    source
        .inject(Event::new("Cell/Temp", ContentType::Double, "1.0"))
        .await;
    assert_eq!(source.listener_count(), 1);
}
