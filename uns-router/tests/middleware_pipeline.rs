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

use chrono::{DateTime, TimeZone, Utc};
use integration_test_utils::{MemoryConnection, RecordingListener};
use std::time::Duration;
use uns_router::{
    ContentType, DeadbandPeriod, DeadbandValue, Event, Middleware, RouterConfig, UnsRouter,
};

const PLANT_CONFIG: &str = r#"
{
    name: "plant-router",
    namespaces: [
        { path: "Plant1/MES", kind: "heterogeneous" },
    ],
    middleware: [
        { type: "deadband_period", min_period_ms: 5000, pattern: "Plant1/MES/#" },
        { type: "report_by_exception" },
    ],
}
"#;

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn reading(path: &str, value: &'static str, seconds: i64) -> Event {
    Event::with_timestamp(path, ContentType::Double, value, at(seconds))
}

struct TagSource;

impl Middleware for TagSource {
    fn id(&self) -> &str {
        "TAG_SOURCE"
    }

    fn process(&self, mut event: Event) -> Option<Event> {
        let source = event.source_connection_id.clone().unwrap_or_default();
        event.path = format!("{}/{source}", event.path);
        Some(event)
    }
}

#[test]
fn configured_pipeline_applies_stages_in_order() {
    integration_test_utils::init_logging();

    let config = RouterConfig::from_json5_str(PLANT_CONFIG).unwrap();
    let router = UnsRouter::from_config(&config);
    let values = RecordingListener::<f64>::new();
    let consumer = router.subscribe_scalar::<f64>("Plant1/#");
    consumer.add_listener(values.clone());

    // Inside the deadband window, then a repeat after it, then a change after it.
    router.on_inbound_event("plc", reading("Plant1/MES/Speed", "10", 0));
    router.on_inbound_event("plc", reading("Plant1/MES/Speed", "11", 2));
    router.on_inbound_event("plc", reading("Plant1/MES/Speed", "10", 6));
    router.on_inbound_event("plc", reading("Plant1/MES/Speed", "12", 12));

    // Out of deadband scope, so only report-by-exception applies.
    router.on_inbound_event("plc", reading("Plant1/ERP/Speed", "1", 0));
    router.on_inbound_event("plc", reading("Plant1/ERP/Speed", "1", 1));
    router.on_inbound_event("plc", reading("Plant1/ERP/Speed", "2", 2));

    assert_eq!(values.received(), vec![10.0, 12.0, 1.0, 2.0]);
}

#[test]
fn value_deadband_compares_against_last_forwarded_value() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("pipeline");
    router.add_middleware(DeadbandValue::new(1.0));
    let values = RecordingListener::<f64>::new();
    let consumer = router.subscribe_scalar::<f64>("Temperature");
    consumer.add_listener(values.clone());

    for value in ["20.0", "NaN", "20.4", "20.9", "21.0", "inf", "19.9", "not-a-number"] {
        router.on_inbound_event("plc", Event::new("Cell/Temperature", ContentType::Double, value));
    }

    assert_eq!(values.received(), vec![20.0, 21.0, 19.9]);
}

#[test]
fn stages_see_the_stamped_source_connection() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("pipeline");
    router.add_middleware(TagSource);
    let consumer = router.subscribe("Cell/Temp/+");

    let delivered = router.on_inbound_event("plc-7", reading("Cell/Temp", "1", 0));

    assert_eq!(delivered, 1);
    assert_eq!(consumer.delivered_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn period_deadband_runs_once_per_outbound_destination() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("pipeline");
    router.add_middleware(DeadbandPeriod::new(Duration::from_secs(5)));
    let first = MemoryConnection::new("first");
    let second = MemoryConnection::new("second");
    router.add_outbound_connection(first.clone());
    router.add_outbound_connection(second.clone());
    router.start().await.unwrap();

    let accepted = router.publish(reading("Line/Speed", "1", 0), None).await;
    assert_eq!(accepted, 1);

    let accepted = router.publish(reading("Line/Speed", "2", 10), None).await;
    assert_eq!(accepted, 1);

    assert_eq!(first.published().len(), 2);
    assert!(second.published().is_empty());

    router.stop().await.unwrap();
}

#[test]
fn removed_stage_no_longer_filters() {
    integration_test_utils::init_logging();

    let config = RouterConfig::from_json5_str(PLANT_CONFIG).unwrap();
    let router = UnsRouter::from_config(&config);
    let consumer = router.subscribe("Plant1/ERP/#");

    router.on_inbound_event("plc", reading("Plant1/ERP/Speed", "1", 0));
    router.on_inbound_event("plc", reading("Plant1/ERP/Speed", "1", 1));
    assert_eq!(consumer.delivered_count(), 1);

    assert!(router.remove_middleware("REPORT_BY_EXCEPTION"));
    router.on_inbound_event("plc", reading("Plant1/ERP/Speed", "1", 2));
    assert_eq!(consumer.delivered_count(), 2);
}
