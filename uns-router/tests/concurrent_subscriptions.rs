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

use futures::future::join_all;
use integration_test_utils::{MemoryConnection, RecordingListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use uns_router::{ContentType, Event, UnsRouter};

const EVENTS: usize = 2_000;
const CHURN_THREADS: usize = 4;

#[test]
fn churning_subscriptions_do_not_disturb_stable_consumers() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("concurrency");
    let stable = router.subscribe("Site/#");
    let stable_values = RecordingListener::<f64>::new();
    let stable_scalar = router.subscribe_scalar::<f64>("Temperature");
    stable_scalar.add_listener(stable_values.clone());

    let done = Arc::new(AtomicBool::new(false));
    let churners: Vec<_> = (0..CHURN_THREADS)
        .map(|worker| {
            let router = router.clone();
            let done = done.clone();
            thread::spawn(move || {
                let patterns = ["Site/+", "Temperature", "#", "Site/Cell/#"];
                let mut iteration = 0;
                while !done.load(Ordering::Relaxed) {
                    let pattern = patterns[(worker + iteration) % patterns.len()];
                    let transient = router.subscribe(pattern);
                    if iteration % 2 == 0 {
                        router.unsubscribe(transient.id());
                    }
                    drop(transient);
                    iteration += 1;
                }
            })
        })
        .collect();

    for index in 0..EVENTS {
        router.on_inbound_event(
            "plc",
            Event::new(
                "Site/Cell/Temperature",
                ContentType::Double,
                format!("{index}.5"),
            ),
        );
    }

    done.store(true, Ordering::Relaxed);
    for churner in churners {
        churner.join().unwrap();
    }

    assert_eq!(stable.delivered_count(), EVENTS as u64);
    assert_eq!(stable_values.count(), EVENTS);
    assert_eq!(stable_values.received()[10], 10.5);

    // Dropped transient handles are pruned on the next dispatch.
    router.on_inbound_event("plc", Event::new("Site/Cell/Temperature", ContentType::Double, "0"));
    assert_eq!(router.consumer_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn per_connection_delivery_order_is_preserved() {
    integration_test_utils::init_logging();

    let router = UnsRouter::new("concurrency");
    let sources: Vec<Arc<MemoryConnection>> = (0..4)
        .map(|index| MemoryConnection::new(&format!("source-{index}")))
        .collect();
    for source in &sources {
        router.add_inbound_connection(source.clone()).await.unwrap();
    }

    let consumers: Vec<_> = (0..sources.len())
        .map(|index| {
            let recorder = RecordingListener::<i64>::new();
            let consumer = router.subscribe_scalar::<i64>(&format!("Line{index}/#"));
            consumer.add_listener(recorder.clone());
            (consumer, recorder)
        })
        .collect();

    let feeds = sources.iter().enumerate().map(|(index, source)| {
        let source = source.clone();
        tokio::spawn(async move {
            for value in 0..200_i64 {
                source
                    .inject(Event::new(
                        &format!("Line{index}/Counter"),
                        ContentType::Int64,
                        value.to_string(),
                    ))
                    .await;
            }
        })
    });
    for result in join_all(feeds).await {
        result.unwrap();
    }

    for (consumer, recorder) in &consumers {
        assert_eq!(consumer.delivered_count(), 200);
        assert_eq!(recorder.received(), (0..200).collect::<Vec<i64>>());
    }
}
