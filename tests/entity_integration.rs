// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for tracked entities through the public API.

use std::sync::Arc;
use std::thread;

use omm_lib::entity::{BulkLoadPolicy, LockRule, TrackedEntity};
use omm_lib::rfp::Rfp;
use omm_lib::types::FieldValue;
use omm_lib::{Error, FieldError};

fn hw_locked_entity(hw_type: &str) -> TrackedEntity<()> {
    let entity = TrackedEntity::builder(())
        .with_lock_rule(LockRule::rfp_hw_type())
        .build();
    entity.set("hwType", FieldValue::enum_tag(hw_type)).unwrap();
    entity.set("hwTypeLocked", true).unwrap();
    entity
}

// ============================================================================
// Field Locking
// ============================================================================

mod locking {
    use super::*;

    #[test]
    fn locked_field_keeps_its_value() {
        for (current, attempted) in [("V", "W"), ("RFP35", "RFP35"), ("A", "")] {
            let entity = hw_locked_entity(current);
            let err = entity
                .set("hwType", FieldValue::enum_tag(attempted))
                .unwrap_err();
            assert_eq!(
                err,
                Error::Field(FieldError::Immutable {
                    field: "hwType".to_string()
                })
            );
            assert_eq!(entity.get("hwType").unwrap(), FieldValue::enum_tag(current));
        }
    }

    #[test]
    fn first_write_allowed_while_locked() {
        let entity = TrackedEntity::builder(())
            .with_lock_rule(LockRule::rfp_hw_type())
            .with_snapshot([("hwTypeLocked", true)])
            .build();

        entity.set("hwType", FieldValue::enum_tag("W")).unwrap();
        assert_eq!(entity.get("hwType").unwrap(), FieldValue::enum_tag("W"));
    }

    #[test]
    fn lock_flag_write_is_tracked_and_never_blocked() {
        let entity = hw_locked_entity("A");
        entity.set("hwTypeLocked", true).unwrap();
        entity.set("name", "still writable").unwrap();

        let changes = entity.pending_changes();
        assert_eq!(changes.names(), vec!["hwType", "hwTypeLocked", "name"]);
    }

    #[test]
    fn lock_is_one_way() {
        let entity = hw_locked_entity("A");
        entity.set("hwTypeLocked", false).unwrap();

        assert!(entity.is_locked());
        let err = entity.set("hwType", FieldValue::enum_tag("B")).unwrap_err();
        assert!(err.is_immutable());
        assert_eq!(entity.get("hwType").unwrap(), FieldValue::enum_tag("A"));
    }

    #[test]
    fn lock_seen_in_snapshot_outlives_later_snapshot() {
        let entity = TrackedEntity::builder(())
            .with_lock_rule(LockRule::rfp_hw_type())
            .with_bulk_load_policy(BulkLoadPolicy::RespectLock)
            .with_snapshot([
                ("hwType", FieldValue::enum_tag("A")),
                ("hwTypeLocked", FieldValue::Bool(true)),
            ])
            .build();

        entity.load_snapshot([
            ("hwTypeLocked", FieldValue::Bool(false)),
            ("hwType", FieldValue::enum_tag("B")),
        ]);

        assert!(entity.is_locked());
        assert_eq!(entity.get("hwTypeLocked").unwrap(), FieldValue::Bool(false));
        assert_eq!(entity.get("hwType").unwrap(), FieldValue::enum_tag("A"));
        assert!(entity.set("hwType", FieldValue::enum_tag("C")).is_err());
        assert!(!entity.has_pending_changes());
    }

    #[test]
    fn rejected_write_leaves_pending_changes_untouched() {
        let entity = hw_locked_entity("A");
        let before = entity.pending_changes();
        assert!(entity.set("hwType", FieldValue::enum_tag("B")).is_err());
        assert_eq!(entity.pending_changes(), before);
    }
}

// ============================================================================
// Change Tracking
// ============================================================================

mod change_tracking {
    use super::*;

    #[test]
    fn first_touch_order_last_value() {
        let entity = TrackedEntity::new(());
        for (name, value) in [("a", 1), ("b", 2), ("a", 3), ("c", 4)] {
            entity.set(name, value).unwrap();
        }

        let changes = entity.pending_changes();
        let entries: Vec<(String, FieldValue)> = changes.into_iter().collect();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), FieldValue::Int(3)),
                ("b".to_string(), FieldValue::Int(2)),
                ("c".to_string(), FieldValue::Int(4)),
            ]
        );
    }

    #[test]
    fn snapshot_is_not_pending() {
        let entity = TrackedEntity::new(());
        entity.load_snapshot([("x", 1), ("y", 2)]);
        assert!(entity.pending_changes().is_empty());
        assert_eq!(entity.get("x").unwrap(), FieldValue::Int(1));
    }

    #[test]
    fn draining_does_not_clear() {
        let entity = TrackedEntity::new(());
        entity.set("name", "a").unwrap();
        assert_eq!(entity.pending_changes().len(), 1);
        assert_eq!(entity.pending_changes().len(), 1);
    }

    #[test]
    fn clear_then_empty_until_next_set() {
        let entity = TrackedEntity::new(());
        entity.set("a", 1).unwrap();
        entity.clear_pending_changes();
        assert!(entity.pending_changes().is_empty());
        assert_eq!(entity.get("a").unwrap(), FieldValue::Int(1));

        entity.set("b", false).unwrap();
        assert_eq!(entity.pending_changes().names(), vec!["b"]);
    }

    #[test]
    fn read_after_write() {
        let entity = TrackedEntity::new(());
        let values = [
            FieldValue::Null,
            FieldValue::Bool(true),
            FieldValue::Int(-1),
            FieldValue::from("00:11:22:aa:bb:cc"),
            FieldValue::enum_tag("HT40Plus"),
        ];
        for value in values {
            entity.set("field", value.clone()).unwrap();
            assert_eq!(entity.get("field").unwrap(), value);
        }
    }

    #[test]
    fn enum_field_reads_the_same_from_any_source() {
        let written = Rfp::new(());
        written.set("hwType", "RFP35").unwrap();

        let loaded = Rfp::new(());
        loaded
            .load_json_snapshot(serde_json::json!({"hwType": "RFP35"}))
            .unwrap();

        assert_eq!(written.get("hwType").unwrap(), loaded.get("hwType").unwrap());

        // A change sent from one copy is acknowledged by an equal value
        let sent = written.pending_changes();
        let echoed: omm_lib::ChangeSet = loaded.fields().into_iter().collect();
        assert_eq!(written.acknowledge_changes(&echoed), sent.len());
    }

    #[test]
    fn unknown_read_fails() {
        let entity = TrackedEntity::new(());
        assert_eq!(
            entity.get("neverSet").unwrap_err(),
            Error::Field(FieldError::NoSuchField("neverSet".to_string()))
        );
    }
}

// ============================================================================
// Sync Scenario
// ============================================================================

mod scenario {
    use super::*;

    /// Stand-in for the OMM session that owns the entity.
    #[derive(Debug, Default)]
    struct Session {
        name: &'static str,
    }

    impl Session {
        fn update_request(&self, rfp: &Rfp<Arc<Session>>) -> String {
            let attributes: Vec<String> = rfp
                .pending_changes()
                .to_attributes()
                .into_iter()
                .map(|(name, value)| format!("{name}=\"{value}\""))
                .collect();
            format!("<SetRFP><rfp {} /></SetRFP>", attributes.join(" "))
        }
    }

    #[test]
    fn hardware_type_lock_cycle() {
        let rfp = Rfp::from_snapshot(
            Arc::new(Session { name: "omm-1" }),
            [
                ("id", FieldValue::Int(3)),
                ("hwType", FieldValue::enum_tag("A")),
                ("hwTypeLocked", FieldValue::Bool(false)),
            ],
        );
        assert_eq!(rfp.owner().name, "omm-1");
        assert_eq!(rfp.display_id().unwrap(), FieldValue::Int(3));

        rfp.set("hwType", "B").unwrap();
        assert_eq!(rfp.get("hwType").unwrap(), FieldValue::enum_tag("B"));

        rfp.set("hwTypeLocked", true).unwrap();
        let err = rfp.set("hwType", "C").unwrap_err();
        assert!(err.is_immutable());
        assert_eq!(rfp.get("hwType").unwrap(), FieldValue::enum_tag("B"));

        let request = rfp.owner().update_request(&rfp);
        assert_eq!(
            request,
            r#"<SetRFP><rfp hwType="B" hwTypeLocked="true" /></SetRFP>"#
        );

        rfp.clear_pending_changes();
        assert!(!rfp.has_pending_changes());
    }

    #[test]
    fn resync_after_push() {
        let rfp = Rfp::new(Arc::new(Session::default()));
        rfp.load_json_snapshot(serde_json::json!({
            "id": 0,
            "name": "Hall",
            "rpn": 12,
            "connected": false,
        }))
        .unwrap();

        rfp.set_name("Lobby").unwrap();
        let sent = rfp.pending_changes();

        // Edit made while the update is in flight
        rfp.set("rpn", 14).unwrap();

        assert_eq!(rfp.acknowledge_changes(&sent), 1);
        assert_eq!(rfp.pending_changes().names(), vec!["rpn"]);

        rfp.load_json_snapshot(serde_json::json!({"name": "Lobby", "connected": true}))
            .unwrap();
        assert_eq!(rfp.is_connected().unwrap(), Some(true));
        assert_eq!(rfp.pending_changes().names(), vec!["rpn"]);
    }
}

// ============================================================================
// Concurrency
// ============================================================================

mod concurrency {
    use super::*;

    const THREADS: usize = 8;
    const WRITES: i64 = 200;

    #[test]
    fn concurrent_writers_track_every_field() {
        let entity = Arc::new(TrackedEntity::new(()));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let entity = Arc::clone(&entity);
                thread::spawn(move || {
                    for i in 0..WRITES {
                        entity.set(format!("field{t}"), i).unwrap();
                        entity.set("shared", i).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let changes = entity.pending_changes();
        assert_eq!(changes.len(), THREADS + 1);
        for t in 0..THREADS {
            let name = format!("field{t}");
            assert_eq!(changes.get(&name), Some(&FieldValue::Int(WRITES - 1)));
            assert_eq!(entity.get(&name).unwrap(), FieldValue::Int(WRITES - 1));
        }
        // The pending value and the field value of the contended field agree
        assert_eq!(changes.get("shared"), Some(&entity.get("shared").unwrap()));
    }

    #[test]
    fn only_one_write_wins_after_lock() {
        let entity = Arc::new(
            TrackedEntity::builder(())
                .with_lock_rule(LockRule::rfp_hw_type())
                .with_snapshot([("hwTypeLocked", true)])
                .build(),
        );

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let entity = Arc::clone(&entity);
                thread::spawn(move || entity.set("hwType", FieldValue::enum_tag(format!("T{t}"))))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(Error::is_immutable)
        );
        assert_eq!(
            entity.pending_changes().get("hwType"),
            Some(&entity.get("hwType").unwrap())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn blocking_tasks_share_an_entity() {
        let rfp = Arc::new(Rfp::new(()));

        let tasks: Vec<_> = (0..4)
            .map(|t| {
                let rfp = Arc::clone(&rfp);
                tokio::task::spawn_blocking(move || {
                    rfp.set_name(format!("rfp-{t}")).unwrap();
                    rfp.set("x", t).unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let changes = rfp.pending_changes();
        assert_eq!(changes.len(), 2);
        assert!(rfp.name().unwrap().unwrap().starts_with("rfp-"));
        assert_eq!(changes.get("x"), Some(&rfp.get("x").unwrap()));
    }
}
