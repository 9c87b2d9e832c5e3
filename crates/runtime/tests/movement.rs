mod common;

use common::{action, drain_events, fixture, path, turn};
use runtime::{Event, Topic};
use tracker_core::{ActionSignal, AlertCategory, CombatantId, MoveMode};

fn c1() -> CombatantId {
    CombatantId::from("c1")
}

#[tokio::test]
async fn dragging_out_and_back_reshapes_one_entry() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    handle.ingest(path("c1", 1)).await.unwrap();
    handle.drain().await.unwrap();
    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Step");
    assert_eq!(entries[0].cost, 1);

    handle.ingest(path("c1", 2)).await.unwrap();
    handle.drain().await.unwrap();
    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Stride: 10ft");
    assert_eq!(entries[0].movement.map(|m| m.mode), Some(MoveMode::Stride));

    handle.ingest(path("c1", 1)).await.unwrap();
    handle.drain().await.unwrap();
    assert_eq!(handle.entries(&c1()).unwrap()[0].label, "Step");

    handle.ingest(path("c1", 0)).await.unwrap();
    handle.drain().await.unwrap();
    assert!(handle.entries(&c1()).unwrap().is_empty());
}

#[tokio::test]
async fn long_moves_cost_one_action_per_speed_increment() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    // 40ft at speed 25.
    handle.ingest(path("c1", 8)).await.unwrap();
    handle.drain().await.unwrap();
    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Stride: 40ft");
    assert_eq!(entries[0].cost, 2);
}

#[tokio::test]
async fn queued_moves_are_applied_in_order() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    for squares in 1..=6 {
        handle.ingest(path("c1", squares)).await.unwrap();
    }
    handle.drain().await.unwrap();

    assert_eq!(handle.movement_queue_depth(&c1()), 0);
    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Stride: 30ft");
    assert_eq!(entries[0].cost, 2);
}

#[tokio::test]
async fn movement_off_turn_is_not_tracked() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    handle.ingest(path("c2", 3)).await.unwrap();
    handle.drain().await.unwrap();
    assert!(handle.entries(&CombatantId::from("c2")).unwrap().is_empty());
}

#[tokio::test]
async fn undoing_movement_past_an_action_reverts_it() {
    let fx = fixture();
    let handle = &fx.handle;
    let mut alerts = handle.subscribe(Topic::Alert);
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    handle.ingest(path("c1", 4)).await.unwrap();
    handle.drain().await.unwrap();
    handle
        .ingest(ActionSignal::Declaration(action("m1", "a1", "Strike", 1)))
        .await
        .unwrap();

    handle.ingest(path("c1", 2)).await.unwrap();
    handle.drain().await.unwrap();

    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Stride: 10ft");

    let fired = drain_events(&mut alerts);
    assert_eq!(fired.len(), 1);
    let Event::Alert(alert) = &fired[0] else {
        panic!("expected an alert, got {:?}", fired[0]);
    };
    assert_eq!(alert.category, AlertCategory::UndoCorrection);
    assert_eq!(alert.message, "Movement undo detected. Reverted: Strike");
}

#[tokio::test]
async fn clearing_the_path_reverts_later_actions() {
    let fx = fixture();
    let handle = &fx.handle;
    let mut alerts = handle.subscribe(Topic::Alert);
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    handle.ingest(path("c1", 2)).await.unwrap();
    handle.drain().await.unwrap();
    handle
        .ingest(ActionSignal::Declaration(action("m1", "a1", "Strike", 1)))
        .await
        .unwrap();
    handle.ingest(path("c1", 0)).await.unwrap();
    handle.drain().await.unwrap();

    assert!(handle.entries(&c1()).unwrap().is_empty());
    let fired = drain_events(&mut alerts);
    assert!(fired.iter().any(|event| matches!(
        event,
        Event::Alert(alert) if alert.message.contains("To maintain turn integrity")
    )));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ending_the_encounter_waits_for_busy_workers() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();
    handle.ingest(turn(1, 1, "c2", Some((1, 0, "c1")))).await.unwrap();

    for squares in 1..=20 {
        handle.ingest(path("c2", squares % 8 + 1)).await.unwrap();
    }
    handle.ingest(ActionSignal::EncounterEnded).await.unwrap();

    assert!(handle.entries(&CombatantId::from("c2")).unwrap().is_empty());
    assert!(handle.entries(&c1()).unwrap().is_empty());
    assert_eq!(handle.movement_queue_depth(&CombatantId::from("c2")), 0);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(handle.entries(&CombatantId::from("c2")).unwrap().is_empty());
}
