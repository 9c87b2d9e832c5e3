mod common;

use common::{action, drain_events, fixture, reaction, turn};
use runtime::{Event, LedgerEvent, Topic};
use tracker_core::{
    ActionSignal, ActorId, AlertCategory, CombatantId, EntryKind, ItemId, ItemRecord, ItemType,
    SourceId, UserId, Visibility,
};

fn c1() -> CombatantId {
    CombatantId::from("c1")
}

#[tokio::test]
async fn off_turn_declarations_are_logged_as_reactions() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    handle
        .ingest(ActionSignal::Declaration(action("m1", "a1", "Strike", 1)))
        .await
        .unwrap();
    handle
        .ingest(ActionSignal::Declaration(action("m2", "a2", "Strike", 1)))
        .await
        .unwrap();
    handle
        .ingest(ActionSignal::Declaration(reaction("m3", "a1", "Shield Block")))
        .await
        .unwrap();

    let ledger = handle.ledger(&c1()).unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.entries()[0].kind, EntryKind::Standard);
    assert_eq!(ledger.entries()[0].label, "Strike");
    assert_eq!(ledger.actions_spent(), 1);
    assert_eq!(ledger.reaction_count(), 1);

    let amiri = handle.entries(&CombatantId::from("c2")).unwrap();
    assert_eq!(amiri.len(), 1);
    assert_eq!(amiri[0].kind, EntryKind::Reaction);
}

#[tokio::test]
async fn updated_declarations_edit_their_entry() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    handle
        .ingest(ActionSignal::Declaration(action("m1", "a1", "Strike", 1)))
        .await
        .unwrap();
    handle
        .ingest(ActionSignal::Declaration(action("m1", "a1", "Power Attack", 2)))
        .await
        .unwrap();

    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Power Attack");
    assert_eq!(entries[0].cost, 2);
}

#[tokio::test]
async fn overspend_alerts_once_per_new_total() {
    let fx = fixture();
    let handle = &fx.handle;
    let mut alerts = handle.subscribe(Topic::Alert);
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    for (id, title) in [("m1", "Power Attack"), ("m2", "Sudden Charge")] {
        handle
            .ingest(ActionSignal::Declaration(action(id, "a1", title, 2)))
            .await
            .unwrap();
    }
    let fired = drain_events(&mut alerts);
    assert_eq!(fired.len(), 1);
    let Event::Alert(alert) = &fired[0] else {
        panic!("expected an alert, got {:?}", fired[0]);
    };
    assert_eq!(alert.category, AlertCategory::Overspend);
    assert_eq!(alert.message, "Valeros: Spent 4 actions (Max: 3)");

    // Re-rendering the same declaration does not raise the total.
    handle
        .ingest(ActionSignal::Declaration(action("m2", "a1", "Sudden Charge", 2)))
        .await
        .unwrap();
    assert!(drain_events(&mut alerts).is_empty());
    assert_eq!(handle.ledger(&c1()).unwrap().last_overspend_alert(), 4);
}

#[tokio::test]
async fn reroll_retargets_the_superseded_entry() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();
    handle
        .ingest(ActionSignal::Declaration(action("m1", "a1", "Strike", 1)))
        .await
        .unwrap();

    handle
        .ingest(ActionSignal::RerollRequested {
            actor: ActorId::from("a1"),
            source_id: SourceId::from("m1"),
        })
        .await
        .unwrap();
    assert_eq!(handle.pending_rerolls(&c1()).unwrap(), 1);

    // The host deletes the original; the pending reroll keeps its entry.
    handle
        .ingest(ActionSignal::DeclarationDeleted {
            actor: ActorId::from("a1"),
            source_id: SourceId::from("m1"),
        })
        .await
        .unwrap();
    assert_eq!(handle.entries(&c1()).unwrap().len(), 1);

    let mut rerolled = action("m1b", "a1", "Strike", 1);
    if let Some(context) = rerolled.context.as_mut() {
        context.is_reroll = true;
    }
    handle
        .ingest(ActionSignal::Declaration(rerolled))
        .await
        .unwrap();

    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source_id, SourceId::from("m1b"));
    assert_eq!(handle.pending_rerolls(&c1()).unwrap(), 0);

    handle
        .ingest(ActionSignal::DeclarationDeleted {
            actor: ActorId::from("a1"),
            source_id: SourceId::from("m1b"),
        })
        .await
        .unwrap();
    assert!(handle.entries(&c1()).unwrap().is_empty());
}

#[tokio::test]
async fn reroll_without_a_pending_original_changes_nothing() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    let mut rerolled = action("m9", "a1", "Strike", 1);
    if let Some(context) = rerolled.context.as_mut() {
        context.is_reroll = true;
    }
    handle
        .ingest(ActionSignal::Declaration(rerolled))
        .await
        .unwrap();
    assert!(handle.entries(&c1()).unwrap().is_empty());
}

#[tokio::test]
async fn consumables_count_only_with_an_intent() {
    let fx = fixture();
    let handle = &fx.handle;
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();
    let elixir = || ItemRecord::new("elixir", "Elixir of Life", ItemType::Consumable);

    handle
        .ingest(ActionSignal::Declaration(
            tracker_core::Declaration::new("m1", "a1").with_item(elixir()),
        ))
        .await
        .unwrap();
    assert!(handle.entries(&c1()).unwrap().is_empty());

    handle
        .ingest(ActionSignal::IntentDeclared {
            actor: ActorId::from("a1"),
            item_id: ItemId::from("elixir"),
        })
        .await
        .unwrap();
    handle
        .ingest(ActionSignal::Declaration(
            tracker_core::Declaration::new("m2", "a1").with_item(elixir()),
        ))
        .await
        .unwrap();

    let entries = handle.entries(&c1()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Elixir of Life");
    assert_eq!(entries[0].cost, 1);
}

#[tokio::test]
async fn whispered_declarations_are_redacted_for_the_authority() {
    let fx = fixture();
    let handle = &fx.handle;
    let mut ledger_events = handle.subscribe(Topic::Ledger);
    handle.ingest(turn(1, 0, "c1", None)).await.unwrap();

    let secret = action("m1", "a1", "Create a Diversion", 1).with_visibility(Visibility {
        whisper: vec![UserId::from("player-1")],
        blind: false,
    });
    handle
        .ingest(ActionSignal::Declaration(secret))
        .await
        .unwrap();

    let entry = handle
        .entry_by_source(&c1(), &SourceId::from("m1"))
        .unwrap()
        .unwrap();
    assert_eq!(entry.label, "Secret Action");
    assert!(drain_events(&mut ledger_events).iter().any(|event| matches!(
        event,
        Event::Ledger(LedgerEvent::EntryAdded { entry, .. }) if entry.label == "Secret Action"
    )));
}

#[tokio::test]
async fn unknown_actors_are_ignored() {
    let fx = fixture();
    fx.handle
        .ingest(ActionSignal::Declaration(action("m1", "stranger", "Strike", 1)))
        .await
        .unwrap();
    assert!(fx.handle.entries(&c1()).unwrap().is_empty());
}
