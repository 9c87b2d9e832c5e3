#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use runtime::{
    ActorOracleImpl, ActorSheet, Event, OracleManager, RosterOracleImpl, RuntimeConfig,
    StaticSession, TerrainOracleImpl, Tracker, TrackerHandle,
};
use tokio::sync::broadcast;
use tracker_core::{
    ActionSignal, ContextKind, Declaration, MovementUpdate, PathPoint, SignalContext, TurnChange,
    TurnPointer,
};

pub struct Fixture {
    pub tracker: Tracker,
    pub handle: TrackerHandle,
    pub actors: Arc<ActorOracleImpl>,
}

/// Two combatants at speed 25: c1 (Valeros, a1) and c2 (Amiri, a2).
pub fn fixture() -> Fixture {
    fixture_with(StaticSession::authority("gm"), RuntimeConfig::default())
}

pub fn fixture_with(session: StaticSession, config: RuntimeConfig) -> Fixture {
    let actors = Arc::new(party());
    let tracker = Tracker::builder()
        .config(config)
        .oracles(oracles(actors.clone(), session))
        .build()
        .expect("tracker should build");
    let handle = tracker.handle();
    Fixture {
        tracker,
        handle,
        actors,
    }
}

pub fn party() -> ActorOracleImpl {
    ActorOracleImpl::new()
        .with_actor("a1", ActorSheet::new("Valeros", 25))
        .with_actor("a2", ActorSheet::new("Amiri", 25))
}

pub fn oracles(actors: Arc<ActorOracleImpl>, session: StaticSession) -> OracleManager {
    let roster = RosterOracleImpl::new()
        .with_combatant("c1", "a1")
        .with_combatant("c2", "a2");
    OracleManager::new(
        actors,
        Arc::new(TerrainOracleImpl::default()),
        Arc::new(roster),
        Arc::new(session),
    )
}

/// A declaration with an action heading and an `actions` glyph.
pub fn action(id: &str, actor: &str, title: &str, actions: u32) -> Declaration {
    Declaration::new(id, actor)
        .with_flavor(format!(
            r#"<h4 class="action"><strong>{title}</strong> <span class="action-glyph">{actions}</span></h4>"#
        ))
        .with_context(SignalContext {
            kind: Some(ContextKind::Action),
            action: Some(title.to_lowercase().replace(' ', "-")),
            ..SignalContext::default()
        })
}

pub fn reaction(id: &str, actor: &str, title: &str) -> Declaration {
    Declaration::new(id, actor)
        .with_flavor(format!(
            r#"<h4 class="action"><strong>{title}</strong> <span class="action-glyph">R</span></h4>"#
        ))
        .with_context(SignalContext {
            kind: Some(ContextKind::Action),
            options: vec!["trait:reaction".into()],
            ..SignalContext::default()
        })
}

pub fn turn(round: u32, turn: u32, combatant: &str, previous: Option<(u32, u32, &str)>) -> ActionSignal {
    ActionSignal::TurnChange(TurnChange {
        previous: previous.map(|(round, turn, c)| TurnPointer::new(round, turn, c)),
        current: TurnPointer::new(round, turn, combatant),
    })
}

/// A straight path east of `squares` grid squares (100 units each).
pub fn path(combatant: &str, squares: u32) -> ActionSignal {
    let points = (0..=squares)
        .map(|n| PathPoint::new(f64::from(n) * 100.0, 0.0))
        .collect::<Vec<_>>();
    let points = if squares == 0 { Vec::new() } else { points };
    ActionSignal::Movement(MovementUpdate::new(combatant, points))
}

pub async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Every event already buffered on `rx`.
pub fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
