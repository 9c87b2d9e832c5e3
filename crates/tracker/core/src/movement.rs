//! Movement reconciliation.
//!
//! A token's path arrives as a stream of full snapshots while it is dragged.
//! [`plan_movement`] compares the measured length against what the ledger
//! already records and returns the steps that bring the two back in line.
//! Planning is pure; the caller applies the steps in order.
use crate::config::TrackerConfig;
use crate::entry::{ActionLogEntry, MoveSegment};
use crate::env::TerrainOracle;
use crate::ids::SourceId;
use crate::ledger::Ledger;
use crate::signal::PathPoint;

/// Path length with the destination's terrain surcharge applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasuredPath {
    /// Grid length before any surcharge.
    pub raw: u32,
    pub distance: u32,
    pub elevated: bool,
    pub difficult: bool,
}

impl MeasuredPath {
    /// `None` for an empty path (a full clear).
    pub fn measure(points: &[PathPoint], terrain: &dyn TerrainOracle) -> Option<Self> {
        let destination = *points.last()?;
        let kind = terrain.terrain_at(destination);
        let raw = terrain.measure_path(points);
        Some(Self {
            raw,
            distance: raw + kind.surcharge(),
            elevated: destination.elevation > 0.0,
            difficult: kind.is_difficult(),
        })
    }

    fn segment(&self, distance: u32, speed: u32) -> (MoveSegment, u32) {
        let cost = distance.div_ceil(speed);
        (
            MoveSegment::new(distance, cost, self.elevated, self.difficult),
            cost,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveStep {
    /// Remove `source`; non-move removals are reported to the actor.
    Undo {
        source: SourceId,
        label: String,
        was_move: bool,
    },
    /// Resize the trailing move entry.
    Resize {
        source: SourceId,
        segment: MoveSegment,
        cost: u32,
    },
    /// Append a new move entry.
    Append { segment: MoveSegment, cost: u32 },
}

impl MoveStep {
    fn undo(entry: &ActionLogEntry) -> Self {
        MoveStep::Undo {
            source: entry.source_id.clone(),
            label: entry.label.clone(),
            was_move: entry.is_move(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum IgnoreReason {
    ZeroDistance,
    /// Longer than any gameplay move; a GM repositioning.
    BeyondCeiling,
    Jitter,
    NoSpeed,
    NothingToClear,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovePlan {
    Ignore(IgnoreReason),
    Apply(Vec<MoveStep>),
}

/// Plans the ledger changes for one path snapshot.
///
/// `path` is `None` when the host cleared the path: trailing entries are
/// undone back through the most recent move.
pub fn plan_movement(ledger: &Ledger, path: Option<MeasuredPath>, speed: u32) -> MovePlan {
    let Some(path) = path else {
        return plan_clear(ledger);
    };
    // A token dropped where it started, even inside a hazard.
    if path.raw == 0 {
        return MovePlan::Ignore(IgnoreReason::ZeroDistance);
    }
    if path.distance > TrackerConfig::MOVEMENT_SANITY_CEILING {
        return MovePlan::Ignore(IgnoreReason::BeyondCeiling);
    }
    if path.distance == ledger.recorded_distance() {
        return MovePlan::Ignore(IgnoreReason::Jitter);
    }
    if speed == 0 {
        return MovePlan::Ignore(IgnoreReason::NoSpeed);
    }

    let mut sim = ledger.clone();
    let mut steps = Vec::new();
    loop {
        let recorded = sim.recorded_distance();
        if path.distance == recorded {
            break;
        }
        let before_last = sim.distance_before_last();
        let Some(last) = sim.last() else {
            let (segment, cost) = path.segment(path.distance, speed);
            steps.push(MoveStep::Append { segment, cost });
            break;
        };

        if path.distance < recorded && !(last.is_move() && path.distance > before_last) {
            steps.push(MoveStep::undo(last));
            sim.pop();
            continue;
        }

        if last.is_move() {
            let (segment, cost) = path.segment(path.distance - before_last, speed);
            steps.push(MoveStep::Resize {
                source: last.source_id.clone(),
                segment,
                cost,
            });
        } else {
            let (segment, cost) = path.segment(path.distance - recorded, speed);
            steps.push(MoveStep::Append { segment, cost });
        }
        break;
    }

    if steps.is_empty() {
        MovePlan::Ignore(IgnoreReason::Jitter)
    } else {
        MovePlan::Apply(steps)
    }
}

fn plan_clear(ledger: &Ledger) -> MovePlan {
    let Some(last_move) = ledger.entries().iter().rposition(ActionLogEntry::is_move) else {
        return MovePlan::Ignore(IgnoreReason::NothingToClear);
    };
    let steps = ledger.entries()[last_move..]
        .iter()
        .rev()
        .map(MoveStep::undo)
        .collect();
    MovePlan::Apply(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryKind, MoveMode};
    use crate::env::Terrain;

    fn path(distance: u32) -> Option<MeasuredPath> {
        Some(MeasuredPath {
            raw: distance,
            distance,
            elevated: false,
            difficult: false,
        })
    }

    fn drive(ledger: &mut Ledger, path: Option<MeasuredPath>, next: &mut u64) {
        let plan = plan_movement(ledger, path, 25);
        apply(ledger, plan, next);
    }

    /// Applies a plan the way the runtime does, numbering new moves.
    fn apply(ledger: &mut Ledger, plan: MovePlan, next: &mut u64) {
        let MovePlan::Apply(steps) = plan else {
            return;
        };
        for step in steps {
            match step {
                MoveStep::Undo { source, .. } => {
                    ledger.remove(&source.into()).unwrap();
                }
                MoveStep::Resize {
                    source,
                    segment,
                    cost,
                } => {
                    ledger
                        .edit(&source, crate::entry::EntryUpdate::resize_move(segment, cost))
                        .unwrap();
                }
                MoveStep::Append { segment, cost } => {
                    *next += 1;
                    let source = SourceId::movement(&"c1".into(), *next);
                    ledger.push(ActionLogEntry::movement(source, segment, cost));
                }
            }
        }
    }

    #[test]
    fn drag_out_and_back() {
        let mut ledger = Ledger::new();
        let mut seq = 0;

        drive(&mut ledger, path(5), &mut seq);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].label, "Step");
        assert_eq!(ledger.entries()[0].cost, 1);

        drive(&mut ledger, path(10), &mut seq);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].label, "Stride: 10ft");
        assert_eq!(ledger.entries()[0].cost, 1);

        drive(&mut ledger, path(5), &mut seq);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].label, "Step");
        assert_eq!(ledger.entries()[0].distance(), 5);

        drive(&mut ledger, None, &mut seq);
        assert!(ledger.is_empty());
        assert_eq!(ledger.actions_spent(), 0);
    }

    #[test]
    fn jitter_zero_and_ceiling_are_ignored() {
        let mut ledger = Ledger::new();
        ledger.push(ActionLogEntry::movement(
            SourceId::from("move-c1-1"),
            MoveSegment::new(10, 1, false, false),
            1,
        ));
        assert_eq!(
            plan_movement(&ledger, path(10), 25),
            MovePlan::Ignore(IgnoreReason::Jitter)
        );
        assert_eq!(
            plan_movement(&ledger, path(0), 25),
            MovePlan::Ignore(IgnoreReason::ZeroDistance)
        );
        assert_eq!(
            plan_movement(&ledger, path(205), 25),
            MovePlan::Ignore(IgnoreReason::BeyondCeiling)
        );
        assert_eq!(
            plan_movement(&ledger, path(20), 0),
            MovePlan::Ignore(IgnoreReason::NoSpeed)
        );
    }

    #[test]
    fn move_after_action_appends_new_segment() {
        let mut ledger = Ledger::new();
        let mut seq = 0;
        drive(&mut ledger, path(20), &mut seq);
        ledger.push(ActionLogEntry::new("m1", "Strike", 1, EntryKind::Standard));
        drive(&mut ledger, path(50), &mut seq);

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.entries()[2].label, "Stride: 30ft");
        assert_eq!(ledger.entries()[2].cost, 2);
        assert_eq!(ledger.recorded_distance(), 50);
    }

    #[test]
    fn shrinking_past_an_action_undoes_it() {
        let mut ledger = Ledger::new();
        let mut seq = 0;
        drive(&mut ledger, path(20), &mut seq);
        ledger.push(ActionLogEntry::new("m1", "Strike", 1, EntryKind::Standard));

        let plan = plan_movement(&ledger, path(10), 25);
        let MovePlan::Apply(steps) = &plan else {
            panic!("expected steps");
        };
        assert_eq!(
            steps[0],
            MoveStep::Undo {
                source: SourceId::from("m1"),
                label: "Strike".into(),
                was_move: false,
            }
        );
        assert!(matches!(steps[1], MoveStep::Resize { .. }));

        apply(&mut ledger, plan, &mut seq);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].label, "Stride: 10ft");
    }

    #[test]
    fn shrinking_to_an_earlier_segment_drops_the_later_one() {
        let mut ledger = Ledger::new();
        let mut seq = 0;
        drive(&mut ledger, path(15), &mut seq);
        ledger.push(ActionLogEntry::new("m1", "Strike", 1, EntryKind::Standard));
        drive(&mut ledger, path(30), &mut seq);
        assert_eq!(ledger.len(), 3);

        drive(&mut ledger, path(10), &mut seq);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.recorded_distance(), 10);
    }

    #[test]
    fn full_clear_stops_at_most_recent_move() {
        let mut ledger = Ledger::new();
        let mut seq = 0;
        drive(&mut ledger, path(10), &mut seq);
        ledger.push(ActionLogEntry::new("m1", "Strike", 1, EntryKind::Standard));
        ledger.push(ActionLogEntry::new("m2", "Strike", 1, EntryKind::Standard));

        let MovePlan::Apply(steps) = plan_movement(&ledger, None, 25) else {
            panic!("expected steps");
        };
        let moves: Vec<bool> = steps
            .iter()
            .map(|s| matches!(s, MoveStep::Undo { was_move: true, .. }))
            .collect();
        assert_eq!(moves, vec![false, false, true]);

        let only_actions = Ledger::with_entries(vec![ActionLogEntry::new(
            "m1",
            "Strike",
            1,
            EntryKind::Standard,
        )]);
        assert_eq!(
            plan_movement(&only_actions, None, 25),
            MovePlan::Ignore(IgnoreReason::NothingToClear)
        );
    }

    #[test]
    fn surcharge_and_elevation_shape_the_segment() {
        struct Swamp;
        impl TerrainOracle for Swamp {
            fn measure_path(&self, points: &[PathPoint]) -> u32 {
                5 * (points.len() as u32 - 1)
            }
            fn terrain_at(&self, _point: PathPoint) -> Terrain {
                Terrain::Difficult
            }
        }

        let points = [PathPoint::new(0.0, 0.0), PathPoint::new(1.0, 0.0)];
        let measured = MeasuredPath::measure(&points, &Swamp).unwrap();
        assert_eq!(measured.distance, 10);
        assert!(measured.difficult);

        let MovePlan::Apply(steps) = plan_movement(&Ledger::new(), Some(measured), 25) else {
            panic!("expected steps");
        };
        let MoveStep::Append { segment, cost } = &steps[0] else {
            panic!("expected append");
        };
        assert_eq!(segment.mode, MoveMode::Stride);
        assert_eq!(*cost, 1);

        let dropped = MeasuredPath::measure(&[PathPoint::new(1.0, 0.0)], &Swamp);
        assert_eq!(dropped.map(|m| (m.raw, m.distance)), Some((0, 5)));
        assert_eq!(
            plan_movement(&Ledger::new(), dropped, 25),
            MovePlan::Ignore(IgnoreReason::ZeroDistance)
        );

        let flying = [PathPoint::new(0.0, 0.0), PathPoint::elevated(1.0, 0.0, 10.0)];
        let measured = MeasuredPath::measure(&flying, &Swamp).unwrap();
        assert!(measured.elevated);
        assert!(MeasuredPath::measure(&[], &Swamp).is_none());
    }
}
