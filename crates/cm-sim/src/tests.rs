//! Integration tests for cm-sim.

use cm_activity::{
    ClassSettings, CommuteSettings, DurationDistribution, SmokeBreakSettings, SocialBreakSettings,
    VenueSource,
};
use cm_core::{AgentId, Coord, SimConfig, Tick};
use cm_day::{DaySettings, Transition, TransitionTable};
use cm_rendezvous::GroupSize;
use cm_spatial::{MapGraph, MapGraphBuilder};

use crate::{AgentStep, GroupConfig, ScenarioConfig, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 5 × 5 grid, 50 m spacing, corners at (0,0) and (200,200).
fn grid() -> MapGraph {
    let mut b = MapGraphBuilder::new();
    let ids: Vec<_> = (0..25)
        .map(|i| b.add_node(Coord::new((i % 5) as f64 * 50.0, (i / 5) as f64 * 50.0)))
        .collect();
    for i in 0..25 {
        if i % 5 < 4 {
            b.add_road(ids[i], ids[i + 1]);
        }
        if i < 20 {
            b.add_road(ids[i], ids[i + 5]);
        }
    }
    b.build()
}

/// (0,0)-(10,0) and (100,100)-(110,100), not connected.
fn islands() -> MapGraph {
    let mut b = MapGraphBuilder::new();
    let a = b.add_node(Coord::new(0.0, 0.0));
    let c = b.add_node(Coord::new(10.0, 0.0));
    let d = b.add_node(Coord::new(100.0, 100.0));
    let e = b.add_node(Coord::new(110.0, 100.0));
    b.add_road(a, c);
    b.add_road(d, e);
    b.build()
}

fn fixed(x: f64, y: f64) -> VenueSource {
    VenueSource::Fixed(vec![[x, y]])
}

/// A short day on the grid: ten-minute "days", five-minute classes.
fn short_day() -> DaySettings {
    DaySettings {
        commute: CommuteSettings {
            stations:        fixed(0.0, 0.0),
            day_length_secs: 600.0,
            ..CommuteSettings::default()
        },
        class: ClassSettings {
            venues:   VenueSource::Fixed(vec![[200.0, 200.0], [200.0, 0.0]]),
            duration: DurationDistribution::uniform(200.0, 400.0),
            ..ClassSettings::default()
        },
        social_break: SocialBreakSettings {
            tables: fixed(100.0, 100.0),
            group:  GroupSize::SOLO,
            ..SocialBreakSettings::default()
        },
        smoke_break: SmokeBreakSettings { spots: fixed(0.0, 200.0), ..SmokeBreakSettings::default() },
        ..DaySettings::default()
    }
}

fn config(total_ticks: u64) -> SimConfig {
    SimConfig { tick_duration_secs: 10, total_ticks, seed: 42, snapshot_interval_ticks: 0 }
}

fn scenario(total_ticks: u64, groups: Vec<GroupConfig>) -> ScenarioConfig {
    ScenarioConfig { sim: config(total_ticks), groups }
}

/// Records every step.
#[derive(Default)]
struct Recorder {
    steps:     Vec<(Tick, AgentStep)>,
    stuck:     Vec<(Tick, AgentId, Coord)>,
    snapshots: Vec<(Tick, Vec<Coord>)>,
    ticks:     u64,
    ended:     Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_step(&mut self, tick: Tick, step: &AgentStep) {
        self.steps.push((tick, step.clone()));
    }

    fn on_stuck(&mut self, tick: Tick, agent: AgentId, at: Coord) {
        self.stuck.push((tick, agent, at));
    }

    fn on_tick_end(&mut self, _tick: Tick, _woken: usize) {
        self.ticks += 1;
    }

    fn on_snapshot(&mut self, tick: Tick, positions: &[Coord]) {
        self.snapshots.push((tick, positions.to_vec()));
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

impl Recorder {
    fn steps_of(&self, agent: AgentId) -> impl Iterator<Item = &AgentStep> {
        self.steps.iter().map(|(_, s)| s).filter(move |s| s.agent == agent)
    }
}

// ── WakeQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wake_queue {
    use cm_core::{AgentId, Tick};

    use crate::WakeQueue;

    #[test]
    fn drains_sorted_and_deduplicated() {
        let mut q = WakeQueue::new();
        q.push(Tick(5), AgentId(3));
        q.push(Tick(5), AgentId(1));
        q.push(Tick(5), AgentId(3));
        q.push(Tick(9), AgentId(0));
        assert_eq!(q.len(), 4);
        assert_eq!(q.tick_count(), 2);
        assert_eq!(q.next_tick(), Some(Tick(5)));

        assert_eq!(q.drain_tick(Tick(5)), Some(vec![AgentId(1), AgentId(3)]));
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_tick(Tick(5)), None);
        assert_eq!(q.next_tick(), Some(Tick(9)));
    }

    #[test]
    fn with_all_queues_everyone() {
        let mut q = WakeQueue::with_all(3, Tick::ZERO);
        assert_eq!(q.drain_tick(Tick::ZERO), Some(vec![AgentId(0), AgentId(1), AgentId(2)]));
        assert!(q.is_empty());
    }
}

// ── Scenario files ────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;

    use cm_activity::VenueSource;

    use crate::{GroupConfig, ScenarioConfig, SimError};

    const SCENARIO: &str = r#"
[sim]
tick_duration_secs = 10
total_ticks = 8640
seed = 7
snapshot_interval_ticks = 360

[[groups]]
kind = "students"
count = 40

[groups.day.commute]
day_length_secs = 86400
offset = { kind = "gaussian", std_secs = 3600 }

[groups.day.social_break]
group = { min = 2, max = 4 }

[[groups]]
kind = "stationary"
venues = { map_nodes = { count = 6 } }
"#;

    #[test]
    fn parse_scenario() {
        let s = ScenarioConfig::parse(SCENARIO).unwrap();
        assert_eq!(s.sim.seed, 7);
        assert_eq!(s.sim.snapshot_interval_ticks, 360);
        assert_eq!(s.groups.len(), 2);
        let GroupConfig::Students { count, day } = &s.groups[0] else { panic!("expected students") };
        assert_eq!(*count, 40);
        assert_eq!(day.social_break.group.max, 4);
        assert_eq!(day.class, cm_activity::ClassSettings::default());
        assert_eq!(s.groups[1], GroupConfig::Stationary { count: None, venues: VenueSource::MapNodes { count: 6 } });
        assert_eq!(s.groups[1].kind_name(), "stationary");
    }

    #[test]
    fn unknown_group_kind_rejected() {
        let err = ScenarioConfig::parse("[[groups]]\nkind = \"visitors\"\ncount = 1\n").unwrap_err();
        assert!(matches!(err, SimError::Toml(_)));
    }

    #[test]
    fn unknown_field_rejected() {
        let err = ScenarioConfig::parse("[sim]\nticks = 5\n").unwrap_err();
        assert!(matches!(err, SimError::Toml(_)));
    }

    #[test]
    fn empty_scenario_rejected() {
        assert!(matches!(ScenarioConfig::parse("[sim]\nseed = 1\n"), Err(SimError::Config(_))));
    }

    #[test]
    fn zero_counts_rejected() {
        let students = "[[groups]]\nkind = \"students\"\ncount = 0\n";
        assert!(matches!(ScenarioConfig::parse(students), Err(SimError::Config(_))));
        let pinned = "[[groups]]\nkind = \"stationary\"\ncount = 0\nvenues = { fixed = [[1.0, 1.0]] }\n";
        assert!(matches!(ScenarioConfig::parse(pinned), Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_day_settings_rejected() {
        let text = "[[groups]]\nkind = \"students\"\ncount = 1\n[groups.day.transitions]\nclass = [{ to = \"commute\", p = 2.0 }]\n";
        assert!(matches!(ScenarioConfig::parse(text), Err(SimError::Day(_))));
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let text = "[sim]\ntick_duration_secs = 0\n[[groups]]\nkind = \"students\"\ncount = 1\n";
        assert!(matches!(ScenarioConfig::parse(text), Err(SimError::Core(_))));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus.toml");
        std::fs::File::create(&path).unwrap().write_all(SCENARIO.as_bytes()).unwrap();
        assert_eq!(ScenarioConfig::from_file(&path).unwrap().groups.len(), 2);

        let missing = dir.path().join("nope.toml");
        assert!(matches!(ScenarioConfig::from_file(&missing), Err(SimError::Io { .. })));
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use cm_activity::VenueSource;
    use cm_core::{AgentId, Coord, Tick};
    use cm_day::DayState;
    use cm_spatial::MapGraphBuilder;

    use crate::{GroupConfig, Mover, SimBuilder, SimError};

    use super::{GroupSize, grid, scenario, short_day};

    fn pinned(count: Option<usize>) -> GroupConfig {
        GroupConfig::Stationary { count, venues: VenueSource::Fixed(vec![[50.0, 50.0], [150.0, 150.0]]) }
    }

    #[test]
    fn spawns_groups_in_order() {
        let s = scenario(10, vec![
            GroupConfig::Students { count: 3, day: short_day() },
            pinned(None),
        ]);
        let sim = SimBuilder::new(s, grid()).build().unwrap();
        assert_eq!(sim.agent_count(), 5);
        assert_eq!(sim.groups, vec![0, 0, 0, 1, 1]);
        assert_eq!(sim.positions[0], Coord::new(0.0, 0.0), "students start at their station");
        assert_eq!(sim.positions[4], Coord::new(150.0, 150.0));
        assert!(matches!(sim.mover(AgentId(1)), Some(Mover::Day(o)) if o.state() == DayState::In(cm_activity::ActivityKind::Commute)));
        assert!(matches!(sim.mover(AgentId(3)), Some(Mover::Stationary(_))));
        assert!(sim.mover(AgentId(5)).is_none());
        assert_eq!(sim.wake_queue.len(), 5);
        assert_eq!(sim.wake_queue.next_tick(), Some(Tick::ZERO));
    }

    #[test]
    fn stationary_count_limited_by_venues() {
        let s = scenario(10, vec![pinned(Some(3))]);
        let Err(err) = SimBuilder::new(s, grid()).build() else { panic!("expected an error") };
        assert!(matches!(err, SimError::AgentCountMismatch { expected: 2, got: 3, .. }));
    }

    #[test]
    fn empty_map_rejected() {
        let s = scenario(10, vec![GroupConfig::Students { count: 1, day: short_day() }]);
        let Err(err) = SimBuilder::new(s, MapGraphBuilder::new().build()).build() else {
            panic!("expected an error")
        };
        assert!(matches!(err, SimError::Spatial(_)));
    }

    #[test]
    fn unreadable_venue_file_rejected() {
        let s = scenario(10, vec![GroupConfig::Stationary {
            count:  None,
            venues: VenueSource::File("/definitely/not/here.wkt".into()),
        }]);
        assert!(matches!(SimBuilder::new(s, grid()).build(), Err(SimError::Activity(_))));
    }

    #[test]
    fn groups_share_rendezvous_system() {
        let s = scenario(10, vec![
            GroupConfig::Students { count: 2, day: short_day() },
            GroupConfig::Students { count: 2, day: short_day() },
        ]);
        let sim = SimBuilder::new(s, grid()).build().unwrap();
        assert_eq!(sim.registry.len(), 1);
    }

    #[test]
    fn lone_student_cannot_form_pairs() {
        let mut day = short_day();
        day.social_break.group = GroupSize::new(2, 2);
        let s = scenario(10, vec![GroupConfig::Students { count: 1, day }]);
        let Err(err) = SimBuilder::new(s, grid()).build() else { panic!("expected an error") };
        assert!(matches!(err, SimError::Config(ref msg) if msg.contains("at least 2")), "{err}");
    }

    #[test]
    fn every_table_needs_enough_students() {
        // Three students over two tables: table 0 gets agents 0 and 2,
        // table 1 only agent 1.
        let mut day = short_day();
        day.social_break.tables = VenueSource::Fixed(vec![[100.0, 100.0], [0.0, 200.0]]);
        day.social_break.group = GroupSize::new(2, 3);
        let s = scenario(10, vec![GroupConfig::Students { count: 3, day: day.clone() }]);
        let Err(err) = SimBuilder::new(s, grid()).build() else { panic!("expected an error") };
        assert!(matches!(err, SimError::Config(ref msg) if msg.contains("table 1")), "{err}");

        let s = scenario(10, vec![GroupConfig::Students { count: 4, day }]);
        assert!(SimBuilder::new(s, grid()).build().is_ok());
    }

    #[test]
    fn pools_span_groups_sharing_a_system() {
        let mut day = short_day();
        day.social_break.group = GroupSize::new(2, 2);
        let s = scenario(10, vec![
            GroupConfig::Students { count: 1, day: day.clone() },
            GroupConfig::Students { count: 1, day },
        ]);
        assert!(SimBuilder::new(s, grid()).build().is_ok());
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use cm_activity::{ActivityKind, VenueSource};
    use cm_core::{AgentId, Coord, Tick};
    use cm_day::DayState;

    use crate::{CsvSnapshotObserver, GroupConfig, NoopObserver, SimBuilder};

    use super::*;

    #[test]
    fn runs_to_end_tick() {
        let s = scenario(500, vec![GroupConfig::Students { count: 4, day: short_day() }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.ticks, 500);
        assert_eq!(rec.ended, Some(Tick(500)));
        assert_eq!(sim.clock.current_tick, Tick(500));
        assert!(rec.stuck.is_empty());
        assert_eq!(sim.summary.steps as usize, rec.steps.len());
        assert!(sim.summary.distance_m > 0.0);
    }

    #[test]
    fn students_leave_commute() {
        // 5000 s is several ten-minute days.
        let s = scenario(500, vec![GroupConfig::Students { count: 6, day: short_day() }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        let left = rec
            .steps
            .iter()
            .any(|(_, s)| matches!(s.state, Some(DayState::To(k)) if k != ActivityKind::Commute));
        assert!(left, "nobody ever left the commute station");
    }

    #[test]
    fn wake_ticks_follow_travel_and_wait() {
        let s = scenario(300, vec![GroupConfig::Students { count: 2, day: short_day() }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        for agent in [AgentId(0), AgentId(1)] {
            let ticks: Vec<Tick> = rec.steps.iter().filter(|(_, s)| s.agent == agent).map(|(t, _)| *t).collect();
            let steps: Vec<&AgentStep> = rec.steps_of(agent).collect();
            for (w, step) in ticks.windows(2).zip(&steps) {
                let travel = step.path.as_ref().map_or(0.0, |p| p.travel_secs());
                let expect = ((travel + step.wait_secs) / 10.0).ceil().max(1.0) as u64;
                assert_eq!(w[1].0 - w[0].0, expect);
                assert_eq!(step.next_wake, Some(w[1]));
            }
        }
    }

    #[test]
    fn stationary_agents_step_once() {
        let s = scenario(100, vec![GroupConfig::Stationary {
            count:  None,
            venues: VenueSource::Fixed(vec![[50.0, 50.0], [150.0, 150.0]]),
        }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.steps.len(), 2);
        assert!(rec.steps.iter().all(|(t, s)| *t == Tick::ZERO && s.next_wake.is_none()));
        assert!(sim.wake_queue.is_empty());
        assert_eq!(sim.positions, vec![Coord::new(50.0, 50.0), Coord::new(150.0, 150.0)]);
    }

    #[test]
    fn endless_class_never_wakes() {
        let mut day = short_day();
        day.commute.day_length_secs = 100.0;
        day.class.duration = DurationDistribution::uniform(1e300, 1e300);
        day.class.fidget_secs = None;
        let mut transitions = TransitionTable::always(ActivityKind::Class);
        transitions.commute = vec![Transition::new(ActivityKind::Class, 1.0)];
        day.transitions = transitions;

        let s = scenario(200, vec![GroupConfig::Students { count: 1, day }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        let last = rec.steps_of(AgentId(0)).last().unwrap();
        assert_eq!(last.state, Some(DayState::In(ActivityKind::Class)));
        assert!(last.wait_secs > 1e299);
        assert_eq!(last.next_wake, None);
        assert!(sim.wake_queue.is_empty());
    }

    #[test]
    fn same_seed_same_run() {
        let run = || {
            let mut day = short_day();
            day.social_break.group = cm_rendezvous::GroupSize::new(2, 3);
            let s = scenario(400, vec![GroupConfig::Students { count: 8, day }]);
            let mut sim = SimBuilder::new(s, grid()).build().unwrap();
            let mut rec = Recorder::default();
            sim.run(&mut rec).unwrap();
            (rec.steps, sim.positions)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn group_walks_together() {
        let mut day = short_day();
        day.commute.day_length_secs = 100.0;
        day.social_break.group = cm_rendezvous::GroupSize::new(2, 2);
        day.social_break.min_walk_nodes = 10;
        day.social_break.max_walk_nodes = 10;
        let mut transitions = TransitionTable::always(ActivityKind::Commute);
        transitions.commute = vec![Transition::new(ActivityKind::SocialBreak, 1.0)];
        transitions.social_break = vec![Transition::new(ActivityKind::SmokeBreak, 1.0)];
        day.transitions = transitions;

        let s = scenario(200, vec![GroupConfig::Students { count: 2, day }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        // The first two legs are the first round; later rounds may follow.
        let legs: Vec<&AgentStep> = rec
            .steps
            .iter()
            .map(|(_, s)| s)
            .filter(|s| s.state == Some(DayState::In(ActivityKind::SocialBreak)))
            .filter(|s| s.path.as_ref().is_some_and(|p| p.len() == 10))
            .collect();
        assert!(legs.len() >= 2, "group never left the table");
        assert_ne!(legs[0].agent, legs[1].agent);
        assert_eq!(legs[0].path, legs[1].path);
        assert_eq!(legs[0].wait_secs, legs[1].wait_secs);
        assert_eq!(legs[0].path.as_ref().unwrap().first(), Some(Coord::new(100.0, 100.0)));
    }

    #[test]
    fn unreachable_venue_reported_stuck() {
        let mut day = short_day();
        day.commute.day_length_secs = 100.0;
        day.class.venues = VenueSource::Fixed(vec![[100.0, 100.0]]);
        day.social_break.tables = VenueSource::Fixed(vec![[0.0, 0.0]]);
        day.smoke_break.spots = VenueSource::Fixed(vec![[0.0, 0.0]]);
        let mut transitions = TransitionTable::always(ActivityKind::Class);
        transitions.commute = vec![Transition::new(ActivityKind::Class, 1.0)];
        day.transitions = transitions;

        let s = scenario(100, vec![GroupConfig::Students { count: 1, day }]);
        let mut sim = SimBuilder::new(s, islands()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.stuck.len() >= 2, "retried while stuck");
        assert!(rec.stuck.iter().all(|&(_, a, at)| a == AgentId(0) && at == Coord::new(0.0, 0.0)));
        assert_eq!(sim.summary.stuck as usize, rec.stuck.len());
    }

    #[test]
    fn snapshots_every_interval() {
        let mut s = scenario(100, vec![GroupConfig::Students { count: 3, day: short_day() }]);
        s.sim.snapshot_interval_ticks = 25;
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        let ticks: Vec<Tick> = rec.snapshots.iter().map(|(t, _)| *t).collect();
        assert_eq!(ticks, vec![Tick(0), Tick(25), Tick(50), Tick(75)]);
        assert!(rec.snapshots.iter().all(|(_, p)| p.len() == 3));
    }

    #[test]
    fn run_ticks_ignores_end() {
        let s = scenario(5, vec![GroupConfig::Students { count: 1, day: short_day() }]);
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        sim.run_ticks(20, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(20));
    }

    #[test]
    fn csv_snapshot_rows() {
        let mut s = scenario(50, vec![GroupConfig::Students { count: 2, day: short_day() }]);
        s.sim.snapshot_interval_ticks = 10;
        let mut sim = SimBuilder::new(s, grid()).build().unwrap();
        let mut out = CsvSnapshotObserver::new(csv::Writer::from_writer(Vec::new())).unwrap();
        sim.run(&mut out).unwrap();
        assert!(out.take_error().is_none());
        let text = String::from_utf8(out.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "tick,agent,x,y,event");
        assert_eq!(lines.len(), 1 + 5 * 2);
        assert!(lines[1].starts_with("0,0,") && lines[1].ends_with(",position"));
    }
}
