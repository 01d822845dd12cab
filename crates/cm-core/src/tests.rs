//! Unit tests for cm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::from_index(42), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn none_edge_is_max() {
        assert_eq!(EdgeId::NONE.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "agent#7");
        assert_eq!(NodeId(3).to_string(), "node#3");
    }
}

#[cfg(test)]
mod geo {
    use crate::Coord;

    #[test]
    fn distance_is_euclidean() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_2(b), 25.0);
    }

    #[test]
    fn clamp_to_bounds() {
        let max = Coord::new(100.0, 50.0);
        assert_eq!(Coord::new(-5.0, 70.0).clamp_to(max), Coord::new(0.0, 50.0));
        assert_eq!(Coord::new(20.0, 20.0).clamp_to(max), Coord::new(20.0, 20.0));
    }

    #[test]
    fn mirror_then_translate() {
        let c = Coord::new(10.0, 20.0).mirrored().translate(5.0, 100.0);
        assert_eq!(c, Coord::new(15.0, 80.0));
    }
}

#[cfg(test)]
mod path {
    use crate::{Coord, Path};

    #[test]
    fn length_and_travel_time() {
        let mut p = Path::new(2.0);
        p.add_waypoint(Coord::new(0.0, 0.0));
        p.add_waypoint(Coord::new(0.0, 10.0));
        p.add_waypoint(Coord::new(10.0, 10.0));
        assert_eq!(p.length_m(), 20.0);
        assert_eq!(p.travel_secs(), 10.0);
        assert_eq!(p.last(), Some(Coord::new(10.0, 10.0)));
    }

    #[test]
    fn stationary_path_takes_no_time() {
        let p = Path::stationary(Coord::new(4.0, 4.0));
        assert_eq!(p.len(), 1);
        assert_eq!(p.travel_secs(), 0.0);
    }

    #[test]
    fn returned_copies_are_independent() {
        let original = Path::with_waypoints(vec![Coord::ORIGIN], 1.0);
        let mut copy = original.clone();
        copy.add_waypoint(Coord::new(1.0, 1.0));
        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(t.checked_offset(3), Some(Tick(13)));
        assert_eq!(Tick(5).checked_offset(u64::MAX), None);
        assert_eq!(Tick(15).since(Tick(10)), 5);
        assert_eq!(Tick(5).since(Tick(10)), 0);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(10);
        assert_eq!(clock.elapsed_secs(), 0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.elapsed_secs(), 20);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(10);
        assert_eq!(clock.ticks_for_secs(0.0), Some(0));
        assert_eq!(clock.ticks_for_secs(1.0), Some(1));
        assert_eq!(clock.ticks_for_secs(20.0), Some(2));
        assert_eq!(clock.ticks_for_secs(f64::INFINITY), None);
        assert_eq!(clock.ticks_for_secs(1e300), Some(u64::MAX));
    }

    #[test]
    fn clock_dhm() {
        let clock = SimClock::at(3600, Tick(25));
        assert_eq!(clock.elapsed_dhm(), (1, 1, 0));
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let cfg = SimConfig { tick_duration_secs: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        assert!(SimConfig::default().validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            assert_eq!(r1.unit(), r2.unit());
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        assert_ne!(r0.unit(), r1.unit(), "seeds for adjacent agents should diverge");
    }

    #[test]
    fn between_in_bounds() {
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..1000 {
            let v = rng.between(2.0, 5.0);
            assert!((2.0..5.0).contains(&v));
        }
        assert_eq!(rng.between(3.0, 3.0), 3.0);
    }

    #[test]
    fn fires_extremes() {
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..1000 {
            assert!(rng.fires(1.0));
            assert!(!rng.fires(0.0));
        }
    }
}

#[cfg(test)]
mod error {
    use crate::error::{check_non_negative, check_range};
    use crate::CoreError;

    #[test]
    fn range_checks() {
        assert!(check_range(1.0, 2.0).is_ok());
        assert!(check_range(2.0, 2.0).is_ok());
        assert_eq!(check_range(3.0, 2.0), Err(CoreError::InvertedRange { min: 3.0, max: 2.0 }));
        assert!(check_range(f64::NAN, 2.0).is_err());
    }

    #[test]
    fn negative_rejected() {
        assert!(check_non_negative("radius", 0.0).is_ok());
        assert!(check_non_negative("radius", -1.0).is_err());
    }
}
