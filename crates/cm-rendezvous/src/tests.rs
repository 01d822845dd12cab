//! Unit tests for cm-rendezvous.

#[cfg(test)]
mod helpers {
    use cm_core::{Coord, SystemId};
    use crate::RendezvousSystem;

    pub fn venues(n: usize) -> Vec<Coord> {
        (0..n).map(|i| Coord::new(i as f64 * 100.0, 50.0)).collect()
    }

    pub fn system(n: usize) -> RendezvousSystem {
        RendezvousSystem::new(SystemId(0), venues(n)).unwrap()
    }
}

// ── Trip ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trip {
    use cm_core::{AgentId, Coord, Path};
    use crate::{SharedLeg, Trip};

    fn leg(x: f64) -> SharedLeg {
        let to = Coord::new(x, 0.0);
        SharedLeg {
            path:        Path::with_waypoints(vec![Coord::ORIGIN, to], 1.0),
            destination: to,
            wait_secs:   30.0,
        }
    }

    #[test]
    fn fills_to_capacity() {
        let t = Trip::new(2, Coord::ORIGIN);
        assert!(!t.add_member(AgentId(0)));
        assert!(!t.is_full());
        assert!(t.add_member(AgentId(1)));
        assert!(t.is_full());
        assert_eq!(t.members(), vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    #[should_panic(expected = "joined a full trip")]
    fn full_trip_rejects_member() {
        let t = Trip::new(1, Coord::ORIGIN);
        t.add_member(AgentId(0));
        t.add_member(AgentId(1));
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        let _ = Trip::new(0, Coord::ORIGIN);
    }

    #[test]
    fn full_is_not_gathered_until_all_arrive() {
        let t = Trip::new(2, Coord::ORIGIN);
        t.add_member(AgentId(0));
        assert_eq!(t.mark_arrived(), 1);
        assert!(t.add_member(AgentId(1)));
        assert!(t.is_full());
        assert!(!t.is_gathered(), "second member is still walking");
        assert_eq!(t.mark_arrived(), 2);
        assert!(t.is_gathered());
        assert_eq!(t.arrived_count(), 2);
    }

    #[test]
    #[should_panic(expected = "more arrivals than members")]
    fn arrival_without_member_panics() {
        let t = Trip::new(2, Coord::ORIGIN);
        t.add_member(AgentId(0));
        t.mark_arrived();
        t.mark_arrived();
    }

    #[test]
    fn first_leg_wins() {
        let t = Trip::new(1, Coord::ORIGIN);
        assert!(t.leg().is_none());
        assert!(t.set_leg(leg(10.0)));
        assert!(!t.set_leg(leg(20.0)));
        assert_eq!(t.leg().unwrap().destination, Coord::new(10.0, 0.0));
    }

    #[test]
    fn leg_or_init_runs_once() {
        let t = Trip::new(2, Coord::ORIGIN);
        let mut calls = 0;
        let a = t.leg_or_init(|| { calls += 1; leg(5.0) }).clone();
        let b = t.leg_or_init(|| { calls += 1; leg(9.0) }).clone();
        assert_eq!(calls, 1);
        assert_eq!(a, b);
    }
}

// ── GroupSize ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod group_size {
    use cm_core::{AgentId, AgentRng};
    use crate::{GroupSize, RendezvousError};

    #[test]
    fn validate_bounds() {
        assert!(GroupSize::new(1, 1).validate().is_ok());
        assert!(GroupSize::new(2, 5).validate().is_ok());
        assert_eq!(
            GroupSize::new(0, 3).validate(),
            Err(RendezvousError::GroupSize { min: 0, max: 3 })
        );
        assert!(GroupSize::new(4, 3).validate().is_err());
    }

    #[test]
    fn draw_is_inclusive() {
        let g = GroupSize::new(2, 4);
        let mut rng = AgentRng::new(1, AgentId(0));
        let mut seen = [false; 5];
        for _ in 0..500 {
            let n = g.draw(&mut rng);
            assert!((2..=4).contains(&n));
            seen[n] = true;
        }
        assert!(seen[2] && seen[3] && seen[4], "max must be reachable");
    }
}

// ── RendezvousSystem ──────────────────────────────────────────────────────────

#[cfg(test)]
mod system {
    use std::sync::Arc;

    use cm_core::{AgentId, AgentRng, SystemId};
    use crate::{GroupSize, RendezvousError, RendezvousSystem};

    use super::helpers::{system, venues};

    #[test]
    fn no_venues_rejected() {
        assert_eq!(
            RendezvousSystem::new(SystemId(3), vec![]).unwrap_err(),
            RendezvousError::NoVenues(SystemId(3))
        );
    }

    #[test]
    fn venue_by_agent_modulo() {
        let sys = system(3);
        let v = venues(3);
        assert_eq!(sys.venue_for(AgentId(0)), v[0]);
        assert_eq!(sys.venue_for(AgentId(4)), v[1]);
        assert_eq!(sys.venue_for(AgentId(8)), v[2]);
        assert!(sys.pending(0).is_none());
    }

    #[test]
    fn pairs_then_fresh_trip() {
        // Agents 0, 2, 4 all map to venue 0 of 2.
        let sys = system(2);
        let g = GroupSize::new(2, 2);
        let mut rngs: Vec<AgentRng> = (0..5).map(|i| AgentRng::new(9, AgentId(i))).collect();

        let t0 = sys.get_instructions(AgentId(0), g, &mut rngs[0]);
        assert_eq!(t0.capacity(), 2);
        assert!(!t0.is_full());
        assert!(Arc::ptr_eq(&sys.pending(0).unwrap(), &t0));

        let t2 = sys.get_instructions(AgentId(2), g, &mut rngs[2]);
        assert!(Arc::ptr_eq(&t0, &t2));
        assert!(t0.is_full(), "earlier member observes the trip fill");
        assert!(sys.pending(0).is_none(), "full trip is detached from its slot");

        let t4 = sys.get_instructions(AgentId(4), g, &mut rngs[4]);
        assert!(!Arc::ptr_eq(&t0, &t4));
        assert_eq!(t4.members(), vec![AgentId(4)]);
        assert_eq!(t0.members(), vec![AgentId(0), AgentId(2)]);
        assert_eq!(t4.location(), venues(2)[0]);
    }

    #[test]
    fn solo_groups_seal_immediately() {
        let sys = system(4);
        for i in 0..20 {
            let mut rng = AgentRng::new(0, AgentId(i));
            let t = sys.get_instructions(AgentId(i), GroupSize::SOLO, &mut rng);
            assert!(t.is_full());
            assert_eq!(t.members(), vec![AgentId(i)]);
        }
        for v in 0..4 {
            assert!(sys.pending(v).is_none());
        }
    }

    #[test]
    fn venues_fill_independently() {
        let sys = system(2);
        let g = GroupSize::new(2, 2);
        let mut rng = AgentRng::new(0, AgentId(0));
        let a = sys.get_instructions(AgentId(0), g, &mut rng);
        let b = sys.get_instructions(AgentId(1), g, &mut rng);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(sys.pending(0).is_some());
        assert!(sys.pending(1).is_some());
    }

    #[test]
    fn members_never_exceed_capacity() {
        let sys = system(1);
        let g = GroupSize::new(1, 6);
        let mut trips = Vec::new();
        for i in 0..200 {
            let mut rng = AgentRng::new(5, AgentId(i));
            trips.push(sys.get_instructions(AgentId(i), g, &mut rng));
        }
        for t in &trips {
            let n = t.member_count();
            assert!(n >= 1 && n <= t.capacity());
        }
    }

    #[test]
    fn same_seed_same_capacities() {
        let run = || {
            let sys = system(3);
            let g = GroupSize::new(1, 5);
            let mut caps = Vec::new();
            for i in 0..60 {
                let mut rng = AgentRng::new(1234, AgentId(i));
                let t = sys.get_instructions(AgentId(i), g, &mut rng);
                caps.push((t.capacity(), t.member_count()));
            }
            caps
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn concurrent_joins_respect_capacity() {
        let sys = system(2);
        let g = GroupSize::new(3, 3);
        let trips: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let sys = &sys;
                    s.spawn(move || {
                        let mut out = Vec::new();
                        for k in 0..30u32 {
                            let id = AgentId(t * 30 + k);
                            let mut rng = AgentRng::new(7, id);
                            out.push(sys.get_instructions(id, g, &mut rng));
                        }
                        out
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(trips.len(), 240);
        let mut sealed = 0;
        for t in &trips {
            assert_eq!(t.capacity(), 3);
            assert!(t.member_count() <= 3);
            if t.is_full() {
                sealed += 1;
            }
        }
        // 120 agents per venue, groups of 3: every trip seals.
        assert_eq!(sealed, 240);
        assert!(sys.pending(0).is_none());
        assert!(sys.pending(1).is_none());
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use std::sync::Arc;

    use cm_core::SystemId;
    use crate::{RendezvousError, RendezvousRegistry};

    use super::helpers::venues;

    #[test]
    fn same_id_shares_system() {
        let mut reg = RendezvousRegistry::new();
        let a = reg.get_or_create(SystemId(1), venues(3)).unwrap();
        let b = reg.get_or_create(SystemId(1), venues(3)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn distinct_ids_are_isolated() {
        let mut reg = RendezvousRegistry::new();
        let a = reg.get_or_create(SystemId(1), venues(3)).unwrap();
        let b = reg.get_or_create(SystemId(2), venues(3)).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(reg.get(SystemId(2)).is_some());
        assert!(reg.get(SystemId(9)).is_none());
    }

    #[test]
    fn conflicting_venues_rejected() {
        let mut reg = RendezvousRegistry::new();
        reg.get_or_create(SystemId(1), venues(3)).unwrap();
        assert_eq!(
            reg.get_or_create(SystemId(1), venues(2)).unwrap_err(),
            RendezvousError::VenueMismatch(SystemId(1))
        );
    }

    #[test]
    fn empty_venues_propagate() {
        let mut reg = RendezvousRegistry::new();
        assert!(reg.get_or_create(SystemId(0), vec![]).is_err());
        assert!(reg.is_empty());
    }
}
