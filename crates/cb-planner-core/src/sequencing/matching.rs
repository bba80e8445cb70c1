use std::collections::HashMap;

use tracing::warn;

use super::{take, Sequencer};
use crate::constraint::Constraint;
use crate::geometry::Point;
use crate::heuristic::Heuristic;

fn flip(d: [u8; 2]) -> [u8; 2] {
    [d[1], d[0]]
}

/// Matching sequencer (spec §4.4): requires every constraint to carry a
/// `direction`, with exactly two distinct direction tuples present.
/// Alternates between the two partitions so the chain visits opposite
/// directions back to back, starting from the larger partition so the
/// alternation both starts and ends on it.
#[derive(Debug, Clone, Copy)]
pub struct Matching<H: Heuristic> {
    pub heuristic: H,
}

impl<H: Heuristic> Matching<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }
}

impl<H: Heuristic> Sequencer for Matching<H> {
    fn sequence(&self, constraints: Vec<Constraint>, start_point: Option<Point>) -> Vec<Constraint> {
        if constraints.is_empty() {
            return Vec::new();
        }

        let mut partitions: HashMap<[u8; 2], Vec<usize>> = HashMap::new();
        for (idx, c) in constraints.iter().enumerate() {
            match c.parameters().direction {
                Some(d) => partitions.entry(d).or_default().push(idx),
                None => {
                    warn!("matching sequencer requires directed constraints");
                    return Vec::new();
                }
            }
        }
        if partitions.len() != 2 {
            warn!("matching sequencer requires exactly two distinct direction values, found {}", partitions.len());
            return Vec::new();
        }

        let mut dirs: Vec<[u8; 2]> = partitions.keys().copied().collect();
        dirs.sort();
        let (d0, d1) = (dirs[0], dirs[1]);
        let larger = if partitions[&d0].len() >= partitions[&d1].len() { d0 } else { d1 };

        let mut slots: Vec<Option<Constraint>> = constraints.into_iter().map(Some).collect();

        let (start_idx, ingress) = match start_point {
            None => {
                let idx = partitions[&larger][0];
                (idx, slots[idx].as_ref().unwrap().ingress_points()[0])
            }
            Some(start) => {
                let search: &[[u8; 2]] = if partitions[&d0].len() != partitions[&d1].len() { std::slice::from_ref(&larger) } else { &dirs };
                let mut best: Option<(usize, Point, f64)> = None;
                for d in search {
                    for &idx in &partitions[d] {
                        for p in slots[idx].as_ref().unwrap().ingress_points() {
                            let cost = self.heuristic.cost(start, p);
                            if best.as_ref().map_or(true, |(_, _, bc)| cost < *bc) {
                                best = Some((idx, p, cost));
                            }
                        }
                    }
                }
                let (idx, p, _) = best.expect("non-empty partition");
                (idx, p)
            }
        };

        slots[start_idx].as_mut().unwrap().select_ingress(ingress);
        let start_direction = slots_direction(&slots, start_idx, &partitions, d0, d1);
        partitions.get_mut(&start_direction).unwrap().retain(|&i| i != start_idx);

        let chain_start_ingress = ingress;
        let mut chain = vec![take(&mut slots, start_idx)];
        let mut chain_egress = chain[0].egress_points()[0];
        let mut last_direction = start_direction;

        while partitions.values().any(|p| !p.is_empty()) {
            let next_direction = flip(last_direction);
            let candidates = partitions.get(&next_direction).cloned().unwrap_or_default();
            if candidates.is_empty() {
                warn!("matching sequencer ran out of constraints in direction {:?} before the chain completed", next_direction);
                break;
            }

            let mut best: Option<(usize, Point, f64)> = None;
            for &idx in &candidates {
                for p in slots[idx].as_ref().unwrap().ingress_points() {
                    let cost = self.heuristic.cost(chain_egress, p);
                    let take_it = match &best {
                        None => true,
                        Some((_, best_p, bc)) => {
                            if (cost - *bc).abs() < 1e-9 {
                                let tie_current = self.heuristic.cost(*best_p, chain_start_ingress);
                                let tie_new = self.heuristic.cost(p, chain_start_ingress);
                                tie_new > tie_current
                            } else {
                                cost < *bc
                            }
                        }
                    };
                    if take_it {
                        best = Some((idx, p, cost));
                    }
                }
            }

            let (idx, p, _) = best.unwrap();
            slots[idx].as_mut().unwrap().select_ingress(p);
            partitions.get_mut(&next_direction).unwrap().retain(|&i| i != idx);
            let next = take(&mut slots, idx);
            chain_egress = next.egress_points()[0];
            chain.push(next);
            last_direction = next_direction;
        }

        chain
    }
}

fn slots_direction(slots: &[Option<Constraint>], idx: usize, partitions: &HashMap<[u8; 2], Vec<usize>>, d0: [u8; 2], d1: [u8; 2]) -> [u8; 2] {
    let _ = slots;
    if partitions[&d0].contains(&idx) {
        d0
    } else {
        d1
    }
}
