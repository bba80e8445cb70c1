use std::collections::HashMap;

use itertools::Itertools;
use tracing::warn;

use crate::constraint::Constraint;

/// Brute-force matching enumerator (spec §4.4, §9). Not a `Sequencer`:
/// rather than producing one chain, it lazily produces every chain
/// obtainable by interleaving a permutation of each direction partition,
/// longer partition first. The caller scores each chain (e.g. by linked
/// path length) and keeps the best, optionally short-circuiting the
/// iteration on a time or count budget.
///
/// The interleave here is a full round-robin merge: when partitions are
/// unequal in size, the leftover tail of the longer one is appended
/// rather than dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceMatching;

impl BruteForceMatching {
    pub fn new() -> Self {
        Self
    }

    pub fn enumerate(&self, constraints: Vec<Constraint>) -> Box<dyn Iterator<Item = Vec<Constraint>>> {
        let mut partitions: HashMap<[u8; 2], Vec<Constraint>> = HashMap::new();
        for c in constraints {
            match c.parameters().direction {
                Some(d) => partitions.entry(d).or_default().push(c),
                None => {
                    warn!("brute-force matching requires directed constraints");
                    return Box::new(std::iter::empty());
                }
            }
        }
        if partitions.len() != 2 {
            warn!("brute-force matching requires exactly two distinct direction values, found {}", partitions.len());
            return Box::new(std::iter::empty());
        }

        let mut dirs: Vec<[u8; 2]> = partitions.keys().copied().collect();
        dirs.sort();
        let p1 = partitions.remove(&dirs[0]).unwrap();
        let p2 = partitions.remove(&dirs[1]).unwrap();
        let (len1, len2) = (p1.len(), p2.len());

        let perms1: Vec<Vec<Constraint>> = p1.into_iter().permutations(len1).collect();
        let perms2: Vec<Vec<Constraint>> = p2.into_iter().permutations(len2).collect();

        let chains = perms1.into_iter().cartesian_product(perms2).flat_map(|(a, b)| {
            let mut out: Vec<Vec<Constraint>> = Vec::new();
            if a.len() >= b.len() {
                out.push(interleave(a.clone(), b.clone()));
            }
            if b.len() >= a.len() {
                out.push(interleave(b, a));
            }
            out
        });

        Box::new(chains)
    }
}

fn interleave(first: Vec<Constraint>, second: Vec<Constraint>) -> Vec<Constraint> {
    let mut result = Vec::with_capacity(first.len() + second.len());
    let mut fi = first.into_iter();
    let mut si = second.into_iter();
    loop {
        match (fi.next(), si.next()) {
            (Some(f), Some(s)) => {
                result.push(f);
                result.push(s);
            }
            (Some(f), None) => {
                result.push(f);
                result.extend(fi);
                break;
            }
            (None, Some(s)) => {
                result.push(s);
                result.extend(si);
                break;
            }
            (None, None) => break,
        }
    }
    result
}
