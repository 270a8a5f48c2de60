//! Critical pairs and the queue they wait in.

use crate::{
    poly::{module::ModuleTerm, monomial::Monomial},
    Entry,
};
use hashbrown::HashSet;
use std::{cmp::Reverse, collections::BinaryHeap};

/// Second member of a critical pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partner {
    /// Another element of the basis under construction.
    Basis(usize),
    /// An element of the prior basis a restricted system is taken modulo.
    Prior(usize),
    /// A monomial relation of the group algebra, applied in the pair's position.
    Relation(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPair<M: Monomial> {
    /// Basis element whose insertion created the pair.
    pub i: usize,
    pub partner: Partner,
    /// Least common multiple of the two leading terms.
    pub lcm: ModuleTerm<M>,
    pub sugar: u32,
    seq: usize,
}

impl<M: Monomial> CriticalPair<M> {
    /// Position in creation order, unique per queue.
    pub fn seq(&self) -> usize {
        self.seq
    }
}

/// Order in which pending pairs are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    /// Smallest lcm first.
    Normal,
    /// Smallest sugar degree first, then smallest lcm.
    #[default]
    Sugar,
}

type Weight<M> = Reverse<(u32, ModuleTerm<M>, usize)>;

/// Pending critical pairs, popped lowest-weight first with ties going to the older pair.
#[derive(Debug)]
pub struct PairQueue<M: Monomial> {
    strategy: SelectionStrategy,
    heap: BinaryHeap<Entry<Weight<M>, CriticalPair<M>>>,
    pending: HashSet<(usize, usize)>,
    next_seq: usize,
}

#[inline]
fn key(i: usize, j: usize) -> (usize, usize) {
    (i.max(j), i.min(j))
}

impl<M: Monomial> PairQueue<M> {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self {
            strategy,
            heap: BinaryHeap::new(),
            pending: HashSet::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, i: usize, partner: Partner, lcm: ModuleTerm<M>, sugar: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Partner::Basis(j) = partner {
            self.pending.insert(key(i, j));
        }
        let weight = match self.strategy {
            SelectionStrategy::Normal => Reverse((0, lcm.clone(), seq)),
            SelectionStrategy::Sugar => Reverse((sugar, lcm.clone(), seq)),
        };
        self.heap.push(Entry(
            weight,
            CriticalPair {
                i,
                partner,
                lcm,
                sugar,
                seq,
            },
        ));
    }

    pub fn pop(&mut self) -> Option<CriticalPair<M>> {
        let Entry(_, pair) = self.heap.pop()?;
        if let Partner::Basis(j) = pair.partner {
            self.pending.remove(&key(pair.i, j));
        }
        Some(pair)
    }

    /// Whether the pair of basis elements `i` and `j` is still waiting.
    pub fn is_pending(&self, i: usize, j: usize) -> bool {
        self.pending.contains(&key(i, j))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
