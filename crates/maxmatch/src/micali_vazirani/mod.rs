//! Micali-Vazirani: O(E·√V) general matching.
//!
//! Each phase interleaves two sweeps over one level structure:
//! - MIN sweep (`min_phase`): breadth-by-level construction. Even levels
//!   scan non-matching edges, odd levels follow the matched edge. A scan
//!   reaching an already-leveled vertex is a *bridge*: filed by tenacity
//!   `ℓ(x)+ℓ(y)+1` into bucket `(T−1)/2`, or hung on both endpoints when
//!   one side has no level yet (promoted later from inside a petal).
//! - MAX sweep (`max_phase`): bridges of the current bucket feed the
//!   double depth-first search (`ddfs`). Two exposed roots mean an
//!   augmenting path — walk it, flip it, and delete it from the level
//!   structure so later paths of this phase stay vertex-disjoint. A
//!   collision means a petal: every node the DDFS saw gets the
//!   bottleneck as its bud and a max level `2Δ+1 − min_level`, and its
//!   hanging bridges whose tenacity just became defined are filed.
//!
//! Phases repeat, each from a fresh level structure, until a phase finds
//! no augmenting path or the matching is perfect.

mod ddfs;
mod paths;

use crate::graph::{collect_matching, Graph, Matching};
use crate::greedy::{seed_matching, Warmstart};
use crate::levels::Buckets;

/// Per-vertex state of the level structure.
#[derive(Clone, Debug)]
struct Node {
    /// Predecessor slots; emptied (not removed) when a path is deleted.
    preds: Vec<Option<usize>>,
    /// Reverse index: `(target, slot in target.preds)` for each edge
    /// this node was recorded as predecessor of.
    pred_to: Vec<(usize, usize)>,
    hanging_bridges: Vec<usize>,
    min_level: Option<u32>,
    max_level: Option<u32>,
    even_level: Option<u32>,
    odd_level: Option<u32>,
    matched: Option<usize>,
    bud: Option<usize>,
    above: Option<usize>,
    below: Option<usize>,
    ddfs_green: Option<usize>,
    ddfs_red: Option<usize>,
    live_preds: usize,
    deleted: bool,
    visited: bool,
}

impl Node {
    fn new() -> Self {
        Node {
            preds: Vec::new(),
            pred_to: Vec::new(),
            hanging_bridges: Vec::new(),
            min_level: None,
            max_level: None,
            even_level: None,
            odd_level: None,
            matched: None,
            bud: None,
            above: None,
            below: None,
            ddfs_green: None,
            ddfs_red: None,
            live_preds: 0,
            deleted: false,
            visited: false,
        }
    }

    /// Reachable on an even alternating path strictly before any odd one.
    fn outer(&self) -> bool {
        match (self.even_level, self.odd_level) {
            (Some(e), Some(o)) => e < o,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Clear everything but the matching.
    fn reset(&mut self) {
        self.preds.clear();
        self.pred_to.clear();
        self.hanging_bridges.clear();
        self.min_level = None;
        self.max_level = None;
        self.even_level = None;
        self.odd_level = None;
        self.bud = None;
        self.above = None;
        self.below = None;
        self.ddfs_green = None;
        self.ddfs_red = None;
        self.live_preds = 0;
        self.deleted = false;
        self.visited = false;
    }
}

/// Micali-Vazirani engine over a borrowed graph.
pub struct MicaliVazirani<'a> {
    g: &'a Graph,
    nodes: Vec<Node>,
    levels: Buckets<usize>,
    bridges: Buckets<(usize, usize)>,

    green_stack: Vec<(usize, usize)>,
    red_stack: Vec<(usize, usize)>,
    path: Vec<usize>,
    ddfs_seen: Vec<usize>,
    ddfs_bottleneck: Option<usize>,

    matched_count: usize,
    bridge_count: i64,
    todo_count: i64,
    seeded: usize,
}

/// Convenience: run the engine without a warm start.
pub fn maximum_matching(g: &Graph) -> Matching {
    MicaliVazirani::new(g).maximum_matching(Warmstart::Off)
}

impl<'a> MicaliVazirani<'a> {
    pub fn new(g: &'a Graph) -> Self {
        let n = g.vertex_count();
        MicaliVazirani {
            g,
            nodes: (0..n).map(|_| Node::new()).collect(),
            levels: Buckets::new(),
            bridges: Buckets::new(),
            green_stack: Vec::new(),
            red_stack: Vec::new(),
            path: Vec::new(),
            ddfs_seen: Vec::new(),
            ddfs_bottleneck: None,
            matched_count: 0,
            bridge_count: 0,
            todo_count: 0,
            seeded: 0,
        }
    }

    #[inline]
    pub fn seeded(&self) -> usize {
        self.seeded
    }

    pub fn maximum_matching(&mut self, warmstart: Warmstart) -> Matching {
        let n = self.nodes.len();

        // Seed through the shared warm start, then mirror into nodes.
        let mut mate: Vec<Option<usize>> = vec![None; n];
        self.seeded = seed_matching(self.g, &mut mate, warmstart);
        self.matched_count = self.seeded;
        for (i, m) in mate.into_iter().enumerate() {
            self.nodes[i].matched = m;
        }

        for i in 0..n {
            if self.nodes[i].matched.is_none() {
                self.add_to_level(0, i);
                self.set_min_level(i, 0);
            }
        }
        let mut phase = 0u32;
        let mut found = self.run_phase();
        while n / 2 > self.matched_count && found {
            phase += 1;
            tracing::debug!(phase, size = self.matched_count, "phase complete");
            self.phase_reset();
            found = self.run_phase();
        }
        let mate: Vec<Option<usize>> = self.nodes.iter().map(|nd| nd.matched).collect();
        collect_matching(&mate)
    }

    /// One phase: alternate MIN and MAX sweeps level by level until an
    /// augmentation happens or the structure runs dry.
    fn run_phase(&mut self) -> bool {
        let n = self.nodes.len();
        for i in 0..(n / 2 + 1) {
            if self.todo_count <= 0 && self.bridge_count <= 0 {
                return false;
            }
            self.min_phase(i);
            if self.max_phase(i) {
                return true;
            }
        }
        false
    }

    fn phase_reset(&mut self) {
        self.levels.clear();
        self.bridges.clear();
        self.bridge_count = 0;
        self.todo_count = 0;
        for i in 0..self.nodes.len() {
            self.nodes[i].reset();
            if self.nodes[i].matched.is_none() {
                self.add_to_level(0, i);
                self.set_min_level(i, 0);
            }
        }
    }

    fn add_to_level(&mut self, level: usize, node: usize) {
        self.levels.push(level, node);
        self.todo_count += 1;
    }

    fn add_bridge(&mut self, bucket: usize, a: usize, b: usize) {
        self.bridges.push(bucket, (a, b));
        self.bridge_count += 1;
    }

    fn set_min_level(&mut self, v: usize, level: u32) {
        self.nodes[v].min_level = Some(level);
        if level % 2 != 0 {
            self.nodes[v].odd_level = Some(level);
        } else {
            self.nodes[v].even_level = Some(level);
        }
    }

    fn set_max_level(&mut self, v: usize, level: u32) {
        self.nodes[v].max_level = Some(level);
        if level % 2 != 0 {
            self.nodes[v].odd_level = Some(level);
        } else {
            self.nodes[v].even_level = Some(level);
        }
    }

    /// Shortest alternating walk exposed→x—y→exposed, or `None` while an
    /// endpoint still lacks the level the walk needs.
    fn tenacity(&self, x: usize, y: usize) -> Option<u32> {
        if self.nodes[x].matched == Some(y) {
            match (self.nodes[x].odd_level, self.nodes[y].odd_level) {
                (Some(a), Some(b)) => Some(a + b + 1),
                _ => None,
            }
        } else {
            match (self.nodes[x].even_level, self.nodes[y].even_level) {
                (Some(a), Some(b)) => Some(a + b + 1),
                _ => None,
            }
        }
    }

    /// Chase bud pointers to the outermost petal representative.
    fn bud_star(&self, mut c: usize) -> usize {
        while let Some(b) = self.nodes[c].bud {
            if b == c {
                break;
            }
            c = b;
        }
        c
    }

    fn bud_star_includes(&self, mut c: usize, goal: usize) -> bool {
        loop {
            if c == goal {
                return true;
            }
            match self.nodes[c].bud {
                Some(b) => c = b,
                None => return false,
            }
        }
    }

    /// One scan step from `from` (at `level`) to `to`: either extend the
    /// level structure or record a bridge.
    fn step_to(&mut self, to: usize, from: usize, level: u32) {
        let next = level + 1;
        let tl = self.nodes[to].min_level;
        if tl.is_none() || tl >= Some(next) {
            if tl != Some(next) {
                self.add_to_level(next as usize, to);
                self.set_min_level(to, next);
            }
            self.nodes[to].preds.push(Some(from));
            self.nodes[to].live_preds += 1;
            let slot = self.nodes[to].preds.len() - 1;
            self.nodes[from].pred_to.push((to, slot));
        } else {
            match self.tenacity(to, from) {
                None => {
                    self.nodes[to].hanging_bridges.push(from);
                    self.nodes[from].hanging_bridges.push(to);
                }
                Some(ten) => self.add_bridge(((ten - 1) / 2) as usize, to, from),
            }
        }
    }

    /// MIN sweep over level `i`.
    fn min_phase(&mut self, i: usize) {
        let snapshot: Vec<usize> = self.levels.level(i).to_vec();
        let g = self.g;
        for &current in &snapshot {
            self.todo_count -= 1;
            let matched = self.nodes[current].matched;
            if i % 2 == 0 {
                for &e in g.neighbors(current) {
                    if Some(e) != matched {
                        self.step_to(e, current, i as u32);
                    }
                }
            } else if let Some(m) = matched {
                self.step_to(m, current, i as u32);
            }
        }
    }

    /// MAX sweep over tenacity bucket `i`. Returns true when the phase
    /// ends because the matching became perfect mid-sweep.
    fn max_phase(&mut self, i: usize) -> bool {
        let mut found = false;
        let snapshot: Vec<(usize, usize)> = self.bridges.level(i).to_vec();
        for &(green, red) in &snapshot {
            self.bridge_count -= 1;
            if self.nodes[green].deleted || self.nodes[red].deleted {
                continue;
            }

            match self.ddfs(green, red) {
                ddfs::Outcome::Empty => continue,
                ddfs::Outcome::Path => {
                    self.find_path(green, red);
                    self.augment_path();
                    if self.nodes.len() / 2 <= self.matched_count {
                        return true;
                    }
                    self.remove_path();
                    found = true;
                }
                ddfs::Outcome::Petal => {
                    let bottleneck = self.ddfs_bottleneck.expect("petal has a bottleneck");
                    let current_tenacity = (2 * i + 1) as u32;
                    let seen = self.ddfs_seen.clone();
                    for &t in &seen {
                        self.nodes[t].bud = Some(bottleneck);
                        let ml = self.nodes[t].min_level.expect("petal node has a min level");
                        let max_lv = current_tenacity - ml;
                        self.set_max_level(t, max_lv);
                        self.add_to_level(max_lv as usize, t);
                        // Hanging bridges whose far endpoint just gained
                        // a level are promoted to real bridges.
                        let hangs = self.nodes[t].hanging_bridges.clone();
                        for h in hangs {
                            if let Some(ten) = self.tenacity(t, h) {
                                self.add_bridge(((ten - 1) / 2) as usize, t, h);
                            }
                        }
                    }
                }
            }
        }
        found
    }
}
