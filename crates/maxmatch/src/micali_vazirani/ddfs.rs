//! Double depth-first search.
//!
//! Two colored searches descend from the bridge endpoints toward exposed
//! roots, kept at equal min-level so neither can slip past the other.
//! Each color owns a stack of pending `(from, pred)` edges. When the two
//! fronts land on the same petal representative, one side backtracks —
//! red pops first, then green; changing that order changes which valid
//! matching comes out, not its size. If neither side can back away the
//! meeting point is the bottleneck of a new petal. Two distinct exposed
//! roots mean an augmenting path.
//!
//! Every vertex absorbed on the way records the color pair that reached
//! it plus `above`/`below` links; path unwinding reads all four.

use super::MicaliVazirani;

/// What one DDFS run concluded.
pub(crate) enum Outcome {
    /// Both endpoints already collapse into the same petal.
    Empty,
    /// Collision at a bottleneck: a new petal.
    Petal,
    /// Two distinct exposed roots: an augmenting path.
    Path,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Green,
    Red,
}

/// An in-flight search edge: where we came from (absent for the two
/// seed edges) and the predecessor it leads to.
type Edge = (Option<usize>, usize);

impl<'a> MicaliVazirani<'a> {
    /// Redirect the walk through buds and remember the descent link.
    fn prepare_next(&mut self, e: &mut Edge) {
        if let Some(from) = e.0 {
            self.nodes[from].below = Some(e.1);
        }
        e.1 = self.bud_star(e.1);
    }

    fn level_of(&self, e: &Option<Edge>) -> u32 {
        let e = e.expect("live ddfs edge");
        let n = self.bud_star(e.1);
        self.nodes[n].min_level.expect("ddfs nodes carry a min level")
    }

    fn stack_pop(&mut self, side: Side) -> Option<Edge> {
        let stack = match side {
            Side::Green => &mut self.green_stack,
            Side::Red => &mut self.red_stack,
        };
        stack.pop().map(|(from, pred)| (Some(from), pred))
    }

    /// Claim the edge's target for `side` (if unvisited), expose its
    /// predecessors on the side's stack, and advance to the next edge.
    fn step_into(
        &mut self,
        side: Side,
        last: &mut Option<usize>,
        nx: &mut Option<Edge>,
        green_top: usize,
        red_top: usize,
    ) {
        let mut e = nx.expect("live ddfs edge");
        self.prepare_next(&mut e);
        let target = e.1;
        if !self.nodes[target].visited {
            self.nodes[target].above = e.0;
            *last = Some(target);
            self.nodes[target].visited = true;
            self.nodes[target].ddfs_green = Some(green_top);
            self.nodes[target].ddfs_red = Some(red_top);
            self.ddfs_seen.push(target);
            let preds = self.nodes[target].preds.clone();
            let stack = match side {
                Side::Green => &mut self.green_stack,
                Side::Red => &mut self.red_stack,
            };
            for p in preds.into_iter().flatten() {
                stack.push((target, p));
            }
        }
        *nx = self.stack_pop(side);
    }

    /// A dead end on one color: fall back to the edge before the last
    /// collision and re-aim the `below` chain along the surviving route.
    fn recover(&mut self, before: Option<Edge>) {
        let Some(e) = before else { return };
        let mut tmp = e.0;
        while let Some(t) = tmp {
            let Some(rc) = self.nodes[t].above else { break };
            let preds = self.nodes[rc].preds.clone();
            for ri in preds.into_iter().flatten() {
                if self.bud_star(ri) == t {
                    self.nodes[rc].below = Some(ri);
                    break;
                }
            }
            tmp = self.nodes[t].above;
        }
    }

    pub(crate) fn ddfs(&mut self, green_top: usize, red_top: usize) -> Outcome {
        self.ddfs_seen.clear();
        self.ddfs_bottleneck = None;
        self.red_stack.clear();
        self.green_stack.clear();

        let mut last_g: Option<usize> = None;
        let mut last_r: Option<usize> = None;

        if self.bud_star(red_top) == self.bud_star(green_top) {
            return Outcome::Empty;
        }
        if self.nodes[green_top].min_level == Some(0) && self.nodes[red_top].min_level == Some(0)
        {
            return Outcome::Path;
        }

        let mut ng: Option<Edge> = Some((None, green_top));
        let mut nr: Option<Edge> = Some((None, red_top));
        let mut red_before: Option<Edge> = None;
        let mut green_before: Option<Edge> = None;

        loop {
            let both_at_roots = match (last_r, last_g) {
                (Some(r), Some(g)) => {
                    self.nodes[r].min_level == Some(0) && self.nodes[g].min_level == Some(0)
                }
                _ => false,
            };
            if both_at_roots {
                break;
            }

            // Keep both fronts at the same min-level.
            while nr.is_some() && ng.is_some() && self.level_of(&nr) != self.level_of(&ng) {
                while nr.is_some() && self.level_of(&nr) > self.level_of(&ng) {
                    self.step_into(Side::Red, &mut last_r, &mut nr, green_top, red_top);
                }
                if nr.is_none() {
                    nr = red_before;
                    self.recover(red_before);
                }
                while ng.is_some() && self.level_of(&nr) < self.level_of(&ng) {
                    self.step_into(Side::Green, &mut last_g, &mut ng, green_top, red_top);
                }
                if ng.is_none() {
                    ng = green_before;
                    self.recover(green_before);
                }
            }

            let r_rep = self.bud_star(nr.expect("live red edge").1);
            let g_rep = self.bud_star(ng.expect("live green edge").1);
            if r_rep == g_rep {
                // Collision: back the red side off first, then green.
                if !self.red_stack.is_empty() {
                    red_before = nr;
                    let mut e = nr.expect("live red edge");
                    self.prepare_next(&mut e);
                    nr = self.stack_pop(Side::Red);
                    match nr {
                        Some(en) => last_r = en.0,
                        None => nr = red_before,
                    }
                } else if !self.green_stack.is_empty() {
                    green_before = ng;
                    let mut e = ng.expect("live green edge");
                    self.prepare_next(&mut e);
                    ng = self.stack_pop(Side::Green);
                    match ng {
                        Some(en) => last_g = en.0,
                        None => ng = green_before,
                    }
                } else {
                    // Nobody can move: the meeting point is a bottleneck.
                    let mut er = nr.expect("live red edge");
                    self.prepare_next(&mut er);
                    let mut eg = ng.expect("live green edge");
                    self.prepare_next(&mut eg);
                    self.ddfs_bottleneck = Some(er.1);
                    return Outcome::Petal;
                }
            } else {
                self.step_into(Side::Red, &mut last_r, &mut nr, green_top, red_top);
                self.step_into(Side::Green, &mut last_g, &mut ng, green_top, red_top);
            }
        }
        Outcome::Path
    }
}
