//! Augmenting-path extraction through nested petals.
//!
//! After a successful DDFS the path exists implicitly in the `above`/
//! `below` links and the per-node color pair. Walking it down crosses
//! petals: at an inner (non-outer) vertex the walk climbs to the petal
//! top, jumps the bridge to the opposite color, and descends the other
//! flank to the bud — recursively, since flanks contain further petals,
//! and with segment reversals wherever the recorded direction opposes
//! the traversal. Petal nesting is unbounded, so the whole walk runs on
//! an explicit frame stack with a small return register.

use super::MicaliVazirani;

/// Resumable positions of the path walk.
#[derive(Clone, Copy)]
enum WalkFrame {
    /// Top-level walk toward a root.
    Path { cur: Option<usize>, resume: bool },
    /// One petal crossing (enter → up → jump → down).
    Blossom {
        cur: usize,
        phase: u8,
        top: usize,
        jumped: usize,
        mark: usize,
    },
    /// Descent along one flank until the bud (or a dead end).
    Down {
        cur: Option<usize>,
        stop: Option<usize>,
        before: usize,
        phase: u8,
    },
    /// Climb to the petal top, reversing opposing segments.
    Up { c: usize, mark: usize, phase: u8 },
    /// Repeated petal crossing until `stop` is reached.
    Conv { cur: usize, stop: usize, phase: u8 },
}

impl<'a> MicaliVazirani<'a> {
    /// Extract the augmenting path between bridge endpoints into
    /// `self.path`, one root to the other.
    pub(crate) fn find_path(&mut self, green: usize, red: usize) {
        self.path.clear();
        self.run_walk(WalkFrame::Path {
            cur: Some(green),
            resume: false,
        });
        self.path.reverse();
        self.run_walk(WalkFrame::Path {
            cur: Some(red),
            resume: false,
        });
    }

    fn blossom_frame(cur: usize) -> WalkFrame {
        WalkFrame::Blossom {
            cur,
            phase: 0,
            top: 0,
            jumped: 0,
            mark: 0,
        }
    }

    fn down_frame(&self, cur: usize, before: Option<usize>) -> WalkFrame {
        WalkFrame::Down {
            cur: Some(cur),
            stop: self.nodes[cur].bud,
            before: before.unwrap_or(cur),
            phase: 0,
        }
    }

    fn run_walk(&mut self, start: WalkFrame) {
        let mut stack = vec![start];
        let mut ret: Option<usize> = None;

        while !stack.is_empty() {
            let idx = stack.len() - 1;
            match stack[idx] {
                WalkFrame::Path { cur, resume } => {
                    if resume {
                        stack[idx] = WalkFrame::Path {
                            cur: ret,
                            resume: false,
                        };
                        continue;
                    }
                    match cur {
                        None => {
                            stack.pop();
                        }
                        Some(c) => {
                            if self.nodes[c].bud.is_some() {
                                stack[idx] = WalkFrame::Path { cur, resume: true };
                                stack.push(Self::blossom_frame(c));
                            } else {
                                self.path.push(c);
                                stack[idx] = WalkFrame::Path {
                                    cur: self.nodes[c].below,
                                    resume: false,
                                };
                            }
                        }
                    }
                }

                WalkFrame::Blossom {
                    cur,
                    phase,
                    top,
                    jumped,
                    mark,
                } => match phase {
                    0 => {
                        if self.nodes[cur].outer() {
                            stack[idx] = WalkFrame::Blossom {
                                cur,
                                phase: 1,
                                top,
                                jumped,
                                mark,
                            };
                            let frame = self.down_frame(cur, None);
                            stack.push(frame);
                        } else {
                            stack[idx] = WalkFrame::Blossom {
                                cur,
                                phase: 2,
                                top,
                                jumped,
                                mark,
                            };
                            stack.push(WalkFrame::Up {
                                c: cur,
                                mark: 0,
                                phase: 0,
                            });
                        }
                    }
                    2 => {
                        // The climb returned the petal top: decide how to
                        // jump its bridge.
                        let top = ret.expect("petal climb yields a top");
                        let dg = self.nodes[top].ddfs_green;
                        let dr = self.nodes[top].ddfs_red;
                        if dg == Some(top) || dr == Some(top) {
                            let jumped = if dg == Some(top) { dr } else { dg }
                                .expect("petal top carries both colors");
                            stack[idx] = WalkFrame::Blossom {
                                cur,
                                phase: 1,
                                top,
                                jumped,
                                mark,
                            };
                            let frame = self.down_frame(jumped, Some(top));
                            stack.push(frame);
                        } else {
                            let dgv = dg.expect("petal top carries both colors");
                            let drv = dr.expect("petal top carries both colors");
                            let (walk_from, jumped) = if self.bud_star_includes(dgv, top) {
                                (dgv, drv)
                            } else {
                                (drv, dgv)
                            };
                            stack[idx] = WalkFrame::Blossom {
                                cur,
                                phase: 3,
                                top,
                                jumped,
                                mark: self.path.len(),
                            };
                            stack.push(WalkFrame::Conv {
                                cur: walk_from,
                                stop: top,
                                phase: 0,
                            });
                        }
                    }
                    3 => {
                        // Bridge-side segment was collected against the
                        // walk direction: flip it, then descend.
                        self.path[mark..].reverse();
                        stack[idx] = WalkFrame::Blossom {
                            cur,
                            phase: 1,
                            top,
                            jumped,
                            mark,
                        };
                        let frame = self.down_frame(jumped, Some(top));
                        stack.push(frame);
                    }
                    _ => {
                        // Descent finished; its return value stands.
                        stack.pop();
                    }
                },

                WalkFrame::Down {
                    cur,
                    stop,
                    before,
                    phase,
                } => match phase {
                    0 => {
                        if cur.is_none() || cur == stop {
                            ret = cur;
                            stack.pop();
                        } else {
                            let cu = cur.expect("checked non-empty");
                            let same_colors = self.nodes[cu].ddfs_green
                                == self.nodes[before].ddfs_green
                                && self.nodes[cu].ddfs_red == self.nodes[before].ddfs_red;
                            if !same_colors {
                                stack[idx] = WalkFrame::Down {
                                    cur,
                                    stop,
                                    before,
                                    phase: 1,
                                };
                                stack.push(Self::blossom_frame(cu));
                            } else {
                                self.path.push(cu);
                                stack[idx] = WalkFrame::Down {
                                    cur: self.nodes[cu].below,
                                    stop,
                                    before,
                                    phase: 0,
                                };
                            }
                        }
                    }
                    _ => {
                        stack[idx] = WalkFrame::Down {
                            cur: ret,
                            stop,
                            before,
                            phase: 0,
                        };
                    }
                },

                WalkFrame::Up { c, mark, phase } => match phase {
                    0 => {
                        self.path.push(c);
                        match self.nodes[c].above {
                            None => {
                                ret = Some(c);
                                stack.pop();
                            }
                            Some(above) => {
                                let segment = match self.nodes[above].below {
                                    Some(bv) if bv != c && self.bud_star_includes(bv, c) => {
                                        Some(bv)
                                    }
                                    _ => None,
                                };
                                match segment {
                                    Some(bv) => {
                                        stack[idx] = WalkFrame::Up {
                                            c,
                                            mark: self.path.len(),
                                            phase: 1,
                                        };
                                        stack.push(WalkFrame::Conv {
                                            cur: bv,
                                            stop: c,
                                            phase: 0,
                                        });
                                    }
                                    None => {
                                        stack[idx] = WalkFrame::Up {
                                            c: above,
                                            mark,
                                            phase: 0,
                                        };
                                    }
                                }
                            }
                        }
                    }
                    _ => {
                        self.path[mark..].reverse();
                        let above = self.nodes[c].above.expect("segment implies an above link");
                        stack[idx] = WalkFrame::Up {
                            c: above,
                            mark,
                            phase: 0,
                        };
                    }
                },

                WalkFrame::Conv { cur, stop, phase } => match phase {
                    0 => {
                        if cur == stop {
                            stack.pop();
                        } else {
                            stack[idx] = WalkFrame::Conv {
                                cur,
                                stop,
                                phase: 1,
                            };
                            stack.push(Self::blossom_frame(cur));
                        }
                    }
                    _ => {
                        let next = ret.expect("petal walk stays on the cycle");
                        stack[idx] = WalkFrame::Conv {
                            cur: next,
                            stop,
                            phase: 0,
                        };
                    }
                },
            }
        }
    }

    /// Flip matched status along `self.path` and count the new pair.
    pub(crate) fn augment_path(&mut self) {
        let mut i = 0;
        while i + 1 < self.path.len() {
            let a = self.path[i];
            let b = self.path[i + 1];
            self.nodes[a].matched = Some(b);
            self.nodes[b].matched = Some(a);
            i += 2;
        }
        self.matched_count += 1;
    }

    /// Delete the consumed path from the level structure, cascading to
    /// vertices that lose their last live predecessor.
    pub(crate) fn remove_path(&mut self) {
        while let Some(current) = self.path.pop() {
            if self.nodes[current].deleted {
                continue;
            }
            self.nodes[current].deleted = true;
            let pred_to = self.nodes[current].pred_to.clone();
            for (target, slot) in pred_to {
                if self.nodes[target].deleted {
                    continue;
                }
                if self.nodes[target].preds[slot].take().is_some() {
                    self.nodes[target].live_preds -= 1;
                    if self.nodes[target].live_preds == 0 {
                        self.path.push(target);
                    }
                }
            }
        }
    }
}
