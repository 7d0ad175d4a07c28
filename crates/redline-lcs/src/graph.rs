//! Edit-graph searches: Myers' forward, backward, and two-sided variants.
//!
//! The edit graph of sequences A and B is the grid `[0..=|A|] x [0..=|B|]`
//! where horizontal moves delete from A, vertical moves insert from B, and
//! diagonal moves consume equal elements. A forward search expands a
//! frontier of farthest-reaching paths from `(0, 0)`; a backward search
//! expands one from `(|A|, |B|)`; the two-sided search alternates both and
//! stops when Myers' Lemma says the frontiers have met.

use tracing::debug;

use crate::label::DiagLabels;
use crate::lcs::{Diff, Lcs};
use crate::seq::SequencePair;

/// Which edit-graph search to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Forward,
    Backward,
    TwoSided,
}

/// Compute the differences between two sequences, along with the common
/// subsequence the search found.
///
/// `limit` bounds the search depth, i.e. the number of non-diagonal edges
/// in the path; past it the search degrades to an approximate result that
/// still converts to consistent diffs. A `limit <= 0` means effectively
/// unbounded.
pub fn compute<S: SequencePair>(seqs: &S, strategy: Strategy, limit: isize) -> (Vec<Diff>, Lcs) {
    let limit = if limit <= 0 { 1 << 25 } else { limit };
    let (alen, blen) = seqs.lengths();
    let mut graph = EditGraph {
        seqs,
        vf: DiagLabels::with_limit(limit),
        vb: DiagLabels::with_limit(limit),
        limit,
        lx: 0,
        ly: 0,
        ux: alen as isize,
        uy: blen as isize,
        delta: alen as isize - blen as isize,
    };
    let lcs = match strategy {
        Strategy::Forward => graph.forward_search(),
        Strategy::Backward => graph.backward_search(),
        Strategy::TwoSided => graph.twosided_search(),
    };
    let diffs = lcs.to_diffs(alen, blen);
    (diffs, lcs)
}

/// Whether `(d, k)` is a diagonal the search can have labeled.
fn ok(d: isize, k: isize) -> bool {
    d >= 0 && -d <= k && k <= d
}

struct EditGraph<'a, S> {
    seqs: &'a S,
    /// Forward and backward diagonal labels.
    vf: DiagLabels,
    vb: DiagLabels,
    /// Maximal search depth.
    limit: isize,
    /// Bounding rectangle of the current edit graph. Only `ux`/`uy` vary
    /// (the stitch fallback shrinks them); a point `(x, y)` lies on
    /// diagonal `k = x - y` forward and `k - delta` backward.
    lx: isize,
    ly: isize,
    ux: isize,
    uy: isize,
    delta: isize,
}

impl<S: SequencePair> EditGraph<'_, S> {
    /// From `(relx, relx - k)`, slide down the diagonal over equal
    /// elements as far as possible; returns the x reached.
    fn look_forward(&self, k: isize, relx: isize) -> isize {
        let rely = relx - k;
        let (x, y) = (relx + self.lx, rely + self.ly);
        if x < self.ux && y < self.uy {
            x + self.seqs.common_prefix_len(
                x as usize,
                self.ux as usize,
                y as usize,
                self.uy as usize,
            ) as isize
        } else {
            x
        }
    }

    /// Slide up the diagonal toward the origin as far as equal elements
    /// allow; `k` is in backward coordinates (forward `k + delta`).
    fn look_backward(&self, k: isize, relx: isize) -> isize {
        let rely = relx - (k + self.delta);
        let (x, y) = (relx + self.lx, rely + self.ly);
        if x > 0 && y > 0 {
            x - self.seqs.common_suffix_len(0, x as usize, 0, y as usize) as isize
        } else {
            x
        }
    }

    fn set_forward(&mut self, d: isize, k: isize, relx: isize) {
        let x = self.look_forward(k, relx);
        self.vf.set(d, k, x - self.lx);
    }

    fn set_backward(&mut self, d: isize, k: isize, relx: isize) {
        let x = self.look_backward(k, relx);
        self.vb.set(d, k, x - self.lx);
    }

    fn get_forward(&self, d: isize, k: isize) -> isize {
        self.vf.get(d, k)
    }

    fn get_backward(&self, d: isize, k: isize) -> isize {
        self.vb.get(d, k)
    }

    /// Find a diagonal where the forward `df`-frontier and backward
    /// `db`-frontier have met (Myers' Lemma). The frontiers can only meet
    /// when `df + db + delta` is even; having found a meeting diagonal,
    /// scan the rest of the range for one whose endpoints make the stitch
    /// degenerate, since those let [`EditGraph::stitch`] skip path
    /// reconstruction.
    fn meet_diagonal(&self, df: isize, db: isize) -> Option<isize> {
        if (df + db + self.delta) % 2 != 0 {
            return None;
        }
        let kmin = (-db + self.delta).max(-df);
        let kmax = (db + self.delta).min(df);
        let mut k = kmin;
        while k <= kmax {
            let x = self.vf.get(df, k);
            let u = self.vb.get(db, k - self.delta);
            if u <= x {
                let mut l = k;
                while l <= kmax {
                    let x = self.vf.get(df, l);
                    let y = x - l;
                    let u = self.vb.get(db, l - self.delta);
                    let v = u - l;
                    if x == u || u == 0 || v == 0 || y == self.uy || x == self.ux {
                        return Some(l);
                    }
                    l += 2;
                }
                return Some(k);
            }
            k += 2;
        }
        None
    }

    /// Recover the subsequence reached by the forward search at `(d, k)`
    /// by backtracking toward the origin: a step whose predecessor label
    /// sits one depth up is a horizontal or vertical edge; anything else
    /// is a diagonal match, prepended to the result.
    fn forward_lcs(&self, mut d: isize, mut k: isize) -> Lcs {
        let mut ans = Lcs::default();
        let mut x = self.get_forward(d, k);
        while x != 0 || x - k != 0 {
            if ok(d - 1, k - 1) && x - 1 == self.get_forward(d - 1, k - 1) {
                // (x-1, y) is labeled d-1: a horizontal edge.
                d -= 1;
                k -= 1;
                x -= 1;
                continue;
            } else if ok(d - 1, k + 1) && x == self.get_forward(d - 1, k + 1) {
                // (x, y-1) is labeled d-1: a vertical edge.
                d -= 1;
                k += 1;
                continue;
            }
            let y = x - k;
            ans.push_front(x + self.lx - 1, y + self.ly - 1);
            x -= 1;
        }
        ans
    }

    /// Recover the subsequence reached by the backward search at `(d, k)`
    /// by backtracking toward the far corner, appending matches.
    fn backward_lcs(&self, mut d: isize, mut k: isize) -> Lcs {
        let mut ans = Lcs::default();
        let mut x = self.get_backward(d, k);
        while x != self.ux || x - (k + self.delta) != self.uy {
            if ok(d - 1, k - 1) && x == self.get_backward(d - 1, k - 1) {
                d -= 1;
                k -= 1;
                continue;
            } else if ok(d - 1, k + 1) && x + 1 == self.get_backward(d - 1, k + 1) {
                d -= 1;
                k += 1;
                x += 1;
                continue;
            }
            let y = x - (k + self.delta);
            ans.push_back(x + self.lx, y + self.ly);
            x += 1;
        }
        ans
    }

    /// The forward path has reached the far corner; recover its
    /// subsequence.
    fn forward_done(&self, d: isize, k: isize) -> Option<Lcs> {
        let x = self.vf.get(d, k);
        let y = x - k;
        if x == self.ux && y == self.uy {
            Some(self.forward_lcs(d, k))
        } else {
            None
        }
    }

    /// The backward path has reached the origin; recover its subsequence.
    fn backward_done(&self, d: isize, k: isize) -> Option<Lcs> {
        let x = self.vb.get(d, k);
        let y = x - (k + self.delta);
        if x == 0 && y == 0 {
            Some(self.backward_lcs(d, k))
        } else {
            None
        }
    }

    /// Combine the forward and backward subsequences that met on diagonal
    /// `kf` at depths `(df, db)`, with `db == df` or `db == df - 1`.
    ///
    /// Myers proved there is a `df`-path from the origin to `(u, v)` and a
    /// `db`-path from `(x, y)` to the far corner. The cases below identify
    /// a labeled predecessor of the meeting point so both halves can be
    /// read straight out of the label stores; only the final fallback has
    /// to rerun a search, inside the shrunk rectangle `(0, 0)-(u, v)`.
    fn stitch(&mut self, df: isize, db: isize, kf: isize) -> Lcs {
        let x = self.vf.get(df, kf);
        let y = x - kf;
        let kb = kf - self.delta;
        let u = self.vb.get(db, kb);
        let v = u - kf;

        // The halves already share the meeting point.
        if x == u {
            let mut lcs = self.forward_lcs(df, kf);
            lcs.segments.extend(self.backward_lcs(db, kb).segments);
            lcs.sort();
            return lcs;
        }

        // A horizontal or vertical edge from a df-1 label reaches (u, v):
        // that forward path plus the backward half covers the rectangle.
        if u > 0 && ok(df - 1, u - 1 - v) && self.vf.get(df - 1, u - 1 - v) == u - 1 {
            let mut lcs = self.forward_lcs(df - 1, u - 1 - v);
            lcs.segments.extend(self.backward_lcs(db, kb).segments);
            lcs.sort();
            return lcs;
        }
        if v > 0 && ok(df - 1, u - (v - 1)) && self.vf.get(df - 1, u - (v - 1)) == u {
            let mut lcs = self.forward_lcs(df - 1, u - (v - 1));
            lcs.segments.extend(self.backward_lcs(db, kb).segments);
            lcs.sort();
            return lcs;
        }

        // The unshared stretch runs along an edge of the rectangle, all
        // horizontal or vertical, so one half carries the whole answer.
        if u == 0 || v == 0 || x == self.ux || y == self.uy {
            if u == 0 || v == 0 {
                return self.backward_lcs(db, kb);
            }
            return self.forward_lcs(df, kf);
        }

        // Symmetric to the df-1 cases: a db-1 label adjacent to (x, y).
        if x + 1 <= self.ux
            && ok(db - 1, x + 1 - y - self.delta)
            && self.vb.get(db - 1, x + 1 - y - self.delta) == x + 1
        {
            let mut lcs = self.backward_lcs(db - 1, kb + 1);
            lcs.segments.extend(self.forward_lcs(df, kf).segments);
            lcs.sort();
            return lcs;
        }
        if y + 1 <= self.uy
            && ok(db - 1, x - (y + 1) - self.delta)
            && self.vb.get(db - 1, x - (y + 1) - self.delta) == x
        {
            let mut lcs = self.backward_lcs(db - 1, kb - 1);
            lcs.segments.extend(self.forward_lcs(df, kf).segments);
            lcs.sort();
            return lcs;
        }

        // No labeled predecessor fits: rerun the forward search inside
        // (0, 0)-(u, v) and concatenate with the outer backward path.
        let mut lcs = self.backward_lcs(db, kb);
        let (oldx, oldy) = (self.ux, self.uy);
        self.ux = u;
        self.uy = v;
        lcs.segments.extend(self.forward_search().segments);
        self.ux = oldx;
        self.uy = oldy;
        lcs.sort();
        lcs
    }

    /// Run the forward search until it reaches the far corner or the
    /// depth limit.
    fn forward_search(&mut self) -> Lcs {
        self.set_forward(0, 0, self.lx);
        if let Some(ans) = self.forward_done(0, 0) {
            return ans;
        }
        for d in 0..self.limit {
            self.set_forward(d + 1, -(d + 1), self.get_forward(d, -d));
            if let Some(ans) = self.forward_done(d + 1, -(d + 1)) {
                return ans;
            }
            self.set_forward(d + 1, d + 1, self.get_forward(d, d) + 1);
            if let Some(ans) = self.forward_done(d + 1, d + 1) {
                return ans;
            }
            let mut k = -d + 1;
            while k <= d - 1 {
                // Interior diagonals take the farther of a vertical step
                // from k-1 and a horizontal step from k+1; the +1 sits on
                // different sides in the forward and backward passes.
                let lookv = self.look_forward(k, self.get_forward(d, k - 1) + 1);
                let lookh = self.look_forward(k, self.get_forward(d, k + 1));
                if lookv > lookh {
                    self.set_forward(d + 1, k, lookv);
                } else {
                    self.set_forward(d + 1, k, lookh);
                }
                if let Some(ans) = self.forward_done(d + 1, k) {
                    return ans;
                }
                k += 2;
            }
        }

        // Depth limit reached: back off to the deepest frontier point
        // still inside the rectangle that maximizes x + y.
        debug!(limit = self.limit, "forward search hit depth limit");
        let mut kmax = -self.limit - 1;
        let mut diagmax = -1;
        let mut k = -self.limit;
        while k <= self.limit {
            let x = self.get_forward(self.limit, k);
            let y = x - k;
            if x + y > diagmax && x <= self.ux && y <= self.uy {
                diagmax = x + y;
                kmax = k;
            }
            k += 2;
        }
        self.forward_lcs(self.limit, kmax)
    }

    /// Run the backward search until it reaches the origin or the depth
    /// limit.
    fn backward_search(&mut self) -> Lcs {
        self.set_backward(0, 0, self.ux);
        if let Some(ans) = self.backward_done(0, 0) {
            return ans;
        }
        for d in 0..self.limit {
            self.set_backward(d + 1, -(d + 1), self.get_backward(d, -d) - 1);
            if let Some(ans) = self.backward_done(d + 1, -(d + 1)) {
                return ans;
            }
            self.set_backward(d + 1, d + 1, self.get_backward(d, d));
            if let Some(ans) = self.backward_done(d + 1, d + 1) {
                return ans;
            }
            let mut k = -d + 1;
            while k <= d - 1 {
                let lookv = self.look_backward(k, self.get_backward(d, k - 1));
                let lookh = self.look_backward(k, self.get_backward(d, k + 1) - 1);
                if lookv < lookh {
                    self.set_backward(d + 1, k, lookv);
                } else {
                    self.set_backward(d + 1, k, lookh);
                }
                if let Some(ans) = self.backward_done(d + 1, k) {
                    return ans;
                }
                k += 2;
            }
        }

        // Depth limit reached: take the frontier point minimizing x + y
        // that is still inside the rectangle.
        debug!(limit = self.limit, "backward search hit depth limit");
        let mut kmax = -self.limit - 1;
        let mut diagmin = isize::MAX;
        let mut k = -self.limit;
        while k <= self.limit {
            let x = self.get_backward(self.limit, k);
            let y = x - (k + self.delta);
            if x + y < diagmin && x >= 0 && y >= 0 {
                diagmin = x + y;
                kmax = k;
            }
            k += 2;
        }
        if kmax < -self.limit {
            panic!("no backward paths at depth limit {}", self.limit);
        }
        self.backward_lcs(self.limit, kmax)
    }

    /// Advance the forward and backward frontiers alternately, one depth
    /// each, stopping as soon as Myers' Lemma says they meet.
    fn twosided_search(&mut self) -> Lcs {
        self.set_forward(0, 0, self.lx);
        self.set_backward(0, 0, self.ux);

        for d in 0..self.limit {
            // A backward extension just finished (or nothing has run yet).
            if let Some(k) = self.meet_diagonal(d, d) {
                return self.stitch(d, d, k);
            }
            // Extend the forward frontier from d to d+1.
            self.set_forward(d + 1, -(d + 1), self.get_forward(d, -d));
            self.set_forward(d + 1, d + 1, self.get_forward(d, d) + 1);
            let mut k = -d + 1;
            while k <= d - 1 {
                let lookv = self.look_forward(k, self.get_forward(d, k - 1) + 1);
                let lookh = self.look_forward(k, self.get_forward(d, k + 1));
                if lookv > lookh {
                    self.set_forward(d + 1, k, lookv);
                } else {
                    self.set_forward(d + 1, k, lookh);
                }
                k += 2;
            }
            if let Some(k) = self.meet_diagonal(d + 1, d) {
                return self.stitch(d + 1, d, k);
            }
            // Extend the backward frontier from d to d+1.
            self.set_backward(d + 1, -(d + 1), self.get_backward(d, -d) - 1);
            self.set_backward(d + 1, d + 1, self.get_backward(d, d));
            let mut k = -d + 1;
            while k <= d - 1 {
                let lookv = self.look_backward(k, self.get_backward(d, k - 1));
                let lookh = self.look_backward(k, self.get_backward(d, k + 1) - 1);
                if lookv < lookh {
                    self.set_backward(d + 1, k, lookv);
                } else {
                    self.set_backward(d + 1, k, lookh);
                }
                k += 2;
            }
        }

        // Depth limit reached without a meeting: stitch the best partial
        // forward and backward subsequences and repair the overlap.
        debug!(
            limit = self.limit,
            "two-sided search hit depth limit; combining partial subsequences"
        );
        let mut kmax = -self.limit - 1;
        let mut diagmax = -1;
        let mut k = -self.limit;
        while k <= self.limit {
            let x = self.get_forward(self.limit, k);
            let y = x - k;
            if x + y > diagmax && x <= self.ux && y <= self.uy {
                diagmax = x + y;
                kmax = k;
            }
            k += 2;
        }
        if kmax < -self.limit {
            panic!("no forward paths at depth limit {}", self.limit);
        }
        let mut lcs = self.forward_lcs(self.limit, kmax);

        let mut kmax = -self.limit - 1;
        let mut diagmin = isize::MAX;
        let mut k = -self.limit;
        while k <= self.limit {
            let x = self.get_backward(self.limit, k);
            let y = x - (k + self.delta);
            if x + y < diagmin && x >= 0 && y >= 0 {
                diagmin = x + y;
                kmax = k;
            }
            k += 2;
        }
        if kmax < -self.limit {
            panic!("no backward paths at depth limit {}", self.limit);
        }
        lcs.segments
            .extend(self.backward_lcs(self.limit, kmax).segments);
        // The halves may overlap; extract a consistent subset.
        lcs.fix()
    }
}
