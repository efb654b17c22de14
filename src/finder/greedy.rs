// Greedy operation finder.
//
// For every head position:
//   1. List candidate offsets: distances 1..=10 first, then the positions
//      the prefix index returns for the 4 bytes at the head.
//   2. Scan the list from the back, keeping a candidate whenever its match
//      length is >= the best so far.  Short distances are scanned last, so
//      they win ties against indexed candidates.
//   3. Emit the match, or a literal when nothing reaches 2 bytes.

use std::fmt;

use log::{debug, trace};

use super::{FindError, OpFinder};
use crate::dict::{DictView, Dictionary};
use crate::hash::config::{PREFIX_LEN, SHORT_DISTANCES};
use crate::ops::{MAX_MATCH_LEN, Match, Operation};

/// Greedy finder: best single operation per position, no look-ahead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Greedy;

impl fmt::Display for Greedy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("greedy finder")
    }
}

/// Candidate offsets for the head of `view`, highest priority first.
///
/// `prefix` holds the bytes at the head (up to 4).  With fewer than 4
/// bytes the prefix index is not consulted.
pub fn potential_offsets<D: Dictionary + ?Sized>(
    dict: &D,
    view: &DictView,
    prefix: &[u8],
) -> Vec<u64> {
    let start = view.window_start();
    let mut offs = Vec::with_capacity(32);
    for distance in 1..=SHORT_DISTANCES {
        if let Some(off) = view.head.checked_sub(distance)
            && start <= off
        {
            offs.push(off);
        }
    }
    if prefix.len() == PREFIX_LEN {
        dict.candidate_offsets(view, prefix, &mut offs);
    }
    offs
}

/// Longest match over `offsets`, scanned from last to first with `>=` so
/// that earlier entries win ties.
///
/// Returns `None` when no candidate covers at least 2 bytes.
pub fn best_match<D: Dictionary + ?Sized>(
    dict: &D,
    view: &DictView,
    offsets: &[u64],
) -> Option<Match> {
    let mut best: Option<u64> = None;
    let mut length = 1usize;
    for &off in offsets.iter().rev() {
        if off >= view.head {
            continue;
        }
        let n = dict.equal_run_length(view.head, off, MAX_MATCH_LEN);
        if n >= length {
            best = Some(off);
            length = n;
        }
    }
    let off = best?;
    if length == 1 {
        return None;
    }
    Some(Match {
        distance: view.head - off,
        length,
    })
}

/// Find the single operation at the head of `view`.
pub fn find_op<D: Dictionary + ?Sized>(dict: &D, view: &DictView) -> Result<Operation, FindError> {
    let mut p = [0u8; PREFIX_LEN];
    let n = dict.read_at(&mut p, view.head)?;
    if n == 0 {
        return Err(FindError::EmptyBuffer { pos: view.head });
    }
    let offs = potential_offsets(dict, view, &p[..n]);
    Ok(match best_match(dict, view, &offs) {
        Some(m) => Operation::Match(m),
        None => Operation::literal(p[0]),
    })
}

impl OpFinder for Greedy {
    fn find_ops<D: Dictionary>(&self, dict: &mut D, all: bool) -> Result<Vec<Operation>, FindError> {
        let mut view = dict.view();
        let start = view.head;
        let mut ops = Vec::new();
        while view.head < view.top {
            let op = find_op(&*dict, &view)?;
            trace!("{op} at {}", view.head);
            dict.advance(&mut view, op.length())?;
            ops.push(op);
        }
        if !all && let Some(op) = ops.pop() {
            trace!("withholding provisional {op}");
        }
        debug!(
            "{self}: {} ops from {start}..{} (all={all})",
            ops.len(),
            view.top
        );
        Ok(ops)
    }

    fn name(&self) -> &'static str {
        "greedy finder"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
