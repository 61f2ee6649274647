//! Node storage for the B&B driver: an arena of [`super::node::BBNode`]s plus
//! the two priority queues `select` needs (`dapcstp`'s `PQmax`/`PQmin`).
//!
//! `dapcstp` holds nodes by pointer in intrusive queues and erases them by
//! stored heap position on `select()`. Rust's `BinaryHeap` has no erase
//! primitive, so this keeps a `generation` counter per arena slot instead:
//! every `enqueue` bumps it and stamps the new heap entries with it; a pop
//! whose stamped generation no longer matches the slot (or whose slot is no
//! longer marked `in_queue`) is stale and is discarded instead of returned.
//! `open_count` is tracked independently of heap occupancy so `PQmin.size()`
//! checks don't need to drain stale entries first.

use super::node::BBNode;
use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    key: f64,
    /// Tie-break: the insertion order. Larger wins ties in a max-heap,
    /// giving LIFO behavior among equal-`depth` nodes for DFS selection,
    /// per the DFS-tiebreak decision recorded in DESIGN.md.
    seq: u64,
    node: usize,
    generation: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.partial_cmp(&other.key).unwrap_or(Ordering::Equal).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Which heap `select()` pops from. The min-heap (keyed by `lb`) is always
/// maintained so `bestlb` is O(1); the max-heap only exists for
/// worst-bound/DFS selection (mirrors `dapcstp`'s `add()`, which only
/// populates `PQmax` for `nodeselect` 0/1).
pub(super) struct NodeStore {
    arena: Vec<Option<BBNode>>,
    max_heap: BinaryHeap<QueueEntry>,
    min_heap: BinaryHeap<Reverse<QueueEntry>>,
    use_max_heap: bool,
    next_seq: u64,
    open_count: usize,
}

impl NodeStore {
    pub fn new(use_max_heap: bool) -> Self {
        NodeStore {
            arena: Vec::new(),
            max_heap: BinaryHeap::new(),
            min_heap: BinaryHeap::new(),
            use_max_heap,
            next_seq: 0,
            open_count: 0,
        }
    }

    /// Inserts a freshly built node, not yet enqueued. Returns its id.
    pub fn insert(&mut self, node: BBNode) -> usize {
        let id = self.arena.len();
        self.arena.push(Some(node));
        id
    }

    pub fn get(&self, id: usize) -> &BBNode {
        self.arena[id].as_ref().expect("node id valid while owned")
    }

    /// Removes a node from the arena for in-place mutation, leaving the slot
    /// permanently empty: every taken node either becomes a leaf/infeasible
    /// dead end or is consumed by `branch` into fresh nodes inserted under
    /// new ids, so the vacated slot is never reused.
    pub fn take(&mut self, id: usize) -> BBNode {
        self.arena[id].take().expect("node id valid while owned")
    }

    /// Pushes `id` onto the selection heap (keyed by `key_max`) and the
    /// always-present min-heap (keyed by `key_min`), bumping its generation
    /// so any stale entries already in the heaps are superseded.
    pub fn enqueue(&mut self, id: usize, key_max: f64, key_min: f64) {
        let generation = {
            let node = self.arena[id].as_mut().expect("node id valid while owned");
            node.generation += 1;
            node.in_queue = true;
            node.generation
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.use_max_heap {
            self.max_heap.push(QueueEntry { key: key_max, seq, node: id, generation });
        }
        self.min_heap.push(Reverse(QueueEntry { key: key_min, seq, node: id, generation }));
        self.open_count += 1;
    }

    fn is_current(&self, id: usize, generation: u64) -> bool {
        matches!(&self.arena[id], Some(n) if n.in_queue && n.generation == generation)
    }

    /// Pops the next node per the configured selection policy, discarding
    /// stale heap entries along the way. The node remains in the arena
    /// (accessible via `take`/`get`) but is marked no longer in-queue.
    pub fn select(&mut self) -> Option<usize> {
        let id = if self.use_max_heap {
            loop {
                let top = self.max_heap.pop()?;
                if self.is_current(top.node, top.generation) {
                    break top.node;
                }
            }
        } else {
            loop {
                let Reverse(top) = self.min_heap.pop()?;
                if self.is_current(top.node, top.generation) {
                    break top.node;
                }
            }
        };
        self.arena[id].as_mut().unwrap().in_queue = false;
        self.open_count -= 1;
        Some(id)
    }

    /// The best (smallest) `lb` among currently open nodes, in O(amortized
    /// 1): `dapcstp`'s `PQmin.top().first`.
    pub fn peek_min_lb(&mut self) -> Option<f64> {
        loop {
            let Reverse(top) = *self.min_heap.peek()?;
            if self.is_current(top.node, top.generation) {
                return Some(top.key);
            }
            self.min_heap.pop();
        }
    }

    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Drains every open node (`dapcstp`'s `freeOpenNodes`): used on
    /// resource-limit shutdown and at the end of a solve.
    pub fn free_open_nodes(&mut self) {
        for slot in self.arena.iter_mut() {
            *slot = None;
        }
        self.max_heap.clear();
        self.min_heap.clear();
        self.open_count = 0;
    }
}
