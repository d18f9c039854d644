use hickory_proto::rr::{Name, Record};
use std::collections::HashSet;

/// Per-request state of one alias-chain walk.
pub(super) struct ChainState {
    visited: HashSet<Name>,
    pub depth: usize,
    pub current_target: Name,
    pub accumulated: Vec<Record>,
    pub success: bool,
}

impl ChainState {
    pub fn new(first_target: Name) -> Self {
        Self {
            visited: HashSet::new(),
            depth: 0,
            current_target: first_target,
            accumulated: Vec::new(),
            success: true,
        }
    }

    pub fn depth_exhausted(&self, max_depth: usize) -> bool {
        max_depth > 0 && self.depth >= max_depth
    }

    pub fn is_visited(&self, name: &Name) -> bool {
        self.visited.contains(&visit_key(name))
    }

    /// Marks the current target as followed and moves on to `next`.
    pub fn advance(&mut self, next: Name) {
        let followed = std::mem::replace(&mut self.current_target, next);
        self.visited.insert(visit_key(&followed));
        self.depth += 1;
    }

    pub fn fail(&mut self) {
        self.success = false;
    }

    pub fn should_commit(&self) -> bool {
        self.success && !self.accumulated.is_empty()
    }
}

fn visit_key(name: &Name) -> Name {
    let mut key = name.to_lowercase();
    key.set_fqdn(true);
    key
}
