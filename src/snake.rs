use crate::pos::Pos;
use std::collections::VecDeque;

/// Body cells, head first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Pos>,
}

impl Snake {
    pub fn new(head: Pos) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Self { body }
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Pos>) -> Self {
        Self { body: cells.into_iter().collect() }
    }

    pub fn head(&self) -> Option<Pos> {
        self.body.front().copied()
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.body.iter().any(|&s| s == p)
    }

    /// Push a new head; the tail stays when `grow` is set.
    pub fn advance(&mut self, new_head: Pos, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    pub fn reset(&mut self, head: Pos) {
        self.body.clear();
        self.body.push_back(head);
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.body.iter().copied()
    }
}
