//! FIFO queue of node ids awaiting classification.

use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>) {
        self.queue.push_back(id.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push("A");
        frontier.push("B");
        frontier.push("C");
        assert_eq!(frontier.peek(), Some("A"));
        assert_eq!(frontier.pop().as_deref(), Some("A"));
        assert_eq!(frontier.pop().as_deref(), Some("B"));
        frontier.push("D");
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pop().as_deref(), Some("C"));
        assert_eq!(frontier.pop().as_deref(), Some("D"));
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }
}
