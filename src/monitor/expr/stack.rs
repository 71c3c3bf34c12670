use smallvec::SmallVec;

/// Depth limit hit while pushing onto a [`BoundedStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOverflow {
    pub limit: usize,
}

/// Growable stack with an explicit depth limit. Shallow expressions stay on
/// the inline buffer.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    items: SmallVec<[T; 16]>,
    limit: usize,
}

impl<T> BoundedStack<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            items: SmallVec::new(),
            limit,
        }
    }

    pub fn push(&mut self, item: T) -> Result<(), StackOverflow> {
        if self.items.len() >= self.limit {
            return Err(StackOverflow { limit: self.limit });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Entries from bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
