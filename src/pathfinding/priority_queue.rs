/// Binary min-heap over `(item, priority)` pairs.
///
/// There is no decrease-key: to improve an entry, push it again with the lower
/// priority and have the consumer discard the stale copy when it is popped.
#[derive(Debug, Clone)]
pub struct MinHeap<T, P> {
    entries: Vec<HeapEntry<T, P>>,
}

#[derive(Debug, Clone)]
struct HeapEntry<T, P> {
    item: T,
    priority: P,
}

impl<T, P: PartialOrd + Copy> MinHeap<T, P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T, priority: P) {
        self.entries.push(HeapEntry { item, priority });
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the entry with the smallest priority
    pub fn pop(&mut self) -> Option<(T, P)> {
        if self.entries.is_empty() {
            return None;
        }

        let root = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((root.item, root.priority))
    }

    pub fn peek_priority(&self) -> Option<P> {
        self.entries.first().map(|entry| entry.priority)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !(self.entries[index].priority < self.entries[parent].priority) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.entries[left].priority < self.entries[smallest].priority {
                smallest = left;
            }
            if right < len && self.entries[right].priority < self.entries[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T, P: PartialOrd + Copy> Default for MinHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
