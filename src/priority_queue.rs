use core::cmp::Ordering;
use core::fmt;

/// A binary-heap priority queue ordered by a user-supplied comparator.
///
/// The element that compares as the *smallest* is popped first,
/// so passing `f64::total_cmp` on a key gives a min-queue.
///
/// Unlike [`std::collections::BinaryHeap`], the element type does not
/// need to implement [`Ord`], which is handy for floating-point keys.
///
/// # Example
/// ```
/// use hill_formation::PriorityQueue;
///
/// let mut queue = PriorityQueue::new(|a: &f64, b: &f64| a.total_cmp(b));
/// queue.push(3.0);
/// queue.push(1.0);
/// queue.push(2.0);
///
/// assert_eq!(queue.pop(), Some(1.0));
/// assert_eq!(queue.pop(), Some(2.0));
/// assert_eq!(queue.pop(), Some(3.0));
/// assert_eq!(queue.pop(), None);
/// ```
#[derive(Clone)]
pub struct PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    heap: Vec<T>,
    compare: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty queue using `compare` to order elements.
    pub fn new(compare: F) -> Self {
        Self {
            heap: Vec::new(),
            compare,
        }
    }

    /// Creates an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, compare: F) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// The number of queued elements.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Gets the element that would be popped next, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Adds an element to the queue.
    ///
    /// # Performance
    /// O(log n) comparisons.
    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the smallest element.
    ///
    /// # Performance
    /// O(log n) comparisons.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let item = self.heap.pop();

        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        item
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.compare)(&self.heap[index], &self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();

        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && (self.compare)(&self.heap[left], &self.heap[smallest]) == Ordering::Less
            {
                smallest = left;
            }
            if right < len
                && (self.compare)(&self.heap[right], &self.heap[smallest]) == Ordering::Less
            {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.heap.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("heap", &self.heap)
            .finish_non_exhaustive()
    }
}
