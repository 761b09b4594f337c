//! # Node Pool
//!
//! Paged bump-pointer allocator for fixed-size records that are freed all at once.

/// Number of records per page.
pub const PAGE_SIZE: usize = 1024;

/// A paged bump-pointer pool.
///
/// Records are handed out in allocation order from 1024-slot pages. There is
/// no per-record free: [`NodePool::clear`] resets the bump pointer and keeps
/// every page for the next round of allocations.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by a single scene graph.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: NodePool<u32> = NodePool::new();
///
/// // Allocate - O(1), a new page only every 1024 records
/// let handle = pool.allocate(7);
/// assert_eq!(pool.get(handle), Some(&7));
///
/// // Reset - O(1), pages are retained
/// pool.clear();
/// assert!(pool.get(handle).is_none());
/// ```
pub struct NodePool<T> {
    /// Retained pages, each exactly `PAGE_SIZE` long.
    pages: Vec<Box<[T]>>,
    /// Bump pointer: number of live records.
    len: usize,
}

/// Handle to a record in a [`NodePool`].
///
/// Valid until the next [`NodePool::clear`] of the pool that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle(u32);

impl PoolHandle {
    /// Creates a handle from a raw slot index.
    #[inline]
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl<T: Default> NodePool<T> {
    /// Creates an empty pool. No page is allocated until the first record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pages: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of records allocated since the last clear.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been allocated since the last clear.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of retained pages.
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns the number of records the retained pages can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pages.len() * PAGE_SIZE
    }

    /// Stores `value` in the next free slot.
    ///
    /// This is an **O(1)** operation. A new page is allocated only when the
    /// retained pages are exhausted.
    ///
    /// # Panics
    ///
    /// Panics if the pool would exceed `u32::MAX` records. Out-of-memory while
    /// growing aborts the process.
    pub fn allocate(&mut self, value: T) -> PoolHandle {
        let index = self.len;
        assert!(index < u32::MAX as usize, "NodePool exhausted the u32 handle space");

        if index == self.capacity() {
            let page: Box<[T]> = (0..PAGE_SIZE).map(|_| T::default()).collect();
            self.pages.push(page);
        }

        self.pages[index / PAGE_SIZE][index % PAGE_SIZE] = value;
        self.len += 1;

        PoolHandle(index as u32)
    }

    /// Gets a reference to an allocated record.
    ///
    /// Returns `None` for handles that were not issued since the last clear.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        let index = handle.0 as usize;
        if index >= self.len {
            return None;
        }
        Some(&self.pages[index / PAGE_SIZE][index % PAGE_SIZE])
    }

    /// Gets a mutable reference to an allocated record.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let index = handle.0 as usize;
        if index >= self.len {
            return None;
        }
        Some(&mut self.pages[index / PAGE_SIZE][index % PAGE_SIZE])
    }

    /// Resets the bump pointer, invalidating every handle.
    ///
    /// This is a **zero-heap-allocation** operation - pages are retained.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Iterates over allocated records in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .take(self.len)
            .enumerate()
            .map(|(index, value)| (PoolHandle(index as u32), value))
    }
}

impl<T: Default> Default for NodePool<T> {
    fn default() -> Self {
        Self::new()
    }
}
