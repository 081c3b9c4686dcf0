use std::hash::Hash;
use std::marker::PhantomData;

/// Generational id for a pooled resource of kind `T`.
///
/// Handles are plain data: copying one never duplicates the resource, and a
/// handle that outlives its slot fails the generation check in [`Pool`]
/// instead of aliasing whatever reused the slot.
#[derive(Debug)]
pub struct Handle<T> {
    pub slot: u16,
    pub generation: u16,
    phantom: PhantomData<T>,
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self {
            slot: Default::default(),
            generation: Default::default(),
            phantom: Default::default(),
        }
    }
}

/// Fixed-capacity slot pool with generation tracking.
///
/// Slots are recycled through a free list; releasing a slot bumps its
/// generation so previously issued handles go stale rather than observe the
/// next occupant. `insert` returns `None` once the pool is exhausted.
pub struct Pool<T> {
    items: Vec<Option<T>>,
    empty: Vec<usize>,
    generation: Vec<u16>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        const INITIAL_SIZE: usize = 1024;
        Self::new(INITIAL_SIZE)
    }
}

impl<T> Pool<T> {
    /// Largest usable capacity: slot indices are 16-bit, so any further
    /// slots could never be handed out without aliasing an earlier handle.
    pub const MAX_CAPACITY: usize = u16::MAX as usize + 1;

    /// Create a pool with up to `capacity` slots, capped at
    /// [`Pool::MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(Self::MAX_CAPACITY);
        let mut p = Pool {
            items: Vec::with_capacity(capacity),
            empty: (0..capacity).rev().collect(),
            generation: vec![0; capacity],
        };

        p.items.resize_with(capacity, || None);
        p
    }

    pub fn insert(&mut self, item: T) -> Option<Handle<T>> {
        let empty_slot = self.empty.pop()?;

        self.items[empty_slot] = Some(item);

        Some(Handle {
            slot: empty_slot as u16,
            generation: self.generation[empty_slot],
            phantom: PhantomData,
        })
    }

    /// Remove the item behind `handle`, freeing its slot.
    ///
    /// Returns `None` when the handle is stale or the slot is already empty,
    /// so release paths can run twice without faulting.
    ///
    /// A slot whose generation counter reaches `u16::MAX` is retired rather
    /// than recycled: a stale handle retained across 65,535 reuse cycles
    /// must never match a later occupant.
    pub fn take(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = handle.slot as usize;
        if slot >= self.items.len() || self.generation[slot] != handle.generation {
            return None;
        }

        let item = self.items[slot].take()?;
        if self.generation[slot] == u16::MAX {
            return Some(item);
        }
        self.generation[slot] += 1;
        self.empty.push(slot);
        Some(item)
    }

    pub fn get_ref(&self, handle: Handle<T>) -> Option<&T> {
        let slot = handle.slot as usize;
        if slot >= self.items.len() || self.generation[slot] != handle.generation {
            return None;
        }
        self.items[slot].as_ref()
    }

    pub fn get_mut_ref(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = handle.slot as usize;
        if slot >= self.items.len() || self.generation[slot] != handle.generation {
            return None;
        }
        self.items[slot].as_mut()
    }

    pub fn is_full(&self) -> bool {
        self.empty.is_empty()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.items.len() - self.empty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut pool = Pool::new(4);
        let a = pool.insert("a").unwrap();
        let b = pool.insert("b").unwrap();

        assert_eq!(pool.get_ref(a), Some(&"a"));
        assert_eq!(pool.get_ref(b), Some(&"b"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_take_makes_handle_stale() {
        let mut pool = Pool::new(4);
        let handle = pool.insert(7u32).unwrap();

        assert_eq!(pool.take(handle), Some(7));
        assert_eq!(pool.take(handle), None);
        assert_eq!(pool.get_ref(handle), None);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        let mut pool = Pool::new(1);
        let first = pool.insert(1u32).unwrap();
        pool.take(first).unwrap();

        let second = pool.insert(2u32).unwrap();
        assert_eq!(first.slot, second.slot);
        assert_ne!(first.generation, second.generation);
        assert_eq!(pool.get_ref(first), None);
        assert_eq!(pool.get_ref(second), Some(&2));
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let mut pool = Pool::new(2);
        assert!(pool.insert(()).is_some());
        assert!(pool.insert(()).is_some());
        assert!(pool.insert(()).is_none());
        assert!(pool.is_full());
    }

    #[test]
    fn test_capacity_is_capped_to_handle_range() {
        let pool: Pool<u8> = Pool::new(Pool::<u8>::MAX_CAPACITY + 4);
        assert_eq!(pool.capacity(), Pool::<u8>::MAX_CAPACITY);
    }

    #[test]
    fn test_full_pool_hands_out_distinct_handles() {
        let mut pool = Pool::new(Pool::<u32>::MAX_CAPACITY + 1);
        let mut handles = Vec::with_capacity(pool.capacity());
        while let Some(handle) = pool.insert(0u32) {
            handles.push(handle);
        }

        assert_eq!(handles.len(), Pool::<u32>::MAX_CAPACITY);
        assert_ne!(handles[0], handles[handles.len() - 1]);
        let mut slots: Vec<u16> = handles.iter().map(|h| h.slot).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), handles.len());
    }

    #[test]
    fn test_slot_retires_at_generation_limit() {
        let mut pool = Pool::new(1);
        let first = pool.insert(0u8).unwrap();
        assert_eq!(pool.take(first), Some(0));

        for _ in 1..=u16::MAX {
            let handle = pool.insert(0u8).unwrap();
            assert_eq!(pool.take(handle), Some(0));
        }

        // Generation space exhausted: the slot never re-enters the free
        // list, and the oldest stale handle still resolves to nothing.
        assert!(pool.insert(0u8).is_none());
        assert_eq!(pool.get_ref(first), None);
        assert_eq!(pool.take(first), None);
    }

    #[test]
    fn test_default_handle_is_stale_on_empty_pool() {
        let pool: Pool<u32> = Pool::new(8);
        assert_eq!(pool.get_ref(Handle::default()), None);
    }
}
