//! Bulk allocation pool for pooled node storage.
//!
//! A [`BulkPool<T>`] hands out uninitialized blocks sized for one `T`. Blocks
//! come from batches that double in size up to [`MAX_BATCH`] blocks, and a
//! released block goes back on the free list instead of to the allocator.
//! A pool can also adopt a retired allocation, such as the slot array a table
//! leaves behind when it grows, and carve blocks out of it. Batches and
//! adopted regions are only returned to the allocator when the pool is
//! dropped.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

/// Number of blocks in the first batch.
pub const MIN_BATCH: usize = 4;

/// Largest number of blocks requested in a single batch.
pub const MAX_BATCH: usize = 16384;

/// A free-list allocator for blocks holding a single `T`.
///
/// The pool never reads or drops the values stored in its blocks. Whoever
/// allocates a block is responsible for initializing it, and for dropping or
/// moving the value out before handing the block back.
pub struct BulkPool<T> {
    free: Vec<NonNull<T>>,
    batches: Vec<NonNull<[MaybeUninit<T>]>>,
    adopted: Vec<(NonNull<u8>, Layout)>,
    adopted_blocks: usize,
    next_batch: usize,
}

impl<T> Default for BulkPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for BulkPool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BulkPool")
            .field("batches", &self.batches.len())
            .field("adopted", &self.adopted.len())
            .field("allocated", &self.allocated())
            .field("available", &self.available())
            .field("next_batch", &self.next_batch)
            .finish()
    }
}

impl<T> BulkPool<T> {
    /// Creates an empty pool. No memory is requested until the first
    /// allocation.
    pub const fn new() -> Self {
        Self {
            free: Vec::new(),
            batches: Vec::new(),
            adopted: Vec::new(),
            adopted_blocks: 0,
            next_batch: MIN_BATCH,
        }
    }

    /// Returns an uninitialized block.
    #[inline]
    pub fn allocate(&mut self) -> NonNull<T> {
        match self.free.pop() {
            Some(block) => block,
            None => self.allocate_batch(),
        }
    }

    #[cold]
    #[inline(never)]
    fn allocate_batch(&mut self) -> NonNull<T> {
        let count = self.next_batch;
        let batch = Box::<[T]>::new_uninit_slice(count);
        // SAFETY: `Box::into_raw` never returns null.
        let batch = unsafe { NonNull::new_unchecked(Box::into_raw(batch)) };
        self.batches.push(batch);
        self.next_batch = (count * 2).min(MAX_BATCH);

        let base: NonNull<T> = batch.cast();
        self.free.reserve(count - 1);
        for i in (1..count).rev() {
            // SAFETY: `i < count`, so the offset stays inside the batch.
            self.free.push(unsafe { base.add(i) });
        }

        base
    }

    /// Returns a block to the free list.
    ///
    /// # Safety
    ///
    /// `block` must have been returned by [`allocate`](Self::allocate) on
    /// this pool, must not already be on the free list, and must no longer
    /// hold a live value.
    #[inline]
    pub unsafe fn deallocate(&mut self, block: NonNull<T>) {
        self.free.push(block);
    }

    /// Takes ownership of a retired allocation and puts every aligned
    /// `T`-sized block that fits in it on the free list.
    ///
    /// Returns `false`, leaving ownership with the caller, when not even one
    /// block fits or `T` is zero-sized.
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by the global allocator with `layout`,
    /// must not be used by the caller again if this returns `true`, and must
    /// hold no live values.
    pub unsafe fn adopt(&mut self, ptr: NonNull<u8>, layout: Layout) -> bool {
        let size = core::mem::size_of::<T>();
        if size == 0 {
            return false;
        }

        let offset = ptr.as_ptr().align_offset(core::mem::align_of::<T>());
        let count = layout.size().saturating_sub(offset) / size;
        if offset == usize::MAX || count == 0 {
            return false;
        }

        // SAFETY: `offset + count * size <= layout.size()`, so every block is
        // inside the region and aligned for `T`.
        let base: NonNull<T> = unsafe { ptr.add(offset).cast() };
        self.free.reserve(count);
        for i in (0..count).rev() {
            // SAFETY: `i < count`.
            self.free.push(unsafe { base.add(i) });
        }
        self.adopted.push((ptr, layout));
        self.adopted_blocks += count;
        true
    }

    /// Total number of blocks owned by the pool, live or free.
    pub fn allocated(&self) -> usize {
        self.batches.iter().map(|batch| batch.len()).sum::<usize>() + self.adopted_blocks
    }

    /// Number of blocks on the free list.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

impl<T> Drop for BulkPool<T> {
    fn drop(&mut self) {
        for batch in self.batches.drain(..) {
            // SAFETY: Each batch came from `Box::into_raw` in `allocate_batch`
            // and is released exactly once here. `MaybeUninit` does not drop
            // its contents.
            unsafe { drop(Box::from_raw(batch.as_ptr())) };
        }
        for (ptr, layout) in self.adopted.drain(..) {
            // SAFETY: `adopt` took ownership of a region allocated with
            // `layout`.
            unsafe { alloc::alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}
