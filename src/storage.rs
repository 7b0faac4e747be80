//! Element storage strategies.
//!
//! A table never touches its elements directly. It asks a [`Storage`]
//! strategy to turn an element into the node kept in a slot, to borrow the
//! element back out of a node, and to destroy a node. Nodes are moved between
//! slots with plain bitwise copies, so probing, displacement and rebuilding
//! are the same for every strategy.
//!
//! - [`Inline`] keeps the element in the slot array. Lookups touch a single
//!   cache line and no per-element allocation happens, but displacing an
//!   element copies all of it.
//! - [`Pooled`] keeps the element in a block from the table's [`BulkPool`]
//!   and stores a pointer in the slot. Displacement copies one pointer and
//!   references to elements survive a rebuild, at the cost of one
//!   indirection per access.

use core::alloc::Layout;
use core::mem::needs_drop;
use core::mem::size_of;
use core::ptr::NonNull;

use crate::pool::BulkPool;

mod sealed {
    pub trait Sealed {}
}

/// How a table stores its elements.
///
/// This trait is sealed; [`Inline`] and [`Pooled`] are the only strategies.
pub trait Storage<T>: sealed::Sealed {
    /// The value kept in a slot.
    type Node;

    /// Per-table state shared by all nodes.
    type Pool: Default;

    /// Whether clearing a table has to visit every node.
    const VISIT_ON_CLEAR: bool;

    /// Turns an element into a node.
    fn construct(pool: &mut Self::Pool, value: T) -> Self::Node;

    /// Destroys a node, recycling its resources and returning the element.
    fn destroy(pool: &mut Self::Pool, node: Self::Node) -> T;

    /// Drops the element held by a node. Resources shared through the pool
    /// are left for the pool to release.
    fn drop_node(node: Self::Node);

    /// Borrows the element held by a node.
    fn get(node: &Self::Node) -> &T;

    /// Mutably borrows the element held by a node.
    fn get_mut(node: &mut Self::Node) -> &mut T;

    /// Blocks owned by the pool and blocks free for reuse, in that order.
    fn pool_blocks(_pool: &Self::Pool) -> (usize, usize) {
        (0, 0)
    }

    /// Offers a retired slot array to the pool. Returns `true` if the pool
    /// took ownership of it.
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by the global allocator with `layout`
    /// and must hold no live nodes.
    unsafe fn adopt(_pool: &mut Self::Pool, _ptr: NonNull<u8>, _layout: Layout) -> bool {
        false
    }
}

/// Stores elements directly in the slot array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inline;

impl sealed::Sealed for Inline {}

impl<T> Storage<T> for Inline {
    type Node = T;
    type Pool = ();

    const VISIT_ON_CLEAR: bool = needs_drop::<T>();

    #[inline(always)]
    fn construct(_pool: &mut (), value: T) -> T {
        value
    }

    #[inline(always)]
    fn destroy(_pool: &mut (), node: T) -> T {
        node
    }

    #[inline(always)]
    fn drop_node(node: T) {
        drop(node);
    }

    #[inline(always)]
    fn get(node: &T) -> &T {
        node
    }

    #[inline(always)]
    fn get_mut(node: &mut T) -> &mut T {
        node
    }
}

/// Stores elements in blocks from a per-table [`BulkPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pooled;

impl sealed::Sealed for Pooled {}

/// An owning pointer to an element in a [`BulkPool`] block.
///
/// Only [`Pooled`] can create one, so a `NodePtr` always points at a live
/// element.
pub struct NodePtr<T> {
    ptr: NonNull<T>,
}

impl<T> Storage<T> for Pooled {
    type Node = NodePtr<T>;
    type Pool = BulkPool<T>;

    const VISIT_ON_CLEAR: bool = true;

    #[inline]
    fn construct(pool: &mut BulkPool<T>, value: T) -> NodePtr<T> {
        let ptr = pool.allocate();
        // SAFETY: `allocate` returns an unused block sized and aligned for `T`.
        unsafe { ptr.write(value) };
        NodePtr { ptr }
    }

    #[inline]
    fn destroy(pool: &mut BulkPool<T>, node: NodePtr<T>) -> T {
        // SAFETY: The block holds a live value that is moved out before the
        // block goes back on the free list.
        unsafe {
            let value = node.ptr.read();
            pool.deallocate(node.ptr);
            value
        }
    }

    #[inline]
    fn drop_node(node: NodePtr<T>) {
        if needs_drop::<T>() {
            // SAFETY: The block holds a live value and the node is consumed.
            unsafe { node.ptr.drop_in_place() };
        }
    }

    #[inline(always)]
    fn get(node: &NodePtr<T>) -> &T {
        // SAFETY: A `NodePtr` always points at a live value.
        unsafe { node.ptr.as_ref() }
    }

    #[inline(always)]
    fn get_mut(node: &mut NodePtr<T>) -> &mut T {
        // SAFETY: A `NodePtr` always points at a live value, and the node is
        // its only owner.
        unsafe { node.ptr.as_mut() }
    }

    fn pool_blocks(pool: &BulkPool<T>) -> (usize, usize) {
        (pool.allocated(), pool.available())
    }

    unsafe fn adopt(pool: &mut BulkPool<T>, ptr: NonNull<u8>, layout: Layout) -> bool {
        // SAFETY: Forwarded from the caller.
        unsafe { pool.adopt(ptr, layout) }
    }
}

/// Whether [`Inline`] storage is the better fit for `T`.
///
/// Small elements are cheap to displace, so they live in the slot array.
/// Elements larger than three machine words are better kept behind a
/// [`Pooled`] pointer.
///
/// # Examples
///
/// ```rust
/// # use robin_hood_map::storage::prefers_inline;
/// assert!(prefers_inline::<(u64, u64)>());
/// assert!(!prefers_inline::<(u64, [u8; 256])>());
/// ```
pub const fn prefers_inline<T>() -> bool {
    size_of::<T>() <= 3 * size_of::<usize>()
}
