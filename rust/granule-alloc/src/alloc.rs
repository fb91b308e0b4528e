//! `Allocator`: the capability through which all memory in the toolkit is
//! obtained and returned.
//!
//! The toolkit never calls a global allocation function on its own; every
//! byte flows through an `Allocator` passed in by the host, which makes it
//! possible to substitute arena, pool, page or tracking allocators without
//! touching the buffer and string layers.

use crate::raw::RawMemory;

/// Abstraction of a memory allocator.
///
/// An allocator hands out and takes back [`RawMemory`] blocks measured in
/// elements of a fixed byte size. Blocks move between the allocator and its
/// callers by value: [`RawMemory`] is not `Clone`, so a freed block cannot be
/// freed again through safe code.
///
/// # Safety
///
/// Implementors must guarantee, for every block they produce:
///
/// - `allocate(count, element_size)` returns a block whose capacity is at
///   least `count` and whose contents are zero-filled up to the *actual*
///   capacity.
/// - The data pointer is non-null whenever `count > 0 && element_size > 0`.
///   For degenerate requests (`count == 0` or `element_size == 0`) the block
///   may carry a null pointer and may report its capacity with a sentinel
///   value rather than backing it with a real allocation.
/// - `reallocate` preserves the element size of the block, preserves prior
///   content up to `min(old_capacity, new_capacity)` elements, and
///   zero-fills any newly exposed region. The block may move.
/// - Out-of-memory is handled inside the implementation (typically by
///   terminating via [`std::alloc::handle_alloc_error`]); it is never
///   surfaced to the caller as a null pointer or a short block.
///
/// These guarantees are load-bearing: [`RawMemory::resize`] asserts them
/// after every allocator call, and the typed views over [`RawMemory`] rely
/// on the zero-fill guarantee for soundness.
pub unsafe trait Allocator {
    /// Allocates a zero-filled block for `count` elements of `element_size`
    /// bytes each. Both arguments can be zero.
    ///
    /// The returned capacity is larger than or equal to `count`; not exact.
    /// The result must eventually be handed back to [`free`](Self::free) (or
    /// recycled through [`reallocate`](Self::reallocate)) exactly once.
    fn allocate(&self, count: usize, element_size: usize) -> RawMemory;

    /// Resizes `mem` to hold at least `new_count` elements, preserving
    /// content up to `min(old_capacity, new_count)` and zero-filling any
    /// newly exposed region. The block may move.
    ///
    /// # Safety
    ///
    /// `mem` must have been produced by this same allocator's
    /// [`allocate`](Self::allocate) or [`reallocate`](Self::reallocate).
    unsafe fn reallocate(&self, mem: RawMemory, new_count: usize) -> RawMemory;

    /// Deallocates a block.
    ///
    /// # Safety
    ///
    /// `mem` must have been produced by this same allocator's
    /// [`allocate`](Self::allocate) or [`reallocate`](Self::reallocate).
    unsafe fn free(&self, mem: RawMemory);
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, count: usize, element_size: usize) -> RawMemory {
        (**self).allocate(count, element_size)
    }

    unsafe fn reallocate(&self, mem: RawMemory, new_count: usize) -> RawMemory {
        unsafe { (**self).reallocate(mem, new_count) }
    }

    unsafe fn free(&self, mem: RawMemory) {
        unsafe { (**self).free(mem) }
    }
}
