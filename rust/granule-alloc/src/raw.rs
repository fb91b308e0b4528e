//! `RawMemory`: an owned, possibly-uninitialized memory block, and the
//! resize/grow engine that every growable structure in the toolkit funnels
//! through.

use crate::alloc::Allocator;

/// Capacity reported for blocks of zero-sized elements.
///
/// A block whose element size is zero never needs a real allocation, so its
/// capacity is pinned to this sentinel and growth on it is a no-op.
pub const MAX_CAPACITY: usize = usize::MAX / 16;

/// Growth multiplier applied by [`RawMemory::grow`].
const GROW_FACTOR: usize = 2;

/// Owned memory block.
///
/// Unlike a slice or vector, the contents carry no initialization guarantee
/// of their own; a block obtained from a conforming [`Allocator`] is
/// zero-filled up to its capacity, and [`RawMemory::resize`] keeps it that
/// way across growth.
///
/// `RawMemory` does not remember which allocator produced it. The owner is
/// responsible for routing [`resize`](Self::resize), [`grow`](Self::grow)
/// and [`release`](Self::release) calls to that same allocator; the `unsafe`
/// contracts on those methods carry this obligation. Blocks transfer by
/// value and the type is not `Clone`, so a released block cannot be released
/// twice through safe code.
#[derive(Debug)]
pub struct RawMemory {
    ptr: *mut u8,
    capacity: usize,
    element_size: usize,
}

impl RawMemory {
    /// Creates an empty block for elements of `element_size` bytes.
    ///
    /// No allocation takes place. For `element_size == 0` the capacity is
    /// the [`MAX_CAPACITY`] sentinel; otherwise it is zero.
    pub fn new(element_size: usize) -> RawMemory {
        if element_size == 0 {
            return RawMemory {
                ptr: std::ptr::null_mut(),
                capacity: MAX_CAPACITY,
                element_size: 0,
            };
        }

        RawMemory {
            ptr: std::ptr::null_mut(),
            capacity: 0,
            element_size,
        }
    }

    /// Assembles a block from its parts. Intended for [`Allocator`]
    /// implementations returning freshly produced memory.
    pub fn from_raw_parts(ptr: *mut u8, capacity: usize, element_size: usize) -> RawMemory {
        RawMemory {
            ptr,
            capacity,
            element_size,
        }
    }

    /// Disassembles the block into `(ptr, capacity, element_size)`,
    /// forgetting it. Intended for [`Allocator`] implementations consuming a
    /// block passed to `reallocate` or `free`.
    pub fn into_raw_parts(self) -> (*mut u8, usize, usize) {
        (self.ptr, self.capacity, self.element_size)
    }

    /// Number of elements currently backing the pointer (or the
    /// [`MAX_CAPACITY`] sentinel for zero-sized elements).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Total backing size in bytes; zero for zero-sized elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity * element_size` overflows `usize`.
    pub fn byte_capacity(&self) -> usize {
        if self.element_size == 0 {
            return 0;
        }
        self.capacity
            .checked_mul(self.element_size)
            .expect("byte capacity overflow")
    }

    /// Returns `true` if the block currently holds a real allocation.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        !self.ptr.is_null()
    }

    /// Raw pointer to the first byte. Null when nothing is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// Mutable raw pointer to the first byte. Null when nothing is
    /// allocated.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr
    }

    /// Views the whole block as a slice of `T`.
    ///
    /// Returns an empty slice when nothing is allocated. Sound for blocks
    /// produced by a conforming [`Allocator`], which zero-fills up to the
    /// actual capacity.
    ///
    /// # Panics
    ///
    /// Panics if `size_of::<T>()` differs from the block's element size.
    pub fn typed_slice<T: bytemuck::AnyBitPattern>(&self) -> &[T] {
        assert_eq!(
            size_of::<T>(),
            self.element_size,
            "element size mismatch in typed view"
        );
        if self.ptr.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.ptr as *const T, self.capacity) }
    }

    /// Views the whole block as a mutable slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if `size_of::<T>()` differs from the block's element size.
    pub fn typed_slice_mut<T: bytemuck::AnyBitPattern + bytemuck::NoUninit>(
        &mut self,
    ) -> &mut [T] {
        assert_eq!(
            size_of::<T>(),
            self.element_size,
            "element size mismatch in typed view"
        );
        if self.ptr.is_null() {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.ptr as *mut T, self.capacity) }
    }

    /// Resizes the block to exactly accommodate `new_capacity` elements.
    ///
    /// If the capacity is the same, does nothing. Shrinks if smaller,
    /// extends if larger, frees if zero. While the memory may move, contents
    /// are preserved up to `min(old, new)` and the extended part is
    /// zero-filled. The resulting capacity is guaranteed to be larger than
    /// or equal to `new_capacity`; not exact.
    ///
    /// # Panics
    ///
    /// Panics if the allocator violates its contract: insufficient returned
    /// capacity, a null data pointer for a nonzero element size, or a
    /// changed element size. Such a violation means the allocator
    /// implementation is broken and is not recoverable.
    ///
    /// # Safety
    ///
    /// `alloc` must be the allocator that produced the block's current
    /// allocation (vacuously satisfied while nothing is allocated).
    pub unsafe fn resize<A: Allocator + ?Sized>(&mut self, new_capacity: usize, alloc: &A) {
        let old_capacity = self.capacity;
        let element_size = self.element_size;

        if old_capacity == new_capacity {
            return;
        }

        if new_capacity == 0 {
            if element_size != 0 {
                let mem = std::mem::replace(self, RawMemory::new(element_size));
                unsafe { alloc.free(mem) };
            } else {
                *self = RawMemory::new(element_size);
            }
            return;
        }

        if old_capacity == 0 {
            *self = alloc.allocate(new_capacity, element_size);
        } else {
            let mem = std::mem::replace(self, RawMemory::new(element_size));
            *self = unsafe { alloc.reallocate(mem, new_capacity) };
        }

        assert!(
            self.capacity >= new_capacity,
            "allocator returned insufficient capacity: {} < {}",
            self.capacity,
            new_capacity
        );
        assert_eq!(
            self.element_size, element_size,
            "allocator changed the element size of the block"
        );

        if element_size != 0 {
            assert!(
                !self.ptr.is_null(),
                "allocator returned a null data pointer"
            );

            // Clear the newly exposed part, up to the actual capacity.
            if self.capacity > old_capacity {
                let offset = old_capacity
                    .checked_mul(element_size)
                    .expect("byte offset overflow");
                let bytes = (self.capacity - old_capacity)
                    .checked_mul(element_size)
                    .expect("byte length overflow");
                unsafe { self.ptr.add(offset).write_bytes(0, bytes) };
            }
        }
    }

    /// Grows the block, at least exponentially, so that it can hold
    /// `min_capacity` elements.
    ///
    /// Does nothing if the capacity is already sufficient or the element
    /// size is zero. Otherwise the target is the larger of `min_capacity`
    /// and double the current capacity, and the call delegates to
    /// [`resize`](Self::resize). This is the sole amortized-growth policy in
    /// the toolkit; a sequence of n single-element extensions triggers
    /// O(log n) allocator calls.
    ///
    /// # Panics
    ///
    /// Panics if doubling the capacity overflows `usize`, or on any
    /// allocator contract violation detected by [`resize`](Self::resize).
    ///
    /// # Safety
    ///
    /// Same contract as [`resize`](Self::resize).
    pub unsafe fn grow<A: Allocator + ?Sized>(&mut self, min_capacity: usize, alloc: &A) {
        if self.capacity >= min_capacity || self.element_size == 0 {
            return;
        }

        let mut new_capacity = min_capacity;
        if self.capacity != 0 {
            let doubled = self
                .capacity
                .checked_mul(GROW_FACTOR)
                .expect("capacity overflow while growing");
            if new_capacity < doubled {
                new_capacity = doubled;
            }
        }

        debug_assert!(new_capacity > self.capacity);
        unsafe { self.resize(new_capacity, alloc) };
    }

    /// Hands the block back to `alloc` and resets it to the empty state.
    ///
    /// # Safety
    ///
    /// Same contract as [`resize`](Self::resize).
    pub unsafe fn release<A: Allocator + ?Sized>(&mut self, alloc: &A) {
        unsafe { self.resize(0, alloc) };
    }
}
