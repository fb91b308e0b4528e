//! `SystemAllocator`: the process heap exposed through the [`Allocator`]
//! capability.

use std::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error, realloc};

use crate::alloc::Allocator;
use crate::raw::RawMemory;

/// Alignment of every block served by [`SystemAllocator`].
const ALIGNMENT: usize = 16;

/// Allocator backed by the standard library heap.
///
/// Blocks are zero-filled on allocation, extended regions are zero-filled on
/// reallocation, and the returned capacity is exactly the requested count.
/// Allocation failure terminates the process through
/// [`std::alloc::handle_alloc_error`]; no error is ever reported to the
/// caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

fn layout_of(count: usize, element_size: usize) -> Layout {
    let size = count
        .checked_mul(element_size)
        .expect("allocation size overflow");
    Layout::from_size_align(size, ALIGNMENT).expect("allocation layout")
}

unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, count: usize, element_size: usize) -> RawMemory {
        if count == 0 || element_size == 0 {
            return RawMemory::new(element_size);
        }

        let layout = layout_of(count, element_size);
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            handle_alloc_error(layout);
        }
        RawMemory::from_raw_parts(ptr, count, element_size)
    }

    unsafe fn reallocate(&self, mem: RawMemory, new_count: usize) -> RawMemory {
        let element_size = mem.element_size();

        if new_count == 0 {
            unsafe { self.free(mem) };
            return RawMemory::new(element_size);
        }

        if !mem.is_allocated() {
            return self.allocate(new_count, element_size);
        }

        let (old_ptr, old_count, element_size) = mem.into_raw_parts();
        let old_layout = layout_of(old_count, element_size);
        let new_layout = layout_of(new_count, element_size);

        let ptr = unsafe { realloc(old_ptr, old_layout, new_layout.size()) };
        if ptr.is_null() {
            handle_alloc_error(new_layout);
        }

        // realloc preserves contents but does not clear the extension.
        if new_count > old_count {
            unsafe {
                ptr.add(old_count * element_size)
                    .write_bytes(0, (new_count - old_count) * element_size)
            };
        }

        RawMemory::from_raw_parts(ptr, new_count, element_size)
    }

    unsafe fn free(&self, mem: RawMemory) {
        if mem.is_allocated() {
            let (ptr, count, element_size) = mem.into_raw_parts();
            unsafe { dealloc(ptr, layout_of(count, element_size)) };
        }
    }
}
