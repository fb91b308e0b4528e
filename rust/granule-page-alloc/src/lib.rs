//! Page-granular memory allocation for the Granule toolkit.
//!
//! [`PageAllocator`] serves the [`Allocator`] capability with whole pages of
//! virtual memory: on Linux through anonymous private `mmap`, elsewhere
//! through a page-aligned standard-library emulation. Requested byte sizes
//! round up to the page boundary and the *actual* capacity is reported back,
//! which makes this allocator a natural exerciser of the
//! "capacity is larger than or equal to requested, not exact" half of the
//! allocator contract.

use granule_alloc::{Allocator, RawMemory};

#[cfg_attr(target_os = "linux", path = "mmap_linux.rs")]
#[cfg_attr(not(target_os = "linux"), path = "mmap_fallback.rs")]
pub mod mmap;

#[cfg(test)]
mod tests;

/// Allocator backed by whole pages of virtual memory.
///
/// Fresh mappings are zero-filled by the operating system, so the zero-fill
/// contract holds over the entire (page-rounded) capacity. Reallocation maps
/// a new region, copies the surviving prefix and unmaps the old region.
/// Mapping failure is fatal; no error is reported to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAllocator;

fn round_up_to_page(size: usize) -> usize {
    let page_size = mmap::get_page_size();
    (size.max(1) + page_size - 1) & !(page_size - 1)
}

unsafe impl Allocator for PageAllocator {
    fn allocate(&self, count: usize, element_size: usize) -> RawMemory {
        if count == 0 || element_size == 0 {
            return RawMemory::new(element_size);
        }

        let size = count
            .checked_mul(element_size)
            .expect("allocation size overflow");
        let (ptr, byte_capacity) = mmap::allocate(size).expect("page allocation failed");

        // Whole pages back the block; report everything they can hold.
        let capacity = byte_capacity / element_size;
        debug_assert!(capacity >= count);
        RawMemory::from_raw_parts(ptr as *mut u8, capacity, element_size)
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

        let mut new_mem = self.allocate(new_count, element_size);
        let copy_bytes = mem.capacity().min(new_mem.capacity()) * element_size;
        unsafe {
            std::ptr::copy_nonoverlapping(mem.as_ptr(), new_mem.as_mut_ptr(), copy_bytes);
            self.free(mem);
        }
        new_mem
    }

    unsafe fn free(&self, mem: RawMemory) {
        if mem.is_allocated() {
            let (ptr, capacity, element_size) = mem.into_raw_parts();
            // The mapping spans the element capacity rounded back up to the
            // page boundary; the remainder below one page was reported to
            // nobody and is freed together with it.
            let bytes = round_up_to_page(capacity * element_size);
            unsafe { mmap::free(ptr as *mut std::ffi::c_void, bytes) }.expect("page free failed");
        }
    }
}
