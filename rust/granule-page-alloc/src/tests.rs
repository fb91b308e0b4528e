use granule_alloc::{Allocator, RawMemory};

use crate::{PageAllocator, mmap};

#[test]
fn test_mmap_allocate_rounds_to_pages() {
    let page_size = mmap::get_page_size();

    let (ptr, capacity) = mmap::allocate(1).expect("allocate");
    assert!(!ptr.is_null());
    assert_eq!(capacity, page_size);
    unsafe { mmap::free(ptr, capacity) }.expect("free");

    let (ptr, capacity) = mmap::allocate(page_size * 3 + 100).expect("allocate");
    assert_eq!(capacity, page_size * 4);
    unsafe { mmap::free(ptr, capacity) }.expect("free");
}

#[test]
fn test_mmap_zero_size_allocates_one_page() {
    let (ptr, capacity) = mmap::allocate(0).expect("allocate");
    assert!(!ptr.is_null());
    assert_eq!(capacity, mmap::get_page_size());
    unsafe { mmap::free(ptr, capacity) }.expect("free");
}

#[test]
fn test_allocate_reports_page_rounded_capacity() {
    let al = PageAllocator;
    let mem = al.allocate(10, 1);
    assert!(mem.capacity() >= 10);
    assert_eq!(mem.capacity(), mmap::get_page_size());
    assert!(mem.is_allocated());
    unsafe { al.free(mem) };
}

#[test]
fn test_allocate_is_zero_filled() {
    let al = PageAllocator;
    let mem = al.allocate(100, 4);
    assert!(mem.typed_slice::<u32>().iter().all(|&v| v == 0));
    unsafe { al.free(mem) };
}

#[test]
fn test_allocate_degenerate() {
    let al = PageAllocator;
    let mem = al.allocate(0, 4);
    assert!(!mem.is_allocated());
    unsafe { al.free(mem) };

    let mem = al.allocate(16, 0);
    assert!(!mem.is_allocated());
    unsafe { al.free(mem) };
}

#[test]
fn test_reallocate_preserves_and_clears() {
    let al = PageAllocator;
    let page_size = mmap::get_page_size();

    let mut mem = al.allocate(8, 8);
    mem.typed_slice_mut::<u64>()[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    // Force a genuinely larger mapping.
    let new_count = page_size / 8 * 2;
    let mem = unsafe { al.reallocate(mem, new_count) };
    assert!(mem.capacity() >= new_count);

    let values = mem.typed_slice::<u64>();
    assert_eq!(&values[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(values[8..].iter().all(|&v| v == 0));
    unsafe { al.free(mem) };
}

#[test]
fn test_elements_wider_than_a_page() {
    let al = PageAllocator;
    let element_size = mmap::get_page_size() + 1;
    let mem = al.allocate(3, element_size);
    assert!(mem.capacity() >= 3);
    assert!(mem.is_allocated());
    unsafe { al.free(mem) };
}

#[test]
fn test_grow_through_page_allocator() {
    let al = PageAllocator;
    let mut mem = RawMemory::new(1);
    unsafe { mem.grow(100, &al) };
    assert!(mem.capacity() >= 100);
    let first = mem.capacity();

    // Already covered by the page rounding: no new mapping needed.
    unsafe { mem.grow(first, &al) };
    assert_eq!(mem.capacity(), first);

    unsafe { mem.grow(first + 1, &al) };
    assert!(mem.capacity() > first);
    unsafe { mem.release(&al) };
    assert!(!mem.is_allocated());
}
