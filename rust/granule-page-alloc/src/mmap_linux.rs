use std::sync::OnceLock;

/// Allocates at least `size` bytes of zero-filled, page-aligned memory.
///
/// The allocation is an anonymous private mapping; the kernel hands out
/// zero-filled pages, so the whole capacity satisfies the allocator
/// zero-fill contract without any explicit clearing.
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok((ptr, capacity))` - A tuple with a pointer to the allocated memory
///   and the actual capacity in bytes, which is `size` rounded up to the
///   next page boundary (one page minimum).
/// - `Err(io::Error)` - An I/O error if the mapping fails.
///
/// # Safety
///
/// The returned pointer must be deallocated using [`free`] with the same
/// capacity value to avoid memory leaks.
pub fn allocate(size: usize) -> std::io::Result<(*mut std::ffi::c_void, usize)> {
    let page_size = get_page_size();
    assert!(page_size.is_power_of_two());
    let capacity = (size.max(1) + page_size - 1) & !(page_size - 1);
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            capacity,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        let err = std::io::Error::last_os_error();
        return Err(err);
    }
    Ok((ptr, capacity))
}

/// Frees a mapping created by [`allocate`].
///
/// # Arguments
///
/// * `ptr` - A pointer to the memory region to deallocate, as returned by
///   [`allocate`]
/// * `size` - The capacity in bytes that was **returned** by [`allocate`]
///
/// # Safety
///
/// `ptr` and `size` must describe a live mapping produced by [`allocate`];
/// the memory must not be accessed afterwards.
pub unsafe fn free(ptr: *mut std::ffi::c_void, size: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, size) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Returns the system page size in bytes.
///
/// The value is read once from `sysconf(_SC_PAGESIZE)` and cached; if the
/// call fails, 4 KiB is assumed.
pub fn get_page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    if let Some(&size) = SIZE.get() {
        size
    } else {
        let size = match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
            n if n > 0 => n as usize,
            _ => 4 * 1024,
        };
        let _ = SIZE.set(size);
        size
    }
}
