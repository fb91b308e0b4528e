//! # Granule: a pluggable-allocator memory toolkit
//!
//! Granule is a small toolkit for byte-oriented memory management built
//! around one idea: the code that owns a buffer should not decide where its
//! memory comes from. A three-operation [`Allocator`] capability is the sole
//! injection point; everything above it, from the raw resize/grow engine to
//! the null-terminated string buffer, works against that capability and
//! nothing else.
//!
//! ## Components
//!
//! * [`alloc`] - the [`Allocator`] capability, the [`RawMemory`] block and
//!   the exact-resize / amortized-grow engine, plus the system-heap and
//!   counting allocators
//! * [`page_alloc`] - whole-page allocation through the same capability
//! * [`strings`] - [`Str`] (borrowed view) and [`StrBuf`] (owned growable
//!   buffer with a maintained null terminator)
//!
//! This facade crate re-exports the public surface of the component crates
//! so the full toolkit is reachable through a single dependency.

pub use granule_alloc as alloc;
pub use granule_page_alloc as page_alloc;
pub use granule_strings as strings;

pub use granule_alloc::{AllocationStats, Allocator, RawMemory, SystemAllocator, TrackingAllocator};
pub use granule_page_alloc::PageAllocator;
pub use granule_strings::{Str, StrBuf};
