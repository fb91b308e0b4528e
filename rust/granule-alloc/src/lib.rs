//! Pluggable memory allocation for the Granule toolkit.
//!
//! This crate defines the three-operation [`Allocator`] capability, the
//! [`RawMemory`] block it trades in, and the exact-resize / amortized-grow
//! engine layered on top. Two general-purpose implementations ship with it:
//! [`SystemAllocator`] (the process heap) and [`TrackingAllocator`] (a
//! counting decorator around any other allocator).
//!
//! Higher layers never allocate on their own: an allocator is injected at
//! construction and every byte they own flows through it.

pub mod alloc;
pub mod raw;
pub mod system;
pub mod tracking;

pub use alloc::Allocator;
pub use raw::{MAX_CAPACITY, RawMemory};
pub use system::SystemAllocator;
pub use tracking::{AllocationStats, TrackingAllocator};
