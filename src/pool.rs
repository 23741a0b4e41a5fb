//! # Pool Allocator
//!
//! A fixed-size block allocator over a caller-owned, fixed-size byte
//! buffer: every chunk is the same size, and chunks are served from a
//! singly linked free list threaded through the chunks themselves (no
//! separate bookkeeping storage is needed).
//!
//! ## Memory Layout
//!
//! ```text
//!   ┌──────────┬──────────────────────────────────────────────────────────┐
//!   │ leading  │                   aligned_memory                          │
//!   │ padding  │  ┌─────────┬─────────┬─────────┬─────────┬─────────┐      │
//!   │ (waste)  │  │ chunk 0 │ chunk 1 │ chunk 2 │ chunk 3 │   ...   │      │
//!   └──────────┴──┴─────────┴─────────┴─────────┴─────────┴─────────┘      │
//!                  num_chunks = floor(capacity / chunk_size)
//! ```
//!
//! Each *free* chunk's first `size_of::<*mut u8>()` bytes are reinterpreted
//! as a pointer to the next free chunk, forming a LIFO free list:
//!
//! ```text
//!   free_list_head ──► [chunk 3] ──► [chunk 1] ──► [chunk 0] ──► null
//! ```
//!
//! ## Safety
//!
//! As with the other allocators in this crate, a `Pool` borrows its backing
//! buffer for its own lifetime, never calls into a system allocator, and is
//! not safe to share across threads.

use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::align::forward_align;

/// A fixed-size block allocator carved out of a caller-supplied byte buffer.
pub struct Pool<'a> {
  aligned_memory: NonNull<u8>,
  capacity: usize,
  chunk_size: usize,
  free_list_head: *mut u8,
  num_chunks: usize,
  valid: bool,
  _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> Pool<'a> {
  /// Builds a pool over `buffer`, serving chunks of `chunk_size` bytes each
  /// aligned to `chunk_align`.
  ///
  /// `aligned_memory` is advanced to the first address `>= buffer`'s start
  /// that satisfies `chunk_align`, and usable capacity shrinks by whatever
  /// leading waste that costs. `chunk_size` is then rounded up to a multiple
  /// of `chunk_align`.
  ///
  /// Construction never panics. If the (rounded) chunk size is smaller than
  /// a free-list node (one pointer) or the usable capacity can't fit even
  /// one chunk, the pool is constructed with zero chunks and
  /// [`is_valid`](Pool::is_valid) returns `false`; every operation on such a
  /// pool is a well-defined no-op that reports failure.
  pub fn new(buffer: &'a mut [u8], chunk_size: usize, chunk_align: usize) -> Self {
    debug_assert!(
      crate::align::is_power_of_two(chunk_align),
      "chunk_align must be a power of two, got {chunk_align}"
    );

    let raw_addr = buffer.as_mut_ptr() as usize;
    let raw_capacity = buffer.len();

    let aligned_addr = forward_align(raw_addr, chunk_align);
    let waste = aligned_addr - raw_addr;
    let capacity = raw_capacity.saturating_sub(waste);

    let rounded_chunk_size = if chunk_size == 0 { chunk_align } else { forward_align(chunk_size, chunk_align) };
    let node_size = mem::size_of::<*mut u8>();

    let valid = rounded_chunk_size >= node_size && capacity >= rounded_chunk_size;
    let num_chunks = if valid { capacity / rounded_chunk_size } else { 0 };

    // SAFETY: `aligned_addr` lies within `[raw_addr, raw_addr + raw_capacity]`.
    let aligned_memory = unsafe { NonNull::new_unchecked(aligned_addr as *mut u8) };

    let mut pool = Self {
      aligned_memory,
      capacity,
      chunk_size: rounded_chunk_size,
      free_list_head: ptr::null_mut(),
      num_chunks,
      valid,
      _marker: PhantomData,
    };

    pool.rebuild_free_list();
    pool
  }

  /// `false` if construction parameters were impossible for this buffer
  /// (chunk too small to hold a free-list node, or not even one chunk fits).
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.valid
  }

  /// Total number of fixed-size chunks this pool can serve.
  #[must_use]
  pub fn num_chunks(&self) -> usize {
    self.num_chunks
  }

  /// Size, in bytes, of each chunk (after rounding up to `chunk_align`).
  #[must_use]
  pub fn chunk_size(&self) -> usize {
    self.chunk_size
  }

  fn aligned_base(&self) -> usize {
    self.aligned_memory.as_ptr() as usize
  }

  fn chunk_addr(&self, index: usize) -> *mut u8 {
    (self.aligned_base() + index * self.chunk_size) as *mut u8
  }

  fn rebuild_free_list(&mut self) {
    self.free_list_head = ptr::null_mut();

    for index in (0..self.num_chunks).rev() {
      let chunk = self.chunk_addr(index);
      // SAFETY: `chunk` is one of `num_chunks` disjoint, in-bounds chunks;
      // its first `size_of::<*mut u8>()` bytes are free to hold the next
      // free-list pointer since the chunk is not yet handed out.
      unsafe {
        (chunk as *mut *mut u8).write(self.free_list_head);
      }
      self.free_list_head = chunk;
    }
  }

  /// Pops a chunk off the free list, zeroes it, and returns it.
  ///
  /// Returns `None` if the pool is empty (or invalid).
  pub fn alloc(&mut self) -> Option<NonNull<u8>> {
    if self.free_list_head.is_null() {
      return None;
    }

    let chunk = self.free_list_head;
    // SAFETY: `chunk` is the current free-list head, written by either
    // `rebuild_free_list` or a prior `free` call with a valid next pointer.
    let next = unsafe { (chunk as *mut *mut u8).read() };
    self.free_list_head = next;

    // SAFETY: `chunk` is `chunk_size` bytes inside the backing buffer.
    unsafe {
      ptr::write_bytes(chunk, 0, self.chunk_size);
      Some(NonNull::new_unchecked(chunk))
    }
  }

  /// Pushes `addr` back onto the free list.
  ///
  /// Returns `false` (without mutating the free list) if `addr` is
  /// `None` or falls outside `[aligned_memory, aligned_memory + capacity]`.
  /// As a stricter-than-required precaution, this also rejects addresses
  /// that don't land exactly on a chunk boundary, since pushing a
  /// misaligned address would silently corrupt the free list on the next
  /// `alloc`.
  pub fn free(&mut self, addr: Option<NonNull<u8>>) -> bool {
    let Some(addr) = addr else { return false };

    let addr_val = addr.as_ptr() as usize;
    let base = self.aligned_base();

    if addr_val < base || addr_val > base + self.capacity {
      return false;
    }

    if (addr_val - base) % self.chunk_size != 0 {
      return false;
    }

    // SAFETY: `addr` is `chunk_size` bytes inside the backing buffer and is
    // not currently on the free list (the caller's contract: no double-free).
    unsafe {
      (addr.as_ptr() as *mut *mut u8).write(self.free_list_head);
    }
    self.free_list_head = addr.as_ptr();

    true
  }

  /// Rebuilds the free list from scratch, making every chunk available
  /// again regardless of the pool's current state.
  pub fn free_all(&mut self) {
    self.rebuild_free_list();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scenario_pool_alloc_exhaustion_and_free_all() {
    let mut buf = [0u8; 320];
    let mut pool = Pool::new(&mut buf, 64, 64);
    assert!(pool.is_valid());

    let expected = pool.num_chunks();
    assert_eq!(expected, pool.capacity / 64);

    let mut addrs = Vec::new();
    for _ in 0..expected {
      let addr = pool.alloc().expect("chunk should be available");
      assert_eq!(addr.as_ptr() as usize % 64, 0);
      addrs.push(addr);
    }

    assert!(pool.alloc().is_none());

    pool.free_all();
    let mut count = 0;
    while pool.alloc().is_some() {
      count += 1;
    }
    assert_eq!(count, expected);
  }

  #[test]
  fn allocated_chunks_are_distinct_and_chunk_aligned() {
    let mut buf = [0u8; 320];
    let mut pool = Pool::new(&mut buf, 64, 64);

    let mut seen = std::collections::HashSet::new();
    while let Some(addr) = pool.alloc() {
      let addr_val = addr.as_ptr() as usize;
      assert_eq!((addr_val - pool.aligned_base()) % pool.chunk_size, 0);
      assert!(seen.insert(addr_val), "pool handed out the same chunk twice");
    }
  }

  #[test]
  fn free_rejects_null_and_out_of_range() {
    let mut buf = [0u8; 320];
    let mut pool = Pool::new(&mut buf, 64, 64);

    assert!(!pool.free(None));

    let way_out = pool.aligned_base() + pool.capacity + 4096;
    // SAFETY: this address is never dereferenced; `free` only compares it.
    let bogus = unsafe { NonNull::new_unchecked(way_out as *mut u8) };
    assert!(!pool.free(Some(bogus)));
  }

  #[test]
  fn free_rejects_non_chunk_boundary_addresses() {
    let mut buf = [0u8; 320];
    let mut pool = Pool::new(&mut buf, 64, 64);

    let chunk = pool.alloc().unwrap();
    let misaligned = (chunk.as_ptr() as usize + 1) as *mut u8;
    // SAFETY: never dereferenced; `free` only compares the address.
    let misaligned = unsafe { NonNull::new_unchecked(misaligned) };
    assert!(!pool.free(Some(misaligned)));
  }

  #[test]
  fn alloc_zeroes_returned_chunk() {
    let mut buf = [0xABu8; 320];
    let mut pool = Pool::new(&mut buf, 64, 64);

    let chunk = pool.alloc().unwrap();
    // SAFETY: `chunk` is a live, `chunk_size`-byte allocation.
    unsafe {
      let slice = std::slice::from_raw_parts(chunk.as_ptr(), pool.chunk_size());
      assert!(slice.iter().all(|&b| b == 0));
    }
  }

  #[test]
  fn construction_with_impossible_parameters_is_invalid_not_panicking() {
    let mut buf = [0u8; 4];
    let pool = Pool::new(&mut buf, 64, 64);
    assert!(!pool.is_valid());
    assert_eq!(pool.num_chunks(), 0);
  }

  #[test]
  fn chunk_size_smaller_than_free_list_node_is_invalid() {
    let mut buf = [0u8; 256];
    // 1-byte chunks, 1-byte aligned: rounds to 1, which cannot hold a
    // `*mut u8` free-list node.
    let pool = Pool::new(&mut buf, 1, 1);
    assert!(!pool.is_valid());
  }
}
