use std::io::Read;

use region_alloc::Arena;

/// Waits until the user presses ENTER.
///
/// Useful when you want to inspect the allocator's decisions step by step
/// instead of having the whole session scroll past at once.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  // This arena carves allocations out of a caller-owned buffer and never
  // touches the OS heap.
  let mut buffer = vec![0u8; 256];
  let mut arena = Arena::new(&mut buffer);

  println!("[start] arena capacity = {} bytes", arena.capacity());
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Allocate space for a u32.
  // --------------------------------------------------------------------
  let first = arena.alloc_aligned(4, 4).expect("fits in a fresh arena");
  println!("\n[1] Allocated 4 bytes at {:?}, used = {}", first, arena.used());

  // SAFETY: `first` is a live 4-byte allocation.
  unsafe {
    (first.as_ptr() as *mut u32).write(0xDEAD_BEEF);
    println!("[1] Value written = 0x{:X}", (first.as_ptr() as *mut u32).read());
  }

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Allocate 12 bytes.
  // --------------------------------------------------------------------
  let second = arena.alloc_aligned(12, 1).expect("fits in a fresh arena");
  println!("\n[2] Allocated 12 bytes at {:?}, used = {}", second, arena.used());

  // --------------------------------------------------------------------
  // 3) Grow the most recent allocation in place.
  // --------------------------------------------------------------------
  let grown = arena
    .resize_aligned(Some(second), 12, 32, 1)
    .expect("top-of-arena resize always succeeds if it fits");
  println!(
    "\n[3] Resized allocation #2 from 12 to 32 bytes: same address? {}",
    grown == second
  );

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Reset and show that memory reads back zeroed.
  // --------------------------------------------------------------------
  // SAFETY: `first` is still a live allocation until `reset` below.
  unsafe {
    *first.as_ptr() = 0xFF;
  }
  arena.reset();
  println!("\n[4] Reset arena: used = {}", arena.used());

  let reused = arena.alloc_aligned(4, 4).expect("fits after reset");
  // SAFETY: `reused` is a freshly bump-allocated 4-byte region.
  unsafe {
    println!("[4] First byte after reset+realloc reads back as {}", *reused.as_ptr());
  }

  println!("\n[5] End of demo.");
}
