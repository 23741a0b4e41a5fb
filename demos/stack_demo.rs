use std::io::Read;

use region_alloc::Stack;

fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  let mut buffer = vec![0u8; 256];
  let mut stack = Stack::new(&mut buffer);

  println!("[start] stack capacity = {} bytes", stack.capacity());
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Push three allocations.
  // --------------------------------------------------------------------
  let a = stack.alloc_aligned(8, 8).expect("fits");
  let b = stack.alloc_aligned(8, 8).expect("fits");
  let c = stack.alloc_aligned(8, 8).expect("fits");
  println!("\n[1] Allocated A={:?} B={:?} C={:?}, used = {}", a, b, c, stack.used());
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Resize the middle allocation (B): it must move and retire.
  // --------------------------------------------------------------------
  let d = stack
    .resize_aligned(Some(b), 8, 16, 8)
    .expect("non-top resize bump-allocates a fresh top block");
  println!("\n[2] Resized B into D={:?} (moved: {})", d, d != b);

  let stale_retry = stack.resize_aligned(Some(b), 8, 16, 8);
  println!("[2] Resizing the now-retired address B again: {:?}", stale_retry);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Free everything in LIFO order.
  // --------------------------------------------------------------------
  println!("\n[3] free(D) -> {}", stack.free(Some(d)));
  println!("[3] free(C) -> {}", stack.free(Some(c)));
  println!("[3] free(B) (already retired) -> {}", stack.free(Some(b)));
  println!("[3] free(A) -> {}", stack.free(Some(a)));
  println!("[3] stack.used() after full unwind = {}", stack.used());

  println!("\n[4] End of demo.");
}
