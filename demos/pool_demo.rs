use std::io::Read;

use region_alloc::Pool;

fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  let mut buffer = vec![0u8; 320];
  let mut pool = Pool::new(&mut buffer, 64, 64);

  println!(
    "[start] pool valid = {}, num_chunks = {}, chunk_size = {}",
    pool.is_valid(),
    pool.num_chunks(),
    pool.chunk_size()
  );
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Drain the pool.
  // --------------------------------------------------------------------
  let mut chunks = Vec::new();
  while let Some(chunk) = pool.alloc() {
    chunks.push(chunk);
  }
  println!("\n[1] Allocated {} chunks, pool now empty: {}", chunks.len(), pool.alloc().is_none());
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Free one chunk back and reuse it.
  // --------------------------------------------------------------------
  let freed = chunks.pop().unwrap();
  println!("\n[2] free(last chunk) -> {}", pool.free(Some(freed)));
  let reused = pool.alloc();
  println!("[2] Reallocated same chunk? {}", reused == Some(freed));
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Reset with free_all.
  // --------------------------------------------------------------------
  pool.free_all();
  let mut count = 0;
  while pool.alloc().is_some() {
    count += 1;
  }
  println!("\n[3] After free_all, drained {} chunks again", count);

  println!("\n[4] End of demo.");
}
