use std::io::Read;
use std::ptr;

use tagalloc::{allocate, instance, object_size, reallocate, release, zero_allocate};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop`, `gdb`, or just follow the free list between steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the free list and the heap counters as they stand.
fn print_heap(label: &str) {
  println!("[{}] {}", label, instance().free_list_report());
  println!("{}", instance().report());
}

fn main() {
  println!("tagalloc demo, PID = {}", std::process::id());

  unsafe {
    // --------------------------------------------------------------------
    // 1) Allocate three small blocks. The first call acquires the first
    //    2 MiB arena; all three are carved off its front by splitting.
    // --------------------------------------------------------------------
    let first = allocate(100).expect("out of memory").as_ptr();
    let second = allocate(200).expect("out of memory").as_ptr();
    let third = allocate(300).expect("out of memory").as_ptr();

    println!("\n[1] Allocated 100, 200 and 300 bytes");
    println!("[1] first  = {first:?} (block size {})", object_size(first));
    println!("[1] second = {second:?} (block size {})", object_size(second));
    println!("[1] third  = {third:?} (block size {})", object_size(third));
    print_heap("1");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) Write into the blocks to show they are usable and independent.
    // --------------------------------------------------------------------
    ptr::write_bytes(first, 0xAA, 100);
    ptr::write_bytes(second, 0xBB, 200);
    ptr::write_bytes(third, 0xCC, 300);
    println!("\n[2] Patterns written: first[99] = 0x{:02X}, second[0] = 0x{:02X}", first.add(99).read(), second.read());
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Release the middle block. Its neighbors are still allocated, so
    //    it lands on the free list as-is, bracketed by them.
    // --------------------------------------------------------------------
    release(second);
    println!("\n[3] Released the middle block");
    print_heap("3");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) Allocate 150 bytes. First-fit finds the freed middle block
    //    before the big remainder at the end of the arena.
    // --------------------------------------------------------------------
    let reused = allocate(150).expect("out of memory").as_ptr();
    println!("\n[4] Allocate 150 bytes (check reuse of the freed block)");
    println!(
      "[4] reused == second? {}",
      if reused == second {
        "Yes, first-fit reused the freed block"
      } else {
        "No, it allocated somewhere else"
      }
    );
    print_heap("4");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) Release first and third. Each merges with whatever free
    //    neighbor it touches; watch the free-list entries fuse.
    // --------------------------------------------------------------------
    release(first);
    release(third);
    println!("\n[5] Released the outer blocks");
    print_heap("5");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Reallocate the reused block. The content moves to the new
    //    block; the old one returns to the free list.
    // --------------------------------------------------------------------
    let grown = reallocate(reused, 4096).expect("out of memory").as_ptr();
    println!("\n[6] Reallocated 150 -> 4096 bytes, moved {reused:?} -> {grown:?}");
    print_heap("6");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 7) Zero-allocate an array. The payload comes back zero-filled even
    //    though this region has been written to before.
    // --------------------------------------------------------------------
    let zeroed = zero_allocate(16, 8).expect("out of memory").as_ptr();
    println!("\n[7] zero_allocate(16, 8): first byte = {}, last byte = {}", zeroed.read(), zeroed.add(127).read());
    release(zeroed);
    release(grown);

    // --------------------------------------------------------------------
    // 8) End of demo. The OS reclaims the arenas on exit; the final
    //    statistics report prints unless TAGALLOC_VERBOSE=NO.
    // --------------------------------------------------------------------
    println!("\n[8] End of demo. Watch for the exit report below.");
  }
}
