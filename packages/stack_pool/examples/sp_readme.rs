//! Example that demonstrates the basic usage of `StackPool`.

use stack_pool::{Error, StackPool};

fn main() {
    println!("=== Stack Pool README Example ===");

    let mut pool = StackPool::<i32>::new();

    // A new stack is just the empty handle; pushing returns the new head.
    let h1 = pool.push(10, pool.new_stack()).unwrap();
    let h2 = pool.push(20, h1).unwrap();
    println!("Stack: {}", pool.display_stack(h2));

    // Popping returns the handle of the node below.
    let h3 = pool.pop(h2).unwrap();
    println!("After pop: {}", pool.display_stack(h3));

    // The popped handle is no longer a head, so it cannot be popped again.
    match pool.pop(h2) {
        Err(Error::NotHead { handle }) => println!("Handle {handle} is no longer a stack head"),
        other => println!("Unexpected result: {other:?}"),
    }

    // The slot of the popped node is recycled by the next push.
    let h4 = pool.push(30, h3).unwrap();
    println!("Reused slot {h4} of {} allocated slots", pool.slot_count());

    pool.free_stack(h4).unwrap();
    println!("README example completed successfully!");
}
