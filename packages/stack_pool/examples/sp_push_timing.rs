//! Pushes a large number of integers onto one stack and reports how long it took.

use std::time::Instant;

use stack_pool::StackPool;

const PUSH_COUNT: i32 = 10_000_000;

fn main() {
    let mut pool = StackPool::<i32>::with_capacity(1000).unwrap();

    let mut stack = pool.new_stack();

    let start = Instant::now();

    for value in 0..PUSH_COUNT {
        stack = pool.push(value, stack).unwrap();
    }

    let elapsed = start.elapsed();

    println!("Time: {} ms", elapsed.as_millis());
    println!("Stack length: {}", pool.length(stack));
}
