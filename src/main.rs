use std::sync::Arc;

use linelog::{global, Stderr};

fn example() {
    global::error().caller().msg("Some terrible error occurred");
}

fn main() {
    global::info().line().msg("Example program starting");
    global::debug().int("x", 6).int("y", 42).msg("Debug trace");
    global::warn().msg("Things are not quite right");

    global::set_debug_destination(Some(Arc::new(Stderr)));
    global::debug().int("x", 6).int("y", 42).msg("Debug trace attempt 2");

    example();
    global::close();
}
