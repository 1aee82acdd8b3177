//! Report a failure from deep inside a call chain
//!
//! Run with `ERRLOG_PRINT_STACK=1` to append the stack trace.

use std::io;

fn main() {
    errlog_core::logging_facility::init(errlog_core::logging_facility::Profile::Development);

    println!("Example start");
    wrapping_function();
    println!("Example end");
}

fn wrapping_function() {
    some_big_function();
}

fn some_big_function() {
    some_dumb_function();

    some_small_function();

    if errlog_core::debugx(some_nasty_function().err().as_ref(), "some information") {
        return;
    }

    some_small_function();
}

fn some_small_function() {
    let _ = format!("I do things {}!", 1);
}

fn some_nasty_function() -> io::Result<()> {
    Err(io::Error::other("I'm failing for some reason"))
}

fn some_dumb_function() -> bool {
    false
}
