//! Process exit codes, as described in the CLI's external interface.

/// Everything worked and every gremlin was zapped (or there were no gremlins).
pub const SUCCESS: i32 = 0;

/// Bad arguments, a build failure, or some other internal error before gremlins could run.
pub const USAGE: i32 = 1;

/// The run completed but one or more gremlins survived.
pub const FOUND_PROBLEMS: i32 = 2;
