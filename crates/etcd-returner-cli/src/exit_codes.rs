//! Process exit codes.

use etcd_returner::ReturnerError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const UNAUTHORIZED: i32 = 3;
pub const CONFIG_ERROR: i32 = 4;

/// Exit code for an error, using the returner's classification when present.
pub fn from_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ReturnerError>())
        .map_or(FAILURE, ReturnerError::exit_code)
}
