//! Error codes and exit status for qlmctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when daemon returns invalid JSON
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when daemon is unavailable/unreachable
pub const EXIT_DAEMON_UNAVAILABLE: i32 = 70;

/// Maps a failure to the matching exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(req_err) = err.downcast_ref::<reqwest::Error>() {
        if req_err.is_connect() || req_err.is_timeout() {
            return EXIT_DAEMON_UNAVAILABLE;
        }
        if req_err.is_decode() {
            return EXIT_INVALID_RESPONSE;
        }
    }
    if err.downcast_ref::<serde_json::Error>().is_some() {
        return EXIT_INVALID_RESPONSE;
    }
    EXIT_GENERAL_ERROR
}
