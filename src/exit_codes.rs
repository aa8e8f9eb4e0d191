//! Exit code constants for the `prompt` CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, bad configuration, template not found)
//! - 2: Validation failure (invalid template, score below threshold)
//! - 3: Render failure (missing/invalid variables, template errors)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, malformed configuration, or unknown template.
pub const USER_ERROR: i32 = 1;

/// Validation failure: template has errors or does not meet a quality threshold.
pub const VALIDATION_FAILURE: i32 = 2;

/// Render failure: the template could not be rendered with the given variables.
pub const RENDER_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, VALIDATION_FAILURE, RENDER_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(VALIDATION_FAILURE, 2);
        assert_eq!(RENDER_FAILURE, 3);
    }
}
