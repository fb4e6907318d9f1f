//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (including runs where nothing matched)       |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage or config error (bad args, missing key column) |
//! | 3    | I/O error (cannot read input, cannot write output)   |
//! | 4    | Parse error (input file is not a readable table)     |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid config, missing key column.
pub const EXIT_USAGE: u8 = 2;

/// File could not be read or an output could not be written.
pub const EXIT_IO: u8 = 3;

/// Input file opened but could not be parsed as a table.
pub const EXIT_PARSE: u8 = 4;
