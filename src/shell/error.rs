//! Command error taxonomy and the integer status codes handed back to the
//! host shell.
use std::fmt;

use super::parser::ParseError;

pub type CmdResult<T> = Result<T, CmdError>;

pub const STATUS_OK: i32 = 0;
/// Too few arguments for the verb.
pub const STATUS_ARGCOUNT: i32 = -20;
/// Unrecognized verb or command name.
pub const STATUS_NOTFOUND: i32 = -21;
/// Malformed address or value token.
pub const STATUS_INVAL: i32 = -22;
/// No translation could be established for the physical range.
pub const STATUS_NOMEM: i32 = -12;
/// Mapping succeeded but the fault-checked read trapped.
pub const STATUS_FAULT: i32 = -14;

#[derive(Debug)]
pub enum CmdError {
    TooFewArgs { got: usize, need: usize },
    BadToken { which: &'static str, source: ParseError },
    Translation { addr: u64 },
    AccessFault { addr: u64 },
    UnknownVerb { verb: char },
}

impl CmdError {
    /// Host shell status code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            CmdError::TooFewArgs { .. } => STATUS_ARGCOUNT,
            CmdError::BadToken { .. } => STATUS_INVAL,
            CmdError::Translation { .. } => STATUS_NOMEM,
            CmdError::AccessFault { .. } => STATUS_FAULT,
            CmdError::UnknownVerb { .. } => STATUS_NOTFOUND,
        }
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdError::TooFewArgs { got, need } => {
                write!(f, "too few arguments ({got} given, {need} required)")
            }
            CmdError::BadToken { which, source } => {
                write!(f, "failed to extract {which}: {source}")
            }
            CmdError::Translation { addr } => {
                write!(f, "remap failed for physical address 0x{addr:x}")
            }
            CmdError::AccessFault { addr } => {
                write!(f, "fault-checked read trapped at 0x{addr:x}")
            }
            CmdError::UnknownVerb { verb } => write!(f, "unknown verb '{verb}'"),
        }
    }
}

impl std::error::Error for CmdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CmdError::BadToken { source, .. } => Some(source),
            _ => None,
        }
    }
}
