pub mod command;
pub mod console;
pub mod error;
pub mod parser;
pub mod registry;

pub use command::MemCommand;
pub use console::{CaptureConsole, Console, StdoutConsole};
pub use error::{CmdError, CmdResult};
pub use parser::{ParseError, TokenCursor};
pub use registry::{CommandTable, ShellCommand};
