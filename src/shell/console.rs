//! Operator console seam.
//!
//! Values read back for the operator go to the interactive console, which is
//! a different sink than the diagnostic log (the shell's `kdb_printf` versus
//! the kernel log in the original tool).
use std::sync::Mutex;

pub trait Console: Send + Sync {
    fn line(&self, text: &str);
}

/// Console writing straight to stdout.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn line(&self, text: &str) {
        println!("{text}");
    }
}

/// Console capturing output for assertions.
#[derive(Debug, Default)]
pub struct CaptureConsole {
    lines: Mutex<Vec<String>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *lines)
    }
}

impl Console for CaptureConsole {
    fn line(&self, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
    }
}
