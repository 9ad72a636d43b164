//! Audible "target is up" signal

use std::io::Write;
#[cfg(target_os = "macos")]
use std::process::{Command, Stdio};

const BELL: &str = "\x07";

/// Side effect fired once when the target comes up
pub trait SignalEmitter {
    fn emit(&self);
}

/// Terminal bell, plus the system alert sound on macOS
#[derive(Debug, Default)]
pub struct Beeper;

impl SignalEmitter for Beeper {
    fn emit(&self) {
        emit_bell(&mut std::io::stdout());

        #[cfg(target_os = "macos")]
        {
            let _ = Command::new("osascript")
                .args(["-e", "beep"])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }
    }
}

/// Write the BEL character; never fails
pub fn emit_bell<W: Write>(out: &mut W) {
    let _ = out.write_all(BELL.as_bytes());
    let _ = out.flush();
}
