pub mod beep;
pub mod colors;
pub mod reporter;

pub use beep::{Beeper, SignalEmitter};
pub use colors::{Colorizer, Tone};
pub use reporter::ConsoleReporter;
