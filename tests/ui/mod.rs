//! Presentation layer tests: colours, narration lines, beep and version
