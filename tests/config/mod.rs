//! Configuration tests: file layer, flag layering and duration strings
