pub mod unauthorized;

pub use unauthorized::*;
