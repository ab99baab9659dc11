pub mod clock;
pub mod interval;
pub mod logging;
pub mod runtime;
