pub mod bci;
pub mod bcl;
pub mod counts;
pub mod engine;
pub mod error;
pub mod extract;
pub mod io;
