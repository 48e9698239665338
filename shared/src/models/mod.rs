//! Domain models for the N2K logistics booking system

mod lr_number;
mod order;
mod reference;
mod report;
mod vehicle;

pub use lr_number::*;
pub use order::*;
pub use reference::*;
pub use report::*;
pub use vehicle::*;
