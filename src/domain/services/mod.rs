pub mod actions;
pub mod events;
mod scroll;
mod session;

pub use scroll::*;
pub use session::*;
