mod action;
mod author;
mod conversation;
mod event;
mod message;
mod remote;
mod textarea;

pub use action::*;
pub use author::*;
pub use conversation::*;
pub use event::*;
pub use message::*;
pub use remote::*;
pub use textarea::*;
