mod gate;

pub mod event;
pub mod observable;

pub use event::Event;
pub use observable::{Observable, Subscription};
