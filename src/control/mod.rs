pub mod debounce;
pub mod periodic;
pub mod throttle;

pub use debounce::Debouncer;
pub use periodic::Periodic;
pub use throttle::Throttle;
