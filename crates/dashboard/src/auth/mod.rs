//! Session handling for the dashboard

pub mod gate;
pub mod guard;
pub mod handler;

pub use gate::{GateState, RouteGate};
pub use guard::SessionGuard;
pub use handler::AuthHandler;
