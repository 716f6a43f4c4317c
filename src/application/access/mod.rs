//! Access control: the explicit per-request authorization gate.

mod gate;

pub use gate::{AccessError, AccessGate, ForbiddenReason, ProtectedAction};
