/*!
 * Monitoring
 * Typed event notifications and tracing setup
 */

pub mod collector;
pub mod events;
mod tracer;

pub use collector::{Collector, StreamStats, Subscriber};
pub use events::{Category, Event, EventFilter, Payload};
pub use tracer::{init_tracing, ENV_TRACE_JSON};
