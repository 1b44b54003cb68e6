//! Streaming session: lifecycle control, pacing, and performance
//! telemetry.

pub mod pacer;
pub mod perf;
pub mod session;

pub use pacer::{PacerIo, StreamPacer};
pub use perf::{PerfMonitor, PerfSnapshot};
pub use session::{IoFactory, SessionCommand, SessionController, SessionState};
