//! # Events Module
//!
//! Event-driven architecture for GUI-ready progress reporting.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI, web) to subscribe and display progress. Operator-facing
//! output is a stream of [`LogLine`]s; state transitions arrive as
//! [`PipelineEvent`]s.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//! let handle = pipeline.spawn(sender);
//!
//! while !handle.is_finished() {
//!     for event in receiver.drain() {
//!         if let Event::Line(line) = event {
//!             println!("{}", line.text);
//!         }
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```

mod channel;
mod types;

pub use channel::{line_texts, null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
