//! Symbol channel capabilities.
//!
//! The optical channel is one-directional: the sender displays symbols, the
//! receiver scans them. Rendering and scanning are someone else's problem;
//! this crate only fixes the contract at that boundary:
//! - [`SymbolSink`] turns one text payload into one displayed symbol
//! - [`PayloadSource`] yields the next decoded payload, if any
//!
//! This is the lowest layer of qrtp. Everything else builds on top of
//! these two traits.

pub mod error;
pub mod lines;
pub mod memory;
pub mod traits;

pub use error::{ChannelError, Result};
pub use lines::{LineSink, LineSource};
pub use memory::IterSource;
pub use traits::{PayloadSource, SymbolSink};
