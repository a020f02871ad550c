//! Validation chains gating delivery.
//!
//! A [`ValidationChain`] owns an ordered list of [`ValidationStage`]s and a
//! [`Terminal`]. Handling a command evaluates stages front to back; the first
//! rejection ends evaluation and is returned as the status. When every stage
//! passes, the terminal either reports "Success" or delivers the command and
//! reports "Message Sent!".
//!
//! # Example
//!
//! ```ignore
//! let chain = ValidationChain::builder()
//!     .then(NonEmptyStage)
//!     .then(MinLengthStage::new(2))
//!     .deliver();
//!
//! let outcome = chain.handle(&DispatchCommand::new(channel, "Hello everyone!"));
//! assert_eq!(outcome.to_string(), "Message Sent!");
//! ```

mod chain;
mod stage;
mod stages;

pub use chain::{
    ChainBuilder, ChainOutcome, DeliveryStage, Terminal, ValidationChain, DELIVERED_MESSAGE,
    SUCCESS_MESSAGE,
};
pub use stage::{Rejection, StageOutcome, ValidationStage};
pub use stages::{HistoryStage, MinLengthStage, NonEmptyStage, PatternStage};
