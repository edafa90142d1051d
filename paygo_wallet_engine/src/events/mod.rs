//! Fire-and-forget side effects.
//!
//! Ledger commits publish events (wallet funded, transfer sent/received) onto an async channel. Subscribers —
//! such as the email dispatcher in the server crate — attach handlers at startup. Handlers run on their own
//! tasks; a slow or failing handler can never fail, or even delay, the ledger operation that produced the event.

mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{TransferReceivedEvent, TransferSentEvent, WalletFundedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
