use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    TransferReceivedEvent,
    TransferSentEvent,
    WalletFundedEvent,
};

/// The producer ends of every configured event channel. Cloned into each API instance; an empty producer list
/// simply means nobody is listening.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub wallet_funded_producers: Vec<EventProducer<WalletFundedEvent>>,
    pub transfer_sent_producers: Vec<EventProducer<TransferSentEvent>>,
    pub transfer_received_producers: Vec<EventProducer<TransferReceivedEvent>>,
}

/// The receiving ends, built from whatever hooks the host application registered.
pub struct EventHandlers {
    pub on_wallet_funded: Option<EventHandler<WalletFundedEvent>>,
    pub on_transfer_sent: Option<EventHandler<TransferSentEvent>>,
    pub on_transfer_received: Option<EventHandler<TransferReceivedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_wallet_funded = hooks.on_wallet_funded.map(|f| EventHandler::new(buffer_size, f));
        let on_transfer_sent = hooks.on_transfer_sent.map(|f| EventHandler::new(buffer_size, f));
        let on_transfer_received = hooks.on_transfer_received.map(|f| EventHandler::new(buffer_size, f));
        Self { on_wallet_funded, on_transfer_sent, on_transfer_received }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_wallet_funded {
            result.wallet_funded_producers.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_transfer_sent {
            result.transfer_sent_producers.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_transfer_received {
            result.transfer_received_producers.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_wallet_funded {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_transfer_sent {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_transfer_received {
            tokio::spawn(handler.start_handler());
        }
    }
}

/// Hook registration, filled in by the host application before the server starts.
#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_wallet_funded: Option<Handler<WalletFundedEvent>>,
    pub on_transfer_sent: Option<Handler<TransferSentEvent>>,
    pub on_transfer_received: Option<Handler<TransferReceivedEvent>>,
}

impl EventHooks {
    pub fn on_wallet_funded<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(WalletFundedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_wallet_funded = Some(Arc::new(f));
        self
    }

    pub fn on_transfer_sent<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TransferSentEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_transfer_sent = Some(Arc::new(f));
        self
    }

    pub fn on_transfer_received<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TransferReceivedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_transfer_received = Some(Arc::new(f));
        self
    }
}
