use std::sync::Arc;

use crate::modules::orders::use_cases::cancel_order::handler::CancelOrderHandler;
use crate::modules::orders::use_cases::create_order::handler::CreateOrderHandler;
use crate::modules::outbox::relay::scheduler::OutboxRelay;
use crate::shared::infrastructure::in_memory::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub create_handler: Arc<CreateOrderHandler<InMemoryStore>>,
    pub cancel_handler: Arc<CancelOrderHandler<InMemoryStore>>,
    pub relay: Arc<OutboxRelay<InMemoryStore>>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryStore>, relay: Arc<OutboxRelay<InMemoryStore>>) -> Self {
        Self {
            create_handler: Arc::new(CreateOrderHandler::new(store.clone())),
            cancel_handler: Arc::new(CancelOrderHandler::new(store.clone())),
            store,
            relay,
        }
    }
}
