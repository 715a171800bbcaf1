// Background worker wiring.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::modules::outbox::relay::scheduler::OutboxRelay;
use crate::shared::infrastructure::outbox_store::OutboxStore;

/// Spawns the relay loop. Flip the watch sender to true to stop it; the
/// current tick always finishes first.
pub fn spawn_relay<TStore>(
    relay: Arc<OutboxRelay<TStore>>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    TStore: OutboxStore + Send + Sync + 'static,
{
    tokio::spawn(relay.run(shutdown))
}
