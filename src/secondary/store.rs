use tokio::sync::RwLock;

/// Sparse, gap-tolerant local log of a secondary.
///
/// Replicated messages may arrive out of order and duplicated, so a write
/// at id `k` first pads the underlying vector with holes up to `k`, then
/// sets slot `k` under last-writer-wins. Readers only ever see the maximal
/// gap-free prefix from id 0; anything past the first hole stays buffered
/// until the gap closes.
pub struct SecondaryStore {
    slots: RwLock<Vec<Option<String>>>,
    delay: RwLock<f64>,
}

impl SecondaryStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            delay: RwLock::new(0.0),
        }
    }

    /// Store `text` at `id`, padding with holes as needed. Idempotent:
    /// re-writing an occupied id overwrites it, which makes overlapping
    /// retry, catch-up and duplicate deliveries all safe.
    pub async fn write(&self, id: u64, text: String) {
        let mut slots = self.slots.write().await;
        let id = id as usize;
        if id >= slots.len() {
            slots.resize_with(id + 1, || None);
        }
        slots[id] = Some(text);

        tracing::info!("Stored message id {} ({} slots)", id, slots.len());
    }

    /// The visible prefix: every payload before the first hole.
    pub async fn visible(&self) -> Vec<String> {
        let slots = self.slots.read().await;
        slots
            .iter()
            .take_while(|slot| slot.is_some())
            .map(|slot| slot.clone().unwrap_or_default())
            .collect()
    }

    /// Injected response delay in seconds, a fault-injection hook for
    /// slow-secondary scenarios.
    pub async fn delay(&self) -> f64 {
        *self.delay.read().await
    }

    pub async fn set_delay(&self, seconds: f64) {
        *self.delay.write().await = seconds;
        tracing::info!("Set response delay to {}s", seconds);
    }
}

impl Default for SecondaryStore {
    fn default() -> Self {
        Self::new()
    }
}
