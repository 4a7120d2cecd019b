use crate::client::RaceApi;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle behind the "accelerate" control.
///
/// Enabled while a race is running. Every press sends its own request;
/// presses are neither debounced nor rate limited and may overlap.
pub struct Accelerator<A> {
    api: Arc<A>,
    target: watch::Receiver<Option<u32>>,
}

impl<A> Clone for Accelerator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            target: self.target.clone(),
        }
    }
}

impl<A: RaceApi> Accelerator<A> {
    pub(crate) fn new(api: Arc<A>, target: watch::Receiver<Option<u32>>) -> Self {
        Self { api, target }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.borrow().is_some()
    }

    /// Fire one accelerate request. Returns `None` when no race is running.
    pub fn press(&self) -> Option<JoinHandle<()>> {
        let Some(race_id) = *self.target.borrow() else {
            tracing::debug!("Accelerate ignored: no race running");
            return None;
        };

        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            if let Err(e) = api.accelerate(race_id).await {
                tracing::warn!("Problem with accelerate for race {}: {}", race_id, e);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeApi};

    #[tokio::test]
    async fn test_disabled_without_race() {
        let (_tx, rx) = watch::channel(None);
        let accelerator = Accelerator::new(Arc::new(FakeApi::new()), rx);

        assert!(!accelerator.is_enabled());
        assert!(accelerator.press().is_none());
    }

    #[tokio::test]
    async fn test_each_press_sends_one_request() {
        let api = Arc::new(FakeApi::new());
        let (_tx, rx) = watch::channel(Some(4));
        let accelerator = Accelerator::new(Arc::clone(&api), rx);

        let handles: Vec<_> = (0..3).filter_map(|_| accelerator.press()).collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(api.calls(), vec![Call::Accelerate(4); 3]);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let api = Arc::new(FakeApi::new().failing_accelerate());
        let (_tx, rx) = watch::channel(Some(1));
        let accelerator = Accelerator::new(Arc::clone(&api), rx);

        let handle = accelerator.press().unwrap();
        assert!(handle.await.is_ok());
        assert_eq!(api.calls(), vec![Call::Accelerate(1)]);
    }

    #[tokio::test]
    async fn test_follows_race_target() {
        let (tx, rx) = watch::channel(None);
        let accelerator = Accelerator::new(Arc::new(FakeApi::new()), rx);

        tx.send_replace(Some(2));
        assert!(accelerator.is_enabled());
        tx.send_replace(None);
        assert!(!accelerator.is_enabled());
    }
}
