//! Sleeper that records requested waits without sleeping.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::resolver::Sleeper;

#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    sleeps: Arc<RwLock<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration requested so far, in order.
    pub async fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.read().await.clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.write().await.push(duration);
    }
}
