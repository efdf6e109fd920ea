pub mod telegram;

use anyhow::Result;

pub use telegram::TelegramClient;

/// Delivery channel for finished reports.
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<()>;
}
