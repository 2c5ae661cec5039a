//! Toast notifications for the storefront.
//!
//! Cart confirmations are queued by [`ToastQueue`] and drained into the
//! `HX-Trigger` header of the response that caused them. The page script
//! turns each message into a transient toast.

use std::sync::{Mutex, PoisonError};

use mercadito_core::{CartEntry, Product, Totals};
use tracing::debug;

use crate::cart::{CartObserver, added_message};

/// Name of the client-side event carrying toast messages.
pub const TOAST_EVENT: &str = "toast";

/// Pending toast messages.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<String>>,
}

impl ToastQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message.
    pub fn push(&self, message: impl Into<String>) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.into());
    }

    /// Take every queued message, oldest first.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CartObserver for ToastQueue {
    fn cart_changed(&self, entries: &[CartEntry], totals: Totals) {
        debug!(
            entries = entries.len(),
            items = totals.items,
            total = %totals.price,
            "Cart changed"
        );
    }

    fn product_added(&self, product: &Product) {
        self.push(added_message(product));
    }
}

/// `HX-Trigger` header value for `messages`, or `None` when there are none.
///
/// Header values must be ASCII, so anything else is written as a JSON
/// `\uXXXX` escape.
#[must_use]
pub fn hx_trigger(messages: &[String]) -> Option<String> {
    if messages.is_empty() {
        return None;
    }
    let mut events = serde_json::Map::new();
    events.insert(TOAST_EVENT.to_string(), serde_json::json!(messages));
    let json = serde_json::Value::Object(events).to_string();

    let mut ascii = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            ascii.push(c);
        } else {
            for unit in c.encode_utf16(&mut [0; 2]) {
                ascii.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Some(ascii)
}
