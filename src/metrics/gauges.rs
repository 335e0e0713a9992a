//! Gauge metrics for values that are overwritten rather than accumulated.

use std::sync::atomic::{AtomicI64, Ordering};

/// A gauge holding the latest observed value.
#[derive(Debug)]
pub struct Gauge {
    name: &'static str,
    help: &'static str,
    value: AtomicI64,
}

impl Gauge {
    /// Create a new gauge.
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            value: AtomicI64::new(0),
        }
    }

    /// Get the gauge name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the gauge help text.
    pub fn help(&self) -> &'static str {
        self.help
    }

    /// Set the gauge to a specific value.
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    /// Get the current value.
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge() {
        let gauge = Gauge::new("sites_on_node", "Sites per node");
        assert_eq!(gauge.get(), 0);

        gauge.set(256);
        assert_eq!(gauge.get(), 256);

        gauge.set(128);
        assert_eq!(gauge.get(), 128);
    }
}
