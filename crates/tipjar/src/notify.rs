/// Where user-facing alerts go.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

impl<F: Fn(&str) + Send + Sync> Notifier for F {
    fn alert(&self, message: &str) {
        self(message)
    }
}
