use std::{cell::RefCell, rc::Rc};
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber writing to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shared log of the values seen by a listener.
#[derive(Clone)]
pub struct Recorder<T>(Rc<RefCell<Vec<T>>>);

#[allow(dead_code)]
impl<T: Clone + 'static> Recorder<T> {
    pub fn new() -> Recorder<T> {
        Recorder(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn sink(&self) -> impl Fn(T) + 'static {
        let log = self.0.clone();
        move |value| log.borrow_mut().push(value)
    }

    pub fn values(&self) -> Vec<T> {
        self.0.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }
}
