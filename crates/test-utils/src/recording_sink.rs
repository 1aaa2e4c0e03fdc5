use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskexec::driver::StatusSink;
use taskexec::errors::Result;
use taskexec::task::StatusUpdate;

/// A status sink that records every update in memory instead of writing to
/// a driver connection.
pub struct RecordingSink {
    updates: Arc<Mutex<Vec<StatusUpdate>>>,
}

impl RecordingSink {
    pub fn new(updates: Arc<Mutex<Vec<StatusUpdate>>>) -> Self {
        Self { updates }
    }
}

impl StatusSink for RecordingSink {
    fn send_update(
        &mut self,
        update: StatusUpdate,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let updates = Arc::clone(&self.updates);
        Box::pin(async move {
            updates.lock().unwrap().push(update);
            Ok(())
        })
    }
}
