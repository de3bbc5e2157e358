use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shielder_core::{PortError, StoragePort};

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageAdapter {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorageAdapter {
    pub fn len(&self) -> Result<usize, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("memory storage lock poisoned: {e}")))?;
        Ok(g.len())
    }

    pub fn is_empty(&self) -> Result<bool, PortError> {
        Ok(self.len()? == 0)
    }
}

impl StoragePort for MemoryStorageAdapter {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("memory storage lock poisoned: {e}")))?;
        Ok(g.get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("memory storage lock poisoned: {e}")))?;
        g.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("memory storage lock poisoned: {e}")))?;
        g.remove(key);
        Ok(())
    }
}
