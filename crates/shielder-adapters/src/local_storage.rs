use shielder_core::{PortError, StoragePort};
use web_sys::Storage;

/// Browser `window.localStorage`.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageAdapter;

fn local_storage() -> Result<Storage, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("window unavailable".to_owned()))?;
    window
        .local_storage()
        .map_err(|e| PortError::Transport(format!("localStorage access denied: {e:?}")))?
        .ok_or_else(|| PortError::Transport("localStorage unavailable".to_owned()))
}

impl StoragePort for LocalStorageAdapter {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| PortError::Transport(format!("localStorage read failed: {e:?}")))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| PortError::Transport(format!("localStorage write failed: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| PortError::Transport(format!("localStorage remove failed: {e:?}")))
    }
}
