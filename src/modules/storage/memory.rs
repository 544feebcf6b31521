use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::MediaStorage;
use crate::core::error::AppError;

/// Test double keeping stored objects in a map
#[derive(Default)]
pub struct InMemoryMediaStorage {
    objects: Mutex<HashMap<String, (String, usize)>>,
    fail_stores: AtomicBool,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store` call fail
    pub fn fail_stores(&self) {
        self.fail_stores.store(true, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.objects.lock().unwrap().contains_key(reference)
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        if self.fail_stores.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("refusing to store '{}'", key)));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), data.len()));
        Ok(key.to_string())
    }

    async fn delete(&self, reference: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().remove(reference);
        Ok(())
    }
}
