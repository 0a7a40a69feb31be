//! Dispatcher port interface

use async_trait::async_trait;

use crate::domain::dispatch::{DispatchError, DispatchRequest};

/// Port for delivering finalized text to the remote endpoint
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send one request. A single attempt, no retry.
    ///
    /// # Arguments
    /// * `request` - The text and PIN snapshot to deliver
    ///
    /// # Returns
    /// Ok(()) when the endpoint answered with a success status
    async fn send(&self, request: &DispatchRequest) -> Result<(), DispatchError>;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for std::sync::Arc<D> {
    async fn send(&self, request: &DispatchRequest) -> Result<(), DispatchError> {
        self.as_ref().send(request).await
    }
}
