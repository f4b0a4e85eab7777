use std::sync::Mutex;
use tracing::{error, info, instrument};

use crate::error::FormError;
use crate::model::ConnectionStatus;
use crate::store::{RemoteStore, SelectQuery};

/// Modal state for the startup connectivity notice.
#[derive(Debug, Default)]
pub struct ConnectionModal {
    status: Mutex<ConnectionStatus>,
}

impl ConnectionModal {
    pub fn show(&self, status: ConnectionStatus) {
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = status;
    }

    /// User acknowledgment. Hides the modal without probing again.
    pub fn dismiss(&self) {
        self.show(ConnectionStatus::Unknown);
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.status().notice()
    }
}

/// Minimal read: at most one row of a single column.
pub async fn check_connection(
    store: &dyn RemoteStore,
    collection: &str,
    column: &str,
) -> Result<(), FormError> {
    let query = SelectQuery::new(collection).columns(column).limit(1);
    store
        .select(&query)
        .await
        .map(|_| ())
        .map_err(|err| FormError::Connectivity(err.to_string()))
}

#[instrument(skip_all, fields(collection = %collection))]
pub async fn probe(
    store: &dyn RemoteStore,
    collection: &str,
    column: &str,
    modal: &ConnectionModal,
) -> ConnectionStatus {
    let status = match check_connection(store, collection, column).await {
        Ok(()) => {
            info!("store reachable");
            ConnectionStatus::Reachable
        }
        Err(err) => {
            error!(%err, kind = err.kind(), "store connection check failed");
            ConnectionStatus::Unreachable
        }
    };
    modal.show(status);
    status
}
