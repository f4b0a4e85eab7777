use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::error::FormError;
use crate::form::{Acknowledge, QuestionForm};
use crate::loader::{self, RecordTable};
use crate::model::ConnectionStatus;
use crate::probe::{self, ConnectionModal};
use crate::signal::{ErrorSignal, FocusTarget};
use crate::store::RemoteStore;

/// Collection names the startup reads target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    pub collection: String,
    pub order_field: String,
    pub probe_column: String,
}

impl StoreTarget {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            collection: cfg.store.collection.clone(),
            order_field: cfg.store.order_field.clone(),
            probe_column: cfg.store.probe_column.clone(),
        }
    }
}

impl Default for StoreTarget {
    fn default() -> Self {
        Self {
            collection: "output_table".into(),
            order_field: "created_at".into(),
            probe_column: "id".into(),
        }
    }
}

pub struct App {
    store: Arc<dyn RemoteStore>,
    target: StoreTarget,
    pub signal: Arc<ErrorSignal>,
    pub modal: Arc<ConnectionModal>,
    pub records: Arc<RecordTable>,
    pub form: QuestionForm,
}

/// The two startup reads, running independently.
pub struct Startup {
    probe: JoinHandle<ConnectionStatus>,
    load: JoinHandle<Result<usize, FormError>>,
}

impl Startup {
    /// Wait for both reads. Each keeps its own outcome; neither aborts the other.
    pub async fn join(self) -> Result<(ConnectionStatus, Result<usize, FormError>)> {
        let (status, loaded) = tokio::join!(self.probe, self.load);
        let status = status.context("connectivity probe task failed")?;
        let loaded = loaded.context("record load task failed")?;
        Ok((status, loaded))
    }

    /// Hand out the two task handles so a caller can react to each
    /// completion on its own.
    pub fn into_handles(
        self,
    ) -> (
        JoinHandle<ConnectionStatus>,
        JoinHandle<Result<usize, FormError>>,
    ) {
        (self.probe, self.load)
    }

    pub fn abort(&self) {
        self.probe.abort();
        self.load.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.probe.is_finished() && self.load.is_finished()
    }
}

impl App {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        target: StoreTarget,
        focus: Arc<dyn FocusTarget>,
        sink: Arc<dyn Acknowledge>,
    ) -> Self {
        let signal = Arc::new(ErrorSignal::new(focus));
        let form = QuestionForm::new(signal.clone(), sink);
        Self {
            store,
            target,
            signal,
            modal: Arc::new(ConnectionModal::default()),
            records: Arc::new(RecordTable::default()),
            form,
        }
    }

    /// Start the connectivity probe and the record load. Must be called
    /// within a tokio runtime.
    pub fn mount(&self) -> Startup {
        info!(collection = %self.target.collection, "mounting form client");

        let store = self.store.clone();
        let target = self.target.clone();
        let modal = self.modal.clone();
        let probe = tokio::spawn(async move {
            probe::probe(
                store.as_ref(),
                &target.collection,
                &target.probe_column,
                &modal,
            )
            .await
        });

        let store = self.store.clone();
        let target = self.target.clone();
        let records = self.records.clone();
        let signal = self.signal.clone();
        let load = tokio::spawn(async move {
            loader::load_all(
                store.as_ref(),
                &target.collection,
                &target.order_field,
                &records,
                &signal,
            )
            .await
        });

        Startup { probe, load }
    }

    /// Re-run the record load in place. Same single-attempt semantics as startup.
    pub async fn reload(&self) -> Result<usize, FormError> {
        loader::load_all(
            self.store.as_ref(),
            &self.target.collection,
            &self.target.order_field,
            &self.records,
            &self.signal,
        )
        .await
    }
}
