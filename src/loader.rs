use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Mutex;
use tracing::{error, info, instrument};

use crate::error::FormError;
use crate::model::OutputRecord;
use crate::signal::ErrorSignal;
use crate::store::{RemoteStore, SelectQuery};

pub const LOAD_FAILURE_MESSAGE: &str = "failed to load output records";

/// Records currently on display, newest first.
#[derive(Debug, Default)]
pub struct RecordTable {
    rows: Mutex<Vec<OutputRecord>>,
}

impl RecordTable {
    pub fn snapshot(&self) -> Vec<OutputRecord> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn replace(&self, rows: Vec<OutputRecord>) {
        *self.rows.lock().unwrap_or_else(|p| p.into_inner()) = rows;
    }
}

/// Stable sort, newest first; equal timestamps keep the store's order.
pub fn sort_newest_first(records: &mut [OutputRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub fn decode_rows(rows: Vec<Value>) -> Result<Vec<OutputRecord>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            serde_json::from_value::<OutputRecord>(row)
                .with_context(|| format!("row {} has an unexpected shape", idx))
        })
        .collect()
}

async fn fetch(
    store: &dyn RemoteStore,
    collection: &str,
    order_field: &str,
) -> Result<Vec<OutputRecord>> {
    let query = SelectQuery::new(collection)
        .columns("*")
        .order_by(order_field, true);
    let rows = store
        .select(&query)
        .await
        .context("ordered read of output records failed")?;
    let mut records = decode_rows(rows)?;
    sort_newest_first(&mut records);
    Ok(records)
}

/// Replace the displayed table with the full ordered collection. On failure
/// the table is left as it was and the banner shows the load-failure message.
#[instrument(skip_all, fields(collection = %collection))]
pub async fn load_all(
    store: &dyn RemoteStore,
    collection: &str,
    order_field: &str,
    table: &RecordTable,
    signal: &ErrorSignal,
) -> Result<usize, FormError> {
    match fetch(store, collection, order_field).await {
        Ok(records) => {
            let count = records.len();
            table.replace(records);
            info!(count, "output records loaded");
            Ok(count)
        }
        Err(cause) => {
            error!(err = ?cause, "failed to load output records");
            signal.set(LOAD_FAILURE_MESSAGE);
            Err(FormError::Load {
                message: LOAD_FAILURE_MESSAGE,
                cause,
            })
        }
    }
}
