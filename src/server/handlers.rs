/// Request handlers for the query endpoint
use axum::extract::State;
use axum::Json;

use crate::models::SnapshotJson;
use crate::store::SnapshotStore;

/// `GET /data`: the latest published snapshot
///
/// Never waits for a cycle in progress; always answers 200, with sentinel
/// values for anything the last cycle could not obtain.
pub async fn data_handler(State(store): State<SnapshotStore>) -> Json<SnapshotJson> {
    Json(SnapshotJson::from(store.current().as_ref()))
}
