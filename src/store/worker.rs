use crate::models::{StoreRequest, StoreResponse};
use crate::store::{execute, HealthStore, StoreError};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::io;
use std::thread;
use std::time::Duration;

/// UI-side end of the store worker channels.
pub struct StoreHandle {
    tx: Sender<StoreRequest>,
    rx: Receiver<StoreResponse>,
}

impl StoreHandle {
    pub fn send(&self, request: StoreRequest) -> Result<(), StoreError> {
        tracing::debug!(?request, "dispatching store request");
        self.tx.send(request).map_err(|_| StoreError::Disconnected)
    }

    /// Drains every response that has completed so far without blocking.
    pub fn poll(&self) -> Vec<StoreResponse> {
        let mut responses = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("store worker disconnected");
                    break;
                }
            }
        }
        responses
    }

    /// Waits up to `timeout` for the next response.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<StoreResponse> {
        self.rx.recv_timeout(timeout).ok()
    }
}

pub fn spawn_store_worker(
    mut store: Box<dyn HealthStore>,
) -> io::Result<(StoreHandle, thread::JoinHandle<()>)> {
    let (request_tx, request_rx) = unbounded::<StoreRequest>();
    let (response_tx, response_rx) = unbounded::<StoreResponse>();

    let handle = thread::Builder::new()
        .name("health-tracker::store_worker".to_string())
        .spawn(move || {
            for request in request_rx.iter() {
                let response = execute(store.as_mut(), request);
                if let Some(error) = response_error(&response) {
                    tracing::warn!(%error, "store request failed");
                }
                if response_tx.send(response).is_err() {
                    break;
                }
            }
            tracing::info!("store worker channel closed, exiting");
        })?;

    Ok((
        StoreHandle {
            tx: request_tx,
            rx: response_rx,
        },
        handle,
    ))
}

fn response_error(response: &StoreResponse) -> Option<&StoreError> {
    match response {
        StoreResponse::MindfulnessAdded { result, .. }
        | StoreResponse::ReferralSaved { result, .. }
        | StoreResponse::ProfileSaved(result) => result.as_ref().err(),
        StoreResponse::DailyMetricsLoaded(result) => result.as_ref().err(),
        StoreResponse::ReferralLoaded(result) => result.as_ref().err(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_worker_answers_requests_in_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (handle, _join) = spawn_store_worker(Box::new(store)).unwrap();

        handle
            .send(StoreRequest::LoadReferral {
                user_id: "u1".to_string(),
            })
            .unwrap();

        match handle.recv_timeout(Duration::from_secs(5)) {
            Some(StoreResponse::ReferralLoaded(Ok(None))) => {}
            other => panic!("unexpected response: {:?}", other),
        }
        assert!(handle.poll().is_empty());
    }

    #[test]
    fn test_worker_exits_when_handle_dropped() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (handle, join) = spawn_store_worker(Box::new(store)).unwrap();
        drop(handle);
        join.join().unwrap();
    }
}
