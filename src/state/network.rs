use crate::state::messages::{NetworkRequest, NetworkResponse, ScheduleRequest};
use log::{debug, error, warn};
use mlb_api::client::ScheduleApi;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: ScheduleApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        api_base_url: &str,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: ScheduleApi::new(api_base_url),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let request = self.newest_queued(request);
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadSchedule(req) => self.handle_load_schedule(req).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(!matches!(result, NetworkResponse::Error { .. }))
                .await;

            if let Err(e) = self.responses.send(result).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    /// Anything queued behind `request` supersedes it; skip straight to the
    /// newest so a burst of key presses costs one fetch.
    fn newest_queued(&mut self, mut request: NetworkRequest) -> NetworkRequest {
        while let Ok(next) = self.requests.try_recv() {
            let NetworkRequest::LoadSchedule(skipped) = &request;
            debug!("skipping superseded schedule request #{}", skipped.id);
            request = next;
        }
        request
    }

    async fn handle_load_schedule(&self, request: ScheduleRequest) -> NetworkResponse {
        debug!(
            "loading schedule #{} for {} (odds: {})",
            request.id, request.range, request.include_odds
        );
        match self
            .client
            .fetch_schedule(request.range, request.include_odds)
            .await
        {
            Ok(days) => NetworkResponse::ScheduleLoaded { request, days },
            Err(err) => {
                warn!("schedule request #{} failed: {err}", request.id);
                NetworkResponse::Error { request, message: err.user_message() }
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlb_api::DateRange;

    fn request(id: u64) -> NetworkRequest {
        NetworkRequest::LoadSchedule(ScheduleRequest {
            id,
            range: DateRange::parse("2023-04-03;2023-04-09").unwrap(),
            include_odds: false,
        })
    }

    #[tokio::test]
    async fn queued_requests_collapse_to_the_newest() {
        let (req_tx, req_rx) = mpsc::channel(10);
        let (resp_tx, _resp_rx) = mpsc::channel(10);
        let mut worker = NetworkWorker::new("http://127.0.0.1:9", req_rx, resp_tx);

        req_tx.send(request(2)).await.unwrap();
        req_tx.send(request(3)).await.unwrap();

        let NetworkRequest::LoadSchedule(newest) = worker.newest_queued(request(1));
        assert_eq!(newest.id, 3);
    }

    #[tokio::test]
    async fn failed_fetch_reports_error_for_that_request() {
        let (req_tx, req_rx) = mpsc::channel(10);
        let (resp_tx, mut resp_rx) = mpsc::channel(100);
        let worker = NetworkWorker::new("http://127.0.0.1:9", req_rx, resp_tx);
        let task = tokio::spawn(worker.run());

        req_tx.send(request(7)).await.unwrap();

        let mut outcome = None;
        while let Some(response) = resp_rx.recv().await {
            match response {
                NetworkResponse::LoadingStateChanged { .. } => continue,
                other => {
                    outcome = Some(other);
                    break;
                }
            }
        }
        task.abort();

        match outcome {
            Some(NetworkResponse::Error { request, message }) => {
                assert_eq!(request.id, 7);
                assert_eq!(message, "An unexpected error occurred.");
            }
            other => panic!("expected error response, got {other:?}"),
        }
    }
}
