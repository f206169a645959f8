use std::sync::{Arc, Mutex};
use std::time::Duration;
use webcrawlerapi::{PollEvent, PollOptions, WebcrawlerClient};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const AUTH_HEADER: &str = "Bearer test-key";

/// Client pointed at the mock server, polling every 10ms at most 5 times
pub fn test_client(server: &MockServer) -> WebcrawlerClient {
    WebcrawlerClient::with_client(API_KEY, server.uri(), reqwest::Client::new())
        .with_poll_options(fast_polling(5))
}

pub fn fast_polling(max_attempts: u32) -> PollOptions {
    PollOptions::new(Duration::from_millis(10), max_attempts)
}

/// Poll options that record every poll event
pub fn recording_polling(max_attempts: u32) -> (PollOptions, Arc<Mutex<Vec<PollEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = fast_polling(max_attempts)
        .with_observer(move |event| sink.lock().unwrap().push(event.clone()));
    (options, events)
}
