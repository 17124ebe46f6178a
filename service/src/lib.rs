use config::Config;
use sse::StreamTiming;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub stream_timing: StreamTiming,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        Self {
            config: app_config,
            stream_timing: StreamTiming::default(),
        }
    }

    pub fn with_stream_timing(mut self, stream_timing: StreamTiming) -> Self {
        self.stream_timing = stream_timing;
        self
    }
}
