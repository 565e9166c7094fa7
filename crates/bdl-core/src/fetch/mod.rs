//! HTTP GET transport.
//!
//! Uses the curl crate (libcurl, `Easy2` + `Handler`) to issue a GET with an
//! optional open-ended byte range. The caller's handler receives header
//! lines, body chunks and progress ticks; it decides what to do with the
//! status and may stop the transfer at any point.

mod parse;

pub use parse::{parse_head, ResponseHead};

use curl::easy::{Easy2, Handler};
use std::time::Duration;

use crate::config::BdlConfig;

/// Transport settings shared by every request of a batch.
#[derive(Debug, Clone)]
pub struct HttpClient {
    user_agent: String,
    connect_timeout: Duration,
    low_speed_limit: u32,
    low_speed_time: Duration,
    buffer_size: Option<usize>,
}

impl HttpClient {
    pub fn new(user_agent: impl Into<String>) -> Self {
        let defaults = BdlConfig::default();
        Self {
            user_agent: user_agent.into(),
            connect_timeout: defaults.connect_timeout(),
            low_speed_limit: defaults.low_speed_limit,
            low_speed_time: defaults.low_speed_time(),
            buffer_size: defaults.buffer_size,
        }
    }

    pub fn from_config(cfg: &BdlConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.connect_timeout(),
            low_speed_limit: cfg.low_speed_limit,
            low_speed_time: cfg.low_speed_time(),
            buffer_size: cfg.buffer_size,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_buffer_size(mut self, size: Option<usize>) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Performs a GET on `url`, sending `Range: bytes=<start>-` when
    /// `range_start` is set. Blocks the current thread until the transfer
    /// ends; call from `spawn_blocking` when used from async code.
    ///
    /// Returns an error only if the request could not be configured.
    pub fn get<H: Handler>(
        &self,
        url: &str,
        range_start: Option<u64>,
        handler: H,
    ) -> Result<Fetched<H>, curl::Error> {
        let mut easy = Easy2::new(handler);
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        // Stall detection instead of a wall-clock limit: large files on slow
        // links must not be cut off.
        easy.low_speed_limit(self.low_speed_limit)?;
        easy.low_speed_time(self.low_speed_time)?;
        if let Some(size) = self.buffer_size {
            easy.buffer_size(size)?;
        }
        if let Some(start) = range_start {
            // curl expects "start-end"; an empty end means "to the last byte".
            easy.range(&format!("{}-", start))?;
        }
        // Enables Handler::progress, which is where cancellation is checked.
        easy.progress(true)?;

        let result = easy.perform();
        Ok(Fetched { easy, result })
    }
}

/// A GET that has run to completion or failure, with its handler.
pub struct Fetched<H: Handler> {
    easy: Easy2<H>,
    result: Result<(), curl::Error>,
}

impl<H: Handler> Fetched<H> {
    pub fn handler(&self) -> &H {
        self.easy.get_ref()
    }

    pub fn handler_mut(&mut self) -> &mut H {
        self.easy.get_mut()
    }

    /// How the transfer ended according to libcurl.
    pub fn result(&self) -> Result<(), &curl::Error> {
        self.result.as_ref().map(|_| ())
    }

    /// Takes the transfer result out, leaving `Ok(())` behind.
    pub fn take_result(&mut self) -> Result<(), curl::Error> {
        std::mem::replace(&mut self.result, Ok(()))
    }

    /// Final HTTP status reported by libcurl (0 when no response arrived).
    pub fn response_code(&mut self) -> Option<u32> {
        self.easy.response_code().ok().filter(|c| *c != 0)
    }
}
