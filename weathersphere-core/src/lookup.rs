//! The weather lookup component: three state cells and the operations that
//! write them.

use crate::{
    error::LookupError,
    model::{LookupRequest, WeatherReading},
    provider::WeatherProvider,
};

/// Everything the view needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupState {
    /// Current user input, kept verbatim.
    pub query: String,
    /// Most recent successful reading.
    pub reading: Option<WeatherReading>,
    /// Message from the most recent failed request, cleared on success.
    pub failure: Option<String>,
    /// Whether a request has been issued and not yet finished.
    pub in_flight: bool,
}

/// What a submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank query; nothing was sent.
    Ignored,
    /// Another request is still outstanding; nothing was sent.
    Busy,
    Loaded,
    Failed,
}

#[derive(Debug)]
pub struct WeatherLookup<P> {
    provider: P,
    state: LookupState,
}

impl<P: WeatherProvider> WeatherLookup<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: LookupState::default(),
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn update_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
    }

    /// Look up the current query and apply the result.
    pub async fn submit_query(&mut self) -> SubmitOutcome {
        if self.state.in_flight {
            return SubmitOutcome::Busy;
        }
        // `in_flight` is only owned by `begin_submit` / `finish_submit` callers.
        let Some(request) = self.pending_request() else {
            return SubmitOutcome::Ignored;
        };

        let result = self.provider.current_weather(&request).await;
        self.apply_result(result)
    }

    /// Set the query to `city` and submit it, so the first render is not empty.
    pub async fn load_default(&mut self, city: &str) -> SubmitOutcome {
        self.update_query(city);
        self.submit_query().await
    }

    /// Mark a request as outstanding and return it, unless the query is
    /// blank or another request is already outstanding.
    ///
    /// Callers driving the request themselves must hand its result to
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Option<LookupRequest> {
        if self.state.in_flight {
            log::debug!("submission ignored, request already in flight");
            return None;
        }

        let request = self.pending_request()?;
        self.state.in_flight = true;
        Some(request)
    }

    /// Apply the result of the outstanding request.
    pub fn finish_submit(
        &mut self,
        result: Result<WeatherReading, LookupError>,
    ) -> SubmitOutcome {
        self.state.in_flight = false;
        self.apply_result(result)
    }

    fn pending_request(&self) -> Option<LookupRequest> {
        let city = self.state.query.trim();
        if city.is_empty() {
            log::debug!("{}, nothing to submit", LookupError::EmptyQuery);
            return None;
        }

        Some(LookupRequest {
            city: city.to_string(),
        })
    }

    fn apply_result(&mut self, result: Result<WeatherReading, LookupError>) -> SubmitOutcome {
        match result {
            Ok(reading) => {
                log::debug!(
                    "loaded weather for {}, {}",
                    reading.location_name,
                    reading.country
                );
                self.state.reading = Some(reading);
                self.state.failure = None;
                SubmitOutcome::Loaded
            }
            Err(err) => {
                log::debug!("lookup failed: {err}");
                self.state.failure = Some(err.user_message().to_string());
                SubmitOutcome::Failed
            }
        }
    }
}
