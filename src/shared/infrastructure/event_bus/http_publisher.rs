// Publisher that POSTs events to a broker's REST produce endpoint.
//
// The internal retry count here is small, bounded, and invisible to the relay:
// when it is exhausted the adapter reports one PublishError and the relay's
// own backoff takes over.

use async_trait::async_trait;
use serde::Serialize;

use crate::shared::infrastructure::event_bus::{EventPublisher, PublishError};

const DEFAULT_MAX_TRIES: u32 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProducerMessage<'a> {
    payload: &'a str,
    key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProducerBody<'a> {
    producer_name: &'a str,
    messages: Vec<ProducerMessage<'a>>,
}

pub struct HttpEventPublisher {
    client: reqwest::Client,
    base_url: String,
    producer_name: String,
    max_tries: u32,
}

impl HttpEventPublisher {
    pub fn new(base_url: impl Into<String>, producer_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            producer_name: producer_name.into(),
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries.max(1);
        self
    }

    async fn send_once(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        let body = ProducerBody {
            producer_name: &self.producer_name,
            messages: vec![ProducerMessage { payload, key }],
        };
        let response = self
            .client
            .post(format!("{}/topics/{}", self.base_url, topic))
            .json(&body)
            .send()
            .await
            .map_err(|err| PublishError::Unreachable(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PublishError::Rejected {
                topic: topic.to_string(),
                message: format!("http status {}", response.status()),
            })
        }
    }
}

#[async_trait]
impl EventPublisher for HttpEventPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        let mut last_error = None;
        for try_no in 1..=self.max_tries {
            match self.send_once(topic, key, payload).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    tracing::debug!(topic, key, try_no, error = %err, "publish try failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| PublishError::Unreachable("no tries made".into())))
    }
}
