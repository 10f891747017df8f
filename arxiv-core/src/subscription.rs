use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, FormError};
use crate::models::{PushTime, SubscriptionRequest, TopicCode};

pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(3);
pub const GENERIC_FAILURE: &str = "Subscription failed, please try again.";

/// Submits the subscription, then asks for the confirmation email. The
/// second call only happens when the backend accepted the first.
pub async fn submit_subscription(
    api: &ApiClient,
    request: &SubscriptionRequest,
) -> Result<(), ApiError> {
    let reply = api.submit_search_request(request).await?;
    if !reply.is_success() {
        let message = reply
            .detail_message()
            .unwrap_or("Subscription request was not accepted")
            .to_owned();
        warn!(status = %reply.status, %message, "subscription rejected");
        return Err(ApiError::Rejected { message });
    }
    debug!(request_id = ?reply.request_id, "subscription stored");
    api.send_subscribe_success(&request.email, request.push_time)
        .await?;
    info!(email = %request.email, push_time = %request.push_time, "subscription confirmed");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Transient; disappears once `until` has passed.
    Success { until: Instant },
    /// Stays until dismissed.
    Error(String),
}

#[derive(Debug)]
pub struct SubscriptionForm {
    pub email: String,
    pub query: String,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    topic: Option<TopicCode>,
    submitting: bool,
    notice: Option<Notice>,
    notice_duration: Duration,
}

impl Default for SubscriptionForm {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl SubscriptionForm {
    pub fn new(notice_duration: Duration) -> Self {
        let time = PushTime::default();
        Self {
            email: String::new(),
            query: String::new(),
            hour: Some(time.hour()),
            minute: Some(time.minute()),
            topic: None,
            submitting: false,
            notice: None,
            notice_duration,
        }
    }

    pub fn topic(&self) -> Option<TopicCode> {
        self.topic
    }

    /// Single-select: a new topic replaces the current one.
    pub fn select_topic(&mut self, topic: TopicCode) {
        self.topic = Some(topic);
    }

    pub fn toggle_topic(&mut self, topic: TopicCode) {
        if self.topic == Some(topic) {
            self.topic = None;
        } else {
            self.topic = Some(topic);
        }
    }

    pub fn clear_topic(&mut self) {
        self.topic = None;
    }

    pub fn push_time(&self) -> Option<PushTime> {
        PushTime::new(self.hour?, self.minute?)
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.topic.is_none() {
            missing.push("topic");
        }
        if self.query.trim().is_empty() {
            missing.push("query");
        }
        if self.hour.is_none() {
            missing.push("hour");
        }
        if self.minute.is_none() {
            missing.push("minute");
        }
        if self.hour.is_some() && self.minute.is_some() && self.push_time().is_none() {
            missing.push("push time");
        }
        missing
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.missing_fields().is_empty()
    }

    pub fn build_request(&self) -> Result<SubscriptionRequest, FormError> {
        let missing = self.missing_fields();
        match (self.topic, self.push_time()) {
            (Some(topic), Some(push_time)) if missing.is_empty() => Ok(SubscriptionRequest {
                email: self.email.trim().to_owned(),
                topics: vec![topic],
                query_content: self.query.trim().to_owned(),
                push_time,
            }),
            _ => Err(FormError::Incomplete(missing)),
        }
    }

    /// Validates the form and marks it as submitting. The returned request is
    /// what the caller sends.
    pub fn begin_submit(&mut self) -> Result<SubscriptionRequest, FormError> {
        if self.submitting {
            return Err(FormError::Busy);
        }
        let request = self.build_request()?;
        self.submitting = true;
        self.notice = None;
        Ok(request)
    }

    pub fn finish_submit(&mut self, result: Result<(), ApiError>, now: Instant) {
        self.submitting = false;
        self.notice = Some(match result {
            Ok(()) => Notice::Success {
                until: now + self.notice_duration,
            },
            Err(err) => {
                let message = err.to_string();
                Notice::Error(if message.trim().is_empty() {
                    GENERIC_FAILURE.to_owned()
                } else {
                    message
                })
            }
        });
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Expires a success notice whose time is up. Returns how long the
    /// current success notice has left, if any.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        match self.notice {
            Some(Notice::Success { until }) if now >= until => {
                self.notice = None;
                None
            }
            Some(Notice::Success { until }) => Some(until - now),
            _ => None,
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
