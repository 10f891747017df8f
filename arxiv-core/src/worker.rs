use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::feed::{FetchTicket, TranslateTicket};
use crate::models::{Paper, SubscriptionRequest};
use crate::subscription::submit_subscription;

/// Results handed back to the UI thread.
#[derive(Debug)]
pub enum Event {
    PapersLoaded {
        ticket: FetchTicket,
        result: Result<Vec<Paper>, ApiError>,
    },
    PaperTranslated {
        entry_id: String,
        result: Result<Paper, ApiError>,
    },
    SubscriptionFinished {
        result: Result<(), ApiError>,
    },
}

/// Runs API requests on the tokio runtime and reports each outcome as an
/// [`Event`]. Requests are independent and are never cancelled.
#[derive(Debug, Clone)]
pub struct Worker {
    api: ApiClient,
    runtime: Handle,
    events: mpsc::UnboundedSender<Event>,
}

impl Worker {
    pub fn new(api: ApiClient, runtime: Handle) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                runtime,
                events,
            },
            rx,
        )
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn fetch_papers(&self, ticket: FetchTicket) {
        let api = self.api.clone();
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = api.list_papers(ticket.category.code()).await;
            deliver(&events, Event::PapersLoaded { ticket, result });
        });
    }

    pub fn translate(&self, ticket: TranslateTicket) {
        let api = self.api.clone();
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = api.translate_paper(&ticket.entry_id).await;
            deliver(
                &events,
                Event::PaperTranslated {
                    entry_id: ticket.entry_id,
                    result,
                },
            );
        });
    }

    pub fn subscribe(&self, request: SubscriptionRequest) {
        let api = self.api.clone();
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = submit_subscription(&api, &request).await;
            deliver(&events, Event::SubscriptionFinished { result });
        });
    }
}

fn deliver(events: &mpsc::UnboundedSender<Event>, event: Event) {
    if events.send(event).is_err() {
        debug!("event receiver dropped; discarding result");
    }
}
