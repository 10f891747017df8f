pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod subscription;
pub mod transition;
pub mod worker;

pub use api::ApiClient;
pub use config::{ApiConfig, AppConfig, ThemeConfig, UiConfig};
pub use error::{ApiError, ConfigError, FormError, ParseValueError};
pub use feed::{FeedState, FetchTicket, TranslateTicket};
pub use models::{
    lookup_key, parse_timestamp, Paper, PushTime, SearchRequestReply, SubscriptionRequest, TopicCode,
};
pub use subscription::{submit_subscription, Notice, SubscriptionForm};
pub use transition::{scroll_progress, LandingScroll, PanelStyle, Transition};
pub use worker::{Event, Worker};
