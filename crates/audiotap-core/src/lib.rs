pub mod config;
pub mod logging;

pub mod classifier;
pub mod har;
pub mod intercept;
pub mod notify;
pub mod prefs;
pub mod request;
pub mod service;
pub mod state;
pub mod url_model;

pub use classifier::{Classification, Classifier};
pub use request::{AudioStreamEvent, Decision, RequestRecord, ResourceType};
pub use service::AudioStreamService;
