#![forbid(unsafe_code)]
#![deny(unused_must_use, missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! Shared fakes and fixtures for portal tests.

pub mod features;
pub mod fixtures;
pub mod page;
pub mod scheduler;

pub use features::{CountingFeature, FailingFeature, FeatureProbe};
pub use fixtures::{admin_identity, at, identity, identity_expiring_at};
pub use page::RecordingPage;
pub use scheduler::{FakeScheduler, FakeTimer, TimerProbe};
