//! Routing configuration data model

pub mod config;
pub mod matcher;
pub mod mute_timing;
pub mod provenance;
pub mod receiver;
pub mod route;

pub use config::RoutingConfig;
pub use matcher::{MatchType, Matcher};
pub use mute_timing::{
    MUTE_TIMING_RESOURCE_TYPE, MuteTimeInterval, MuteTiming, TimeInterval, TimeRange,
};
pub use provenance::{Provenance, Provisionable, ResourceRef};
pub use receiver::{ManagedReceiver, Receiver};
pub use route::{Route, RouteIter};
