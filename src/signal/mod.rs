//! Signal collection — weighted observations about the current visitor.

mod collector;
mod environment;
mod types;

pub use collector::{classify_referrer, SignalCollector};
pub use environment::{PageEnvironment, StaticEnvironment};
pub use types::{
    ReferrerCategory, Signal, SignalSource, WEIGHT_PAGE_CONTEXT, WEIGHT_PERSONA_OVERRIDE,
    WEIGHT_REFERRER_KNOWN, WEIGHT_REFERRER_OTHER, WEIGHT_SESSION, WEIGHT_URL_PARAM,
};
