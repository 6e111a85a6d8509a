//! # Domain Models
//!
//! Validated request types for the Polygon lookups.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Case-sensitive stock ticker |
//! | [`TradeDate`] | `YYYY-MM-DD` calendar date |
//! | [`RangeBound`] | Aggregate window bound (date or epoch millis) |
//! | [`Timespan`] | Aggregate bar size |
//! | [`SortOrder`] | Aggregate bar ordering |
//! | [`SnapshotFlags`] | Optional snapshot sections |
//! | [`AggregateRange`] | Complete aggregate-bars window |
//! | [`AggregationRequest`] | Everything one invocation asks for |
//!
//! Construction validates every invariant, so a built [`AggregationRequest`]
//! can be handed to the gateway without further checks.

mod request;
mod ticker;
mod timespan;
mod trade_date;

pub use request::{AggregateRange, AggregationRequest, SnapshotFlags};
pub use ticker::Ticker;
pub use timespan::{SortOrder, Timespan};
pub use trade_date::{RangeBound, TradeDate};
