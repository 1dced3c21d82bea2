//! # Slot Accounting Transaction Layer
//!
//! Committee slot requirements and the committee-level `total_slots`
//! aggregate derived from them.
//!
//! Every write goes through a `SlotMutation` applied inside a single store
//! transaction, so a slot row never changes without its aggregate (and the
//! other way round).
//!
//! | Operation | Slot row | Aggregate |
//! |-----------|----------|-----------|
//! | create    | insert   | `+ n`     |
//! | update    | rewrite  | `+ (n - previous)` |
//! | delete    | remove   | unchanged (default policy) |

pub mod accounting;
pub mod errors;
pub mod mutation;
pub mod types;
pub mod verify;

pub use accounting::SlotAccounting;
pub use errors::{SlotError, SlotResult};
pub use mutation::{MutationEffect, SlotMutation};
pub use types::{
    AggregateMode, CommitteeId, CommitteeSlot, CreateOutcome, DeleteOutcome, SlotKey, SlotPolicy,
    UpdateOutcome,
};
pub use verify::{verify_totals, AggregateDrift, ConsistencyReport};
