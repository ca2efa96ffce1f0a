//! Pure derivation rules for the adjustment ledger.
//!
//! The adjustment log is the only writable, ledger-affecting record in the
//! system. Everything else here is a re-derivable function of it: the
//! on-hand quantity for an (item, location) pair is the signed sum of its
//! adjustments, a purchase-order line's outstanding quantity is ordered
//! minus received clamped non-negative, and a purchase order's fulfillment
//! state falls out of its lines' ordered/received totals.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::AdjustmentReason;

/// Fold the signed adjustment deltas for one (item, location) pair into the
/// current on-hand quantity. Addition is commutative and associative, so the
/// result is independent of interleaving across writers.
pub fn fold<I>(changes: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    changes.into_iter().sum()
}

/// Normalize an operator-entered quantity according to the reason's sign
/// policy. This is the single place sign policy lives; both the generic
/// adjustment path and PO receiving go through it.
///
/// - `usage` / `wastage`: consumption, always stored negative
/// - `correction`: trusted as entered, either sign
/// - `receive`: intake, always stored non-negative
pub fn normalized_change(reason: AdjustmentReason, qty: i64) -> i64 {
    match reason {
        AdjustmentReason::Usage | AdjustmentReason::Wastage => -qty.saturating_abs(),
        AdjustmentReason::Correction => qty,
        AdjustmentReason::Receive => qty.saturating_abs(),
    }
}

/// Clamp an operator-entered receive quantity to the closed interval
/// `[0, pending]`. Out-of-range values are clamped, not rejected.
pub fn clamp_receive_qty(pending: i64, value: i64) -> i64 {
    value.clamp(0, pending.max(0))
}

/// Outstanding quantity on a purchase-order line, clamped to
/// `[0, qty_ordered]` for operator input purposes.
pub fn pending_qty(qty_ordered: i64, qty_received: i64) -> i64 {
    (qty_ordered - qty_received).clamp(0, qty_ordered.max(0))
}

/// Fulfillment state computed from a purchase order's lines, as opposed to
/// its stored draft/open/closed status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentState {
    Unfulfilled,
    PartiallyReceived,
    Fulfilled,
}

/// Derive the fulfillment state from (ordered, received) pairs, one per
/// line. An order with no lines is trivially unfulfilled.
pub fn fulfillment_state<I>(lines: I) -> FulfillmentState
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut any_line = false;
    let mut any_received = false;
    let mut all_fulfilled = true;

    for (ordered, received) in lines {
        any_line = true;
        if received > 0 {
            any_received = true;
        }
        if received < ordered {
            all_fulfilled = false;
        }
    }

    if any_line && all_fulfilled {
        FulfillmentState::Fulfilled
    } else if any_received {
        FulfillmentState::PartiallyReceived
    } else {
        FulfillmentState::Unfulfilled
    }
}
