//! The write path: validate, encode, store, report.
//!
//! Execution is synchronous and bounded: one validation pass over fields with
//! static bounds, one encode, and exactly one `put` on success. Existing
//! state is never read, so a same-key write (only possible when two
//! transactions share an id) overwrites.

use serde::Serialize;

use dataverse_core::{compute_units, encode, state_key, Action, Fact, RejectReason, TxId};
use dataverse_store::StateMut;

use crate::error::ExecuteError;

/// What one execution reports to the host ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Compute units charged. Charged on rejection too.
    pub compute_units: u64,
    /// Why the fact was rejected, if it was.
    pub rejection: Option<RejectReason>,
}

impl Outcome {
    fn accepted(compute_units: u64) -> Self {
        Self {
            compute_units,
            rejection: None,
        }
    }

    fn rejected(reason: RejectReason, compute_units: u64) -> Self {
        Self {
            compute_units,
            rejection: Some(reason),
        }
    }

    /// Whether the fact was stored.
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }

    /// The fixed failure payload, present only on rejection.
    pub fn output(&self) -> Option<&'static [u8]> {
        self.rejection.map(RejectReason::output)
    }
}

/// Execute one fact as transaction `tx_id`.
///
/// A validation rejection is an `Ok` outcome: the transaction commits,
/// charged but inert. A store failure is an `Err` and must abort it.
pub fn execute_fact<F, S>(fact: &F, tx_id: &TxId, state: &mut S) -> Result<Outcome, ExecuteError>
where
    F: Fact,
    S: StateMut + ?Sized,
{
    let units = compute_units(F::KIND);

    if let Err(reason) = fact.validate() {
        tracing::warn!(kind = %F::KIND, %tx_id, %reason, "fact rejected");
        return Ok(Outcome::rejected(reason, units));
    }

    let key = state_key(F::KIND, tx_id);
    let value = encode(fact);
    tracing::debug!(kind = %F::KIND, %key, size = value.len(), "storing fact");
    state.put(key, value)?;

    Ok(Outcome::accepted(units))
}

/// Execute the fact carried by `action`.
pub fn execute<S>(action: &Action, tx_id: &TxId, state: &mut S) -> Result<Outcome, ExecuteError>
where
    S: StateMut + ?Sized,
{
    match action {
        Action::Register(f) => execute_fact(f, tx_id, state),
        Action::Attest(f) => execute_fact(f, tx_id, state),
        Action::Notarize(f) => execute_fact(f, tx_id, state),
    }
}
