//! The trust-line transition.
//!
//! [`apply_trust_set`] decides whether the line named by a TrustSet is
//! created, modified, or deleted, and returns the resulting writes as one
//! [`WriteSet`]. It never writes to the view it is given: every change is
//! made on owned copies inside a [`Sandbox`], and the sandbox is only turned
//! into a write-set when the result is `tesSUCCESS`.

use tl_store::{
    describe_owner, dir_add, dir_remove, AccountRoot, ReadView, Sandbox, Side, TrustLine,
    TrustLineFlags, WriteSet,
};
use tl_types::{AccountId, IssuedAmount, LedgerIndex, Quality, ResultCode};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::preflight::{run_checks, Verdict, STANDARD_CHECKS};
use crate::sides::{LineSides, SideState};
use crate::transaction::{ApplyFlags, TrustSet};

// ---------------------------------------------------------------------------
// TransitionOutcome
// ---------------------------------------------------------------------------

/// Result of one trust-line transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub result: ResultCode,
    /// Writes to commit. Always empty unless `result` is `tesSUCCESS`.
    pub changes: WriteSet,
}

impl TransitionOutcome {
    fn rejected(result: ResultCode) -> Self {
        Self {
            result,
            changes: WriteSet::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Apply `tx` against `view`.
///
/// Malformed transactions are rejected before the ledger is read. Any store
/// or directory error raised while applying ends the transition with the
/// matching failure code and no writes.
pub fn apply_trust_set(view: &dyn ReadView, tx: &TrustSet, flags: ApplyFlags) -> TransitionOutcome {
    if let Verdict::Reject(code) = run_checks(STANDARD_CHECKS, tx) {
        return TransitionOutcome::rejected(code);
    }

    let mut sandbox = Sandbox::new(view);
    match transact(&mut sandbox, tx, flags) {
        Ok(ResultCode::Success) => TransitionOutcome {
            result: ResultCode::Success,
            changes: sandbox.into_write_set(),
        },
        Ok(code) => {
            debug!(account = %tx.account, result = %code, "trust set rejected");
            TransitionOutcome::rejected(code)
        }
        Err(err) => {
            warn!(account = %tx.account, error = %err, "trust set aborted");
            TransitionOutcome::rejected(err.result_code())
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Transaction fields after normalization.
struct Request {
    /// The requester's new limit, issued by the requester.
    limit: IssuedAmount,
    /// `None` leaves the stored value alone; `Some(DEFAULT)` clears it.
    quality_in: Option<Quality>,
    quality_out: Option<Quality>,
}

impl Request {
    fn new(tx: &TrustSet) -> Self {
        Self {
            limit: tx.limit_amount.with_issuer(tx.account),
            quality_in: tx.quality_in.map(Quality::normalize),
            quality_out: tx.quality_out.map(Quality::normalize),
        }
    }

    /// Asks for nothing a missing line does not already have.
    fn is_redundant(&self) -> bool {
        let default = |q: Option<Quality>| q.map_or(true, |q| q.is_default());
        self.limit.is_zero() && default(self.quality_in) && default(self.quality_out)
    }
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

/// Owned copies of both account roots.
struct Parties {
    sides: LineSides,
    requester: AccountRoot,
    counterparty: AccountRoot,
    dirty: [bool; 2],
}

impl Parties {
    fn root_mut(&mut self, side: Side) -> &mut AccountRoot {
        if side == self.sides.requester {
            &mut self.requester
        } else {
            &mut self.counterparty
        }
    }

    /// Add `delta` to `side`'s owner count, clamping at the `u32` range.
    fn adjust_owner_count(&mut self, side: Side, delta: i32) {
        let slot = usize::from(side != self.sides.requester);
        let root = self.root_mut(side);
        root.owner_count = match root.owner_count.checked_add_signed(delta) {
            Some(count) => count,
            None => {
                warn!(
                    account = %root.account,
                    owner_count = root.owner_count,
                    delta,
                    "owner count out of range, clamping"
                );
                if delta < 0 {
                    0
                } else {
                    u32::MAX
                }
            }
        };
        debug!(account = %root.account, owner_count = root.owner_count, "owner count adjusted");
        self.dirty[slot] = true;
    }

    /// Write back whichever roots changed.
    fn persist(self, view: &mut Sandbox<'_>) -> Result<(), EngineError> {
        if self.dirty[0] {
            view.modify(self.requester.into())?;
        }
        if self.dirty[1] {
            view.modify(self.counterparty.into())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

fn transact(view: &mut Sandbox<'_>, tx: &TrustSet, flags: ApplyFlags) -> Result<ResultCode, EngineError> {
    let destination = tx.destination();

    let Some(requester) = view.read_account_root(&LedgerIndex::account_root(&tx.account))? else {
        return Ok(ResultCode::NoAccount);
    };
    let Some(counterparty) = view.read_account_root(&LedgerIndex::account_root(&destination))? else {
        return Ok(ResultCode::NoDestination);
    };

    // Measured against the owner count before this transition touches it.
    let reserve_create = view
        .config()
        .fees
        .reserve(requester.owner_count.saturating_add(1));
    let can_afford = !flags.open_ledger || requester.balance >= reserve_create;
    debug!(
        account = %tx.account,
        balance = %requester.balance,
        reserve = %reserve_create,
        can_afford,
        "reserve evaluated"
    );

    let request = Request::new(tx);
    let parties = Parties {
        sides: LineSides::new(tx.account, destination),
        requester,
        counterparty,
        dirty: [false; 2],
    };

    let line_index = LedgerIndex::trust_line(&tx.account, &destination, &tx.currency());
    match view.read_trust_line(&line_index)? {
        Some(line) => modify_line(view, line, &request, parties, can_afford),
        None if request.is_redundant() => Ok(ResultCode::NoLineRedundant),
        None if !can_afford => Ok(ResultCode::NoLineInsufficientReserve),
        None => create_line(view, line_index, &request, parties),
    }
}

fn modify_line(
    view: &mut Sandbox<'_>,
    mut line: TrustLine,
    request: &Request,
    mut parties: Parties,
    can_afford: bool,
) -> Result<ResultCode, EngineError> {
    let requester = parties.sides.requester;
    let index = line.index();

    line.set_limit(requester, request.limit);
    if let Some(quality) = request.quality_in {
        line.set_quality_in(requester, (!quality.is_default()).then_some(quality));
    }
    if let Some(quality) = request.quality_out {
        line.set_quality_out(requester, (!quality.is_default()).then_some(quality));
    }

    let mut reserve_increase = false;
    let mut in_use = false;
    for side in [Side::Low, Side::High] {
        let required = SideState::of(&line, side).requires_reserve();
        let claimed = line.flags.reserve(side);
        in_use |= required;

        if required && !claimed {
            parties.adjust_owner_count(side, 1);
            line.flags.set_reserve(side, true);
            reserve_increase |= side == requester;
        } else if !required && claimed {
            parties.adjust_owner_count(side, -1);
            line.flags.set_reserve(side, false);
        }
    }

    if !in_use {
        let low = parties.sides.low;
        let high = parties.sides.high;
        let low_listed = dir_remove(view, &LedgerIndex::owner_dir(&low), &index, false)?;
        let high_listed = dir_remove(view, &LedgerIndex::owner_dir(&high), &index, false)?;
        if !low_listed || !high_listed {
            warn!(line = %index.short_hex(), low_listed, high_listed, "line missing from an owner directory");
        }
        view.delete(&index)?;
        parties.persist(view)?;
        debug!(line = %index.short_hex(), "trust line deleted");
        return Ok(ResultCode::Success);
    }

    if reserve_increase && !can_afford {
        return Ok(ResultCode::InsufficientReserveLine);
    }

    view.modify(line.into())?;
    parties.persist(view)?;
    debug!(line = %index.short_hex(), "trust line modified");
    Ok(ResultCode::Success)
}

fn create_line(
    view: &mut Sandbox<'_>,
    index: LedgerIndex,
    request: &Request,
    mut parties: Parties,
) -> Result<ResultCode, EngineError> {
    let sides = parties.sides;
    let requester = sides.requester;
    let currency = request.limit.currency;

    let mut line = TrustLine {
        balance: IssuedAmount::zero(currency, AccountId::ONE),
        low_limit: IssuedAmount::zero(currency, sides.low),
        high_limit: IssuedAmount::zero(currency, sides.high),
        low_quality_in: None,
        low_quality_out: None,
        high_quality_in: None,
        high_quality_out: None,
        flags: TrustLineFlags::reserved_by(requester),
    };
    line.set_limit(requester, request.limit);
    if let Some(quality) = request.quality_in.filter(|q| !q.is_default()) {
        line.set_quality_in(requester, Some(quality));
    }
    if let Some(quality) = request.quality_out.filter(|q| !q.is_default()) {
        line.set_quality_out(requester, Some(quality));
    }
    view.create(line.into())?;

    let owner = sides.account(requester);
    dir_add(view, &LedgerIndex::owner_dir(&owner), index, describe_owner(owner))?;
    parties.adjust_owner_count(requester, 1);

    let other = sides.account(sides.counterparty());
    dir_add(view, &LedgerIndex::owner_dir(&other), index, describe_owner(other))?;

    parties.persist(view)?;
    debug!(line = %index.short_hex(), "trust line created");
    Ok(ResultCode::Success)
}
