//! Transactions and their construction via the builder pattern.
//!
//! [`Transaction::new`] is the one place every construction rule is
//! enforced; [`TransactionBuilder`] is the convenient front door that
//! derives the fee and sequence number from an [`Account`] and then calls
//! it. Neither signs: that happens through [`super::signing::Signable`],
//! so construction stays testable without key material.

use tracing::debug;

use crate::config::{MAX_OPERATIONS, MAX_SIGNATURES, MEMO_TEXT_MAX_BYTES, MIN_BASE_FEE};
use crate::crypto::DecoratedSignature;
use crate::identity::MuxedAccount;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

use super::envelope::EnvelopeType;
use super::error::TransactionError;
use super::memo::Memo;
use super::operation::Operation;
use super::preconditions::{TimeBounds, TransactionPreconditions};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction: a source account, fee, sequence number, preconditions,
/// memo and 1 to 100 operations, plus the signatures collected so far.
///
/// All fields except the signature list are fixed at construction. The
/// envelope type only changes how the transaction is serialized; hashing
/// always uses the V1 layout, so switching between V0 and V1 never
/// invalidates a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    source_account: MuxedAccount,
    /// Maximum total fee in stroops.
    fee: u32,
    sequence_number: i64,
    preconditions: TransactionPreconditions,
    memo: Memo,
    operations: Vec<Operation>,
    pub(super) signatures: Vec<DecoratedSignature>,
    envelope_type: EnvelopeType,
}

impl Transaction {
    /// Build a transaction, checking the operation count, every operation's
    /// field rules and the preconditions.
    pub fn new(
        source_account: impl Into<MuxedAccount>,
        fee: u32,
        sequence_number: i64,
        operations: Vec<Operation>,
        memo: Memo,
        preconditions: TransactionPreconditions,
    ) -> Result<Self, TransactionError> {
        check_operation_count(operations.len())?;
        for (index, op) in operations.iter().enumerate() {
            op.body
                .check()
                .map_err(|reason| TransactionError::InvalidOperation { index, reason })?;
        }
        preconditions.is_valid()?;
        if let Memo::Text(text) = &memo {
            if text.len() > MEMO_TEXT_MAX_BYTES {
                return Err(TransactionError::MemoTooLong { len: text.len() });
            }
        }
        Ok(Self {
            source_account: source_account.into(),
            fee,
            sequence_number,
            preconditions,
            memo,
            operations,
            signatures: Vec::new(),
            envelope_type: EnvelopeType::Tx,
        })
    }

    pub fn source_account(&self) -> &MuxedAccount {
        &self.source_account
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    pub fn preconditions(&self) -> &TransactionPreconditions {
        &self.preconditions
    }

    /// Shorthand for `preconditions().time_bounds`.
    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.preconditions.time_bounds.as_ref()
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn envelope_type(&self) -> EnvelopeType {
        self.envelope_type
    }

    /// Choose the envelope layout.
    ///
    /// The V0 layout can only carry an unmuxed source account and time
    /// bounds, so it is refused for anything else. Fee bumps are a
    /// different type altogether.
    pub fn set_envelope_type(&mut self, envelope_type: EnvelopeType) -> Result<(), TransactionError> {
        match envelope_type {
            EnvelopeType::Tx => {}
            EnvelopeType::TxV0 => {
                if self.source_account.is_muxed() {
                    return Err(TransactionError::InvalidConstruction(
                        "a V0 envelope cannot carry a muxed source account".into(),
                    ));
                }
                if self.preconditions.has_v2() {
                    return Err(TransactionError::InvalidConstruction(
                        "a V0 envelope can only carry time bounds".into(),
                    ));
                }
            }
            EnvelopeType::TxFeeBump => {
                return Err(TransactionError::InvalidConstruction(
                    "wrap the transaction in a FeeBumpTransaction instead".into(),
                ));
            }
        }
        self.envelope_type = envelope_type;
        Ok(())
    }

    // -- wire layouts ------------------------------------------------------

    /// The `Transaction` (V1) struct; also what the signature base hashes.
    pub(crate) fn write_v1(&self, w: &mut XdrWriter) {
        self.source_account.write_xdr(w);
        w.write_u32(self.fee);
        w.write_i64(self.sequence_number);
        self.preconditions.write_xdr(w);
        self.memo.write_xdr(w);
        w.write_var_array(&self.operations);
        w.write_discriminant(0);
    }

    /// The legacy `TransactionV0` struct.
    fn write_v0(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(self.source_account.key());
        w.write_u32(self.fee);
        w.write_i64(self.sequence_number);
        self.preconditions.time_bounds.write_xdr(w);
        self.memo.write_xdr(w);
        w.write_var_array(&self.operations);
        w.write_discriminant(0);
    }

    /// The envelope: tag, body in the selected layout, signatures.
    pub(crate) fn write_envelope(&self, w: &mut XdrWriter) {
        w.write_discriminant(self.envelope_type.discriminant());
        match self.envelope_type {
            EnvelopeType::TxV0 => self.write_v0(w),
            _ => self.write_v1(w),
        }
        w.write_var_array(&self.signatures);
    }

    pub(crate) fn read_v1(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let source_account = MuxedAccount::read_xdr(r)?;
        let fee = r.read_u32()?;
        let sequence_number = r.read_i64()?;
        let preconditions = TransactionPreconditions::read_xdr(r)?;
        let memo = Memo::read_xdr(r)?;
        let operations = read_operations(r)?;
        read_empty_ext(r, "TransactionExt")?;
        Ok(Self {
            source_account,
            fee,
            sequence_number,
            preconditions,
            memo,
            operations,
            signatures: Vec::new(),
            envelope_type: EnvelopeType::Tx,
        })
    }

    fn read_v0(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let key: [u8; 32] = r.read_fixed_opaque()?;
        let fee = r.read_u32()?;
        let sequence_number = r.read_i64()?;
        let time_bounds = Option::<TimeBounds>::read_xdr(r)?;
        let memo = Memo::read_xdr(r)?;
        let operations = read_operations(r)?;
        read_empty_ext(r, "TransactionV0Ext")?;
        Ok(Self {
            source_account: MuxedAccount::new(key, None),
            fee,
            sequence_number,
            preconditions: TransactionPreconditions {
                time_bounds,
                ..TransactionPreconditions::default()
            },
            memo,
            operations,
            signatures: Vec::new(),
            envelope_type: EnvelopeType::TxV0,
        })
    }

    pub(crate) fn read_v0_envelope(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let mut tx = Self::read_v0(r)?;
        tx.signatures = read_signatures(r)?;
        Ok(tx)
    }

    pub(crate) fn read_v1_envelope(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let mut tx = Self::read_v1(r)?;
        tx.signatures = read_signatures(r)?;
        Ok(tx)
    }
}

fn check_operation_count(count: usize) -> Result<(), TransactionError> {
    if count == 0 || count > MAX_OPERATIONS {
        return Err(TransactionError::InvalidOperationCount { count });
    }
    Ok(())
}

fn read_operations(r: &mut XdrReader<'_>) -> Result<Vec<Operation>, XdrError> {
    let operations: Vec<Operation> = r.read_var_array(MAX_OPERATIONS as u32)?;
    if operations.is_empty() {
        return Err(XdrError::InvalidValue(
            "transaction has no operations".into(),
        ));
    }
    Ok(operations)
}

pub(crate) fn read_signatures(r: &mut XdrReader<'_>) -> Result<Vec<DecoratedSignature>, XdrError> {
    r.read_var_array(MAX_SIGNATURES as u32)
}

/// Extension unions whose only known arm is the empty `0`.
pub(crate) fn read_empty_ext(r: &mut XdrReader<'_>, type_name: &'static str) -> Result<(), XdrError> {
    match r.read_discriminant()? {
        0 => Ok(()),
        other => Err(XdrError::unknown_variant(type_name, other)),
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// The two facts about a source account a builder needs: its address and
/// current sequence number, as last fetched from the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    account_id: MuxedAccount,
    sequence_number: i64,
}

impl Account {
    pub fn new(account_id: impl Into<MuxedAccount>, sequence_number: i64) -> Self {
        Self {
            account_id: account_id.into(),
            sequence_number,
        }
    }

    pub fn account_id(&self) -> &MuxedAccount {
        &self.account_id
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    /// The sequence number the next transaction from this account must use.
    pub fn incremented_sequence_number(&self) -> Result<i64, TransactionError> {
        self.sequence_number
            .checked_add(1)
            .ok_or(TransactionError::SequenceOverflow)
    }

    pub fn increment_sequence_number(&mut self) -> Result<(), TransactionError> {
        self.sequence_number = self.incremented_sequence_number()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] instances.
///
/// The builder borrows the source [`Account`] mutably and bumps its
/// sequence number on a successful [`build`](Self::build), so consecutive
/// builds from the same account produce consecutive sequence numbers.
///
/// ```
/// use stellar_protocol::asset::Asset;
/// use stellar_protocol::identity::AccountId;
/// use stellar_protocol::transaction::{Account, Operation, TransactionBuilder};
///
/// let source = AccountId::from_strkey("GBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5TWUC")?;
/// let mut account = Account::new(source, 41);
/// let tx = TransactionBuilder::new(&mut account)
///     .add_operation(Operation::payment(source, Asset::native(), 10_000_000))
///     .base_fee(100)
///     .set_timeout(1_700_000_000, 30)
///     .build()?;
///
/// assert_eq!(tx.sequence_number(), 42);
/// assert_eq!(tx.fee(), 100);
/// assert_eq!(account.sequence_number(), 42);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TransactionBuilder<'a> {
    account: &'a mut Account,
    operations: Vec<Operation>,
    memo: Memo,
    preconditions: TransactionPreconditions,
    base_fee: u32,
}

impl<'a> TransactionBuilder<'a> {
    /// Defaults: no operations, no memo, no preconditions, and the minimum
    /// base fee of 100 stroops per operation.
    pub fn new(account: &'a mut Account) -> Self {
        Self {
            account,
            operations: Vec::new(),
            memo: Memo::None,
            preconditions: TransactionPreconditions::default(),
            base_fee: MIN_BASE_FEE,
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn add_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Replace every precondition at once.
    pub fn preconditions(mut self, preconditions: TransactionPreconditions) -> Self {
        self.preconditions = preconditions;
        self
    }

    pub fn time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.preconditions.time_bounds = Some(time_bounds);
        self
    }

    /// Expire `timeout` seconds after `now` (unix seconds). A timeout of
    /// [`TIMEOUT_INFINITE`](super::preconditions::TIMEOUT_INFINITE) never
    /// expires.
    pub fn set_timeout(self, now: u64, timeout: u64) -> Self {
        self.time_bounds(TimeBounds::expires_after(now, timeout))
    }

    /// Fee per operation, in stroops.
    pub fn base_fee(mut self, base_fee: u32) -> Self {
        self.base_fee = base_fee;
        self
    }

    /// Consume the builder and produce an unsigned [`Transaction`].
    ///
    /// The total fee is `base_fee * operations` and the sequence number is
    /// the account's plus one. The account is only incremented once the
    /// transaction has been built successfully.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.base_fee < MIN_BASE_FEE {
            return Err(TransactionError::FeeTooLow {
                base_fee: i64::from(self.base_fee),
                minimum: i64::from(MIN_BASE_FEE),
            });
        }
        check_operation_count(self.operations.len())?;
        let ops = u32::try_from(self.operations.len()).map_err(|_| TransactionError::FeeOverflow)?;
        let fee = self
            .base_fee
            .checked_mul(ops)
            .ok_or(TransactionError::FeeOverflow)?;
        let sequence_number = self.account.incremented_sequence_number()?;

        let tx = Transaction::new(
            self.account.account_id,
            fee,
            sequence_number,
            self.operations,
            self.memo,
            self.preconditions,
        )?;
        self.account.increment_sequence_number()?;

        debug!(
            source = %tx.source_account,
            sequence = sequence_number,
            ops = tx.operations.len(),
            fee,
            "built transaction"
        );
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
