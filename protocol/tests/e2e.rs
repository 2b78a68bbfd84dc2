//! End-to-end integration tests for the transaction core.
//!
//! These tests drive the public API the way a wallet would: derive keys,
//! build a transaction from an account, sign it for a network, ship the
//! envelope as base64, parse it back on the other side, wrap it in a fee
//! bump and derive the IDs the network will assign. Each test stands alone.

use stellar_protocol::asset::{Asset, ChangeTrustAsset, LiquidityPoolParameters};
use stellar_protocol::config::Network;
use stellar_protocol::crypto::{signed_payload_hint, KeyPair};
use stellar_protocol::identity::{AccountId, MuxedAccount, SignedPayloadSigner, SignerKey};
use stellar_protocol::ids::{claimable_balance_id, ClaimableBalanceId, Toid};
use stellar_protocol::strkey;
use stellar_protocol::transaction::{
    Account, AnyTransaction, ClaimPredicate, Claimant, EnvelopeType, FeeBumpTransaction,
    LedgerBounds, Memo, Operation, Signable, TimeBounds, Transaction, TransactionBuilder,
    TransactionError, TransactionPreconditions, TIMEOUT_INFINITE,
};
use stellar_protocol::xdr::{ReadXdr, WriteXdr, XdrError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const SEED: &str = "SCZANGBA5YHTNYVVV4C3U252E2B6P6F5T3U6MM63WBSBZATAQI3EBTQ4";
const CLAIMANT: &str = "GCACCFMIWJAHUUASSE2WC7V6VVDLYRLSJYZ3DJEXCG523FSHTNII6KOG";

fn source() -> KeyPair {
    KeyPair::from_secret_seed(SEED).unwrap()
}

fn usd(issuer: &KeyPair) -> Asset {
    Asset::credit("USD", AccountId::from(issuer)).unwrap()
}

/// A signed single-payment transaction from `from` with sequence `seq + 1`.
fn signed_payment(from: &KeyPair, seq: i64, network: &Network) -> Transaction {
    let mut account = Account::new(from, seq);
    let mut tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::payment(
            &KeyPair::from_raw_seed(&[9; 32]),
            Asset::native(),
            25_000_000,
        ))
        .memo(Memo::text("rent").unwrap())
        .set_timeout(1_700_000_000, 300)
        .build()
        .unwrap();
    tx.sign(from, network).unwrap();
    tx
}

// ---------------------------------------------------------------------------
// 1. Build, sign, ship, parse
// ---------------------------------------------------------------------------

#[test]
fn payment_lifecycle() {
    let alice = source();
    let tx = signed_payment(&alice, 100, &Network::TESTNET);

    assert_eq!(tx.sequence_number(), 101);
    assert_eq!(tx.fee(), 100);
    assert_eq!(
        tx.time_bounds(),
        Some(&TimeBounds::new(0, 1_700_000_300).unwrap())
    );
    assert!(tx.is_signed_by(&alice.public_key(), &Network::TESTNET));

    let wire = tx.to_envelope_xdr_base64();
    let parsed = AnyTransaction::from_envelope_xdr_base64(&wire).unwrap();
    assert_eq!(parsed.envelope_type(), EnvelopeType::Tx);

    let received = parsed.as_transaction().unwrap();
    assert_eq!(received, &tx);
    assert_eq!(received.hash(&Network::TESTNET), tx.hash(&Network::TESTNET));
    assert!(received.is_signed_by(&alice.public_key(), &Network::TESTNET));

    // Re-encoding what we parsed gives back the exact same bytes.
    assert_eq!(parsed.to_xdr_base64(), wire);
}

#[test]
fn signatures_are_network_bound() {
    let alice = source();
    let testnet = signed_payment(&alice, 1, &Network::TESTNET);
    let public = signed_payment(&alice, 1, &Network::PUBLIC);

    assert_ne!(testnet.hash(&Network::TESTNET), testnet.hash(&Network::PUBLIC));
    assert!(!testnet.is_signed_by(&alice.public_key(), &Network::PUBLIC));
    assert!(public.is_signed_by(&alice.public_key(), &Network::PUBLIC));

    let custom = Network::new("My Private Network ; 2026");
    assert_ne!(testnet.hash(&custom), testnet.hash(&Network::TESTNET));
}

#[test]
fn builder_only_advances_sequence_on_success() {
    let alice = source();
    let mut account = Account::new(&alice, 7);

    let err = TransactionBuilder::new(&mut account)
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap_err();
    assert_eq!(err, TransactionError::InvalidOperationCount { count: 0 });
    assert_eq!(account.sequence_number(), 7);

    let tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::bump_sequence(50))
        .base_fee(250)
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap();
    assert_eq!(tx.sequence_number(), 8);
    assert_eq!(tx.fee(), 250);
    assert_eq!(account.sequence_number(), 8);
}

// ---------------------------------------------------------------------------
// 2. Multi-signer flows
// ---------------------------------------------------------------------------

#[test]
fn multisig_with_hash_x_and_signed_payload() {
    let alice = source();
    let cosigner = KeyPair::from_raw_seed(&[4; 32]);
    let preimage = b"open sesame";

    let mut account = Account::new(&alice, 0);
    let mut tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::manage_data("config", Some(b"v2".to_vec())))
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap();
    tx.sign(&alice, &Network::TESTNET).unwrap();
    tx.sign(&cosigner, &Network::TESTNET).unwrap();
    tx.sign_hash_x(preimage).unwrap();

    let parsed = AnyTransaction::from_envelope_xdr(&tx.to_envelope_xdr()).unwrap();
    let parsed = parsed.as_transaction().unwrap();
    assert_eq!(parsed.signatures().len(), 3);
    assert!(parsed.is_signed_by(&alice.public_key(), &Network::TESTNET));
    assert!(parsed.is_signed_by(&cosigner.public_key(), &Network::TESTNET));
    assert_eq!(parsed.signatures()[2].signature(), preimage);

    // The hash-x signer a wallet would register for that preimage.
    let signer = SignerKey::hash_x_from_preimage(preimage);
    assert!(signer.to_strkey().starts_with('X'));
}

#[test]
fn signed_payload_signer_hint_and_strkey() {
    let mut key = [0u8; 32];
    key[28..].copy_from_slice(&[254, 66, 4, 55]);
    let signer = SignedPayloadSigner::new(key, vec![1, 2, 3]).unwrap();
    assert_eq!(signer.hint(), [255, 64, 7, 55]);
    assert_eq!(signed_payload_hint(&key, &[1, 2, 3]), [255, 64, 7, 55]);

    let signer_key = SignerKey::Ed25519SignedPayload(signer);
    let encoded = signer_key.to_strkey();
    assert!(encoded.starts_with('P'));
    assert_eq!(SignerKey::from_strkey(&encoded).unwrap(), signer_key);
}

// ---------------------------------------------------------------------------
// 3. Preconditions and envelope kinds
// ---------------------------------------------------------------------------

#[test]
fn v2_preconditions_survive_the_wire() {
    let alice = source();
    let preconditions = TransactionPreconditions {
        time_bounds: Some(TimeBounds::new(0, 2_000_000_000).unwrap()),
        ledger_bounds: Some(LedgerBounds::new(100, 200).unwrap()),
        min_sequence_number: Some(5),
        min_sequence_age: 60,
        min_sequence_ledger_gap: 2,
        extra_signers: vec![SignerKey::Ed25519([3; 32])],
    };
    let mut account = Account::new(&alice, 10);
    let mut tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::bump_sequence(20))
        .preconditions(preconditions.clone())
        .build()
        .unwrap();
    tx.sign(&alice, &Network::TESTNET).unwrap();

    let parsed = AnyTransaction::from_envelope_xdr_base64(&tx.to_envelope_xdr_base64()).unwrap();
    assert_eq!(parsed.as_transaction().unwrap().preconditions(), &preconditions);

    // V2 preconditions cannot travel in a V0 envelope.
    assert!(matches!(
        tx.set_envelope_type(EnvelopeType::TxV0),
        Err(TransactionError::InvalidConstruction(_))
    ));
}

#[test]
fn preconditions_without_time_bounds_are_rejected() {
    let alice = source();
    let mut account = Account::new(&alice, 10);
    let err = TransactionBuilder::new(&mut account)
        .add_operation(Operation::bump_sequence(20))
        .preconditions(TransactionPreconditions {
            min_sequence_age: 10,
            ..Default::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, TransactionError::Validation(_)));
    assert_eq!(account.sequence_number(), 10);
}

#[test]
fn v0_envelope_parses_and_hashes_as_v1() {
    let alice = source();
    let mut tx = signed_payment(&alice, 1, &Network::TESTNET);
    let v1_hash = tx.hash(&Network::TESTNET);
    tx.set_envelope_type(EnvelopeType::TxV0).unwrap();

    let wire = tx.to_envelope_xdr();
    assert_eq!(&wire[..4], &[0, 0, 0, 0]);
    let parsed = AnyTransaction::from_envelope_xdr(&wire).unwrap();
    assert_eq!(parsed.envelope_type(), EnvelopeType::TxV0);
    assert_eq!(parsed.hash(&Network::TESTNET), v1_hash);
    assert!(parsed
        .as_transaction()
        .unwrap()
        .is_signed_by(&alice.public_key(), &Network::TESTNET));
}

#[test]
fn network_v0_envelopes_reencode_identically() {
    // Pubnet payment with a hash memo.
    let pubnet = "AAAAAERmsKL73CyLV/HvjyQCERDXXpWE70Xhyb6MR5qPO3yQAAAAZAAIbkEAACD7AAAAAAAAAAN43bSwpXw8tSAhl7TBtQeOZTQAXwAAAAAAAAAAAAAAAAAAAAEAAAABAAAAAP1qe44j+i4uIT+arbD4QDQBt8ryEeJd7a0jskQ3nwDeAAAAAAAAAADdVhDVFrUiS/jPrRpblXY4bAW9u4hbRI2Hhw+2ATsFpQAAAAAtPWvAAAAAAAAAAAGPO3yQAAAAQHGWVHCBsjTyap/OY9JjPHmzWtN2Y2sL98aMERc/xJ3hcWz6kdQAwjlEhilItCyokDHCrvALZy3v/1TlaDqprA0=";
    // Unsigned GOLD payment with a text memo.
    let memo_text = "AAAAACq1Ixcw1fchtF5aLTSw1zaYAYjb3WbBRd4jqYJKThB9AAAAZAA8tDoAAAALAAAAAAAAAAEAAAAZR29sZCBwYXltZW50IGZvciBzZXJ2aWNlcwAAAAAAAAEAAAAAAAAAAQAAAAARREGslec48mbJJygIwZoLvRtL6/gGL4ss2TOpnOUOhgAAAAFHT0xEAAAAACq1Ixcw1fchtF5aLTSw1zaYAYjb3WbBRd4jqYJKThB9AAAAADuaygAAAAAAAAAAAA==";
    // Text memo that is not valid UTF-8.
    let binary_memo = "AAAAAM6jLgjKjuXxWkir4M7v0NqoOfODXcFnn6AGlP+d4RxAAAAAZAAIiE4AAAABAAAAAAAAAAEAAAAcyKMl+WDSzuttWkF2DvzKAkkEqeSZ4cZihjGJEAAAAAEAAAAAAAAAAQAAAAAgECmBaDwiRPE1z2vAE36J+45toU/ZxdvpR38tc0HvmgAAAAAAAAAAAJiWgAAAAAAAAAABneEcQAAAAECeXDKebJoAbST1T2AbDBui9K0TbSM8sfbhXUAZ2ROAoCRs5cG1pRvY+ityyPWFEKPd7+3qEupavkAZ/+L7/28G";

    for envelope in [pubnet, memo_text, binary_memo] {
        let parsed = AnyTransaction::from_envelope_xdr_base64(envelope).unwrap();
        assert_eq!(parsed.envelope_type(), EnvelopeType::TxV0);
        assert_eq!(parsed.to_xdr_base64(), envelope);
    }

    let parsed = AnyTransaction::from_envelope_xdr_base64(pubnet).unwrap();
    let tx = parsed.as_transaction().unwrap();
    assert_eq!(tx.sequence_number(), 2_373_025_265_623_291);
    assert_eq!(tx.signatures().len(), 1);

    let parsed = AnyTransaction::from_envelope_xdr_base64(memo_text).unwrap();
    let tx = parsed.as_transaction().unwrap();
    assert_eq!(tx.memo(), &Memo::Text(b"Gold payment for services".to_vec()));
    assert_eq!(tx.operations().len(), 1);
    assert!(tx.signatures().is_empty());
}

#[test]
fn muxed_source_round_trips() {
    let alice = source();
    let muxed = MuxedAccount::with_id(AccountId::from(&alice), 1_234_567);
    assert!(muxed.address().starts_with('M'));

    let mut account = Account::new(muxed, 0);
    let mut tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::bump_sequence(1))
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap();
    tx.sign(&alice, &Network::TESTNET).unwrap();

    let parsed = AnyTransaction::from_envelope_xdr(&tx.to_envelope_xdr()).unwrap();
    let parsed = parsed.as_transaction().unwrap();
    assert_eq!(parsed.source_account().id(), Some(1_234_567));
    assert!(parsed.is_signed_by(&alice.public_key(), &Network::TESTNET));
}

#[test]
fn corrupted_envelopes_are_rejected() {
    let tx = signed_payment(&source(), 1, &Network::TESTNET);
    let wire = tx.to_envelope_xdr();

    let mut trailing = wire.clone();
    trailing.extend_from_slice(&[0, 0, 0, 0]);
    assert!(AnyTransaction::from_envelope_xdr(&trailing)
        .unwrap_err()
        .is_malformed());

    assert!(AnyTransaction::from_envelope_xdr(&wire[..wire.len() - 1])
        .unwrap_err()
        .is_malformed());

    let mut unknown = wire;
    unknown[..4].copy_from_slice(&9i32.to_be_bytes());
    assert_eq!(
        AnyTransaction::from_envelope_xdr(&unknown),
        Err(XdrError::unknown_variant("EnvelopeType", 9))
    );

    assert!(matches!(
        AnyTransaction::from_envelope_xdr_base64("not base64!"),
        Err(XdrError::InvalidBase64(_))
    ));
}

// ---------------------------------------------------------------------------
// 4. Fee bumps
// ---------------------------------------------------------------------------

#[test]
fn fee_bump_lifecycle() {
    let alice = source();
    let sponsor = KeyPair::from_raw_seed(&[8; 32]);
    let inner = signed_payment(&alice, 1, &Network::TESTNET);

    let mut bump = FeeBumpTransaction::with_base_fee(&sponsor, 400, inner.clone()).unwrap();
    assert_eq!(bump.fee(), 800);
    bump.sign(&sponsor, &Network::TESTNET).unwrap();

    let parsed = AnyTransaction::from_envelope_xdr_base64(&bump.to_envelope_xdr_base64()).unwrap();
    assert_eq!(parsed.envelope_type(), EnvelopeType::TxFeeBump);
    let parsed = parsed.as_fee_bump().unwrap();

    assert_eq!(parsed, &bump);
    assert!(parsed.is_signed_by(&sponsor.public_key(), &Network::TESTNET));
    assert!(parsed
        .inner_transaction()
        .is_signed_by(&alice.public_key(), &Network::TESTNET));
    assert_eq!(
        parsed.inner_transaction().hash(&Network::TESTNET),
        inner.hash(&Network::TESTNET)
    );
    assert_ne!(parsed.hash(&Network::TESTNET), inner.hash(&Network::TESTNET));
}

#[test]
fn fee_bump_fee_rules() {
    let inner = signed_payment(&source(), 1, &Network::TESTNET);
    let sponsor = AccountId::from_bytes([8; 32]);

    assert_eq!(
        FeeBumpTransaction::with_base_fee(sponsor, 99, inner.clone()).unwrap_err(),
        TransactionError::FeeTooLow {
            base_fee: 99,
            minimum: 100
        }
    );
    assert_eq!(
        FeeBumpTransaction::with_base_fee(sponsor, 100, inner)
            .unwrap()
            .fee(),
        200
    );
}

#[test]
fn fee_bump_of_v0_inner_carries_v1() {
    let alice = source();
    let mut inner = signed_payment(&alice, 1, &Network::TESTNET);
    inner.set_envelope_type(EnvelopeType::TxV0).unwrap();

    let bump = FeeBumpTransaction::with_base_fee(AccountId::from_bytes([8; 32]), 100, inner)
        .unwrap();
    assert_eq!(bump.inner_transaction().envelope_type(), EnvelopeType::Tx);
    assert!(bump
        .inner_transaction()
        .is_signed_by(&alice.public_key(), &Network::TESTNET));
}

// ---------------------------------------------------------------------------
// 5. Assets and pools
// ---------------------------------------------------------------------------

#[test]
fn pool_trustline_for_ordered_assets() {
    let issuer = KeyPair::from_raw_seed(&[5; 32]);
    let native = Asset::native();
    let dollar = usd(&issuer);
    assert!(native < dollar);

    let params = LiquidityPoolParameters::constant_product(native.clone(), dollar.clone()).unwrap();
    assert_eq!(params.fee(), 30);
    assert!(LiquidityPoolParameters::constant_product(dollar.clone(), native.clone()).is_err());

    let id = params.pool_id();
    assert_eq!(
        LiquidityPoolParameters::constant_product(native, dollar)
            .unwrap()
            .pool_id(),
        id
    );

    let alice = source();
    let mut account = Account::new(&alice, 0);
    let tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::change_trust(ChangeTrustAsset::from(params), i64::MAX))
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap();
    let parsed = AnyTransaction::from_envelope_xdr(&tx.to_envelope_xdr()).unwrap();
    assert_eq!(parsed.as_transaction().unwrap().operations(), tx.operations());
}

// ---------------------------------------------------------------------------
// 6. Deterministic IDs
// ---------------------------------------------------------------------------

#[test]
fn claimable_balance_id_before_submission() {
    let alice = source();
    let claimant = AccountId::from_strkey(CLAIMANT).unwrap();
    let create = Operation::create_claimable_balance(
        Asset::native(),
        4_200_000_000,
        vec![Claimant::new(
            claimant,
            ClaimPredicate::not(ClaimPredicate::BeforeRelativeTime(86_400)),
        )],
    );

    let mut account = Account::new(&alice, 123);
    let tx = TransactionBuilder::new(&mut account)
        .add_operation(create)
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap();

    // The predicate is not part of the preimage.
    let id = claimable_balance_id(&tx, 0).unwrap();
    assert!(id
        .to_hex()
        .eq_ignore_ascii_case("0000000095001252AB3B4D16ADBFA5364CE526DFCDA03CB2258B827EDBB2E0450087BE51"));

    // Parsing the envelope on the receiving side yields the same ID.
    let parsed = AnyTransaction::from_envelope_xdr(&tx.to_envelope_xdr()).unwrap();
    assert_eq!(claimable_balance_id(parsed.as_transaction().unwrap(), 0).unwrap(), id);

    // And it can be claimed by that ID.
    let claim = Operation::claim_claimable_balance(id);
    assert_eq!(ClaimableBalanceId::from_xdr(&id.to_xdr()).unwrap(), id);
    let mut claimer = Account::new(claimant, 0);
    let claim_tx = TransactionBuilder::new(&mut claimer)
        .add_operation(claim)
        .set_timeout(0, TIMEOUT_INFINITE)
        .build()
        .unwrap();
    assert!(claimable_balance_id(&claim_tx, 0).is_err());
}

#[test]
fn toid_paging_cursor() {
    let range = Toid::ledger_range_inclusive(100, 100).unwrap();
    let first = Toid::new(100, 0, 0).unwrap();
    let mut cursor = Toid::new(100, 1, 4_095).unwrap();
    cursor.increment_operation_index().unwrap();

    assert_eq!(cursor, Toid::new(100, 2, 0).unwrap());
    assert!(range.contains(first.to_i64()));
    assert!(range.contains(cursor.to_i64()));
    assert!(range.contains(Toid::after_ledger(100).unwrap().to_i64()));
    assert!(!range.contains(Toid::new(101, 0, 0).unwrap().to_i64()));
    assert_eq!(Toid::from_i64(cursor.to_i64()).unwrap(), cursor);
}

// ---------------------------------------------------------------------------
// 7. Key derivation
// ---------------------------------------------------------------------------

#[test]
fn sep5_accounts_are_distinct_and_stable() {
    let seed = [0x42u8; 64];
    let first = KeyPair::from_bip39_seed(&seed, 0).unwrap();
    let second = KeyPair::from_bip39_seed(&seed, 1).unwrap();

    assert_ne!(first.account_id(), second.account_id());
    assert_eq!(
        KeyPair::from_bip39_seed(&seed, 0).unwrap().account_id(),
        first.account_id()
    );
    assert!(strkey::is_valid_account_id(&first.account_id()));
    assert!(strkey::is_valid_secret_seed(&first.secret_seed().unwrap()));
}
