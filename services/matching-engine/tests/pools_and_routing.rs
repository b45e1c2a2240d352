//! Pool deposits/withdrawals, multi-hop routing, and the engine-wide
//! determinism and conservation properties.

use dex_types::errors::DexError;
use dex_types::ids::Address;
use dex_types::numeric::Amount;
use dex_types::order::LimitOrderType;
use matching_engine::msg::{DepositMsg, MultiHopSwapMsg, PlaceLimitOrderMsg, WithdrawalMsg};
use matching_engine::MatchingEngine;
use rust_decimal::Decimal;

fn engine() -> MatchingEngine {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut e = MatchingEngine::new();
    e.begin_block(1, 1_000);
    e
}

fn fund(e: &mut MatchingEngine, who: &str, denom: &str, amount: u128) -> Address {
    let addr = Address::new(who);
    e.fund(&addr, denom, Amount::new(amount)).unwrap();
    addr
}

fn deposit(
    e: &mut MatchingEngine,
    who: &Address,
    token_a: &str,
    token_b: &str,
    amount_a: u128,
    amount_b: u128,
    tick: i64,
) -> Vec<Amount> {
    e.deposit(
        who,
        &DepositMsg {
            receiver: who.clone(),
            token_a: token_a.to_string(),
            token_b: token_b.to_string(),
            amounts_a: vec![Amount::new(amount_a)],
            amounts_b: vec![Amount::new(amount_b)],
            tick_indexes_a_to_b: vec![tick],
            fees: vec![0],
            options: vec![],
        },
    )
    .unwrap()
    .shares_minted
}

#[test]
fn deposit_then_withdraw_round_trip() {
    let mut e = engine();
    let alice = fund(&mut e, "alice", "untrn", 1_000);
    e.fund(&alice, "uibcusdc", Amount::new(1_000)).unwrap();

    // 100 + 100 * 1.0001 in token0 terms, floored
    let minted = deposit(&mut e, &alice, "untrn", "uibcusdc", 100, 100, 1);
    assert_eq!(minted, vec![Amount::new(200)]);

    let resp = e
        .withdrawal(
            &alice,
            &WithdrawalMsg {
                receiver: alice.clone(),
                token_a: "untrn".to_string(),
                token_b: "uibcusdc".to_string(),
                shares_to_remove: vec![Amount::new(10)],
                tick_indexes_a_to_b: vec![1],
                fees: vec![0],
            },
        )
        .unwrap();
    assert_eq!(resp.amounts_a, vec![Amount::new(5)]);
    assert_eq!(resp.amounts_b, vec![Amount::new(5)]);

    let pool = e.queries().pool("untrn", "uibcusdc", 1, 0).unwrap().unwrap();
    assert_eq!(pool.reserves0, Amount::new(95));
    assert_eq!(pool.reserves1, Amount::new(95));
    assert_eq!(pool.total_shares, Amount::new(190));
}

#[test]
fn invalid_pair_rejected_with_wire_message() {
    let mut e = engine();
    let alice = fund(&mut e, "alice", "untrn", 1_000);
    let err = e
        .deposit(
            &alice,
            &DepositMsg {
                receiver: alice.clone(),
                token_a: "untrn".to_string(),
                token_b: "untrn".to_string(),
                amounts_a: vec![Amount::new(10)],
                amounts_b: vec![Amount::new(10)],
                tick_indexes_a_to_b: vec![0],
                fees: vec![0],
                options: vec![],
            },
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "untrn<>untrn: Invalid token pair");
}

#[test]
fn pool_liquidity_matches_takers_with_fee_markup() {
    let mut e = engine();
    let alice = fund(&mut e, "alice", "untrn", 1_000);
    e.fund(&alice, "uibcusdc", Amount::new(1_000)).unwrap();
    let bob = fund(&mut e, "bob", "uibcusdc", 1_000);

    // Pool at tick 0 (par) with fee tier 100
    e.deposit(
        &alice,
        &DepositMsg {
            receiver: alice.clone(),
            token_a: "untrn".to_string(),
            token_b: "uibcusdc".to_string(),
            amounts_a: vec![Amount::new(500)],
            amounts_b: vec![Amount::new(500)],
            tick_indexes_a_to_b: vec![0],
            fees: vec![100],
            options: vec![],
        },
    )
    .unwrap();

    // The fee shifts the pool's book tick to 100, so a taker limited
    // below that cannot reach it
    let starved = e
        .place_limit_order(
            &bob,
            &PlaceLimitOrderMsg {
                receiver: bob.clone(),
                token_in: "uibcusdc".to_string(),
                token_out: "untrn".to_string(),
                tick_index_in_to_out: 99,
                amount_in: Amount::new(100),
                order_type: LimitOrderType::ImmediateOrCancel,
                expiration_time: None,
                max_amount_out: None,
            },
        )
        .unwrap();
    assert_eq!(starved.taker_coin_out, Amount::zero());

    let filled = e
        .place_limit_order(
            &bob,
            &PlaceLimitOrderMsg {
                receiver: bob.clone(),
                token_in: "uibcusdc".to_string(),
                token_out: "untrn".to_string(),
                tick_index_in_to_out: 100,
                amount_in: Amount::new(100),
                order_type: LimitOrderType::ImmediateOrCancel,
                expiration_time: None,
                max_amount_out: None,
            },
        )
        .unwrap();
    // 100 * 1.0001^-100 = 99.005 floored
    assert_eq!(filled.taker_coin_out, Amount::new(99));
}

#[test]
fn multi_hop_swap_through_two_pools() {
    let mut e = engine();
    let lp = fund(&mut e, "lp", "untrn", 1_000);
    e.fund(&lp, "uibcusdc", Amount::new(1_000)).unwrap();
    e.fund(&lp, "uatom", Amount::new(1_000)).unwrap();
    let bob = fund(&mut e, "bob", "uatom", 50);

    // uatom -> untrn leg: the pool only needs untrn reserves
    deposit(&mut e, &lp, "uatom", "untrn", 0, 100, 0);
    // untrn -> uibcusdc leg: only uibcusdc reserves
    deposit(&mut e, &lp, "uibcusdc", "untrn", 100, 0, 0);

    let resp = e
        .multi_hop_swap(
            &bob,
            &MultiHopSwapMsg {
                receiver: bob.clone(),
                route: vec![
                    "uatom".to_string(),
                    "untrn".to_string(),
                    "uibcusdc".to_string(),
                ],
                amount_in: Amount::new(50),
                exit_limit_price: Decimal::from_str_exact("0.9").unwrap(),
            },
        )
        .unwrap();
    assert_eq!(resp.coin_out, Amount::new(50));
    assert_eq!(e.balance_of(&bob, "uatom"), Amount::zero());
    assert_eq!(e.balance_of(&bob, "uibcusdc"), Amount::new(50));
    // Two pool updates, one per hop
    assert_eq!(resp.events.len(), 2);
    assert!(resp.events.iter().all(|ev| ev.tranche_key.is_none()));
}

#[test]
fn multi_hop_exit_limit_price_enforced() {
    let mut e = engine();
    let lp = fund(&mut e, "lp", "untrn", 1_000);
    e.fund(&lp, "uibcusdc", Amount::new(1_000)).unwrap();
    e.fund(&lp, "uatom", Amount::new(1_000)).unwrap();
    let bob = fund(&mut e, "bob", "uatom", 50);

    deposit(&mut e, &lp, "uatom", "untrn", 0, 100, 0);
    deposit(&mut e, &lp, "uibcusdc", "untrn", 100, 0, 0);

    let before = e.clone();
    let err = e
        .multi_hop_swap(
            &bob,
            &MultiHopSwapMsg {
                receiver: bob.clone(),
                route: vec![
                    "uatom".to_string(),
                    "untrn".to_string(),
                    "uibcusdc".to_string(),
                ],
                amount_in: Amount::new(50),
                exit_limit_price: Decimal::TWO,
            },
        )
        .unwrap_err();
    assert!(matches!(err, DexError::LimitPriceNotSatisfied { .. }));
    assert_eq!(e, before);
}

#[test]
fn multi_hop_fails_without_liquidity() {
    let mut e = engine();
    let lp = fund(&mut e, "lp", "untrn", 1_000);
    e.fund(&lp, "uatom", Amount::new(1_000)).unwrap();
    let bob = fund(&mut e, "bob", "uatom", 50);

    deposit(&mut e, &lp, "uatom", "untrn", 0, 100, 0);

    let before = e.clone();
    let err = e
        .multi_hop_swap(
            &bob,
            &MultiHopSwapMsg {
                receiver: bob.clone(),
                route: vec![
                    "uatom".to_string(),
                    "untrn".to_string(),
                    "uosmo".to_string(),
                ],
                amount_in: Amount::new(50),
                exit_limit_price: Decimal::ZERO,
            },
        )
        .unwrap_err();
    assert!(matches!(err, DexError::InsufficientLiquidity { .. }));
    assert_eq!(e, before);
}

#[test]
fn multi_hop_rejects_degenerate_routes() {
    let mut e = engine();
    let bob = fund(&mut e, "bob", "uatom", 50);

    for route in [
        vec!["uatom".to_string()],
        vec!["uatom".to_string(), "uatom".to_string()],
    ] {
        let err = e
            .multi_hop_swap(
                &bob,
                &MultiHopSwapMsg {
                    receiver: bob.clone(),
                    route,
                    amount_in: Amount::new(50),
                    exit_limit_price: Decimal::ZERO,
                },
            )
            .unwrap_err();
        assert_eq!(err, DexError::InvalidRoute);
    }
}

fn run_workload(e: &mut MatchingEngine) {
    let alice = fund(e, "alice", "untrn", 1_000);
    e.fund(&alice, "uibcusdc", Amount::new(1_000)).unwrap();
    let bob = fund(e, "bob", "uibcusdc", 500);

    deposit(e, &alice, "untrn", "uibcusdc", 100, 100, 1);
    e.place_limit_order(
        &alice,
        &PlaceLimitOrderMsg {
            receiver: alice.clone(),
            token_in: "untrn".to_string(),
            token_out: "uibcusdc".to_string(),
            tick_index_in_to_out: 0,
            amount_in: Amount::new(100),
            order_type: LimitOrderType::GoodTilCanceled,
            expiration_time: None,
            max_amount_out: None,
        },
    )
    .unwrap();
    e.place_limit_order(
        &bob,
        &PlaceLimitOrderMsg {
            receiver: bob.clone(),
            token_in: "uibcusdc".to_string(),
            token_out: "untrn".to_string(),
            tick_index_in_to_out: 5,
            amount_in: Amount::new(150),
            order_type: LimitOrderType::ImmediateOrCancel,
            expiration_time: None,
            max_amount_out: None,
        },
    )
    .unwrap();
    e.end_block().unwrap();
}

#[test]
fn identical_sequences_produce_identical_states() {
    let mut e1 = engine();
    let mut e2 = engine();
    run_workload(&mut e1);
    run_workload(&mut e2);
    assert_eq!(e1, e2);
}

#[test]
fn tokens_are_conserved_across_a_workload() {
    let mut e = engine();
    run_workload(&mut e);

    // Every untrn and uibcusdc is either spendable, pool reserves, or
    // tranche escrow.
    let pool = e.queries().pool("untrn", "uibcusdc", 1, 0).unwrap().unwrap();
    let records = e.queries().limit_order_tranche_user_all(None);
    let (mut tranche_untrn, mut tranche_usdc) = (Amount::zero(), Amount::zero());
    let mut seen = Vec::new();
    for rec in &records {
        if seen.contains(&rec.tranche_key) {
            continue;
        }
        seen.push(rec.tranche_key.clone());
        if let Some(info) = e.queries().limit_order_tranche(&rec.tranche_key) {
            // Every tranche in this workload sells untrn for uibcusdc
            assert_eq!(info.token_in, "untrn");
            tranche_untrn = tranche_untrn + info.reserves_in;
            tranche_usdc = tranche_usdc + info.reserves_out;

            // Ledger sums tie exactly to the tranche reserves
            let (mut unfilled, mut claimable) = (Amount::zero(), Amount::zero());
            for r in records.iter().filter(|r| r.tranche_key == rec.tranche_key) {
                unfilled = unfilled + r.amount_unfilled_remaining;
                claimable = claimable + r.amount_filled_claimable;
            }
            assert_eq!(unfilled, info.reserves_in);
            assert_eq!(claimable, info.reserves_out);
        }
    }

    // token1 of the canonical pair is untrn
    let total_untrn = e.bank_supply("untrn") + pool.reserves1 + tranche_untrn;
    let total_usdc = e.bank_supply("uibcusdc") + pool.reserves0 + tranche_usdc;
    assert_eq!(total_untrn, Amount::new(1_000));
    assert_eq!(total_usdc, Amount::new(1_500));
}
