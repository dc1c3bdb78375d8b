#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reward_ledger::{RewardLedgerContract, RewardLedgerContractClient, StakeRole};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const EPOCH_ZERO: u64 = 1_000;
const EPOCH_LENGTH: u64 = 100;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { node: u8, amount: u32, operator: bool, boosted: bool },
    Exit { pick: u8 },
    Advance { epochs: u8 },
    Deposit { epoch: u16, amount: u32 },
    Settle { pick: u8 },
    SettleUpto { pick: u8, epoch: u16 },
    Claim { pick: u8 },
    Sweep,
    Withdraw,
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(RewardLedgerContract, ());
    let client = RewardLedgerContractClient::new(&env, &contract_id);
    let minter = StellarAssetClient::new(&env, &token);
    let balances = TokenClient::new(&env, &token);

    let admin = Address::generate(&env);
    client.initialize(&admin, &token, &EPOCH_ZERO, &EPOCH_LENGTH);
    client.add_lock_tier(&admin, &1, &0, &0, &10_000);
    client.add_lock_tier(&admin, &2, &0, &1, &15_000);

    let mut operators = vec![];
    for node in 0..4u64 {
        let operator = Address::generate(&env);
        client.approve_node(&admin, &node, &operator, &(node as u32 * 2_500));
        operators.push(operator);
    }

    let mut epoch: u32 = 0;
    env.ledger().set_timestamp(EPOCH_ZERO);

    let mut positions: Vec<(Address, u64)> = vec![];

    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Stake { node, amount, operator, boosted } => {
                let node_id = (node % 4) as u64;
                let holder = if operator {
                    operators[node_id as usize].clone()
                } else {
                    Address::generate(&env)
                };
                let amount = amount as i128;
                if amount > 0 {
                    minter.mint(&holder, &amount);
                }
                let role = if operator { StakeRole::Operator } else { StakeRole::Delegator };
                let tier = if boosted { 2u32 } else { 1u32 };
                if let Ok(Ok(id)) = client.try_stake(&holder, &node_id, &amount, &tier, &role) {
                    positions.push((holder, id));
                }
            }
            FuzzAction::Exit { pick } if !positions.is_empty() => {
                let (holder, id) = &positions[pick as usize % positions.len()];
                let _ = client.try_exit(holder, id);
            }
            FuzzAction::Advance { epochs } => {
                epoch = epoch.saturating_add(epochs as u32 % 4);
                env.ledger()
                    .set_timestamp(EPOCH_ZERO + epoch as u64 * EPOCH_LENGTH);
            }
            FuzzAction::Deposit { epoch: target, amount } => {
                let amount = amount as i128;
                if amount > 0 {
                    minter.mint(&admin, &amount);
                }
                let _ = client.try_deposit_rewards(&admin, &(target as u32), &amount);
            }
            FuzzAction::Settle { pick } if !positions.is_empty() => {
                let (_, id) = &positions[pick as usize % positions.len()];
                let _ = client.try_settle(id);
            }
            FuzzAction::SettleUpto { pick, epoch: upto } if !positions.is_empty() => {
                let (_, id) = &positions[pick as usize % positions.len()];
                let _ = client.try_settle_upto(id, &(upto as u32));
            }
            FuzzAction::Claim { pick } if !positions.is_empty() => {
                let (holder, id) = &positions[pick as usize % positions.len()];
                let _ = client.try_claim_rewards(holder, id);
            }
            FuzzAction::Sweep => {
                let _ = client.try_sweep();
            }
            FuzzAction::Withdraw => {
                let _ = client.try_withdraw_reclaimable(&admin, &admin);
            }
            _ => {}
        }

        let custody = client.get_custody();
        assert_eq!(
            custody.circulating + custody.reclaimable,
            balances.balance(&contract_id),
            "custody split drifted from the token balance"
        );
        assert!(custody.circulating >= 0 && custody.reclaimable >= 0);
    }
});
