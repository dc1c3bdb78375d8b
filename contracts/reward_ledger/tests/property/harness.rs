//! Shared fixtures for the property suites.

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use reward_ledger::{RewardLedgerContract, RewardLedgerContractClient, StakeRole};

pub const EPOCH_ZERO: u64 = 1_000;
pub const EPOCH_LENGTH: u64 = 100;

pub const BASE_TIER: u32 = 1;
pub const BOOST_TIER: u32 = 2;

/// Fees of the nodes opened by [`launch`], one node per entry.
pub const NODE_FEES: [u32; 3] = [0, 500, 2_000];

pub struct Fixture {
    pub env: Env,
    pub client: RewardLedgerContractClient<'static>,
    pub admin: Address,
    pub token: Address,
}

impl Fixture {
    pub fn at_epoch(&self, epoch: u32) {
        self.env
            .ledger()
            .set_timestamp(EPOCH_ZERO + epoch as u64 * EPOCH_LENGTH + 1);
    }

    pub fn mint(&self, to: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.token).mint(to, &amount);
    }

    pub fn held(&self) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(&self.client.address)
    }

    pub fn open_node(&self, node_id: u64, fee_bps: u32, principal: i128) -> (Address, u64) {
        let operator = Address::generate(&self.env);
        self.client
            .approve_node(&self.admin, &node_id, &operator, &fee_bps);
        self.mint(&operator, principal);
        let id = self
            .client
            .stake(&operator, &node_id, &principal, &BASE_TIER, &StakeRole::Operator);
        (operator, id)
    }

    pub fn delegate(&self, node_id: u64, principal: i128, tier_id: u32) -> (Address, u64) {
        let holder = Address::generate(&self.env);
        self.mint(&holder, principal);
        let id = self
            .client
            .stake(&holder, &node_id, &principal, &tier_id, &StakeRole::Delegator);
        (holder, id)
    }

    pub fn fund(&self, epoch: u32, amount: i128) {
        self.mint(&self.admin, amount);
        self.client.deposit_rewards(&self.admin, &epoch, &amount);
    }
}

/// Initialised ledger at epoch 0 with a 1.0× and a 1.2× tier, no locks.
pub fn launch() -> Fixture {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(RewardLedgerContract, ());
    let client = RewardLedgerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &token, &EPOCH_ZERO, &EPOCH_LENGTH);
    client.add_lock_tier(&admin, &BASE_TIER, &0, &0, &10_000);
    client.add_lock_tier(&admin, &BOOST_TIER, &0, &0, &12_000);

    let fixture = Fixture {
        env,
        client,
        admin,
        token,
    };
    fixture.at_epoch(0);
    fixture
}
