use soroban_sdk::{symbol_short, Address, Env, Symbol};

const OPERATOR: Symbol = symbol_short!("OPERATOR");
const OPERATOR_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const OPERATOR_TTL_EXTEND_TO: u32 = 518_400; // ~30 days

fn operator_key(address: &Address) -> (Symbol, Address) {
    (OPERATOR, address.clone())
}

fn extend_operator_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, OPERATOR_TTL_THRESHOLD, OPERATOR_TTL_EXTEND_TO);
}

/// Grants operator rights to `address`.
///
/// Returns `false` when the address already was an operator.
pub fn add_operator(env: &Env, address: &Address) -> bool {
    let key = operator_key(address);
    if env.storage().persistent().has(&key) {
        extend_operator_ttl(env, &key);
        return false;
    }
    env.storage().persistent().set(&key, &true);
    extend_operator_ttl(env, &key);
    true
}

/// Revokes operator rights. Returns `false` when `address` was not an operator.
pub fn remove_operator(env: &Env, address: &Address) -> bool {
    let key = operator_key(address);
    if !env.storage().persistent().has(&key) {
        return false;
    }
    env.storage().persistent().remove(&key);
    true
}

/// Returns whether `address` currently holds operator rights.
pub fn is_operator(env: &Env, address: &Address) -> bool {
    let key = operator_key(address);
    let is_operator = env.storage().persistent().get(&key).unwrap_or(false);
    if is_operator {
        extend_operator_ttl(env, &key);
    }
    is_operator
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{contract, testutils::Address as _};

    #[contract]
    pub struct Harness;

    #[test]
    fn add_and_remove_operator() {
        let env = Env::default();
        let contract_id = env.register(Harness, ());
        let operator = Address::generate(&env);

        env.as_contract(&contract_id, || {
            assert!(!is_operator(&env, &operator));

            assert!(add_operator(&env, &operator));
            assert!(is_operator(&env, &operator));

            // Second grant is a no-op.
            assert!(!add_operator(&env, &operator));

            assert!(remove_operator(&env, &operator));
            assert!(!is_operator(&env, &operator));
            assert!(!remove_operator(&env, &operator));
        });
    }
}
