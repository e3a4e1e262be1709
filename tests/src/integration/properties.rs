//! # Randomized Properties
//!
//! Conservation, authority gating and idempotence checked over random
//! prices, fees and callers.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account, World, OPERATOR, REGISTRY};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use shared_types::{namehash, Address, U256};
    use subdomain_registrar::prelude::*;

    const ROUNDS: usize = 64;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_registration_conserves_value() {
        let mut rng = rng();
        for round in 0..ROUNDS {
            let world = World::new();
            let owner = account(0);
            let buyer = account(1);
            let referrer = if rng.gen_bool(0.5) {
                account(2)
            } else {
                Address::ZERO
            };
            world.onboard("test", owner);

            let price = U256::from(rng.gen::<u64>());
            let ppm = rng.gen_range(0..=1_000_000u32);
            let payment = price + U256::from(rng.gen_range(0..1_000u64));
            world
                .registry
                .configure_domain(owner, "test", price, ppm)
                .unwrap();
            world.env.ledger.mint(buyer, payment);
            let before = world.env.ledger.total();

            let request = RegistrationRequest::new("test", "sub", buyer, payment).referrer(referrer);
            world.registry.register(buyer, request).unwrap();

            let ledger = &world.env.ledger;
            let mut received = ledger.balance(owner);
            if !referrer.is_zero() {
                received += ledger.balance(referrer);
            }
            assert_eq!(received, price, "round {round}");
            assert_eq!(ledger.balance(REGISTRY), payment - price, "round {round}");
            assert_eq!(ledger.balance(buyer), U256::zero(), "round {round}");
            assert_eq!(ledger.total(), before, "round {round}");
        }
    }

    #[test]
    fn test_only_authority_administers() {
        let mut rng = rng();
        let world = World::new();
        let owner = account(0);
        world.issue("test", owner);
        world
            .registry
            .configure_domain(owner, "test", U256::from(1u64), 0)
            .unwrap();

        for _ in 0..ROUNDS {
            let caller = Address::repeat_byte(rng.gen_range(2..=0xfe));
            if caller == owner || caller == OPERATOR {
                continue;
            }
            let denied = RegistrarError::unauthorized(caller, "test");
            assert_eq!(
                world
                    .registry
                    .configure_domain(caller, "test", U256::from(rng.gen::<u64>()), 0),
                Err(denied.clone())
            );
            assert_eq!(world.registry.unlist_domain(caller, "test"), Err(denied.clone()));
            assert_eq!(
                world.registry.set_transfer_address(caller, "test", caller),
                Err(denied)
            );
        }
        assert_eq!(world.registry.query("test", "").price, U256::from(1u64));
    }

    #[test]
    fn test_relisting_is_idempotent() {
        let mut rng = rng();
        let world = World::new();
        let owner = account(0);
        world.issue("test", owner);

        for _ in 0..ROUNDS {
            let price = U256::from(rng.gen::<u64>());
            let ppm = rng.gen_range(0..=1_000_000u32);
            world
                .registry
                .configure_domain(owner, "test", price, ppm)
                .unwrap();
            let first = world.registry.query("test", "");
            world
                .registry
                .configure_domain(owner, "test", price, ppm)
                .unwrap();
            assert_eq!(world.registry.query("test", ""), first);
            assert_eq!(first.price, price);
            assert_eq!(first.referral_fee_ppm, ppm);

            if rng.gen_bool(0.3) {
                world.registry.unlist_domain(owner, "test").unwrap();
                assert!(!world.registry.query("test", "").is_listed());
            }
        }
    }

    #[test]
    fn test_subdomain_sold_once() {
        let mut rng = rng();
        let world = World::new();
        let owner = account(0);
        world.onboard("test", owner);
        world
            .registry
            .configure_domain(owner, "test", U256::zero(), 0)
            .unwrap();

        let labels = ["a", "b", "c", "d"];
        let mut sold = std::collections::HashMap::new();
        for _ in 0..ROUNDS {
            let subdomain = labels[rng.gen_range(0..labels.len())];
            let buyer = account(rng.gen_range(1..10));
            let request = RegistrationRequest::new("test", subdomain, buyer, U256::zero());
            let result = world.registry.register(buyer, request);

            match sold.get(subdomain) {
                None => {
                    assert!(result.is_ok());
                    sold.insert(subdomain, buyer);
                }
                Some(_) => assert!(matches!(result, Err(RegistrarError::AlreadyOwned { .. }))),
            }
            let node = namehash(&format!("{subdomain}.test.eth"));
            assert_eq!(world.env.names.owner(node), sold[subdomain]);
        }
    }
}
