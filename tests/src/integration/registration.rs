//! # Registration Flow
//!
//! Listing a label, selling subdomains, and the settlement that follows.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account, World, REGISTRY};
    use shared_types::{labelhash, namehash, Address, U256};
    use subdomain_registrar::prelude::*;

    const PRICE: u64 = 10_000_000_000_000_000;

    fn listed_world() -> (World, Address) {
        let world = World::new();
        let owner = account(0);
        world.onboard("test", owner);
        world
            .registry
            .configure_domain(owner, "test", U256::from(PRICE), 100_000)
            .unwrap();
        (world, owner)
    }

    #[test]
    fn test_ten_percent_referral_scenario() {
        let (world, owner) = listed_world();
        let buyer = account(1);
        let referrer = account(2);
        world.env.ledger.mint(buyer, U256::from(PRICE));

        let request =
            RegistrationRequest::new("test", "foo", buyer, U256::from(PRICE)).referrer(referrer);
        world.registry.register(buyer, request.clone()).unwrap();

        assert_eq!(
            world.env.ledger.balance(referrer),
            U256::from(1_000_000_000_000_000u64)
        );
        assert_eq!(
            world.env.ledger.balance(owner),
            U256::from(9_000_000_000_000_000u64)
        );
        assert_eq!(world.env.names.owner(namehash("foo.test.eth")), buyer);

        world.env.ledger.mint(buyer, U256::from(PRICE));
        assert_eq!(
            world.registry.register(buyer, request),
            Err(RegistrarError::AlreadyOwned {
                label: "test".to_string(),
                subdomain: "foo".to_string(),
            })
        );
    }

    #[test]
    fn test_registration_event_carries_details() {
        let (world, _) = listed_world();
        let buyer = account(1);
        let referrer = account(2);
        world.env.ledger.mint(buyer, U256::from(PRICE));
        world.env.events.clear();

        let request =
            RegistrationRequest::new("test", "foo", buyer, U256::from(PRICE)).referrer(referrer);
        world.registry.register(buyer, request).unwrap();

        let events = world.env.events.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].emitter, REGISTRY);
        assert_eq!(
            events[0].event,
            RegistrarEvent::NewRegistration {
                label: labelhash("test"),
                subdomain: "foo".to_string(),
                owner: buyer,
                price: U256::from(PRICE),
                referrer,
            }
        );
    }

    #[test]
    fn test_deed_handover_onboards_owner() {
        let world = World::new();
        let owner = account(0);
        world.issue("test", owner);
        world
            .env
            .legacy
            .transfer_deed(labelhash("test"), REGISTRY)
            .unwrap();
        assert_eq!(world.env.names.owner(namehash("test.eth")), REGISTRY);
        assert_eq!(world.registry.authority("test"), Authority::Custodial(owner));

        world
            .registry
            .configure_domain(owner, "test", U256::from(PRICE), 100_000)
            .unwrap();
        assert_eq!(
            world.registry.record("test").unwrap().custodial_owner,
            owner
        );

        let buyer = account(1);
        world.env.ledger.mint(buyer, U256::from(PRICE));
        let request = RegistrationRequest::new("test", "foo", buyer, U256::from(PRICE));
        world.registry.register(buyer, request).unwrap();
        assert_eq!(world.env.ledger.balance(owner), U256::from(PRICE));
        assert_eq!(world.env.names.owner(namehash("foo.test.eth")), buyer);
    }

    #[test]
    fn test_directly_held_label_cannot_sell() {
        let world = World::new();
        let owner = account(0);
        world.issue("test", owner);
        world
            .registry
            .configure_domain(owner, "test", U256::from(PRICE), 0)
            .unwrap();

        let buyer = account(1);
        world.env.ledger.mint(buyer, U256::from(PRICE));
        let request = RegistrationRequest::new("test", "foo", buyer, U256::from(PRICE));
        assert_eq!(
            world.registry.register(buyer, request),
            Err(RegistrarError::NodeNotHeld {
                label: "test".to_string(),
                holder: REGISTRY,
            })
        );
        assert_eq!(world.env.ledger.balance(buyer), U256::from(PRICE));
        assert_eq!(world.env.ledger.balance(owner), U256::zero());
        assert_eq!(
            world.env.names.owner(namehash("foo.test.eth")),
            Address::ZERO
        );
    }

    #[test]
    fn test_unconfigured_domain_cannot_sell() {
        let world = World::new();
        world.issue("test", account(0));
        let buyer = account(1);
        world.env.ledger.mint(buyer, U256::from(PRICE));

        let request = RegistrationRequest::new("test", "foo", buyer, U256::from(PRICE));
        assert_eq!(
            world.registry.register(buyer, request),
            Err(RegistrarError::DomainUnlisted("test".to_string()))
        );
        assert_eq!(world.env.ledger.balance(buyer), U256::from(PRICE));
    }

    #[test]
    fn test_non_owner_cannot_configure_other_label() {
        let (world, owner) = listed_world();
        assert_eq!(
            world
                .registry
                .configure_domain(owner, "toast", U256::from(1u64), 0),
            Err(RegistrarError::unauthorized(owner, "toast"))
        );
    }

    #[test]
    fn test_external_transfer_moves_authority() {
        let (world, owner) = listed_world();
        let new_owner = account(1);
        world.issue("test", new_owner);

        world
            .registry
            .configure_domain(new_owner, "test", U256::from(PRICE / 10), 10_000)
            .unwrap();
        let q = world.registry.query("test", "");
        assert_eq!(q.price, U256::from(PRICE / 10));
        assert_eq!(q.referral_fee_ppm, 10_000);
        assert!(world.registry.unlist_domain(owner, "test").is_err());
    }

    #[test]
    fn test_free_registration_without_referrer() {
        let world = World::new();
        let owner = account(0);
        world.onboard("free", owner);
        world
            .registry
            .configure_domain(owner, "free", U256::zero(), 500_000)
            .unwrap();

        let buyer = account(1);
        let request = RegistrationRequest::new("free", "me", buyer, U256::zero());
        world.registry.register(buyer, request).unwrap();
        assert_eq!(world.env.names.owner(namehash("me.free.eth")), buyer);
        assert_eq!(world.env.ledger.balance(owner), U256::zero());
    }

    #[test]
    fn test_subdomain_with_dot_rejected() {
        let (world, _) = listed_world();
        let buyer = account(1);
        world.env.ledger.mint(buyer, U256::from(PRICE));
        let request = RegistrationRequest::new("test", "a.b", buyer, U256::from(PRICE));
        assert_eq!(
            world.registry.register(buyer, request),
            Err(RegistrarError::InvalidLabel("a.b".to_string()))
        );
    }

    #[test]
    fn test_stats_track_outcomes() {
        let (world, _) = listed_world();
        let buyer = account(1);
        world.env.ledger.mint(buyer, U256::from(PRICE * 2));

        for sub in ["a", "b"] {
            let request = RegistrationRequest::new("test", sub, buyer, U256::from(PRICE));
            world.registry.register(buyer, request).unwrap();
        }
        let request = RegistrationRequest::new("test", "a", buyer, U256::from(PRICE));
        assert!(world.registry.register(buyer, request).is_err());

        let stats = world.registry.stats();
        assert_eq!(stats.registrations, 2);
        assert_eq!(stats.rejected_registrations, 1);
        assert_eq!(stats.settled_volume, U256::from(PRICE * 2));
    }

    #[test]
    fn test_zero_address_owner_cannot_be_paid() {
        let world = World::new();
        // Label never issued: authority is zero, nobody may configure it.
        assert_eq!(
            world
                .registry
                .configure_domain(Address::ZERO, "ghost", U256::one(), 0),
            Err(RegistrarError::unauthorized(Address::ZERO, "ghost"))
        );
    }
}
