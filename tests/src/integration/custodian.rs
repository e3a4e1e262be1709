//! # Deed Custody Flow
//!
//! A legacy deed enters custody, changes beneficial owner, is assigned once,
//! and is claimed back after the TLD moves to a new registrar.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account, World, CUSTODIAN};
    use shared_types::{labelhash, namehash, U256};
    use subdomain_registrar::prelude::*;

    #[test]
    fn test_full_custody_lifecycle() {
        let world = World::new();
        let node = namehash("deedtest.eth");
        let (a0, a1, a2, a3) = (account(0), account(1), account(2), account(3));

        world.issue("deedtest", a0);
        assert_eq!(world.env.names.owner(node), a0);

        world.custodian.deposit(a0, "deedtest").unwrap();
        assert_eq!(world.custodian.deed_owner("deedtest"), a0);
        assert_eq!(world.env.names.owner(node), CUSTODIAN);

        world.custodian.transfer_deed(a0, "deedtest", a1).unwrap();
        assert_eq!(world.custodian.deed_owner("deedtest"), a1);
        assert_eq!(world.env.names.owner(node), CUSTODIAN);

        assert!(world.custodian.transfer_deed(a0, "deedtest", a0).is_err());
        assert!(world.custodian.assign(a0, "deedtest", a2).is_err());

        world.custodian.assign(a1, "deedtest", a2).unwrap();
        assert_eq!(world.env.names.owner(node), a2);

        assert_eq!(
            world.custodian.assign(a1, "deedtest", a3),
            Err(RegistrarError::AlreadyAssigned("deedtest".to_string()))
        );
        assert_eq!(
            world.custodian.claim(a1, "deedtest"),
            Err(RegistrarError::ParentUnchanged)
        );

        world.env.replace_tld_owner(a0);
        world.custodian.claim(a1, "deedtest").unwrap();
        assert_eq!(world.env.legacy.deed_owner(labelhash("deedtest")), a1);
        assert_eq!(world.env.names.owner(node), a2);
    }

    #[test]
    fn test_escrowed_label_is_administered_by_deed_owner() {
        let world = World::new();
        let (a0, a1, buyer) = (account(0), account(1), account(5));
        world.issue("vault", a0);
        world.custodian.deposit(a0, "vault").unwrap();

        world
            .registry
            .configure_domain(a0, "vault", U256::from(100u64), 0)
            .unwrap();

        world.custodian.transfer_deed(a0, "vault", a1).unwrap();
        assert_eq!(
            world.registry.unlist_domain(a0, "vault"),
            Err(RegistrarError::unauthorized(a0, "vault"))
        );

        world.env.ledger.mint(buyer, U256::from(100u64));
        let request = RegistrationRequest::new("vault", "x", buyer, U256::from(100u64));
        world.registry.register(buyer, request).unwrap();
        assert_eq!(world.env.ledger.balance(a1), U256::from(100u64));
        assert_eq!(world.env.ledger.balance(a0), U256::zero());
    }

    #[test]
    fn test_custody_events_in_order() {
        let world = World::new();
        let (a0, a1) = (account(0), account(1));
        world.issue("deedtest", a0);
        world.custodian.deposit(a0, "deedtest").unwrap();
        world.custodian.transfer_deed(a0, "deedtest", a1).unwrap();
        world.custodian.assign(a1, "deedtest", a1).unwrap();

        let names: Vec<&str> = world
            .env
            .events
            .payloads()
            .iter()
            .map(RegistrarEvent::name)
            .collect();
        assert_eq!(names, vec!["DeedEscrowed", "DeedTransferred", "DeedAssigned"]);
    }

    #[test]
    fn test_claimed_deed_cannot_be_assigned_again() {
        let world = World::new();
        let node = namehash("deedtest.eth");
        let (a0, a1, a2) = (account(0), account(1), account(2));
        world.issue("deedtest", a0);
        world.custodian.deposit(a0, "deedtest").unwrap();
        world.custodian.assign(a0, "deedtest", a1).unwrap();

        world.env.replace_tld_owner(a2);
        world.custodian.claim(a0, "deedtest").unwrap();
        world.custodian.deposit(a0, "deedtest").unwrap();
        assert_eq!(
            world.custodian.assign(a0, "deedtest", a2),
            Err(RegistrarError::AlreadyAssigned("deedtest".to_string()))
        );
        assert_eq!(world.env.names.owner(node), a1);

        let bytes = world.custodian.snapshot().unwrap();
        let restarted = world.env.deploy_custodian(CUSTODIAN);
        restarted.restore_snapshot(&bytes).unwrap();
        assert_eq!(
            restarted.assign(a0, "deedtest", a2),
            Err(RegistrarError::AlreadyAssigned("deedtest".to_string()))
        );
        assert_eq!(world.env.names.owner(node), a1);
    }

    #[test]
    fn test_custodian_snapshot_survives_restart() {
        let world = World::new();
        let a0 = account(0);
        world.issue("deedtest", a0);
        world.custodian.deposit(a0, "deedtest").unwrap();

        let bytes = world.custodian.snapshot().unwrap();
        let restarted = world.env.deploy_custodian(CUSTODIAN);
        restarted.restore_snapshot(&bytes).unwrap();
        assert_eq!(restarted.deed_owner("deedtest"), a0);
        assert!(restarted.escrow("deedtest").is_some());
    }
}
