//! # Observability and Persistence
//!
//! Event streams written as JSON lines, registry snapshots across a restart,
//! and the logging bootstrap configuration.

#[cfg(test)]
mod tests {
    use crate::fixtures::{account, init_test_logging, World, CUSTODIAN, OPERATOR, REGISTRY};
    use parking_lot::Mutex;
    use registrar_telemetry::TelemetryConfig;
    use shared_types::{labelhash, namehash, Address, U256};
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use subdomain_registrar::prelude::*;

    /// Writer that can be unplugged mid-test.
    #[derive(Clone, Default)]
    struct Pluggable {
        unplugged: Arc<AtomicBool>,
        written: Arc<Mutex<Vec<u8>>>,
    }

    impl Write for Pluggable {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.unplugged.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
            }
            self.written.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_events_stream_as_json_lines() {
        init_test_logging();
        let env = InMemoryEnvironment::new();
        let sink = Arc::new(JsonLinesEventSink::new(Vec::new()));
        let mut ctx = env.context();
        ctx.events = sink.clone();

        let custodian = env.deploy_custodian(CUSTODIAN);
        let registry = DomainRegistry::new(REGISTRY, OPERATOR, custodian, ctx);
        let owner = account(0);
        env.legacy.issue("test", owner).unwrap();
        registry
            .configure_domain(owner, "test", U256::from(5u64), 250_000)
            .unwrap();
        registry.unlist_domain(owner, "test").unwrap();
        assert!(registry.unlist_domain(account(1), "test").is_err());
        drop(registry);

        let Ok(sink) = Arc::try_unwrap(sink) else {
            panic!("registry dropped, sink must be unshared");
        };
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"]["event"], "DomainConfigured");
        assert_eq!(lines[0]["event"]["referral_fee"], 250_000);
        assert_eq!(lines[1]["event"]["event"], "DomainUnlisted");
        assert!(env.events.is_empty());
    }

    #[test]
    fn test_failed_event_write_undoes_registration() {
        init_test_logging();
        let env = InMemoryEnvironment::new();
        let writer = Pluggable::default();
        let mut ctx = env.context();
        ctx.events = Arc::new(JsonLinesEventSink::new(writer.clone()));

        let custodian = env.deploy_custodian(CUSTODIAN);
        let registry = DomainRegistry::new(REGISTRY, OPERATOR, custodian, ctx);
        let owner = account(0);
        let referrer = account(2);
        env.legacy.issue("test", owner).unwrap();
        env.legacy.transfer_deed(labelhash("test"), REGISTRY).unwrap();
        registry
            .configure_domain(owner, "test", U256::from(100u64), 100_000)
            .unwrap();

        let buyer = account(1);
        env.ledger.mint(buyer, U256::from(100u64));
        writer.unplugged.store(true, Ordering::SeqCst);

        let request =
            RegistrationRequest::new("test", "foo", buyer, U256::from(100u64)).referrer(referrer);
        assert!(matches!(
            registry.register(buyer, request.clone()),
            Err(RegistrarError::EventSink(EventSinkError::Write(_)))
        ));
        assert_eq!(env.ledger.balance(buyer), U256::from(100u64));
        assert_eq!(env.ledger.balance(owner), U256::zero());
        assert_eq!(env.ledger.balance(referrer), U256::zero());
        assert_eq!(env.names.owner(namehash("foo.test.eth")), Address::ZERO);
        assert_eq!(registry.stats().rejected_registrations, 1);

        writer.unplugged.store(false, Ordering::SeqCst);
        registry.register(buyer, request).unwrap();
        assert_eq!(env.ledger.balance(owner), U256::from(90u64));
        assert_eq!(env.names.owner(namehash("foo.test.eth")), buyer);

        let output = String::from_utf8(writer.written.lock().clone()).unwrap();
        let names: Vec<String> = output
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["event"]["event"].as_str().unwrap_or_default().to_string()
            })
            .collect();
        assert_eq!(names, vec!["DomainConfigured", "NewRegistration"]);
    }

    #[test]
    fn test_registry_snapshot_survives_restart() {
        let world = World::new();
        let owner = account(0);
        world.issue("test", owner);
        world
            .registry
            .configure_domain(owner, "test", U256::from(77u64), 1_000)
            .unwrap();
        world.registry.stop(OPERATOR).unwrap();
        let bytes = world.registry.snapshot().unwrap();

        let restarted =
            world
                .env
                .deploy_registry(Address::repeat_byte(0xab), OPERATOR, world.custodian.clone());
        restarted.restore_snapshot(&bytes).unwrap();

        assert_eq!(restarted.record("test"), world.registry.record("test"));
        assert_eq!(restarted.state(), world.registry.state());
        assert_eq!(
            restarted.configure_domain(owner, "test", U256::one(), 0),
            Err(RegistrarError::RegistrarStopped)
        );
    }

    #[test]
    fn test_rejections_are_counted() {
        let world = World::new();
        let owner = account(0);
        world.onboard("test", owner);
        world
            .registry
            .configure_domain(owner, "test", U256::from(10u64), 0)
            .unwrap();

        let buyer = account(1);
        let short = RegistrationRequest::new("test", "foo", buyer, U256::from(9u64));
        assert!(world.registry.register(buyer, short).is_err());

        world.env.ledger.mint(buyer, U256::from(10u64));
        let paid = RegistrationRequest::new("test", "foo", buyer, U256::from(10u64));
        world.registry.register(buyer, paid).unwrap();

        let stats = world.registry.stats();
        assert_eq!(stats.registrations, 1);
        assert_eq!(stats.rejected_registrations, 1);
        assert_eq!(stats.settled_volume, U256::from(10u64));
    }

    #[test]
    fn test_telemetry_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "subdomain-registrar");
        assert!(config.console_output);
        assert_eq!(TelemetryConfig::with_level("debug").log_level, "debug");
    }

    #[test]
    fn test_label_span_macro() {
        init_test_logging();
        let span = registrar_telemetry::label_span!("configure_domain", "test");
        let _entered = span.entered();
        tracing::info!("inside label span");
    }
}
