//! # Call Journal
//!
//! Records each external effect of a call with its inverse and buffers the
//! call's events. `commit` publishes the events and only then keeps the
//! effects; dropping an uncommitted journal undoes the effects newest-first,
//! so a failed call, or one whose events cannot be published, leaves no trace.

use super::RegistrarContext;
use crate::domain::RegistrarError;
use crate::events::{EmittedEvent, RegistrarEvent};
use crate::ports::outbound::{
    AddressResolver, EventSink, LegacyRegistrar, NameRegistry, ValueTransfer,
};
use shared_types::{subnode, Address, Hash, U256};
use tracing::{debug, error};

/// An applied effect and what it replaced.
#[derive(Clone, Copy, Debug)]
enum Effect {
    Owner {
        node: Hash,
        previous: Address,
    },
    Resolver {
        node: Hash,
        previous: Address,
    },
    Addr {
        resolver: Address,
        node: Hash,
        previous: Address,
    },
    Value {
        from: Address,
        to: Address,
        amount: U256,
    },
    Deed {
        label_hash: Hash,
        owner: Address,
        previous_owner: Address,
    },
}

pub(crate) struct Journal<'a> {
    ctx: &'a RegistrarContext,
    effects: Vec<Effect>,
    events: Vec<EmittedEvent>,
    committed: bool,
}

impl<'a> Journal<'a> {
    pub(crate) fn new(ctx: &'a RegistrarContext) -> Self {
        Self {
            ctx,
            effects: Vec::new(),
            events: Vec::new(),
            committed: false,
        }
    }

    pub(crate) fn set_owner(&mut self, node: Hash, owner: Address) -> Result<(), RegistrarError> {
        let previous = self.ctx.names.owner(node);
        self.ctx.names.set_owner(node, owner)?;
        self.effects.push(Effect::Owner { node, previous });
        Ok(())
    }

    pub(crate) fn set_resolver(
        &mut self,
        node: Hash,
        resolver: Address,
    ) -> Result<(), RegistrarError> {
        let previous = self.ctx.names.resolver(node);
        self.ctx.names.set_resolver(node, resolver)?;
        self.effects.push(Effect::Resolver { node, previous });
        Ok(())
    }

    pub(crate) fn set_addr(
        &mut self,
        resolver: Address,
        node: Hash,
        addr: Address,
    ) -> Result<(), RegistrarError> {
        let previous = self.ctx.resolvers.addr(resolver, node);
        self.ctx.resolvers.set_addr(resolver, node, addr)?;
        self.effects.push(Effect::Addr {
            resolver,
            node,
            previous,
        });
        Ok(())
    }

    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), RegistrarError> {
        self.ctx.ledger.transfer(from, to, amount)?;
        self.effects.push(Effect::Value { from, to, amount });
        Ok(())
    }

    /// Move a legacy deed. The legacy registrar may also move the label
    /// node, so its owner is journaled alongside.
    pub(crate) fn transfer_deed(
        &mut self,
        label_hash: Hash,
        to: Address,
    ) -> Result<(), RegistrarError> {
        let node = subnode(self.ctx.config.tld_node(), label_hash);
        let previous_node_owner = self.ctx.names.owner(node);
        let owner = self.ctx.legacy.deed_owner(label_hash);
        let previous_owner = self.ctx.legacy.previous_owner(label_hash);
        self.ctx.legacy.transfer_deed(label_hash, to)?;
        self.effects.push(Effect::Deed {
            label_hash,
            owner,
            previous_owner,
        });
        if self.ctx.names.owner(node) != previous_node_owner {
            self.effects.push(Effect::Owner {
                node,
                previous: previous_node_owner,
            });
        }
        Ok(())
    }

    pub(crate) fn emit(&mut self, emitter: Address, event: RegistrarEvent) {
        self.events.push(EmittedEvent { emitter, event });
    }

    /// Publish the buffered events, then keep every effect. A publication
    /// failure drops the journal and rolls the call back.
    pub(crate) fn commit(mut self) -> Result<(), RegistrarError> {
        if !self.events.is_empty() {
            self.ctx.events.publish(&self.events)?;
        }
        self.committed = true;
        self.effects.clear();
        Ok(())
    }

    fn undo(&self, effect: Effect) -> Result<(), RegistrarError> {
        match effect {
            Effect::Owner { node, previous } => self.ctx.names.set_owner(node, previous),
            Effect::Resolver { node, previous } => self.ctx.names.set_resolver(node, previous),
            Effect::Addr {
                resolver,
                node,
                previous,
            } => self.ctx.resolvers.set_addr(resolver, node, previous),
            Effect::Value { from, to, amount } => Ok(self.ctx.ledger.reverse(from, to, amount)?),
            Effect::Deed {
                label_hash,
                owner,
                previous_owner,
            } => self
                .ctx
                .legacy
                .restore_deed(label_hash, owner, previous_owner),
        }
    }
}

impl Drop for Journal<'_> {
    fn drop(&mut self) {
        if self.committed || self.effects.is_empty() {
            return;
        }
        debug!(effects = self.effects.len(), "Rolling back call");
        while let Some(effect) = self.effects.pop() {
            if let Err(e) = self.undo(effect) {
                error!(?effect, error = %e, "Rollback step failed");
            }
        }
    }
}
