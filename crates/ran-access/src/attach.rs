//! The terminal attach state machine.

use std::collections::BTreeMap;
use std::fmt;

use ran_core::{DeviceId, DeviceRole, SimConfig, SimTime};
use ran_sched::{EventHandle, Scheduler};
use ran_topology::Topology;
use tracing::debug;

use crate::{AccessError, AccessEvent, AccessResult, BearerManager, QosClass};

// ── AttachState ───────────────────────────────────────────────────────────────

/// Where a terminal is in the attach procedure.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachState {
    #[default]
    Idle,
    Discovering,
    Attaching,
    Connected,
}

impl AttachState {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachState::Idle        => "idle",
            AttachState::Discovering => "discovering",
            AttachState::Attaching   => "attaching",
            AttachState::Connected   => "connected",
        }
    }
}

impl fmt::Display for AttachState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change, reported to observers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Transition {
    pub terminal: DeviceId,
    pub from:     AttachState,
    pub to:       AttachState,
    pub at:       SimTime,
}

// ── Per-terminal context ──────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct TerminalContext {
    state:           AttachState,
    /// Base station chosen by `begin_attach`; kept until detach.
    target:          Option<DeviceId>,
    /// Procedure timer currently on the scheduler, if any.
    pending:         Option<EventHandle>,
    connected_since: Option<SimTime>,
}

// ── AttachMachine ─────────────────────────────────────────────────────────────

/// Drives terminals through `Idle → Discovering → Attaching → Connected`.
///
/// Terminals that never called `begin_attach` are implicitly `Idle`; the
/// machine only stores context for terminals it has seen.
#[derive(Debug)]
pub struct AttachMachine {
    terminals:       BTreeMap<DeviceId, TerminalContext>,
    discovery_delay: SimTime,
    attach_delay:    SimTime,
    /// Class of the bearer activated automatically on attach completion.
    default_bearer:  Option<QosClass>,
}

impl AttachMachine {
    /// Build a machine using the timers in `config`.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            terminals:       BTreeMap::new(),
            discovery_delay: config.discovery_delay,
            attach_delay:    config.attach_delay,
            default_bearer:  None,
        }
    }

    /// Activate a bearer of class `qos` whenever a terminal reaches
    /// `Connected`.  `None` (the default) leaves bearer setup to the caller.
    pub fn with_default_bearer(mut self, qos: Option<QosClass>) -> Self {
        self.set_default_bearer(qos);
        self
    }

    /// Takes effect for terminals that complete attach after the call.
    pub fn set_default_bearer(&mut self, qos: Option<QosClass>) {
        self.default_bearer = qos;
    }

    pub fn default_bearer(&self) -> Option<QosClass> {
        self.default_bearer
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn state(&self, terminal: DeviceId) -> AttachState {
        self.terminals.get(&terminal).map(|c| c.state).unwrap_or_default()
    }

    #[inline]
    pub fn is_connected(&self, terminal: DeviceId) -> bool {
        self.state(terminal) == AttachState::Connected
    }

    /// Base station the terminal is attaching or attached to.
    pub fn serving_cell(&self, terminal: DeviceId) -> Option<DeviceId> {
        self.terminals.get(&terminal).and_then(|c| c.target)
    }

    /// Time the terminal last reached `Connected`, while it stays connected.
    pub fn connected_since(&self, terminal: DeviceId) -> Option<SimTime> {
        self.terminals.get(&terminal).and_then(|c| c.connected_since)
    }

    /// Procedure timer armed for the terminal's current state, if any.
    pub fn pending_timer(&self, terminal: DeviceId) -> Option<EventHandle> {
        self.terminals.get(&terminal).and_then(|c| c.pending)
    }

    /// Terminals currently in `state`, in id order.
    pub fn terminals_in(&self, state: AttachState) -> Vec<DeviceId> {
        self.terminals
            .iter()
            .filter(|(_, c)| c.state == state)
            .map(|(&id, _)| id)
            .collect()
    }

    // ── Procedure ─────────────────────────────────────────────────────────

    /// Start attaching `terminal` to `base_station`.
    ///
    /// Moves the terminal to `Discovering` and schedules discovery
    /// completion after the configured discovery delay.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Topology`] if either device is unknown.
    /// - [`AccessError::RoleMismatch`] if the roles are not terminal and
    ///   base station.
    /// - [`AccessError::InvalidState`] unless the terminal is `Idle`.
    pub fn begin_attach<E: From<AccessEvent>>(
        &mut self,
        sched:        &mut Scheduler<E>,
        topology:     &Topology,
        terminal:     DeviceId,
        base_station: DeviceId,
    ) -> AccessResult<Transition> {
        expect_role(topology, terminal, DeviceRole::Terminal)?;
        expect_role(topology, base_station, DeviceRole::BaseStation)?;

        let ctx = self.terminals.entry(terminal).or_default();
        if ctx.state != AttachState::Idle {
            return Err(AccessError::InvalidState {
                terminal,
                state: ctx.state,
                operation: "begin_attach",
            });
        }

        let handle = sched.schedule_in(
            self.discovery_delay,
            E::from(AccessEvent::DiscoveryComplete { terminal, base_station }),
        );
        ctx.target = Some(base_station);
        ctx.pending = Some(handle);
        Ok(set_state(ctx, terminal, AttachState::Discovering, sched.now()))
    }

    /// Advance the procedure for a popped [`AccessEvent`].
    ///
    /// - `DiscoveryComplete`: associate terminal → base station, move to
    ///   `Attaching`, schedule attach completion.
    /// - `AttachComplete`: move to `Connected` and, if configured, activate
    ///   the default bearer.
    ///
    /// # Errors
    ///
    /// [`AccessError::InvalidState`] if the terminal is not in the state the
    /// timer was armed in, and any association error from the registry.
    pub fn on_event<E: From<AccessEvent>>(
        &mut self,
        event:    AccessEvent,
        sched:    &mut Scheduler<E>,
        topology: &mut Topology,
        bearers:  &mut BearerManager,
    ) -> AccessResult<Transition> {
        let now = sched.now();
        match event {
            AccessEvent::DiscoveryComplete { terminal, base_station } => {
                let state = self.expect_state(terminal, AttachState::Discovering, "discovery completion")?;
                topology.associate(terminal, base_station)?;
                let handle = sched.schedule_in(
                    self.attach_delay,
                    E::from(AccessEvent::AttachComplete { terminal }),
                );
                let ctx = self.context_mut(terminal, state)?;
                ctx.pending = Some(handle);
                Ok(set_state(ctx, terminal, AttachState::Attaching, now))
            }

            AccessEvent::AttachComplete { terminal } => {
                let state = self.expect_state(terminal, AttachState::Attaching, "attach completion")?;
                let ctx = self.context_mut(terminal, state)?;
                ctx.pending = None;
                ctx.connected_since = Some(now);
                let transition = set_state(ctx, terminal, AttachState::Connected, now);

                if let Some(qos) = self.default_bearer {
                    let bearer = bearers.activate(self, terminal, qos, now)?;
                    debug!(%terminal, %bearer, %qos, "default bearer activated");
                }
                Ok(transition)
            }
        }
    }

    /// Detach a connected terminal.
    ///
    /// Clears the association, returns the terminal to `Idle`, and releases
    /// every bearer it owns.
    ///
    /// # Errors
    ///
    /// [`AccessError::InvalidState`] unless the terminal is `Connected`.
    pub fn detach(
        &mut self,
        topology: &mut Topology,
        bearers:  &mut BearerManager,
        terminal: DeviceId,
        now:      SimTime,
    ) -> AccessResult<Transition> {
        let state = self.expect_state(terminal, AttachState::Connected, "detach")?;
        topology.disassociate(terminal)?;
        let released = bearers.release_all(terminal);
        debug!(%terminal, released = released.len(), "bearers released on detach");

        let ctx = self.context_mut(terminal, state)?;
        ctx.target = None;
        ctx.pending = None;
        ctx.connected_since = None;
        Ok(set_state(ctx, terminal, AttachState::Idle, now))
    }

    /// Forget every terminal.  Pending timers are owned by the scheduler and
    /// must be cleared there.
    pub fn clear(&mut self) {
        self.terminals.clear();
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Check `terminal` is in `expected`; returns the current state on success.
    fn expect_state(
        &self,
        terminal:  DeviceId,
        expected:  AttachState,
        operation: &'static str,
    ) -> AccessResult<AttachState> {
        let state = self.state(terminal);
        if state != expected {
            return Err(AccessError::InvalidState { terminal, state, operation });
        }
        Ok(state)
    }

    fn context_mut(&mut self, terminal: DeviceId, state: AttachState) -> AccessResult<&mut TerminalContext> {
        self.terminals.get_mut(&terminal).ok_or(AccessError::InvalidState {
            terminal,
            state,
            operation: "context lookup",
        })
    }
}

// ── Free helpers ──────────────────────────────────────────────────────────────

fn expect_role(topology: &Topology, device: DeviceId, expected: DeviceRole) -> AccessResult<()> {
    let actual = topology.role_of(device)?;
    if actual != expected {
        return Err(AccessError::RoleMismatch { device, expected, actual });
    }
    Ok(())
}

fn set_state(ctx: &mut TerminalContext, terminal: DeviceId, to: AttachState, at: SimTime) -> Transition {
    let from = ctx.state;
    ctx.state = to;
    debug!(%terminal, %from, %to, time = %at, "attach transition");
    Transition { terminal, from, to, at }
}
