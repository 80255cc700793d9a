use crate::domain::order::{Order, StatusUpdate};
use crate::domain::status::ItemStatus;
use std::collections::{BTreeSet, HashMap};

/// Identifies one optimistic update from request to settlement.
pub type Ticket = u64;

/// Everything that can change an [`OrderBook`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A fetch finished. `fetch` increases with every request issued.
    Loaded { fetch: u64, orders: Vec<Order> },
    UpdateRequested { ticket: Ticket, update: StatusUpdate },
    UpdateSucceeded { ticket: Ticket },
    UpdateFailed { ticket: Ticket, reason: String },
    Toggle(String),
    /// Selects exactly these ids, or clears the selection if it already
    /// equals them.
    SelectAll(Vec<String>),
    ClearSelection,
    DismissError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePhase {
    Pending,
    Applied,
    RolledBack { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub ticket: Ticket,
    pub update: StatusUpdate,
    pub phase: UpdatePhase,
}

/// What a dispatch did to the book.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Changed,
    Ignored,
    Settled(UpdateOutcome),
}

/// A value an update writes: the order's stored status or one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Stored,
    Item(usize),
}

/// Values an optimistic update overwrote, kept until it settles.
#[derive(Debug, Clone)]
struct PendingUpdate {
    update: StatusUpdate,
    generation: u64,
    stored: Option<ItemStatus>,
    items: Vec<(usize, ItemStatus)>,
}

impl PendingUpdate {
    fn slots(&self) -> Vec<(Slot, Option<ItemStatus>)> {
        self.items
            .iter()
            .map(|(index, previous)| (Slot::Item(*index), Some(previous.clone())))
            .chain(std::iter::once((Slot::Stored, self.stored.clone())))
            .collect()
    }

    /// Takes over the value an earlier, failed writer of `slot` replaced.
    fn inherit(&mut self, slot: Slot, previous: Option<ItemStatus>) {
        match slot {
            Slot::Stored => self.stored = previous,
            Slot::Item(index) => {
                if let Some(entry) = self.items.iter_mut().find(|(i, _)| *i == index)
                    && let Some(previous) = previous
                {
                    entry.1 = previous;
                }
            }
        }
    }
}

/// Order state of one dashboard session.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    generation: u64,
    last_fetch: Option<u64>,
    pending: HashMap<Ticket, PendingUpdate>,
    /// Last unsettled ticket to write each slot.
    writers: HashMap<(String, Slot), Ticket>,
    selection: BTreeSet<String>,
    last_error: Option<String>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.order_id == order_id)
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn pending_updates(&self) -> usize {
        self.pending.len()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of fetches applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dispatch(&mut self, action: Action) -> Transition {
        match action {
            Action::Loaded { fetch, orders } => self.load(fetch, orders),
            Action::UpdateRequested { ticket, update } => self.request(ticket, update),
            Action::UpdateSucceeded { ticket } => match self.pending.remove(&ticket) {
                Some(pending) => {
                    self.writers.retain(|_, writer| *writer != ticket);
                    Transition::Settled(UpdateOutcome {
                        ticket,
                        update: pending.update,
                        phase: UpdatePhase::Applied,
                    })
                }
                None => Transition::Ignored,
            },
            Action::UpdateFailed { ticket, reason } => self.roll_back(ticket, reason),
            Action::Toggle(order_id) => {
                if !self.selection.remove(&order_id) {
                    self.selection.insert(order_id);
                }
                Transition::Changed
            }
            Action::SelectAll(ids) => {
                let ids: BTreeSet<String> = ids.into_iter().collect();
                if self.selection == ids {
                    self.selection.clear();
                } else {
                    self.selection = ids;
                }
                Transition::Changed
            }
            Action::ClearSelection => {
                self.selection.clear();
                Transition::Changed
            }
            Action::DismissError => {
                self.last_error = None;
                Transition::Changed
            }
        }
    }

    fn load(&mut self, fetch: u64, orders: Vec<Order>) -> Transition {
        if self.last_fetch.is_some_and(|last| fetch <= last) {
            return Transition::Ignored;
        }
        self.orders = orders;
        self.generation += 1;
        self.last_fetch = Some(fetch);
        self.writers.clear();
        let orders = &self.orders;
        self.selection
            .retain(|id| orders.iter().any(|order| &order.order_id == id));
        Transition::Changed
    }

    fn request(&mut self, ticket: Ticket, update: StatusUpdate) -> Transition {
        let Some(order) = self
            .orders
            .iter_mut()
            .find(|order| order.order_id == update.order_id)
        else {
            return Transition::Ignored;
        };

        let stored = order.status.clone();
        let items: Vec<(usize, ItemStatus)> = order
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| update.targets(item))
            .map(|(index, item)| (index, item.status.clone()))
            .collect();
        order.apply_update(&update);

        let order_id = order.order_id.clone();
        for (index, _) in &items {
            self.writers
                .insert((order_id.clone(), Slot::Item(*index)), ticket);
        }
        self.writers.insert((order_id, Slot::Stored), ticket);

        self.pending.insert(
            ticket,
            PendingUpdate {
                update,
                generation: self.generation,
                stored,
                items,
            },
        );
        Transition::Changed
    }

    /// Reverts what the update wrote, unless a newer fetch replaced the
    /// orders. A slot a later update has written since keeps that value; the
    /// later update inherits this one's previous value for its own rollback.
    fn roll_back(&mut self, ticket: Ticket, reason: String) -> Transition {
        let Some(pending) = self.pending.remove(&ticket) else {
            return Transition::Ignored;
        };

        if pending.generation == self.generation {
            let order_id = &pending.update.order_id;
            for (slot, previous) in pending.slots() {
                let key = (order_id.clone(), slot);
                match self.writers.get(&key).copied() {
                    Some(writer) if writer == ticket => {
                        self.writers.remove(&key);
                        self.restore(order_id, slot, previous);
                    }
                    Some(writer) => {
                        if let Some(later) = self.pending.get_mut(&writer) {
                            later.inherit(slot, previous);
                        }
                    }
                    None => {}
                }
            }
        }
        self.writers.retain(|_, writer| *writer != ticket);

        self.last_error = Some(reason.clone());
        Transition::Settled(UpdateOutcome {
            ticket,
            update: pending.update,
            phase: UpdatePhase::RolledBack { reason },
        })
    }

    fn restore(&mut self, order_id: &str, slot: Slot, previous: Option<ItemStatus>) {
        let Some(order) = self
            .orders
            .iter_mut()
            .find(|order| order.order_id == order_id)
        else {
            return;
        };
        match slot {
            Slot::Stored => order.status = previous,
            Slot::Item(index) => {
                if let Some(item) = order.items.get_mut(index)
                    && let Some(previous) = previous
                {
                    item.status = previous;
                }
            }
        }
    }
}
