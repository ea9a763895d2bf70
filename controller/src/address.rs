//! The address (URL query string) as seen by the controller.
//!
//! Every write the controller makes carries a [`WriteId`]. Hosts report
//! address changes back with an [`AddressOrigin`]: either the id of the
//! write that caused it, or the kind of external navigation.

use std::collections::VecDeque;

use common::query_codec::QueryCodec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WriteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteMode {
    /// New history entry.
    Push,
    /// Rewrite the current entry, e.g. to canonicalize a pasted link.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationKind {
    /// Back or forward through history.
    Traversal,
    /// A link was opened or the address was edited by hand.
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressOrigin {
    SelfOriginated(WriteId),
    External(NavigationKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressChange {
    pub query: String,
    pub origin: AddressOrigin,
}

impl AddressChange {
    pub fn external(query: impl Into<String>, kind: NavigationKind) -> Self {
        Self { query: query.into(), origin: AddressOrigin::External(kind) }
    }

    pub fn echo(query: impl Into<String>, write: WriteId) -> Self {
        Self { query: query.into(), origin: AddressOrigin::SelfOriginated(write) }
    }
}

/// Strips the leading `?` and surrounding whitespace.
pub fn bare_query(query: &str) -> &str {
    let query = query.trim();
    query.strip_prefix('?').unwrap_or(query)
}

/// Where the controller's state is persisted.
pub trait Address {
    fn read_current(&self) -> String;

    /// Performs a self-originated write. Implementations report the
    /// resulting change tagged with `write`.
    fn write(&mut self, query: &str, write: WriteId, mode: WriteMode);
}

/// In-memory browser history. Changes are queued and drained by the host,
/// standing in for asynchronous navigation callbacks.
#[derive(Debug, Clone)]
pub struct MemoryAddress {
    entries: Vec<String>,
    cursor: usize,
    pending: VecDeque<AddressChange>,
}

impl MemoryAddress {
    pub fn new(initial: &str) -> Self {
        Self { entries: vec![bare_query(initial).to_string()], cursor: 0, pending: VecDeque::new() }
    }

    /// Opens a link in the same tab.
    pub fn open(&mut self, query: &str) {
        self.push_entry(bare_query(query).to_string());
        self.pending.push_back(AddressChange::external(bare_query(query), NavigationKind::Load));
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.pending.push_back(AddressChange::external(self.entries[self.cursor].clone(), NavigationKind::Traversal));
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        self.pending.push_back(AddressChange::external(self.entries[self.cursor].clone(), NavigationKind::Traversal));
        true
    }

    /// Drains change notifications in the order they happened.
    pub fn take_changes(&mut self) -> Vec<AddressChange> {
        self.pending.drain(..).collect()
    }

    pub fn history(&self) -> &[String] {
        &self.entries
    }

    fn push_entry(&mut self, query: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(query);
        self.cursor = self.entries.len() - 1;
    }
}

impl Address for MemoryAddress {
    fn read_current(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn write(&mut self, query: &str, write: WriteId, mode: WriteMode) {
        let query = bare_query(query).to_string();
        match mode {
            WriteMode::Push => self.push_entry(query.clone()),
            WriteMode::Replace => self.entries[self.cursor] = query.clone(),
        }
        self.pending.push_back(AddressChange::echo(query, write));
    }
}

/// Writes a host has made but not yet seen come back from its router.
///
/// Routers may coalesce quick successive writes or hand the query back with
/// a different percent-encoding, so an observed address matches a recorded
/// write when it is the same bare query or decodes to the same state.
/// Matching a write forgets it and every older one.
#[derive(Debug, Clone, Default)]
pub struct PendingWrites {
    writes: Vec<(WriteId, String)>,
}

impl PendingWrites {
    pub fn record(&mut self, write: WriteId, query: &str) {
        self.writes.push((write, bare_query(query).to_string()));
    }

    /// Tags an observed address change. History traversals are never
    /// echoes and drop every recorded write.
    pub fn classify(&mut self, query: &str, kind: NavigationKind, codec: &QueryCodec) -> AddressChange {
        let query = bare_query(query);
        if kind == NavigationKind::Traversal {
            self.writes.clear();
            return AddressChange::external(query, kind);
        }

        let matched = self.writes.iter().rposition(|(_, written)| same_address(codec, written, query));
        match matched {
            Some(position) => {
                let write = self.writes[position].0;
                self.writes.drain(..=position);
                AddressChange::echo(query, write)
            }
            None => AddressChange::external(query, kind),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

fn same_address(codec: &QueryCodec, written: &str, observed: &str) -> bool {
    written == observed || codec.decode(written) == codec.decode(observed)
}
