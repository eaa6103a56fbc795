//! Object identity for connection instances.
//!
//! A connection attached as both inbound and outbound is one object behind two trait-object
//! handles. Keying on the data pointer lets the lifecycle start and stop it once.

use crate::connection::Connection;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct ConnectionIdentityKey {
    connection: Arc<dyn Connection>,
}

impl ConnectionIdentityKey {
    pub(crate) fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    // Vtable pointers may differ between codegen units; only the data address is stable.
    fn address(&self) -> *const () {
        Arc::as_ptr(&self.connection) as *const ()
    }
}

impl Hash for ConnectionIdentityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl PartialEq for ConnectionIdentityKey {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for ConnectionIdentityKey {}

impl Debug for ConnectionIdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionIdentityKey")
            .field("id", &self.connection.id())
            .finish_non_exhaustive()
    }
}
