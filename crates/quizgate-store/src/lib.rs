//! Durable key-value storage for persisted sessions.
//!
//! The session manager keeps exactly two entries in durable storage: the
//! opaque token and the JSON-encoded user. They must never be written or
//! erased independently, so the [`SessionStore`] trait only exposes batch
//! writes and batch removals; an implementation applies each batch as one
//! unit.
//!
//! Two implementations ship:
//!
//! - [`MemoryStore`]: process-local, shared between clones. The default
//!   for tests and for embedders that bring their own persistence.
//! - [`FileStore`]: a JSON object in a file, rewritten atomically on every
//!   batch. The desktop equivalent of browser `localStorage`.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A string-keyed, string-valued durable store.
///
/// The trait is synchronous on purpose: like `localStorage`, a store is
/// expected to be small and local, and the session manager calls it while
/// holding a short-lived lock that must not span an `.await`.
///
/// `Send + 'static` lets the manager own the store inside a mutex and be
/// shared across tasks.
pub trait SessionStore: Send + 'static {
    /// Reads one value. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backing medium can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes every `(key, value)` pair as one unit.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the batch could not be persisted. In that
    /// case none of the pairs are visible to later reads.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Removes every key as one unit. Absent keys are ignored.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the removal could not be persisted.
    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StoreError>;
}
