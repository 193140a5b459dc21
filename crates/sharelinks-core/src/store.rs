//! Shareable link store
//!
//! The `LinkStore` owns the full link collection and mirrors it to a
//! [`LinkPersistence`] backend after every mutation.
//!
//! ## Lifecycle
//!
//! A link is created valid, counts accesses through [`LinkStore::validate_link`],
//! and stops working once revoked (soft delete, record kept) or past its expiry.
//! Only [`LinkStore::cleanup_expired_links`] removes records.
//!
//! ## Persistence
//!
//! Loading never fails: missing data starts an empty store, unreadable data
//! is logged and discarded. Writes always replace the whole collection. A
//! failed write is logged and leaves the store dirty; the in-memory state
//! stays authoritative until [`LinkStore::flush`] succeeds. Data written by
//! a newer format version is loaded as empty and never overwritten: every
//! write is refused with [`StorageError::UnsupportedVersion`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = LinkStore::open(
//!     Box::new(FilePersistence::from_config(&config)),
//!     Box::new(SystemClock),
//!     config.store_options(),
//! );
//!
//! let url = store.create_shareable_link("doc-1", ItemType::Document, None)?;
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::id::{generate_link_id, share_url};
use crate::models::{days_to_duration, ItemType, ShareableLink};
use crate::storage::{format, LinkPersistence, StorageError, StorageResult};

/// Errors returned by [`LinkStore::create_shareable_link`]
#[derive(Error, Debug)]
pub enum ShareError {
    /// The item id was empty
    #[error("Item id must not be empty")]
    EmptyItemId,

    /// The requested lifetime is not a positive, representable number of days
    #[error("Expiry must be a positive number of days, got {0}")]
    InvalidExpiry(f64),

    /// The link was created but could not be written to storage
    #[error("Link {url} was created but not persisted: {source}")]
    NotPersisted {
        url: String,
        #[source]
        source: StorageError,
    },
}

/// Store behaviour settings
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    /// Origin prepended to `/share/<id>`
    pub origin: String,
    /// Lifetime used when the caller passes no expiry
    pub default_expiry_days: f64,
    /// Purge expired links right after loading
    pub cleanup_on_open: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".to_string(),
            default_expiry_days: 7.0,
            cleanup_on_open: true,
        }
    }
}

/// Owner of the shareable link collection
pub struct LinkStore {
    /// All links in insertion order
    links: Vec<ShareableLink>,
    persistence: Box<dyn LinkPersistence>,
    clock: Box<dyn Clock>,
    options: StoreOptions,
    /// Set when the last write failed
    dirty: bool,
    /// `(found, expected)` when the stored data has a newer format version
    incompatible: Option<(u32, u32)>,
}

impl LinkStore {
    /// Load the collection from `persistence`
    ///
    /// Absent, unreadable, or malformed data yields an empty store; the
    /// problem is logged, never returned.
    pub fn open(
        persistence: Box<dyn LinkPersistence>,
        clock: Box<dyn Clock>,
        options: StoreOptions,
    ) -> Self {
        let mut incompatible = None;
        let links = match persistence.read_all() {
            Ok(Some(text)) => match format::decode(&text) {
                Ok(links) => links,
                Err(StorageError::UnsupportedVersion { found, expected }) => {
                    warn!(
                        "Shareable links use format version {} (expected {}); store is read-only",
                        found, expected
                    );
                    incompatible = Some((found, expected));
                    Vec::new()
                }
                Err(e) => {
                    warn!("Discarding unreadable shareable links: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load shareable links: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} shareable links", links.len());

        let mut store = Self {
            links,
            persistence,
            clock,
            options,
            dirty: false,
            incompatible,
        };

        if store.options.cleanup_on_open {
            store.cleanup_expired_links();
        }

        store
    }

    /// Every link, in insertion order, regardless of state
    pub fn links(&self) -> &[ShareableLink] {
        &self.links
    }

    /// Whether in-memory state has changes that failed to persist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether writes are refused because the stored data is too new
    pub fn is_read_only(&self) -> bool {
        self.incompatible.is_some()
    }

    /// Current instant according to the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Public URL for a link id
    pub fn share_url_for(&self, link_id: &str) -> String {
        share_url(&self.options.origin, link_id)
    }

    // ==================== Mutations ====================

    /// Create a link for an item and return its share URL
    ///
    /// `expires_in_days` defaults to the configured lifetime and may be
    /// fractional. If the write fails the link is still kept and its URL is
    /// carried in [`ShareError::NotPersisted`].
    pub fn create_shareable_link(
        &mut self,
        item_id: &str,
        item_type: ItemType,
        expires_in_days: Option<f64>,
    ) -> Result<String, ShareError> {
        if item_id.is_empty() {
            return Err(ShareError::EmptyItemId);
        }

        let days = expires_in_days.unwrap_or(self.options.default_expiry_days);
        let lifetime = days_to_duration(days).ok_or(ShareError::InvalidExpiry(days))?;

        let id = self.unused_id();
        let link = ShareableLink::new(id, item_id, item_type, self.now(), lifetime)
            .ok_or(ShareError::InvalidExpiry(days))?;
        let url = self.share_url_for(&link.id);

        debug!(
            "Created link {} for {} {} expiring {}",
            link.id, link.item_type, link.item_id, link.expires
        );
        self.links.push(link);

        match self.persist() {
            Ok(()) => Ok(url),
            Err(source) => Err(ShareError::NotPersisted { url, source }),
        }
    }

    /// Revoke one link
    ///
    /// Returns `true` if the link exists, including when it was already
    /// revoked or has expired.
    pub fn revoke_link(&mut self, link_id: &str) -> bool {
        let Some(link) = self.links.iter_mut().find(|l| l.id == link_id) else {
            return false;
        };

        link.revoked = true;
        debug!("Revoked link {}", link_id);
        self.persist_logged();
        true
    }

    /// Revoke every active link for an item
    ///
    /// Returns how many links went from unrevoked to revoked.
    pub fn revoke_all_links_for_item(&mut self, item_id: &str) -> usize {
        let mut count = 0;
        for link in self
            .links
            .iter_mut()
            .filter(|l| l.item_id == item_id && !l.revoked)
        {
            link.revoked = true;
            count += 1;
        }

        if count > 0 {
            debug!("Revoked {} links for item {}", count, item_id);
            self.persist_logged();
        }
        count
    }

    /// Check a link and record an access if it is valid
    ///
    /// Unknown, revoked, and expired links return `false` and are not touched.
    pub fn validate_link(&mut self, link_id: &str) -> bool {
        let now = self.now();
        let Some(link) = self.links.iter_mut().find(|l| l.id == link_id) else {
            return false;
        };
        if !link.is_valid(now) {
            return false;
        }

        link.access_count += 1;
        debug!("Link {} accessed ({} total)", link_id, link.access_count);
        self.persist_logged();
        true
    }

    /// Push a link's expiry further out
    ///
    /// Only unrevoked links can be extended. Returns `false` for unknown or
    /// revoked links and for non-positive day counts.
    pub fn extend_link_expiration(&mut self, link_id: &str, additional_days: Option<f64>) -> bool {
        let days = additional_days.unwrap_or(self.options.default_expiry_days);
        let Some(extra) = days_to_duration(days) else {
            return false;
        };
        let Some(link) = self
            .links
            .iter_mut()
            .find(|l| l.id == link_id && !l.revoked)
        else {
            return false;
        };
        let Some(expires) = link.expires.checked_add_signed(extra) else {
            return false;
        };

        link.expires = expires;
        debug!("Extended link {} to {}", link_id, expires);
        self.persist_logged();
        true
    }

    /// Permanently remove links whose expiry has passed
    ///
    /// Revocation does not matter here. Returns the number removed.
    pub fn cleanup_expired_links(&mut self) -> usize {
        let now = self.now();
        let before = self.links.len();
        self.links.retain(|l| !l.is_expired(now));
        let removed = before - self.links.len();

        if removed > 0 {
            info!("Removed {} expired shareable links", removed);
            self.persist_logged();
        }
        removed
    }

    // ==================== Queries ====================

    /// All links for an item, in insertion order, whatever their state
    pub fn get_links_for_item(&self, item_id: &str) -> Vec<&ShareableLink> {
        self.links.iter().filter(|l| l.item_id == item_id).collect()
    }

    /// Currently valid links for an item
    pub fn get_active_links_for_item(&self, item_id: &str) -> Vec<&ShareableLink> {
        let now = self.now();
        self.links
            .iter()
            .filter(|l| l.item_id == item_id && l.is_valid(now))
            .collect()
    }

    /// Every currently valid link
    pub fn get_all_active_links(&self) -> Vec<&ShareableLink> {
        let now = self.now();
        self.links.iter().filter(|l| l.is_valid(now)).collect()
    }

    /// Look up a link by id
    pub fn get_link_details(&self, link_id: &str) -> Option<&ShareableLink> {
        self.links.iter().find(|l| l.id == link_id)
    }

    // ==================== Persistence ====================

    /// Write the full collection, retrying any failed earlier write
    pub fn flush(&mut self) -> StorageResult<()> {
        self.persist()
    }

    fn persist(&mut self) -> StorageResult<()> {
        if let Some((found, expected)) = self.incompatible {
            self.dirty = true;
            return Err(StorageError::UnsupportedVersion { found, expected });
        }
        let result = format::encode(&self.links).and_then(|text| self.persistence.write_all(&text));
        self.dirty = result.is_err();
        result
    }

    fn persist_logged(&mut self) {
        if let Err(e) = self.persist() {
            warn!("Failed to persist shareable links: {}", e);
        }
    }

    fn unused_id(&self) -> String {
        loop {
            let id = generate_link_id();
            if self.get_link_details(&id).is_none() {
                return id;
            }
        }
    }
}
