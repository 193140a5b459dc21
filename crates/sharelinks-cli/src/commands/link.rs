//! Share link command handlers

use anyhow::{bail, Result};
use tracing::debug;

use sharelinks_core::{link_id_from_url, ItemType, LinkStore, ShareError};

use crate::output::Output;

/// Create a new share link for an item
pub fn create(
    store: &mut LinkStore,
    item_id: String,
    item_type: ItemType,
    days: Option<f64>,
    output: &Output,
) -> Result<()> {
    match store.create_shareable_link(&item_id, item_type, days) {
        Ok(url) => {
            output.print_url(&url);
            Ok(())
        }
        Err(ShareError::NotPersisted { url, source }) => {
            // The link exists for this run only; still hand out the URL
            output.print_url(&url);
            Err(anyhow::Error::new(source).context("Link created but could not be saved"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Revoke a single link
pub fn revoke(store: &mut LinkStore, link: String, output: &Output) -> Result<()> {
    let id = link_id(&link)?;
    if !store.revoke_link(id) {
        bail!("Link not found: {}", link);
    }
    ensure_saved(store)?;

    output.success(&format!("Revoked link {}", id));
    Ok(())
}

/// Revoke every active link for an item
pub fn revoke_item(store: &mut LinkStore, item_id: String, output: &Output) -> Result<()> {
    let count = store.revoke_all_links_for_item(&item_id);
    ensure_saved(store)?;

    output.print_count(
        "revoked",
        count,
        &format!("Revoked {} link(s) for {}", count, item_id),
    );
    Ok(())
}

/// Check a link, counting an access if it is valid
pub fn validate(store: &mut LinkStore, link: String, output: &Output) -> Result<()> {
    let id = link_id(&link)?;
    let valid = store.validate_link(id);
    debug!("Validated {}: {}", id, valid);
    ensure_saved(store)?;

    let message = if valid {
        format!("Link {} is valid", id)
    } else {
        format!("Link {} is invalid, revoked, or expired", id)
    };
    output.print_flag("valid", valid, &message);
    Ok(())
}

/// Show a single link
pub fn show(store: &LinkStore, link: String, output: &Output) -> Result<()> {
    let id = link_id(&link)?;
    let details = store
        .get_link_details(id)
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", link))?;

    output.print_link(details, &store.share_url_for(id), store.now());
    Ok(())
}

/// List links, optionally for one item and/or only active ones
pub fn list(store: &LinkStore, item_id: Option<String>, active: bool, output: &Output) -> Result<()> {
    let links = match (item_id.as_deref(), active) {
        (Some(item), true) => store.get_active_links_for_item(item),
        (Some(item), false) => store.get_links_for_item(item),
        (None, true) => store.get_all_active_links(),
        (None, false) => store.links().iter().collect(),
    };

    output.print_links(&links, store.now());
    Ok(())
}

/// Extend a link's expiry
pub fn extend(store: &mut LinkStore, link: String, days: Option<f64>, output: &Output) -> Result<()> {
    if let Some(d) = days {
        if !d.is_finite() || d <= 0.0 {
            bail!("Days must be a positive number, got {}", d);
        }
    }

    let id = link_id(&link)?;
    if !store.extend_link_expiration(id, days) {
        bail!("Link not found or revoked: {}", link);
    }
    ensure_saved(store)?;

    if let Some(details) = store.get_link_details(id) {
        output.success(&format!(
            "Link {} now expires {}",
            id,
            details.expires.format("%Y-%m-%d %H:%M")
        ));
    }
    Ok(())
}

/// Remove expired links
pub fn cleanup(store: &mut LinkStore, output: &Output) -> Result<()> {
    let removed = store.cleanup_expired_links();
    ensure_saved(store)?;

    output.print_count(
        "removed",
        removed,
        &format!("Removed {} expired link(s)", removed),
    );
    Ok(())
}

/// Link id from a bare id or share URL
fn link_id(input: &str) -> Result<&str> {
    let id = link_id_from_url(input);
    if id.is_empty() {
        bail!("No link id in '{}'", input);
    }
    Ok(id)
}

/// Fail if the last write did not reach storage
fn ensure_saved(store: &mut LinkStore) -> Result<()> {
    if store.is_dirty() {
        store.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use sharelinks_core::{ManualClock, MemoryPersistence, StoreOptions};
    use chrono::{Duration, TimeZone, Utc};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn store_with_clock() -> (LinkStore, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        let store = LinkStore::open(
            Box::new(MemoryPersistence::new()),
            Box::new(clock.clone()),
            StoreOptions {
                origin: "https://todo.example".to_string(),
                default_expiry_days: 7.0,
                cleanup_on_open: false,
            },
        );
        (store, clock)
    }

    #[test]
    fn test_create_and_revoke_by_url() {
        let (mut store, _) = store_with_clock();
        create(&mut store, "doc-1".to_string(), ItemType::Document, None, &quiet()).unwrap();

        let id = store.links()[0].id.clone();
        let url = store.share_url_for(&id);
        revoke(&mut store, url, &quiet()).unwrap();

        assert!(store.get_link_details(&id).unwrap().revoked);
    }

    #[test]
    fn test_revoke_unknown_fails() {
        let (mut store, _) = store_with_clock();
        assert!(revoke(&mut store, "missing".to_string(), &quiet()).is_err());
    }

    #[test]
    fn test_url_without_id_is_rejected() {
        let (mut store, _) = store_with_clock();
        create(&mut store, "doc-1".to_string(), ItemType::Document, None, &quiet()).unwrap();

        let err = revoke(&mut store, "https://todo.example/share/".to_string(), &quiet())
            .unwrap_err();
        assert!(err.to_string().contains("No link id"));
        assert!(validate(&mut store, String::new(), &quiet()).is_err());
        assert!(show(&store, "https://todo.example/share/".to_string(), &quiet()).is_err());
        assert!(extend(&mut store, "/share/".to_string(), None, &quiet()).is_err());

        assert_eq!(store.links()[0].access_count, 0);
        assert!(!store.links()[0].revoked);
    }

    #[test]
    fn test_create_rejects_empty_item() {
        let (mut store, _) = store_with_clock();
        assert!(create(&mut store, String::new(), ItemType::Note, None, &quiet()).is_err());
        assert!(store.links().is_empty());
    }

    #[test]
    fn test_validate_counts_access() {
        let (mut store, _) = store_with_clock();
        create(&mut store, "todo-1".to_string(), ItemType::Todo, None, &quiet()).unwrap();
        let id = store.links()[0].id.clone();

        validate(&mut store, id.clone(), &quiet()).unwrap();
        validate(&mut store, id.clone(), &quiet()).unwrap();
        assert_eq!(store.get_link_details(&id).unwrap().access_count, 2);
    }

    #[test]
    fn test_extend_and_cleanup() {
        let (mut store, clock) = store_with_clock();
        create(&mut store, "doc-1".to_string(), ItemType::Document, Some(1.0), &quiet()).unwrap();
        create(&mut store, "doc-2".to_string(), ItemType::Document, Some(1.0), &quiet()).unwrap();
        let keep = store.links()[0].id.clone();

        extend(&mut store, keep.clone(), Some(5.0), &quiet()).unwrap();
        assert!(extend(&mut store, keep.clone(), Some(-1.0), &quiet()).is_err());

        clock.advance(Duration::days(2));
        cleanup(&mut store, &quiet()).unwrap();

        assert_eq!(store.links().len(), 1);
        assert_eq!(store.links()[0].id, keep);
    }

    #[test]
    fn test_show_unknown_fails() {
        let (store, _) = store_with_clock();
        assert!(show(&store, "missing".to_string(), &quiet()).is_err());
    }
}
