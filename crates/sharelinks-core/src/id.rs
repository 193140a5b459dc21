//! Link id and share URL generation
//!
//! Ids are two independent random base-36 fragments joined together. They
//! only need to be unique within one local store; nothing here is meant to
//! be unguessable.

use std::iter;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Characters per random fragment
pub const FRAGMENT_LEN: usize = 13;

/// Path segment under which share links are served
pub const SHARE_PATH: &str = "/share/";

fn fragment() -> String {
    iter::repeat_with(|| BASE36[rand::random_range(0..BASE36.len())] as char)
        .take(FRAGMENT_LEN)
        .collect()
}

/// Generate a new opaque link id
pub fn generate_link_id() -> String {
    let mut id = fragment();
    id.push_str(&fragment());
    id
}

/// Build the public URL for a link id
pub fn share_url(origin: &str, id: &str) -> String {
    format!("{}{}{}", origin.trim_end_matches('/'), SHARE_PATH, id)
}

/// Extract the link id from a share URL, or accept a bare id
pub fn link_id_from_url(input: &str) -> &str {
    match input.rfind(SHARE_PATH) {
        Some(pos) => input[pos + SHARE_PATH.len()..].trim_end_matches('/'),
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = generate_link_id();
        assert_eq!(id.len(), FRAGMENT_LEN * 2);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_link_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://todo.example", "abc123"),
            "https://todo.example/share/abc123"
        );
        assert_eq!(
            share_url("https://todo.example/", "abc123"),
            "https://todo.example/share/abc123"
        );
    }

    #[test]
    fn test_link_id_from_url() {
        assert_eq!(link_id_from_url("https://todo.example/share/abc123"), "abc123");
        assert_eq!(link_id_from_url("https://todo.example/share/abc123/"), "abc123");
        assert_eq!(link_id_from_url("abc123"), "abc123");
    }
}
