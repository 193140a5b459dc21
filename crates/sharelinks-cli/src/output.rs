//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{DateTime, Utc};

use sharelinks_core::ShareableLink;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single link
    pub fn print_link(&self, link: &ShareableLink, url: &str, now: DateTime<Utc>) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", link.id);
                println!("URL:      {}", url);
                println!("Item:     {} ({})", link.item_id, link.item_type);
                println!("Status:   {}", status(link, now));
                println!("Accesses: {}", link.access_count);
                println!("Created:  {}", link.created.format("%Y-%m-%d %H:%M"));
                println!("Expires:  {}", link.expires.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", to_json(link));
            }
            OutputFormat::Quiet => {
                println!("{}", link.id);
            }
        }
    }

    /// Print a list of links
    pub fn print_links(&self, links: &[&ShareableLink], now: DateTime<Utc>) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for link in links {
                    println!(
                        "{} | {:<8} | {:<24} | {:<7} | {:>4} | {}",
                        link.id,
                        link.item_type,
                        truncate(&link.item_id, 24),
                        status(link, now),
                        link.access_count,
                        link.expires.format("%Y-%m-%d %H:%M")
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => {
                println!("{}", to_json(&links));
            }
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print a generated share URL
    pub fn print_url(&self, url: &str) {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", url),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "url": url }));
            }
        }
    }

    /// Print the outcome of a yes/no check
    pub fn print_flag(&self, key: &str, value: bool, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ key: value }));
            }
            OutputFormat::Quiet => println!("{}", value),
        }
    }

    /// Print a count with a label
    pub fn print_count(&self, key: &str, count: usize, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ key: count }));
            }
            OutputFormat::Quiet => println!("{}", count),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (all formats except quiet)
    pub fn warn(&self, message: &str) {
        if self.format != OutputFormat::Quiet {
            eprintln!("warning: {}", message);
        }
    }
}

/// Human label for a link's current state
fn status(link: &ShareableLink, now: DateTime<Utc>) -> &'static str {
    if link.revoked {
        "revoked"
    } else if link.is_valid(now) {
        "active"
    } else {
        "expired"
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
