//! Targets that rendered markup is mounted into

use super::{COUNTDOWN, LEADERBOARD, RACERS, TRACKS};
use colored::Colorize;
use scraper::Html;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Something that displays markup in named containers.
///
/// `mount` replaces whatever the container held before. It is the only
/// rendering operation with side effects.
pub trait Surface: Send + Sync + 'static {
    fn mount(&self, selector: &str, markup: String);
}

/// Visible text of a markup fragment, one entry per non-empty text node
pub fn text_lines(markup: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(markup);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A single recorded mount
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    pub selector: String,
    pub markup: String,
}

#[derive(Debug, Default)]
struct Document {
    mounts: Vec<Mount>,
    containers: HashMap<String, String>,
}

/// In-memory surface keeping the current contents of every container and
/// the full history of mounts
#[derive(Debug, Default)]
pub struct MemorySurface {
    document: Mutex<Document>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_document<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut document)
    }

    /// Current contents of a container
    pub fn contents(&self, selector: &str) -> Option<String> {
        self.with_document(|d| d.containers.get(selector).cloned())
    }

    pub fn mounts(&self) -> Vec<Mount> {
        self.with_document(|d| d.mounts.clone())
    }

    /// Markup mounted into one container, oldest first
    pub fn mounts_at(&self, selector: &str) -> Vec<String> {
        self.with_document(|d| {
            d.mounts
                .iter()
                .filter(|m| m.selector == selector)
                .map(|m| m.markup.clone())
                .collect()
        })
    }

    pub fn mount_count(&self, selector: &str) -> usize {
        self.with_document(|d| d.mounts.iter().filter(|m| m.selector == selector).count())
    }
}

impl Surface for MemorySurface {
    fn mount(&self, selector: &str, markup: String) {
        self.with_document(|d| {
            d.containers.insert(selector.to_string(), markup.clone());
            d.mounts.push(Mount {
                selector: selector.to_string(),
                markup,
            });
        });
    }
}

/// Prints the text of mounted markup to stdout
#[derive(Debug)]
pub struct TerminalSurface {
    show_catalog: bool,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self { show_catalog: true }
    }

    /// Skip the track and racer lists, for callers that print them
    /// their own way
    pub fn race_only() -> Self {
        Self {
            show_catalog: false,
        }
    }
}

impl Surface for TerminalSurface {
    fn mount(&self, selector: &str, markup: String) {
        if !self.show_catalog && (selector == TRACKS || selector == RACERS) {
            return;
        }
        let lines = text_lines(&markup);

        let mut out = String::new();
        match selector {
            COUNTDOWN => {
                out.push_str(&format!("  {}\n", lines.join(" ").yellow().bold()));
            }
            LEADERBOARD => {
                for line in lines.iter().skip(1) {
                    out.push_str(&format!("  {}\n", highlight_player(line)));
                }
                out.push_str(&format!("  {}\n", "-".repeat(30).dimmed()));
            }
            _ => {
                out.push('\n');
                for (i, line) in lines.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&format!("{}\n", line.cyan().bold()));
                    } else {
                        out.push_str(&format!("  {}\n", highlight_player(line)));
                    }
                }
            }
        }

        print!("{}", out);
    }
}

fn highlight_player(line: &str) -> String {
    if line.ends_with("(you)") {
        line.green().bold().to_string()
    } else {
        line.to_string()
    }
}
