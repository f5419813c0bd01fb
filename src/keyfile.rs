//! Key-file document model
//!
//! This module holds the persisted origin document: an ordered list of named
//! sections, each an ordered list of `key=value` entries with an optional
//! comment. It is the single source of truth the [`Origin`](crate::origin::Origin)
//! cache is derived from.
//!
//! ## Features
//!
//! - Typed accessors for strings, `;`-separated string lists, and booleans
//! - Per-entry comments that survive a serialize/parse round-trip
//! - Value escaping (`\\`, `\n`, `\t`, `\r`, leading `\s`, and `\;` in lists)
//! - `duplicate()` producing an independent copy through the text form
//!
//! ## Example
//!
//! ```
//! use deploy_origin::keyfile::KeyFile;
//!
//! let mut kf = KeyFile::parse("[origin]\nrefspec=fedora:fedora/36/x86_64/silverblue\n").unwrap();
//! kf.set_string_list("packages", "requested", &["vim-enhanced", "htop"]);
//! assert_eq!(
//!     kf.get_string_list("packages", "requested").unwrap(),
//!     vec!["vim-enhanced", "htop"]
//! );
//! assert!(kf.to_data().contains("requested=vim-enhanced;htop;"));
//! ```

use log::warn;

use crate::error::{Error, Result};

/// A key-value entry in a section
#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    key: String,
    /// Raw (escaped) value as it appears in the text form
    value: String,
    comment: Option<String>,
}

/// A named section and its entries
#[derive(Clone, Debug, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.key == key)
    }
}

/// In-memory key-file document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyFile {
    sections: Vec<Section>,
}

impl KeyFile {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse key-file text into a document
    ///
    /// Supports:
    /// - Section headers: `[section]`
    /// - Key-value pairs: `key=value` (whitespace around `=` is ignored; the
    ///   rest of the value, trailing whitespace included, is kept verbatim)
    /// - Comment lines starting with `#`, attached to the entry that follows
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyFileParse` for an entry before any section header, a
    /// line that is neither header, comment nor `key=value`, or an empty key.
    pub fn parse(content: &str) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();
        let mut pending_comment: Vec<&str> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(comment) = trimmed.strip_prefix('#') {
                pending_comment.push(comment);
                continue;
            }

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                let name = trimmed[1..trimmed.len() - 1].trim();
                if name.is_empty() {
                    return Err(parse_error(line_no, "empty section name"));
                }
                // Group comments are not modelled
                pending_comment.clear();
                if !sections.iter().any(|section| section.name == name) {
                    sections.push(Section {
                        name: name.to_string(),
                        entries: Vec::new(),
                    });
                }
                continue;
            }

            let entry_line = line.trim_start();
            let Some(pos) = entry_line.find('=') else {
                return Err(parse_error(line_no, "expected '[section]' or 'key=value'"));
            };
            let key = entry_line[..pos].trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty key"));
            }
            let value = entry_line[pos + 1..].trim_start_matches([' ', '\t']);
            let comment = if pending_comment.is_empty() {
                None
            } else {
                Some(pending_comment.join("\n"))
            };
            pending_comment.clear();

            let Some(section) = sections.last_mut() else {
                return Err(parse_error(line_no, "key outside of any section"));
            };
            // Later duplicates win, as they would for a reader scanning top-down
            match section.entry_mut(key) {
                Some(existing) => {
                    existing.value = value.to_string();
                    existing.comment = comment;
                }
                None => section.entries.push(Entry {
                    key: key.to_string(),
                    value: value.to_string(),
                    comment,
                }),
            }
        }

        Ok(Self { sections })
    }

    /// Serialize the document back to key-file text
    pub fn to_data(&self) -> String {
        let mut output = String::new();

        for (index, section) in self.sections.iter().enumerate() {
            output.push('[');
            output.push_str(&section.name);
            output.push_str("]\n");

            for entry in &section.entries {
                if let Some(comment) = &entry.comment {
                    for line in comment.lines() {
                        output.push('#');
                        output.push_str(line);
                        output.push('\n');
                    }
                }
                output.push_str(&entry.key);
                output.push('=');
                output.push_str(&entry.value);
                output.push('\n');
            }

            if index + 1 < self.sections.len() {
                output.push('\n');
            }
        }

        output
    }

    /// Produce an independent copy by serializing and re-parsing
    pub fn duplicate(&self) -> Result<Self> {
        Self::parse(&self.to_data())
    }

    /// Names of all sections, in document order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.name.as_str())
    }

    /// Keys of a section, in document order
    pub fn keys(&self, section: &str) -> Vec<&str> {
        self.section(section)
            .map(|s| s.entries.iter().map(|entry| entry.key.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.raw(section, key).is_some()
    }

    /// Read a string value, unescaping it
    pub fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.raw(section, key).map(unescape)
    }

    /// Read a `;`-separated string list
    pub fn get_string_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.raw(section, key).map(split_list)
    }

    /// Read a boolean value
    ///
    /// Returns `None` when the key is absent. A value other than
    /// `true`/`false`/`1`/`0` (trailing whitespace aside) is logged and read
    /// as `false`.
    pub fn get_boolean(&self, section: &str, key: &str) -> Option<bool> {
        let raw = self.raw(section, key)?;
        match raw.trim_end() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            other => {
                warn!(
                    "Key file contains key '{}' in group '{}' which has a value that cannot be interpreted: '{}'",
                    key, section, other
                );
                Some(false)
            }
        }
    }

    /// Comment attached to an entry, without the leading `#`
    pub fn comment(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.entry(key)?.comment.as_deref()
    }

    /// Set a string value, keeping any existing comment
    pub fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.set_raw(section, key, escape(value, false));
    }

    /// Set a string list value, keeping any existing comment
    pub fn set_string_list<S: AsRef<str>>(&mut self, section: &str, key: &str, values: &[S]) {
        let mut raw = String::new();
        for value in values {
            raw.push_str(&escape(value.as_ref(), true));
            raw.push(';');
        }
        self.set_raw(section, key, raw);
    }

    /// Set a boolean value, keeping any existing comment
    pub fn set_boolean(&mut self, section: &str, key: &str, value: bool) {
        self.set_raw(section, key, value.to_string());
    }

    /// Attach a comment to an existing entry, or clear it with `None`
    ///
    /// Returns `false` if the entry does not exist.
    pub fn set_comment(&mut self, section: &str, key: &str, comment: Option<&str>) -> bool {
        match self.section_mut(section).and_then(|s| s.entry_mut(key)) {
            Some(entry) => {
                entry.comment = comment.map(str::to_string);
                true
            }
            None => false,
        }
    }

    /// Remove an entry and its comment
    ///
    /// A section left with no entries is dropped. Returns whether the entry
    /// existed.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        let Some(pos) = self.sections.iter().position(|s| s.name == section) else {
            return false;
        };
        let entries = &mut self.sections[pos].entries;
        let before = entries.len();
        entries.retain(|entry| entry.key != key);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.sections.remove(pos);
        }
        removed
    }

    /// Remove a whole section. Returns whether it existed.
    pub fn remove_section(&mut self, section: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != section);
        self.sections.len() != before
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    fn raw(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.entry(key).map(|entry| entry.value.as_str())
    }

    fn set_raw(&mut self, section: &str, key: &str, value: String) {
        let section = match self.sections.iter().position(|s| s.name == section) {
            Some(pos) => &mut self.sections[pos],
            None => {
                self.sections.push(Section {
                    name: section.to_string(),
                    entries: Vec::new(),
                });
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            }
        };
        match section.entry_mut(key) {
            Some(entry) => entry.value = value,
            None => section.entries.push(Entry {
                key: key.to_string(),
                value,
                comment: None,
            }),
        }
    }
}

fn parse_error(line: usize, message: &str) -> Error {
    Error::KeyFileParse {
        line,
        message: message.to_string(),
    }
}

fn escape(value: &str, in_list: bool) -> String {
    // Spaces from here on are trailing; list items are always `;`-terminated
    let trailing = if in_list {
        value.len()
    } else {
        value.trim_end_matches(' ').len()
    };
    let mut out = String::with_capacity(value.len());
    for (index, ch) in value.char_indices() {
        match ch {
            ' ' if index == 0 || index >= trailing => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            ';' if in_list => out.push_str("\\;"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape_char(next: char) -> Option<char> {
    match next {
        's' => Some(' '),
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        ';' => Some(';'),
        _ => None,
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(next) => match unescape_char(next) {
                Some(c) => out.push(c),
                None => {
                    out.push('\\');
                    out.push(next);
                }
            },
            None => out.push('\\'),
        }
    }
    out
}

fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ';' => items.push(std::mem::take(&mut current)),
            '\\' => match chars.next() {
                Some(next) => match unescape_char(next) {
                    Some(c) => current.push(c),
                    None => {
                        current.push('\\');
                        current.push(next);
                    }
                },
                None => current.push('\\'),
            },
            _ => current.push(ch),
        }
    }
    // An unterminated trailing item still counts, unless it is blank
    if !current.trim().is_empty() {
        items.push(current);
    }
    items
}
