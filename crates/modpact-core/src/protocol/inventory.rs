//! Inventory token format, message parsing, and bounded chunking.

use crate::catalog::{ModScope, ModuleEntry};

/// Wire command carrying inventory payloads between servers.
pub const CMD_REQMODS: &str = "REQMODS";

/// Longest module name kept from a token; overflow is dropped, not fatal.
pub const MAX_NAME_LEN: usize = 63;

/// Transport line budget for one protocol line.
pub const MAX_LINE_LEN: usize = 512;

/// Margin reserved for `:<server> REQMODS :` framing on the line.
pub const ADDRESS_MARGIN: usize = 68;

/// Default payload bound for one inventory message.
pub const MAX_PAYLOAD_LEN: usize = MAX_LINE_LEN - ADDRESS_MARGIN;

/// One parsed inventory entry; exists only while a message is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub scope: ModScope,
    pub name: String,
    pub version: Option<String>,
}

/// Parse a single `<flag><name>[:<version>]` token.
///
/// The post-flag remainder is capped at [`MAX_NAME_LEN`] bytes *before* the
/// version split, matching the fixed name buffer of the wire format: when
/// the colon falls past the cap, the version is lost along with the
/// overflow and the entry parses as version-less. Returns `None` only for
/// an empty token; a bare flag yields an entry with an empty name, which
/// flows through the decision matrix like any other absent module.
pub fn parse_token(token: &str) -> Option<InventoryEntry> {
    let mut chars = token.chars();
    let flag = chars.next()?;
    let rest = truncate_on_char_boundary(chars.as_str(), MAX_NAME_LEN);

    let (name, version) = match rest.split_once(':') {
        Some((name, version)) => (name, Some(version.to_string())),
        None => (rest, None),
    };

    Some(InventoryEntry {
        scope: ModScope::from_flag(flag),
        name: name.to_string(),
        version,
    })
}

/// Parse one message payload into entries, preserving token order.
/// Runs of spaces are tolerated.
pub fn parse_message(payload: &str) -> Vec<InventoryEntry> {
    payload
        .split(' ')
        .filter(|t| !t.is_empty())
        .filter_map(parse_token)
        .collect()
}

/// Format one catalog entry as a wire token.
pub fn format_token(entry: &ModuleEntry) -> String {
    format!("{}{}:{}", entry.scope.flag(), entry.name, entry.version)
}

/// Serialize catalog entries into the minimum number of payloads of at most
/// `max_len` bytes, preserving entry order across payload boundaries. Every
/// entry lands in exactly one payload.
///
/// A single token longer than `max_len` cannot be bounded; it is emitted as
/// its own payload with a warning rather than dropped.
pub fn chunk_inventory<'a, I>(entries: I, max_len: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a ModuleEntry>,
{
    let mut payloads = Vec::new();
    let mut buf = String::new();

    for entry in entries {
        let token = format_token(entry);
        if token.len() > max_len {
            tracing::warn!(
                module = %entry.name,
                len = token.len(),
                max_len,
                "inventory token exceeds payload bound"
            );
        }

        if !buf.is_empty() && buf.len() + 1 + token.len() > max_len {
            payloads.push(std::mem::take(&mut buf));
        }
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(&token);
    }

    if !buf.is_empty() {
        payloads.push(buf);
    }
    payloads
}

/// Byte-capped prefix that never splits a UTF-8 sequence.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::catalog::ModScope;

    fn entry(name: &str, version: &str, scope: ModScope) -> ModuleEntry {
        ModuleEntry::new(name, version, scope, true)
    }

    #[test]
    fn parse_token_basic() {
        let e = parse_token("Gchanfilter:3.2").unwrap();
        assert_eq!(e.scope, ModScope::Global);
        assert_eq!(e.name, "chanfilter");
        assert_eq!(e.version.as_deref(), Some("3.2"));
    }

    #[test]
    fn parse_token_without_version() {
        let e = parse_token("Lunknownmodule").unwrap();
        assert_eq!(e.scope, ModScope::Local);
        assert_eq!(e.name, "unknownmodule");
        assert!(e.version.is_none());
    }

    #[test]
    fn parse_token_keeps_rest_after_first_colon() {
        let e = parse_token("Gfoo:1.0:beta").unwrap();
        assert_eq!(e.name, "foo");
        assert_eq!(e.version.as_deref(), Some("1.0:beta"));
    }

    #[test]
    fn parse_token_bare_flag_is_empty_name() {
        let e = parse_token("G").unwrap();
        assert_eq!(e.scope, ModScope::Global);
        assert_eq!(e.name, "");
        assert!(e.version.is_none());
    }

    #[test]
    fn parse_token_truncates_long_names() {
        let long = "m".repeat(70);
        let e = parse_token(&format!("G{long}")).unwrap();
        assert_eq!(e.name.len(), MAX_NAME_LEN);
        assert_eq!(e.name, "m".repeat(MAX_NAME_LEN));
    }

    #[test]
    fn truncation_can_swallow_the_version() {
        // Name is 62 bytes, so only ":" survives the 63-byte cap and the
        // version digits are cut off entirely.
        let name = "m".repeat(62);
        let e = parse_token(&format!("G{name}:2.0")).unwrap();
        assert_eq!(e.name, name);
        assert_eq!(e.version.as_deref(), Some(""));

        // One byte longer and even the colon is gone: version-less entry.
        let name = "m".repeat(63);
        let e = parse_token(&format!("G{name}:2.0")).unwrap();
        assert_eq!(e.name, name);
        assert!(e.version.is_none());
    }

    #[test]
    fn parse_message_skips_empty_tokens() {
        let entries = parse_message("Gfoo:1.0  Lbar:2.0 ");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "foo");
        assert_eq!(entries[1].name, "bar");
    }

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let catalog = vec![
            entry("alpha", "1.0", ModScope::Global),
            entry("beta", "2.1-rc1", ModScope::Local),
            entry("gamma", "0.9", ModScope::Global),
        ];

        let payloads = chunk_inventory(catalog.iter(), MAX_PAYLOAD_LEN);
        assert_eq!(payloads.len(), 1);

        let parsed: Vec<InventoryEntry> =
            payloads.iter().flat_map(|p| parse_message(p)).collect();
        assert_eq!(parsed.len(), catalog.len());
        for (got, want) in parsed.iter().zip(&catalog) {
            assert_eq!(got.name, want.name);
            assert_eq!(got.version.as_deref(), Some(want.version.as_str()));
            assert_eq!(got.scope, want.scope);
        }
    }

    #[test]
    fn chunking_respects_bound_and_order() {
        let catalog: Vec<ModuleEntry> = (0..40)
            .map(|i| entry(&format!("module{i:02}"), "1.0.0", ModScope::Global))
            .collect();

        let max_len = 64;
        let payloads = chunk_inventory(catalog.iter(), max_len);
        assert!(payloads.len() > 1);
        for p in &payloads {
            assert!(p.len() <= max_len, "payload over bound: {} bytes", p.len());
        }

        // Concatenation of all tokens equals the full serialized catalog.
        let tokens: Vec<String> = payloads
            .iter()
            .flat_map(|p| p.split(' ').map(str::to_string))
            .collect();
        let expected: Vec<String> = catalog.iter().map(format_token).collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn chunking_is_minimal_greedy() {
        // Tokens of 10 bytes each ("Gmod00:1.0"): with an mtu of 32 each
        // payload holds exactly three (10*3 + 2 separators), so ten entries
        // need four payloads.
        let catalog: Vec<ModuleEntry> = (0..10)
            .map(|i| entry(&format!("mod{i:02}"), "1.0", ModScope::Global))
            .collect();
        let payloads = chunk_inventory(catalog.iter(), 32);
        assert_eq!(payloads.len(), 4);
        assert_eq!(payloads[0], "Gmod00:1.0 Gmod01:1.0 Gmod02:1.0");
        assert_eq!(payloads[3], "Gmod09:1.0");
    }

    #[test]
    fn oversized_token_travels_alone() {
        let catalog = vec![
            entry("tiny", "1", ModScope::Local),
            entry(&"x".repeat(50), "1.0", ModScope::Global),
            entry("small", "2", ModScope::Local),
        ];
        let payloads = chunk_inventory(catalog.iter(), 16);
        assert_eq!(payloads.len(), 3);
        assert_eq!(payloads[0], "Ltiny:1");
        assert!(payloads[1].len() > 16);
        assert_eq!(payloads[2], "Lsmall:2");
    }
}
