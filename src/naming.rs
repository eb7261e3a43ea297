//! Naming resolver: turns hook-style names into canonical ids.
//!
//! ```text
//! useCounterHook → Counter → counter
//! useUserProfile → UserProfile → user-profile
//! ```
//!
//! The transform is pure and idempotent on its own output, so an id that
//! is already canonical passes through unchanged.

const HOOK_PREFIX: &str = "use";
const HOOK_SUFFIX: &str = "Hook";

/// Strip the conventional `use` prefix and `Hook` suffix.
///
/// The prefix only counts when followed by an uppercase letter (`useState`,
/// not `user`), and the suffix is kept when stripping it would leave
/// nothing behind.
pub fn strip_hook_affixes(name: &str) -> &str {
    let mut bare = name;

    if let Some(rest) = bare.strip_prefix(HOOK_PREFIX) {
        if rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            bare = rest;
        }
    }

    if let Some(rest) = bare.strip_suffix(HOOK_SUFFIX) {
        if !rest.is_empty() {
            bare = rest;
        }
    }

    bare
}

/// Convert medial capitals to lower-case hyphenated form.
///
/// One hyphen goes before every uppercase letter except the first
/// character, so `HTTPServer` becomes `h-t-t-p-server`.
pub fn to_hyphenated(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve a hook-style name to its canonical id.
pub fn canonical_id(name: &str) -> String {
    to_hyphenated(strip_hook_affixes(name))
}
