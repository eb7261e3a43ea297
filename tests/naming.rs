//! Property and example tests for hook-name resolution.

use anystate::naming::{canonical_id, strip_hook_affixes, to_hyphenated};
use proptest::prelude::*;

#[test]
fn canonical_ids_of_common_hook_names() {
    let cases = [
        ("useCounter", "counter"),
        ("useCounterHook", "counter"),
        ("useUserProfile", "user-profile"),
        ("UserProfileHook", "user-profile"),
        ("user", "user"),
        ("useHook", "hook"),
        ("counter", "counter"),
    ];
    for (name, id) in cases {
        assert_eq!(canonical_id(name), id, "{}", name);
    }
}

#[test]
fn prefix_needs_an_uppercase_follower() {
    assert_eq!(strip_hook_affixes("username"), "username");
    assert_eq!(strip_hook_affixes("use"), "use");
    assert_eq!(strip_hook_affixes("useX"), "X");
}

#[test]
fn acronyms_hyphenate_per_letter() {
    assert_eq!(to_hyphenated("HTTPServer"), "h-t-t-p-server");
    assert_eq!(to_hyphenated("already-canonical"), "already-canonical");
}

proptest! {
    #[test]
    fn canonical_id_is_idempotent(name in "[a-zA-Z][a-zA-Z0-9]{0,24}") {
        let once = canonical_id(&name);
        prop_assert_eq!(canonical_id(&once), once.clone());
    }

    #[test]
    fn canonical_id_has_no_uppercase(name in "[a-zA-Z0-9]{0,24}") {
        let id = canonical_id(&name);
        prop_assert!(!id.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn hyphenation_preserves_letters(name in "[a-zA-Z]{0,24}") {
        let hyphenated = to_hyphenated(&name);
        let letters: String = hyphenated.chars().filter(|c| *c != '-').collect();
        prop_assert_eq!(letters, name.to_lowercase());
    }
}
