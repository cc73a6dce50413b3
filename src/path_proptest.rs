//! Property-based tests for canonical keys and build stamps.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{canonical_key, normalize};
    use crate::version::BuildStamp;
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,8}".prop_filter("not the source root", |s| s != "src")
    }

    // ============================================================================
    // canonical_key property tests
    // ============================================================================

    proptest! {
        /// Property: the key of a file under `src/` does not depend on the
        /// project it lives in
        #[test]
        fn canonical_key_is_project_independent(
            root_a in prop::collection::vec(segment(), 1..4),
            root_b in prop::collection::vec(segment(), 1..4),
            rest in prop::collection::vec(segment(), 1..5),
        ) {
            let root_a: PathBuf = Path::new("/").join(root_a.join("/"));
            let root_b: PathBuf = Path::new("/").join(root_b.join("/"));
            let tail = format!("src/{}", rest.join("/"));

            let key_a = canonical_key(&root_a, &root_a.join(&tail));
            let key_b = canonical_key(&root_b, &root_b.join(&tail));
            prop_assert_eq!(&key_a, &key_b);
            prop_assert_eq!(key_a, tail);
        }

        /// Property: a directory called `src` above the project root is ignored
        #[test]
        fn canonical_key_ignores_src_outside_project(
            name in segment(),
            rest in prop::collection::vec(segment(), 1..4),
        ) {
            let root = Path::new("/src/work").join(&name);
            let file = root.join("src").join(rest.join("/"));
            let key = canonical_key(&root, &file);
            prop_assert!(key.starts_with("src/"));
            prop_assert_eq!(key.split('/').filter(|part| *part == "src").count(), 1);
        }

        /// Property: normalizing an already-normal path is a no-op
        #[test]
        fn normalize_is_idempotent(parts in prop::collection::vec("[a-z]{1,5}|\\.|\\.\\.", 1..8)) {
            let path = PathBuf::from(format!("/{}", parts.join("/")));
            let once = normalize(&path);
            prop_assert_eq!(normalize(&once), once);
        }
    }

    // ============================================================================
    // BuildStamp property tests
    // ============================================================================

    proptest! {
        /// Property: stamp ordering follows date ordering
        #[test]
        fn stamp_order_matches_date_order(a in 0i64..20000, b in 0i64..20000) {
            let base = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            let date_a = base + chrono::Duration::days(a);
            let date_b = base + chrono::Duration::days(b);

            let stamp_a = BuildStamp::for_date(date_a);
            let stamp_b = BuildStamp::for_date(date_b);
            prop_assert_eq!(stamp_a.cmp(&stamp_b), date_a.cmp(&date_b));
        }

        /// Property: numeric ordering, not lexical ("2024.10" > "2024.9")
        #[test]
        fn stamp_order_is_numeric(major in 0u64..5000, x in 0u64..1000, y in 0u64..1000) {
            let a = BuildStamp::parse(&format!("{}.{}", major, x)).unwrap();
            let b = BuildStamp::parse(&format!("{}.{}", major, y)).unwrap();
            prop_assert_eq!(a.cmp(&b), x.cmp(&y));
        }

        /// Property: a stamp embedded in a file name is recovered exactly
        #[test]
        fn stamp_round_trips_through_file_name(
            parts in prop::collection::vec(0u64..10000, 1..4),
            ext in "(\\.min)?\\.js",
        ) {
            let token = parts.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
            let file_name = format!("suite-{}{}", token, ext);
            let stamp = BuildStamp::from_file_name("suite-", &file_name).unwrap();
            prop_assert_eq!(stamp.as_str(), token.as_str());
        }
    }
}
