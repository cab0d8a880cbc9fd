//! Hostname rewrite applied to hash field values before they are returned.

/// Object-storage host that is replaced in `hget` results.
pub const SOURCE_HOST: &str = "chanty-data.s3.us-east-1.amazonaws.com";

/// Host substituted for [`SOURCE_HOST`].
pub const TARGET_HOST: &str = "s3ab.deno.dev";

/// Replaces every occurrence of [`SOURCE_HOST`] with [`TARGET_HOST`].
///
/// Matching is case-sensitive. Values without the source host are returned
/// as-is.
pub fn rewrite_storage_host(value: String) -> String {
    if value.contains(SOURCE_HOST) {
        value.replace(SOURCE_HOST, TARGET_HOST)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rewrites_every_occurrence() {
        let value = "https://chanty-data.s3.us-east-1.amazonaws.com/a.png \
                     https://chanty-data.s3.us-east-1.amazonaws.com/b.png"
            .to_string();
        assert_eq!(
            rewrite_storage_host(value),
            "https://s3ab.deno.dev/a.png https://s3ab.deno.dev/b.png"
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let value = "https://CHANTY-DATA.s3.us-east-1.amazonaws.com/a.png".to_string();
        assert_eq!(rewrite_storage_host(value.clone()), value);
    }

    #[test]
    fn test_other_hosts_untouched() {
        let value = "https://other-bucket.s3.us-east-1.amazonaws.com/a.png".to_string();
        assert_eq!(rewrite_storage_host(value.clone()), value);
    }

    proptest! {
        #[test]
        fn prop_values_without_source_host_unchanged(value in "[a-z0-9./:-]{0,80}") {
            prop_assume!(!value.contains(SOURCE_HOST));
            prop_assert_eq!(rewrite_storage_host(value.clone()), value);
        }

        #[test]
        fn prop_source_host_never_survives(
            prefix in "[a-z/]{0,20}",
            suffix in "[a-z/]{0,20}",
            repeats in 1usize..4,
        ) {
            let value = format!("{prefix}{}{suffix}", SOURCE_HOST.repeat(repeats));
            let rewritten = rewrite_storage_host(value);
            prop_assert!(!rewritten.contains(SOURCE_HOST));
            prop_assert_eq!(rewritten.matches(TARGET_HOST).count(), repeats);
        }
    }
}
