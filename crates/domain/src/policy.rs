//! Per-platform account selection policies.

use crawlpool_core::{AppError, AppResult};

use crate::{AccountStatus, Platform};

/// Resolves a caller-supplied policy tag to the ordered status list to try.
///
/// Instagram and TikTok lease `normal` accounts only and ignore the tag.
/// Twitter recognizes `normal`, `suspended`, `search` (normal accounts for
/// search crawls) and `similar` (suspended first, then normal), with
/// `similar` as the default when no tag is given.
pub fn eligible_statuses(platform: Platform, tag: Option<&str>) -> AppResult<Vec<AccountStatus>> {
    match platform {
        Platform::Instagram | Platform::TikTok => Ok(vec![AccountStatus::Normal]),
        Platform::Twitter => match tag.unwrap_or_default() {
            "" | "similar" => Ok(vec![AccountStatus::Suspended, AccountStatus::Normal]),
            "normal" | "search" => Ok(vec![AccountStatus::Normal]),
            "suspended" => Ok(vec![AccountStatus::Suspended]),
            other => Err(AppError::Validation(format!(
                "unknown twitter account type '{other}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_similar_tries_suspended_then_normal() {
        let statuses = eligible_statuses(Platform::Twitter, Some("similar")).unwrap();
        assert_eq!(
            statuses,
            vec![AccountStatus::Suspended, AccountStatus::Normal]
        );
    }

    #[test]
    fn twitter_defaults_to_similar_policy() {
        assert_eq!(
            eligible_statuses(Platform::Twitter, None).unwrap(),
            eligible_statuses(Platform::Twitter, Some("similar")).unwrap()
        );
        assert_eq!(
            eligible_statuses(Platform::Twitter, Some("")).unwrap(),
            eligible_statuses(Platform::Twitter, Some("similar")).unwrap()
        );
    }

    #[test]
    fn twitter_search_uses_normal_accounts_only() {
        let statuses = eligible_statuses(Platform::Twitter, Some("search")).unwrap();
        assert_eq!(statuses, vec![AccountStatus::Normal]);
    }

    #[test]
    fn twitter_rejects_unknown_tag() {
        assert!(eligible_statuses(Platform::Twitter, Some("premium")).is_err());
    }

    #[test]
    fn instagram_and_tiktok_ignore_the_tag() {
        for platform in [Platform::Instagram, Platform::TikTok] {
            let statuses = eligible_statuses(platform, Some("suspended")).unwrap();
            assert_eq!(statuses, vec![AccountStatus::Normal]);
        }
    }
}
