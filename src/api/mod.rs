//
//  gitlab-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the [`GitlabClient`] and the per-resource sub-clients
//! it hands out.
//!
//! ## Resource Groups
//!
//! Sub-clients are looked up by name with [`GitlabClient::api`], or directly
//! through typed accessors such as [`GitlabClient::issues`]. The name table is
//! fixed and matched exactly (no trimming, no case folding):
//!
//! | Names | Group |
//! |-------|-------|
//! | `deploy_keys` | [`DeployKeys`] |
//! | `groups` | [`Groups`] |
//! | `issues` | [`Issues`] |
//! | `board`, `issue_boards` | [`IssueBoards`] |
//! | `jobs` | [`Jobs`] |
//! | `mr`, `merge_requests` | [`MergeRequests`] |
//! | `milestones`, `ms` | [`Milestones`] |
//! | `namespaces`, `ns` | [`Namespaces`] |
//! | `projects` | [`Projects`] |
//! | `repo`, `repositories` | [`Repositories`] |
//! | `snippets` | [`Snippets`] |
//! | `hooks`, `system_hooks` | [`SystemHooks`] |
//! | `users` | [`Users`] |
//! | `keys` | [`Keys`] |
//! | `tags` | [`Tags`] |
//! | `version` | [`Version`] |
//!
//! Every lookup constructs a new sub-client; they hold nothing but a
//! reference to the client.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gitlab_client::{AuthMethod, GitlabClient};
//! use gitlab_client::api::Api;
//!
//! # async fn example() -> gitlab_client::Result<()> {
//! let mut client = GitlabClient::new()?;
//! client.authenticate("glpat-xxxx", AuthMethod::HttpToken, None);
//!
//! if let Api::MergeRequests(mrs) = client.api("mr")? {
//!     let all = mrs.all("group/project", &Default::default()).await?;
//!     println!("{} merge requests", all.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The client that owns the transport pipeline.
pub mod client;

/// Shared helpers: path encoding, query encoding and pagination.
pub mod common;

pub mod deploy_keys;
pub mod groups;
pub mod issue_boards;
pub mod issues;
pub mod jobs;
pub mod keys;
pub mod merge_requests;
pub mod milestones;
pub mod namespaces;
pub mod projects;
pub mod repositories;
pub mod snippets;
pub mod system_hooks;
pub mod tags;
pub mod users;
pub mod version;

pub use client::GitlabClient;
pub use common::{encode_path, query_pairs, ListOptions, Pagination, ResultPager, UserRef};
pub use deploy_keys::DeployKeys;
pub use groups::Groups;
pub use issue_boards::IssueBoards;
pub use issues::{Issue, Issues};
pub use jobs::Jobs;
pub use keys::Keys;
pub use merge_requests::{MergeRequest, MergeRequests};
pub use milestones::Milestones;
pub use namespaces::Namespaces;
pub use projects::{Project, Projects};
pub use repositories::Repositories;
pub use snippets::Snippets;
pub use system_hooks::SystemHooks;
pub use tags::Tags;
pub use users::Users;
pub use version::Version;

/// A logical group of GitLab resources served by one sub-client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceGroup {
    DeployKeys,
    Groups,
    Issues,
    IssueBoards,
    Jobs,
    MergeRequests,
    Milestones,
    Namespaces,
    Projects,
    Repositories,
    Snippets,
    SystemHooks,
    Users,
    Keys,
    Tags,
    Version,
}

/// Every accepted resource group name, synonyms included.
pub const RESOURCE_NAMES: &[(&str, ResourceGroup)] = &[
    ("deploy_keys", ResourceGroup::DeployKeys),
    ("groups", ResourceGroup::Groups),
    ("issues", ResourceGroup::Issues),
    ("board", ResourceGroup::IssueBoards),
    ("issue_boards", ResourceGroup::IssueBoards),
    ("jobs", ResourceGroup::Jobs),
    ("mr", ResourceGroup::MergeRequests),
    ("merge_requests", ResourceGroup::MergeRequests),
    ("milestones", ResourceGroup::Milestones),
    ("ms", ResourceGroup::Milestones),
    ("namespaces", ResourceGroup::Namespaces),
    ("ns", ResourceGroup::Namespaces),
    ("projects", ResourceGroup::Projects),
    ("repo", ResourceGroup::Repositories),
    ("repositories", ResourceGroup::Repositories),
    ("snippets", ResourceGroup::Snippets),
    ("hooks", ResourceGroup::SystemHooks),
    ("system_hooks", ResourceGroup::SystemHooks),
    ("users", ResourceGroup::Users),
    ("keys", ResourceGroup::Keys),
    ("tags", ResourceGroup::Tags),
    ("version", ResourceGroup::Version),
];

impl ResourceGroup {
    /// Looks up a group by exact name.
    pub fn from_name(name: &str) -> Result<Self> {
        RESOURCE_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, group)| *group)
            .ok_or_else(|| Error::invalid_argument(format!("unknown API resource group '{}'", name)))
    }

    /// All names that resolve to this group.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        RESOURCE_NAMES
            .iter()
            .filter(move |(_, group)| *group == self)
            .map(|(name, _)| *name)
    }
}

impl FromStr for ResourceGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The longest name of each group is its canonical one.
        let name = self.names().max_by_key(|n| n.len()).unwrap_or("unknown");
        f.write_str(name)
    }
}

/// A sub-client returned by [`GitlabClient::api`].
#[derive(Debug, Clone, Copy)]
pub enum Api<'a> {
    DeployKeys(DeployKeys<'a>),
    Groups(Groups<'a>),
    Issues(Issues<'a>),
    IssueBoards(IssueBoards<'a>),
    Jobs(Jobs<'a>),
    MergeRequests(MergeRequests<'a>),
    Milestones(Milestones<'a>),
    Namespaces(Namespaces<'a>),
    Projects(Projects<'a>),
    Repositories(Repositories<'a>),
    Snippets(Snippets<'a>),
    SystemHooks(SystemHooks<'a>),
    Users(Users<'a>),
    Keys(Keys<'a>),
    Tags(Tags<'a>),
    Version(Version<'a>),
}

impl<'a> Api<'a> {
    /// Constructs the sub-client for `group`.
    pub fn new(group: ResourceGroup, client: &'a GitlabClient) -> Self {
        match group {
            ResourceGroup::DeployKeys => Self::DeployKeys(DeployKeys::new(client)),
            ResourceGroup::Groups => Self::Groups(Groups::new(client)),
            ResourceGroup::Issues => Self::Issues(Issues::new(client)),
            ResourceGroup::IssueBoards => Self::IssueBoards(IssueBoards::new(client)),
            ResourceGroup::Jobs => Self::Jobs(Jobs::new(client)),
            ResourceGroup::MergeRequests => Self::MergeRequests(MergeRequests::new(client)),
            ResourceGroup::Milestones => Self::Milestones(Milestones::new(client)),
            ResourceGroup::Namespaces => Self::Namespaces(Namespaces::new(client)),
            ResourceGroup::Projects => Self::Projects(Projects::new(client)),
            ResourceGroup::Repositories => Self::Repositories(Repositories::new(client)),
            ResourceGroup::Snippets => Self::Snippets(Snippets::new(client)),
            ResourceGroup::SystemHooks => Self::SystemHooks(SystemHooks::new(client)),
            ResourceGroup::Users => Self::Users(Users::new(client)),
            ResourceGroup::Keys => Self::Keys(Keys::new(client)),
            ResourceGroup::Tags => Self::Tags(Tags::new(client)),
            ResourceGroup::Version => Self::Version(Version::new(client)),
        }
    }

    /// The group this sub-client serves.
    pub fn group(&self) -> ResourceGroup {
        match self {
            Self::DeployKeys(_) => ResourceGroup::DeployKeys,
            Self::Groups(_) => ResourceGroup::Groups,
            Self::Issues(_) => ResourceGroup::Issues,
            Self::IssueBoards(_) => ResourceGroup::IssueBoards,
            Self::Jobs(_) => ResourceGroup::Jobs,
            Self::MergeRequests(_) => ResourceGroup::MergeRequests,
            Self::Milestones(_) => ResourceGroup::Milestones,
            Self::Namespaces(_) => ResourceGroup::Namespaces,
            Self::Projects(_) => ResourceGroup::Projects,
            Self::Repositories(_) => ResourceGroup::Repositories,
            Self::Snippets(_) => ResourceGroup::Snippets,
            Self::SystemHooks(_) => ResourceGroup::SystemHooks,
            Self::Users(_) => ResourceGroup::Users,
            Self::Keys(_) => ResourceGroup::Keys,
            Self::Tags(_) => ResourceGroup::Tags,
            Self::Version(_) => ResourceGroup::Version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_resolve_to_same_group() {
        let pairs = [
            ("mr", "merge_requests"),
            ("ms", "milestones"),
            ("ns", "namespaces"),
            ("repo", "repositories"),
            ("hooks", "system_hooks"),
            ("board", "issue_boards"),
        ];
        for (short, long) in pairs {
            assert_eq!(
                ResourceGroup::from_name(short).unwrap(),
                ResourceGroup::from_name(long).unwrap()
            );
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        for name in ["Issues", " issues", "issues ", "merge-requests", "", "issue"] {
            match ResourceGroup::from_name(name) {
                Err(Error::InvalidArgument(message)) => assert!(message.contains(name)),
                other => panic!("'{}' resolved to {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_every_group_is_reachable() {
        let groups: std::collections::HashSet<_> =
            RESOURCE_NAMES.iter().map(|(_, g)| *g).collect();
        assert_eq!(groups.len(), 16);
    }

    #[test]
    fn test_display_uses_long_name() {
        assert_eq!(ResourceGroup::MergeRequests.to_string(), "merge_requests");
        assert_eq!(ResourceGroup::SystemHooks.to_string(), "system_hooks");
        assert_eq!(ResourceGroup::Keys.to_string(), "keys");
    }
}
