//! Roles and the capability matrix gating privileged actions.
//!
//! Every privileged mutation in the domain services asks this table before
//! acting. Keeping the matrix in one `const fn` avoids the scattered
//! per-callsite role checks that tend to drift apart over time.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Editorial role assigned to a user. Exactly one role per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full control: publishing, deletion, and all management surfaces.
    Admin,
    /// May publish and unpublish, but owns no management surface.
    Editor,
    /// Authors drafts and submits them for review.
    Contributor,
}

/// A named permission checked before a privileged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Permanently remove an article.
    DeleteArticle,
    /// Move an article into (or out of) the published state.
    Publish,
    /// Edit any user profile, not just one's own.
    EditAnyProfile,
    /// Hand a draft over for editorial review.
    SubmitForReview,
    /// Create, edit, and delete user accounts.
    ManageUsers,
    /// Create, rename, and delete categories.
    ManageCategories,
    /// Create, edit, and delete ads.
    ManageAds,
}

impl Role {
    /// Return `true` when this role holds the given capability.
    ///
    /// The table is fixed and exhaustive; there is no configuration surface.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Capability, Role};
    ///
    /// assert!(Role::Editor.has_capability(Capability::Publish));
    /// assert!(!Role::Editor.has_capability(Capability::DeleteArticle));
    /// ```
    pub const fn has_capability(self, capability: Capability) -> bool {
        match capability {
            Capability::Publish => matches!(self, Self::Admin | Self::Editor),
            Capability::SubmitForReview => matches!(self, Self::Contributor),
            Capability::DeleteArticle
            | Capability::EditAnyProfile
            | Capability::ManageUsers
            | Capability::ManageCategories
            | Capability::ManageAds => matches!(self, Self::Admin),
        }
    }

    /// Lowercase label used in log lines and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Contributor => "contributor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    //! Exhaustive coverage of the capability table.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Capability::DeleteArticle, true, false, false)]
    #[case(Capability::Publish, true, true, false)]
    #[case(Capability::EditAnyProfile, true, false, false)]
    #[case(Capability::SubmitForReview, false, false, true)]
    #[case(Capability::ManageUsers, true, false, false)]
    #[case(Capability::ManageCategories, true, false, false)]
    #[case(Capability::ManageAds, true, false, false)]
    fn matrix_matches_specified_table(
        #[case] capability: Capability,
        #[case] admin: bool,
        #[case] editor: bool,
        #[case] contributor: bool,
    ) {
        assert_eq!(Role::Admin.has_capability(capability), admin);
        assert_eq!(Role::Editor.has_capability(capability), editor);
        assert_eq!(Role::Contributor.has_capability(capability), contributor);
    }

    #[test]
    fn roles_serialize_as_snake_case() {
        let value = serde_json::to_value(Role::Contributor).expect("serializes");
        assert_eq!(value, "contributor");
    }
}
