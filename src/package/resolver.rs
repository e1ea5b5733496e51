//! Request path resolution.
//!
//! # Responsibilities
//! - Pick the submodule owning a request path, if any
//! - Produce the import root and repository URL to advertise
//!
//! # Design Decisions
//! - Longest absolute path wins, so declaration order never matters
//! - Submodules without a URL inherit the package URL
//! - Never fails: unrelated paths resolve to the package itself

use crate::package::registration::{PackageRegistration, Submodule};

/// The import root and repository advertised for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Import root path, either the package path or a submodule's absolute path.
    pub path: &'a str,
    /// Repository URL for `path`.
    pub url: &'a str,
    /// The submodule that matched, if any.
    pub submodule: Option<&'a Submodule>,
}

/// Returns true if `path` is `base`, `base/`, or anything below `base/`.
pub fn is_within(base: &str, path: &str) -> bool {
    path.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Resolve `request_path` against a provisioned package.
pub fn resolve<'a>(registration: &'a PackageRegistration, request_path: &str) -> Resolution<'a> {
    let mut best: Option<&Submodule> = None;
    for submodule in registration.submodules() {
        let candidate = submodule.absolute_path();
        if !is_within(candidate, request_path) {
            continue;
        }
        // Strictly longer only: on equal length the earlier declaration stays.
        match best {
            Some(b) if candidate.len() <= b.absolute_path().len() => {}
            _ => best = Some(submodule),
        }
    }

    match best {
        Some(submodule) => Resolution {
            path: submodule.absolute_path(),
            url: submodule.url().unwrap_or(registration.url()),
            submodule: Some(submodule),
        },
        None => Resolution {
            path: registration.path(),
            url: registration.url(),
            submodule: None,
        },
    }
}
