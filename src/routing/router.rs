//! Package lookup and dispatch.
//!
//! # Responsibilities
//! - Store provisioned packages with their mount matchers
//! - Look up the package owning a request
//! - Return matched package or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes sorted once at build time: host-restricted first, then longest mount path
//! - O(n) scan in that order, first match wins
//! - Explicit NoMatch rather than silent default

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::config::PackageConfig;
use crate::package::{PackageRegistration, ProvisionError};
use crate::routing::matcher::{AndMatcher, HostMatcher, Matcher, MountMatcher};

/// A package together with the conditions under which it serves a request.
#[derive(Debug)]
pub struct Route {
    matcher: AndMatcher,
    package: Arc<PackageRegistration>,
}

impl Route {
    pub fn new(package: PackageRegistration) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = vec![Box::new(MountMatcher::new(package.path()))];
        if let Some(host) = package.host() {
            matchers.push(Box::new(HostMatcher::new(host)));
        }

        Self {
            matcher: AndMatcher::new(matchers),
            package: Arc::new(package),
        }
    }

    pub fn package(&self) -> &Arc<PackageRegistration> {
        &self.package
    }

    fn specificity(&self) -> (bool, usize) {
        (self.package.host().is_some(), self.package.path().len())
    }
}

/// Immutable table of provisioned packages.
#[derive(Debug, Default)]
pub struct PackageRouter {
    routes: Vec<Route>,
}

impl PackageRouter {
    /// Provision every package, failing as a whole if any package is invalid.
    pub fn from_config(packages: &[PackageConfig]) -> Result<Self, ProvisionError> {
        let packages = packages
            .iter()
            .map(PackageRegistration::provision)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(packages))
    }

    pub fn new(packages: Vec<PackageRegistration>) -> Self {
        let mut routes: Vec<Route> = packages.into_iter().map(Route::new).collect();
        // Stable sort keeps config order among equally specific routes.
        routes.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
        Self { routes }
    }

    /// Find the package responsible for this request.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Arc<PackageRegistration>> {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(req))
            .map(Route::package)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
