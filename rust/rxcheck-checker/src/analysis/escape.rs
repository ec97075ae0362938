//! The escape-analysis seam.
//!
//! The mutation check only needs one fact from escape analysis: whether the
//! object bound at an allocation site provably stays inside the function.
//! Anything that cannot answer "yes" must answer "no".

use rxcheck_core::program::{AllocationSite, FunctionDecl};

pub trait EscapeOracle: Send + Sync {
    fn does_not_escape(&self, function: &FunctionDecl, site: &AllocationSite) -> bool;
}

/// Assumes every object escapes. Always safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEscapes;

impl EscapeOracle for AlwaysEscapes {
    fn does_not_escape(&self, _function: &FunctionDecl, _site: &AllocationSite) -> bool {
        false
    }
}

/// Trusts the verdict the front end recorded on each allocation site.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredEscapes;

impl EscapeOracle for DeclaredEscapes {
    fn does_not_escape(&self, _function: &FunctionDecl, site: &AllocationSite) -> bool {
        site.non_escaping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_never_proves_non_escape() {
        let f = FunctionDecl::new("f");
        let site = AllocationSite::new("o", "C", true);
        assert!(!AlwaysEscapes.does_not_escape(&f, &site));
        assert!(DeclaredEscapes.does_not_escape(&f, &site));
        assert!(!DeclaredEscapes.does_not_escape(&f, &AllocationSite::new("o", "C", false)));
    }
}
