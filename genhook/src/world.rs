//! Stable identity of a host world.

use std::fmt;

use arcstr::ArcStr;


/// Identifies a world of the host for as long as it is loaded, this is used as the
/// key of per-world override state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldId(ArcStr);

impl WorldId {

    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
