pub use self::{distancer::*, geometry::*, layout::*};

pub(crate) mod distancer;
pub(crate) mod geometry;
pub(crate) mod layout;
