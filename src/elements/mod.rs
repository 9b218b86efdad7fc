//! Structural elements: the value types that make up a `Model`

mod material;
mod member;
mod node;
mod section;
mod support;

pub use material::{Material, MaterialCategory};
pub use member::{Member, MemberReleases};
pub use node::Node;
pub use section::{Section, SectionType};
pub use support::Support;
