mod node_handle;
pub(crate) mod raw_node;

pub(crate) use node_handle::NodeHandle;
pub use node_handle::{NodeId, NodeShape};
pub use raw_node::Window;
pub(crate) use raw_node::{NodeType, TraitNode};
