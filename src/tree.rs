/// Navigation primitives over one node of a parsed document.
///
/// The flattener only ever reads through this trait, so it works against any
/// tree-shaped input. Implementations are expected to be cheap handles
/// (typically references into a parsed document); the engine never mutates
/// the tree.
///
/// Absence is not an error anywhere in this contract: a missing child,
/// attribute, or text node is `None` / an empty list, and callers treat it as
/// "this item has no data for this path".
pub trait TreeNode: Sized + Clone {
    /// First matching child or descendant, in document order.
    fn find_one(&self, tag: &str) -> Option<Self>;

    /// All matching children and descendants, in document order.
    fn find_all(&self, tag: &str) -> Vec<Self>;

    /// Value of the named attribute on this node.
    fn attr(&self, name: &str) -> Option<String>;

    /// Text content of this node, `None` if it has none.
    fn text(&self) -> Option<String>;
}
