//! Stable CSS-path derivation for event targets.
//!
//! Used at capture time to label an event's target and at replay time to
//! re-locate it. The resolver walks a [`DomView`] the adapter supplies, so
//! the same path logic runs against any framework's DOM access.

/// Read-only view of a DOM tree, generic over the host's node handle.
///
/// `child_position` is the node's 1-based position among all of its
/// parent's children (element position, as `nth-child` counts).
pub trait DomView {
	type Node: Clone;

	/// Lowercase tag name.
	fn tag(&self, node: &Self::Node) -> String;

	fn id(&self, node: &Self::Node) -> Option<String>;

	/// `None` at the document root.
	fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

	fn child_position(&self, node: &Self::Node) -> usize;
}

/// Derives a `>`-joined CSS path from the document root to `node`.
///
/// At each ancestor with an `id` the path short-circuits to `tag#id` — ids
/// are assumed locally unique. Elsewhere the segment is
/// `tag:nth-child(k)`. Resolution is deterministic for a static DOM but
/// makes no uniqueness guarantee across regenerated subtrees; replay
/// treats a miss as a tolerable [`TargetError::NotFound`](crate::adapter::TargetError).
pub fn resolve<V: DomView>(view: &V, node: &V::Node) -> String {
	let mut segments = Vec::new();
	let mut current = node.clone();

	loop {
		let tag = view.tag(&current);
		if let Some(id) = view.id(&current) {
			segments.push(format!("{tag}#{id}"));
			break;
		}
		segments.push(format!("{tag}:nth-child({})", view.child_position(&current)));
		match view.parent(&current) {
			Some(parent) => current = parent,
			None => break,
		}
	}

	segments.reverse();
	segments.join(" > ")
}
