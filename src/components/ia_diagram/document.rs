//! Document boundary: JSON parsing/validation and structural mutations.
//!
//! Validation happens here and only here; once a [`DocNode`] tree exists it
//! is assumed well-formed by the rest of the engine. Mutations clone the
//! tree and return a new root so in-flight renders keep seeing the previous
//! version until the caller swaps it out and recompiles.

use log::debug;

use super::types::DocNode;

/// Result alias for document-level operations.
pub type Result<T> = std::result::Result<T, DiagramError>;

#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
	#[error("invalid document: {message}")]
	InvalidDocument { message: String },

	#[error("no node named {name:?} in the document")]
	TargetNotFound { name: String },
}

impl DocNode {
	/// Parse an uploaded/fetched JSON document. This is the one place
	/// [`DiagramError::InvalidDocument`] is produced; a non-object value or
	/// a node missing `name` fails here.
	pub fn from_json(text: &str) -> Result<DocNode> {
		let doc: DocNode =
			serde_json::from_str(text).map_err(|err| DiagramError::InvalidDocument {
				message: err.to_string(),
			})?;
		debug!("parsed document rooted at {:?}", doc.name);
		Ok(doc)
	}
}

/// Append `child` under the first node (pre-order) named `parent_name`.
/// Returns the new root; the input tree is left untouched.
pub fn add_child_under(doc: &DocNode, parent_name: &str, child: DocNode) -> Result<DocNode> {
	let mut next = doc.clone();
	let mut carrier = Some(child);
	if insert_child(&mut next, parent_name, &mut carrier) {
		Ok(next)
	} else {
		Err(DiagramError::TargetNotFound {
			name: parent_name.to_string(),
		})
	}
}

fn insert_child(node: &mut DocNode, parent_name: &str, carrier: &mut Option<DocNode>) -> bool {
	if node.name == parent_name {
		if let Some(child) = carrier.take() {
			node.children.push(child);
		}
		return true;
	}
	node.children
		.iter_mut()
		.any(|c| insert_child(c, parent_name, carrier))
}

/// Remove every node named `target` (with its whole subtree), preserving
/// the order of remaining siblings. A root match removes the entire
/// document and yields `Ok(None)`; the caller owns the empty-document
/// state from there.
pub fn remove_by_name(doc: &DocNode, target: &str) -> Result<Option<DocNode>> {
	if doc.name == target {
		return Ok(None);
	}
	let mut next = doc.clone();
	let removed = prune(&mut next, target);
	if removed == 0 {
		return Err(DiagramError::TargetNotFound {
			name: target.to_string(),
		});
	}
	debug!("removed {removed} subtree(s) named {target:?}");
	Ok(Some(next))
}

fn prune(node: &mut DocNode, target: &str) -> usize {
	let before = node.children.len();
	node.children.retain(|c| c.name != target);
	let mut removed = before - node.children.len();
	for child in &mut node.children {
		removed += prune(child, target);
	}
	removed
}
