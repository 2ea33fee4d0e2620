//! Mapping region positions back into the host document

use crate::node::SourceNode;
use crate::walker::walk_mut;

/// Shifts every node of a region tree into host coordinates.
///
/// Lines move by `line_offset`, byte offsets by `byte_offset`. Columns are
/// left alone: only the first region line starts mid-line in the host, and
/// nothing downstream reads columns of that line.
pub fn normalize_locations(root: &mut SourceNode, line_offset: usize, byte_offset: usize) {
    if line_offset == 0 && byte_offset == 0 {
        return;
    }
    walk_mut(root, &mut |node| {
        node.start += byte_offset;
        node.end += byte_offset;
        if let Some(loc) = node.loc.as_mut() {
            loc.start.line += line_offset;
            loc.end.line += line_offset;
        }
    });
}
