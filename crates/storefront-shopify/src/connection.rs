//! Flattening of `edges { node }` connections into plain lists.

use crate::types::Connection;

/// Extracts the nodes of a connection, one slot per edge, in order.
///
/// A `null` edge or an edge without a `node` yields `None` in its slot
/// rather than shifting later entries, so `result.len() == edges.len()` and
/// `result[i]` is always `edges[i].node`. Never fails; an empty connection
/// yields an empty `Vec`.
#[must_use]
pub fn remove_edges_and_nodes<T>(connection: Connection<T>) -> Vec<Option<T>> {
    connection
        .edges
        .into_iter()
        .map(|edge| edge.and_then(|e| e.node))
        .collect()
}

/// Extracts the nodes of a connection, dropping empty slots.
///
/// This is what the reshaping code renders from; every dropped slot is
/// logged at `debug` with its position and the list it came from.
#[must_use]
pub fn collect_nodes<T>(connection: Connection<T>, list: &str) -> Vec<T> {
    remove_edges_and_nodes(connection)
        .into_iter()
        .enumerate()
        .filter_map(|(index, node)| {
            if node.is_none() {
                tracing::debug!(list, index, "connection edge has no node; skipping");
            }
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    fn edge(node: Option<u32>) -> Option<Edge<u32>> {
        Some(Edge { node, cursor: None })
    }

    #[test]
    fn empty_connection_yields_empty_vec() {
        let connection: Connection<u32> = Connection::default();
        assert!(remove_edges_and_nodes(connection).is_empty());
    }

    #[test]
    fn preserves_order_one_to_one() {
        let connection = Connection::from_nodes([3, 1, 2, 1]);
        assert_eq!(
            remove_edges_and_nodes(connection),
            vec![Some(3), Some(1), Some(2), Some(1)]
        );
    }

    #[test]
    fn missing_node_keeps_its_slot() {
        let connection = Connection {
            edges: vec![edge(Some(1)), edge(None), None, edge(Some(4))],
            page_info: None,
        };
        let nodes = remove_edges_and_nodes(connection.clone());

        assert_eq!(nodes.len(), connection.edges.len());
        for (slot, original) in nodes.iter().zip(&connection.edges) {
            assert_eq!(slot, &original.as_ref().and_then(|e| e.node));
        }
    }

    #[test]
    fn collect_nodes_drops_holes_without_reordering() {
        let connection = Connection {
            edges: vec![edge(Some(7)), edge(None), edge(Some(5))],
            page_info: None,
        };
        assert_eq!(collect_nodes(connection, "test"), vec![7, 5]);
    }

    #[test]
    fn deserializes_edge_without_node() {
        let connection: Connection<String> =
            serde_json::from_str(r#"{"edges":[{"node":"a"},{},null,{"node":"d"}]}"#)
                .expect("connection");
        assert_eq!(
            remove_edges_and_nodes(connection),
            vec![Some("a".to_owned()), None, None, Some("d".to_owned())]
        );
    }
}
