use std::collections::HashMap;
use tracing::trace;

/// A node in a trie of `/`-separated relative paths.
#[derive(Default)]
pub struct TrieNode {
    pub children: HashMap<String, TrieNode>,
    pub token_count: Option<usize>,
}

impl TrieNode {
    pub fn new() -> Self {
        TrieNode::default()
    }

    /// Calculates the total number of tokens in the subtree.
    pub fn calculate_total_tokens(&self) -> usize {
        self.token_count.unwrap_or(0)
            + self
                .children
                .values()
                .map(|child| child.calculate_total_tokens())
                .sum::<usize>()
    }
}

#[derive(Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    /// Inserts a relative path with its token count.
    pub fn insert(&mut self, path: &str, token_count: usize) {
        trace!("Inserting path: {} with token count: {}", path, token_count);
        let mut current_node = &mut self.root;
        for component in path.split('/').filter(|c| !c.is_empty()) {
            current_node = current_node
                .children
                .entry(component.to_owned())
                .or_default();
        }
        current_node.token_count = Some(token_count);
    }

    pub fn get_root(&self) -> &TrieNode {
        &self.root
    }
}
