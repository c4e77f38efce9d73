//! Prefix tree used for shell completion of commands, ids and tags.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<char, Node>,
    terminal: bool,
}

/// A set of words supporting prefix lookup.
///
/// ```
/// use memkeep::trie::Trie;
///
/// let trie: Trie = ["rust", "ruby", "go"].into_iter().collect();
/// assert_eq!(trie.completions("ru"), vec!["ruby", "rust"]);
/// assert!(trie.contains("go"));
/// ```
#[derive(Debug, Default)]
pub struct Trie {
    root: Node,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `word`; empty words and duplicates are ignored.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let node = word
            .chars()
            .fold(&mut self.root, |node, ch| node.children.entry(ch).or_default());
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    /// Removes `word`, returning whether it was present.
    ///
    /// Branches left empty are pruned.
    pub fn remove(&mut self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return false;
        }
        let removed = remove_from(&mut self.root, &chars);
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.node(word).is_some_and(|n| n.terminal)
    }

    /// Words starting with `prefix`, in sorted order.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.node(prefix) {
            let mut buf = prefix.to_string();
            collect(node, &mut buf, &mut out);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
        self.len = 0;
    }

    fn node(&self, prefix: &str) -> Option<&Node> {
        prefix
            .chars()
            .try_fold(&self.root, |node, ch| node.children.get(&ch))
    }
}

impl<'a> FromIterator<&'a str> for Trie {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for word in iter {
            trie.insert(word);
        }
        trie
    }
}

/// Returns true if the word was found; prunes children that end up empty.
fn remove_from(node: &mut Node, chars: &[char]) -> bool {
    let Some((first, rest)) = chars.split_first() else {
        let was_terminal = node.terminal;
        node.terminal = false;
        return was_terminal;
    };
    let Some(child) = node.children.get_mut(first) else {
        return false;
    };
    let removed = remove_from(child, rest);
    if removed && !child.terminal && child.children.is_empty() {
        node.children.remove(first);
    }
    removed
}

fn collect(node: &Node, buf: &mut String, out: &mut Vec<String>) {
    if node.terminal {
        out.push(buf.clone());
    }
    for (ch, child) in &node.children {
        buf.push(*ch);
        collect(child, buf, out);
        buf.pop();
    }
}
