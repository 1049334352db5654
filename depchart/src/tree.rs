//! Dependency trees returned by the parser.
use std::fmt;

use crate::grammar::{Attachment, Dependency, Side};
use crate::vocab::{TagId, WordId};

/// Label of a tree node: a sentence word with the tag it was parsed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub(crate) position: usize,
    pub(crate) word: String,
    pub(crate) tag: String,
    pub(crate) word_id: WordId,
    pub(crate) tag_id: TagId,
}

impl Label {
    /// Gets the position of the word in the sentence.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Gets the surface form.
    #[inline(always)]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Gets the tag.
    #[inline(always)]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Gets the word id. Unseen words have the id of the unknown word.
    #[inline(always)]
    pub fn word_id(&self) -> WordId {
        self.word_id
    }

    /// Gets the tag id.
    #[inline(always)]
    pub fn tag_id(&self) -> TagId {
        self.tag_id
    }

    fn attachment(&self) -> Attachment {
        Attachment {
            position: self.position,
            word: self.word_id,
            tag: self.tag_id,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.word, self.tag)
    }
}

/// A headed tree over the words of a sentence.
///
/// A [`DepTree::Branch`] is labeled with its head word. Its children are the
/// head's own [`DepTree::Leaf`] and one subtree per argument, in sentence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepTree {
    /// A single word.
    Leaf(Label),
    /// A head with its arguments.
    Branch(Label, Vec<DepTree>),
}

impl DepTree {
    /// Gets the label of the root.
    pub fn label(&self) -> &Label {
        match self {
            Self::Leaf(label) | Self::Branch(label, _) => label,
        }
    }

    /// Gets the children of the root; a leaf has none.
    pub fn children(&self) -> &[DepTree] {
        match self {
            Self::Leaf(_) => &[],
            Self::Branch(_, children) => children,
        }
    }

    /// Checks if the tree is a single word.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Collects the leaves from left to right.
    pub fn leaves(&self) -> Vec<&Label> {
        let mut leaves = vec![];
        self.push_leaves(&mut leaves);
        leaves
    }

    fn push_leaves<'a>(&'a self, leaves: &mut Vec<&'a Label>) {
        match self {
            Self::Leaf(label) => leaves.push(label),
            Self::Branch(_, children) => {
                for child in children {
                    child.push_leaves(leaves);
                }
            }
        }
    }

    /// Gets the surface forms of the leaves from left to right.
    pub fn words(&self) -> Vec<&str> {
        self.leaves().into_iter().map(Label::word).collect()
    }

    /// Gets the fencepost span `(start, end)` covered by the tree.
    pub fn span(&self) -> (usize, usize) {
        match self {
            Self::Leaf(label) => (label.position, label.position + 1),
            Self::Branch(_, children) => {
                let start = children.first().map_or(0, |c| c.span().0);
                let end = children.last().map_or(0, |c| c.span().1);
                (start, end)
            }
        }
    }

    /// Merges every branch whose label equals its parent's label into the parent.
    ///
    /// Labels carry the word position, so only nodes headed by the same word merge.
    pub fn flatten(self) -> Self {
        match self {
            Self::Leaf(_) => self,
            Self::Branch(label, children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.flatten() {
                        Self::Branch(child_label, grandchildren) if child_label == label => {
                            flat.extend(grandchildren);
                        }
                        child => flat.push(child),
                    }
                }
                Self::Branch(label, flat)
            }
        }
    }

    /// Lists the generation events of the analysis.
    ///
    /// Every argument yields its attachment event followed by its two stop
    /// events. The root generates no stop events.
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut deps = vec![];
        self.push_dependencies(self.label(), &mut deps);
        deps
    }

    fn push_dependencies(&self, head: &Label, deps: &mut Vec<Dependency>) {
        let h = head.position;
        for child in self.children() {
            let child_label = child.label();
            if child_label.position == h {
                // the head's own word, or a branch that was not flattened
                child.push_dependencies(head, deps);
                continue;
            }
            let (start, end) = child.span();
            let (side, distance) = if end <= h {
                (Side::Left, h - end)
            } else {
                (Side::Right, start - h - 1)
            };
            deps.push(Dependency {
                head: head.attachment(),
                arg: Some(child_label.attachment()),
                side,
                distance,
            });
            let a = child_label.position;
            for (side, distance) in [(Side::Left, a - start), (Side::Right, end - a - 1)] {
                deps.push(Dependency {
                    head: child_label.attachment(),
                    arg: None,
                    side,
                    distance,
                });
            }
            child.push_dependencies(child_label, deps);
        }
    }

    /// Lists `(argument, head)` position pairs, sorted by argument.
    pub fn arcs(&self) -> Vec<(usize, usize)> {
        let mut arcs: Vec<_> = self
            .dependencies()
            .into_iter()
            .filter_map(|d| d.arg.map(|a| (a.position, d.head.position)))
            .collect();
        arcs.sort_unstable();
        arcs
    }
}

impl fmt::Display for DepTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(label) => write!(f, "{label}"),
            Self::Branch(label, children) => {
                write!(f, "({label}")?;
                for child in children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(position: usize, word: &str, tag: &str) -> Label {
        Label {
            position,
            word: word.to_string(),
            tag: tag.to_string(),
            word_id: WordId(position as u32 + 2),
            tag_id: TagId(position as u32 + 1),
        }
    }

    fn leaf(position: usize, word: &str, tag: &str) -> DepTree {
        DepTree::Leaf(label(position, word, tag))
    }

    // barks(dog(the)) headed by the boundary, as binary backtrace output
    fn binary_tree() -> DepTree {
        let the = leaf(0, "the", "DT");
        let dog = DepTree::Branch(label(1, "dog", "NN"), vec![the, leaf(1, "dog", "NN")]);
        let barks = DepTree::Branch(label(2, "barks", "VBZ"), vec![dog, leaf(2, "barks", "VBZ")]);
        let root = label(3, ".$.", ".$$.");
        DepTree::Branch(root.clone(), vec![barks, DepTree::Leaf(root)])
    }

    #[test]
    fn test_display() {
        assert_eq!(
            binary_tree().to_string(),
            "(.$./.$$. (barks/VBZ (dog/NN the/DT dog/NN) barks/VBZ) .$./.$$.)"
        );
    }

    #[test]
    fn test_flatten_merges_same_head() {
        let head = label(2, "b", "X");
        let inner = DepTree::Branch(head.clone(), vec![leaf(1, "a", "Y"), leaf(2, "b", "X")]);
        let tree = DepTree::Branch(head, vec![inner, leaf(3, "c", "Z")]).flatten();
        assert_eq!(tree.to_string(), "(b/X a/Y b/X c/Z)");
        assert_eq!(tree.children().len(), 3);
    }

    #[test]
    fn test_flatten_keeps_same_word_at_other_position() {
        let outer = label(1, "very", "RB");
        let inner = DepTree::Branch(label(0, "very", "RB"), vec![leaf(0, "very", "RB")]);
        let tree = DepTree::Branch(outer, vec![inner, leaf(1, "very", "RB")]).flatten();
        assert_eq!(tree.children().len(), 2);
        assert!(!tree.children()[0].is_leaf());
    }

    #[test]
    fn test_leaves_and_span() {
        let tree = binary_tree().flatten();
        assert_eq!(tree.words(), vec!["the", "dog", "barks", ".$."]);
        assert_eq!(tree.span(), (0, 4));
        assert_eq!(tree.children()[0].span(), (0, 3));
    }

    #[test]
    fn test_dependencies() {
        let tree = binary_tree().flatten();
        assert_eq!(tree.arcs(), vec![(0, 1), (1, 2), (2, 3)]);

        let deps = tree.dependencies();
        // three arcs, each followed by two stops
        assert_eq!(deps.len(), 9);
        let barks = &deps[0];
        assert_eq!(barks.side, Side::Left);
        assert_eq!(barks.distance, 0);
        // barks covers [0, 3): two words to its left, none to its right
        assert_eq!((deps[1].side, deps[1].distance), (Side::Left, 2));
        assert_eq!((deps[2].side, deps[2].distance), (Side::Right, 0));
        // binary and flattened trees describe the same analysis
        assert_eq!(binary_tree().dependencies(), deps);
    }

    #[test]
    fn test_right_argument_distance() {
        // a(b c) with c attached to a over b
        let b = leaf(1, "b", "X");
        let c = leaf(2, "c", "X");
        let tree = DepTree::Branch(label(0, "a", "X"), vec![leaf(0, "a", "X"), b, c]);
        let deps = tree.dependencies();
        assert_eq!((deps[0].side, deps[0].distance), (Side::Right, 0));
        assert_eq!((deps[3].side, deps[3].distance), (Side::Right, 1));
    }
}
