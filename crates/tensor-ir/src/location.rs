//! Source locations attached to operations.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use cranelift_entity::{PrimaryMap, entity_impl};
use parking_lot::RwLock;

use crate::refs::PathRef;
use crate::symbol::Symbol;

/// A span of source code, represented as byte offsets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Source location of an operation. Copy-able, no lifetime parameter.
///
/// A location may be wrapped in name tags attributing it to operators, used
/// when a rewrite derives new operations from an existing one. Tags nest:
/// wrapping a tagged location keeps the earlier tag reachable through
/// [`inner`](Self::inner).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub path: PathRef,
    pub span: Span,
    tag: Option<TagRef>,
}

impl Location {
    pub const fn new(path: PathRef, span: Span) -> Self {
        Self {
            path,
            span,
            tag: None,
        }
    }

    /// Wrap this location in a name tag.
    pub fn named(self, name: Symbol) -> Self {
        let tag = intern_tag(TagNode {
            name,
            inner: self.tag,
        });
        Self {
            tag: Some(tag),
            ..self
        }
    }

    /// The outermost name tag.
    pub fn name(&self) -> Option<Symbol> {
        self.tag.map(|tag| tag_node(tag).name)
    }

    /// The location this one wraps, or `None` if it carries no tag.
    pub fn inner(&self) -> Option<Location> {
        let node = tag_node(self.tag?);
        Some(Self {
            tag: node.inner,
            ..*self
        })
    }

    /// All name tags, outermost first.
    pub fn names(&self) -> Vec<Symbol> {
        let tags = TAGS.read();
        let mut names = Vec::new();
        let mut next = self.tag;
        while let Some(tag) = next {
            let node = tags.nodes[tag];
            names.push(node.name);
            next = node.inner;
        }
        names
    }

    /// The same path and span with every tag removed.
    pub fn base(&self) -> Location {
        Self::new(self.path, self.span)
    }

    /// Render this location, resolving its path through `paths`.
    pub fn display<'a>(&'a self, paths: &'a PathInterner) -> LocationDisplay<'a> {
        LocationDisplay { loc: self, paths }
    }
}

/// Display adapter returned by [`Location::display`].
pub struct LocationDisplay<'a> {
    loc: &'a Location,
    paths: &'a PathInterner,
}

impl fmt::Display for LocationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.loc.names() {
            write!(f, "{name} @ ")?;
        }
        let Location { path, span, .. } = self.loc;
        write!(f, "{}:{}..{}", self.paths.get(*path), span.start, span.end)
    }
}

// ============================================================================
// Name tags
// ============================================================================

/// Interned link in a chain of name tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct TagRef(u32);
entity_impl!(TagRef, "tag");

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct TagNode {
    name: Symbol,
    inner: Option<TagRef>,
}

struct TagTable {
    nodes: PrimaryMap<TagRef, TagNode>,
    dedup: HashMap<TagNode, TagRef>,
}

/// Tag chains are shared by every context, like symbols. The same chain
/// always interns to the same `TagRef`, so locations compare by value.
static TAGS: LazyLock<RwLock<TagTable>> = LazyLock::new(|| {
    RwLock::new(TagTable {
        nodes: PrimaryMap::new(),
        dedup: HashMap::new(),
    })
});

fn intern_tag(node: TagNode) -> TagRef {
    let mut table = TAGS.upgradable_read();
    if let Some(&tag) = table.dedup.get(&node) {
        return tag;
    }
    table.with_upgraded(|table| {
        let tag = table.nodes.push(node);
        table.dedup.insert(node, tag);
        tag
    })
}

fn tag_node(tag: TagRef) -> TagNode {
    TAGS.read().nodes[tag]
}

/// Deduplicating path (URI string) interner.
pub struct PathInterner {
    paths: PrimaryMap<PathRef, String>,
    dedup: HashMap<String, PathRef>,
}

impl PathInterner {
    pub fn new() -> Self {
        Self {
            paths: PrimaryMap::new(),
            dedup: HashMap::default(),
        }
    }

    /// Intern a path string, returning an existing ref if the string matches.
    pub fn intern(&mut self, path: impl Into<String>) -> PathRef {
        let path = path.into();
        if let Some(&existing) = self.dedup.get(&path) {
            return existing;
        }
        let r = self.paths.push(path.clone());
        self.dedup.insert(path, r);
        r
    }

    pub fn get(&self, r: PathRef) -> &str {
        &self.paths[r]
    }
}

impl Default for PathInterner {
    fn default() -> Self {
        Self::new()
    }
}
