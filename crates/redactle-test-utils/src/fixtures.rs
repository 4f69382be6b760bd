//! Sample documents shared by tests.

/// Frontmatter, a two-word title, and one sentence.
pub const PARIS: &str = "---\nfoo: 1\n---\n# Paris Facts\nParis is nice.";

/// A link whose destination gives the answer away.
pub const LINK: &str = "# Paris\n\n[click here](http://example.com/answer-is-paris)";

/// No level-1 heading anywhere.
pub const NO_TITLE: &str = "## Not a title\n\nJust some text.";

/// A title line with no words in it.
pub const EMPTY_TITLE: &str = "# ???\n\nBody text.";

/// Most block and inline constructs in one document.
pub const KITCHEN_SINK: &str = "\
---
title: ignored
---
# The Great Wall

The wall is *long* and **old**. See [the map](https://maps.example/wall).

## History

- built over centuries
- about `21196` km

> A quote about the wall.

```text
wall length
```

| Dynasty | Years |
|---------|-------|
| Ming    | 1368  |
";
