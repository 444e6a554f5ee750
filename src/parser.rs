use crate::ast::*;
use crate::error::ParseError;

/// Drops blank and `#` comment lines and measures the indentation of the
/// rest. Line numbers are 1-based. Only a leading run of `indent_char` counts
/// toward the depth; mixed indentation is not reported.
pub fn normalize(input: &str, indent_char: char) -> Vec<SourceLine> {
    let mut lines = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let mut raw = line;
        if idx == 0 {
            raw = raw.trim_start_matches('\u{feff}');
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let depth = raw.chars().take_while(|&c| c == indent_char).count();
        lines.push(SourceLine::new(line_no, depth, trimmed));
    }

    lines
}

/// Groups lines into top-level blocks. A new block starts at every depth-0
/// line once the current block holds at least one line.
pub fn segment(lines: Vec<SourceLine>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<SourceLine> = Vec::new();

    for line in lines {
        if line.indent_depth == 0 && !current.is_empty() {
            blocks.push(Block {
                lines: std::mem::take(&mut current),
            });
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(Block { lines: current });
    }

    blocks
}

/// Builds the indentation tree of a block. Each line is attached to the most
/// recent line that is strictly shallower than it, so a line indented several
/// levels past its predecessor becomes that predecessor's child. After such a
/// jump, a partial dedent (`a`, `\t\t\tb`, `\t\tc`) puts `c` under `a` rather
/// than ascending level by level from `b`, which would leave `c` under the root.
pub fn build_tree(block: &Block) -> Result<Option<Tree>, ParseError> {
    let Some(header) = block.header() else {
        return Ok(None);
    };
    let mut tree = Tree::new(header.clone());
    let mut cursor = tree.root();

    for line in block.body() {
        let depth = line.indent_depth;
        while tree.node(cursor).depth >= depth {
            cursor = tree.parent(cursor).ok_or(ParseError::Structural {
                line_no: line.line_no,
                depth,
            })?;
        }
        cursor = tree.push_child(cursor, line.clone());
    }

    Ok(Some(tree))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "# this is a comment
mission \"Kestrel: More Weapons\"
\tlanding
\tinvisible
\tto offer
\t\thas \"kestrel: more weapons\"
\ton offer
\t\tevent \"kestrel available: more weapons\" 50
\t\tfail



mission \"Kestrel: More Engines\"
\tlanding
\tto offer
\t\thas \"kestrel: more engines\"
";

    fn texts(tree: &Tree, id: NodeId) -> Vec<&str> {
        tree.children(id)
            .map(|child| tree.node(child).line.text.as_str())
            .collect()
    }

    #[test]
    fn test_normalize() {
        let lines = normalize(EXAMPLE, '\t');
        assert_eq!(lines.len(), 12);
        assert_eq!(
            lines[0],
            SourceLine::new(2, 0, "mission \"Kestrel: More Weapons\"")
        );
        assert_eq!(lines[1], SourceLine::new(3, 1, "landing"));
        assert_eq!(
            lines[4],
            SourceLine::new(6, 2, "has \"kestrel: more weapons\"")
        );
        assert_eq!(lines[7], SourceLine::new(9, 2, "fail"));
        assert_eq!(
            lines[8],
            SourceLine::new(13, 0, "mission \"Kestrel: More Engines\"")
        );
    }

    #[test]
    fn test_normalize_strips_bom_and_indented_comments() {
        let lines = normalize("\u{feff}mission \"A\"\n\t# note\n\t\n\tlanding", '\t');
        assert_eq!(
            lines,
            vec![
                SourceLine::new(1, 0, "mission \"A\""),
                SourceLine::new(4, 1, "landing"),
            ]
        );
    }

    #[test]
    fn test_normalize_counts_only_leading_indent_char() {
        let lines = normalize("  \tspaces first\n\t  \ttab then spaces\n\t\ttwo", '\t');
        let depths: Vec<usize> = lines.iter().map(|l| l.indent_depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);

        let lines = normalize("a\n  b\n    c", ' ');
        let depths: Vec<usize> = lines.iter().map(|l| l.indent_depth).collect();
        assert_eq!(depths, vec![0, 2, 4]);
    }

    #[test]
    fn test_segment_keeps_every_line_in_order() {
        let lines = normalize(EXAMPLE, '\t');
        let blocks = segment(lines.clone());
        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            assert_eq!(block.lines[0].indent_depth, 0);
        }
        assert_eq!(blocks[0].lines.len(), 8);
        assert_eq!(blocks[1].header().unwrap().line_no, 13);

        let rejoined: Vec<SourceLine> = blocks.into_iter().flat_map(|b| b.lines).collect();
        assert_eq!(rejoined, lines);
    }

    #[test]
    fn test_segment_body_before_first_header() {
        let blocks = segment(normalize("\tstray\nmission \"A\"", '\t'));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines[0].text, "stray");
        assert_eq!(blocks[1].lines[0].text, "mission \"A\"");
    }

    #[test]
    fn test_segment_empty() {
        assert!(segment(Vec::new()).is_empty());
    }

    #[test]
    fn test_build_tree_nesting() {
        let blocks = segment(normalize(EXAMPLE, '\t'));
        let tree = build_tree(&blocks[0]).unwrap().unwrap();
        let root = tree.root();
        assert_eq!(tree.len(), 8);
        assert_eq!(
            texts(&tree, root),
            vec!["landing", "invisible", "to offer", "on offer"]
        );

        let to_offer = tree.children(root).nth(2).unwrap();
        assert_eq!(texts(&tree, to_offer), vec!["has \"kestrel: more weapons\""]);
        let on_offer = tree.children(root).nth(3).unwrap();
        assert_eq!(
            texts(&tree, on_offer),
            vec!["event \"kestrel available: more weapons\" 50", "fail"]
        );

        let has = tree.children(to_offer).next().unwrap();
        assert_eq!(tree.parent(has), Some(to_offer));
        assert_eq!(tree.parent(to_offer), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.node(has).depth, 2);
    }

    #[test]
    fn test_build_tree_dedent_several_levels() {
        let src = "mission \"A\"\n\ton complete\n\t\tconversation\n\t\t\t`Hi.`\n\tto offer";
        let blocks = segment(normalize(src, '\t'));
        let tree = build_tree(&blocks[0]).unwrap().unwrap();
        assert_eq!(texts(&tree, tree.root()), vec!["on complete", "to offer"]);
    }

    #[test]
    fn test_build_tree_absorbs_depth_jump_after_header() {
        let src = "mission \"A\"\n\t\t\tdeep\n\tto offer\n\t\thas \"x\"";
        let blocks = segment(normalize(src, '\t'));
        let tree = build_tree(&blocks[0]).unwrap().unwrap();
        let root = tree.root();
        assert_eq!(texts(&tree, root), vec!["deep", "to offer"]);

        let deep = tree.children(root).next().unwrap();
        assert_eq!(tree.node(deep).depth, 3);
        assert_eq!(tree.parent(deep), Some(root));
    }

    #[test]
    fn test_build_tree_absorbs_depth_jump_mid_block() {
        let src = "mission \"A\"\n\ta\n\t\t\tb\n\t\tc\n\td";
        let blocks = segment(normalize(src, '\t'));
        let tree = build_tree(&blocks[0]).unwrap().unwrap();
        let root = tree.root();
        assert_eq!(texts(&tree, root), vec!["a", "d"]);

        let a = tree.children(root).next().unwrap();
        assert_eq!(texts(&tree, a), vec!["b", "c"]);
    }

    #[test]
    fn test_build_tree_rejects_body_at_root_depth() {
        let block = Block {
            lines: vec![
                SourceLine::new(1, 1, "mission \"A\""),
                SourceLine::new(2, 1, "landing"),
            ],
        };
        assert_eq!(
            build_tree(&block),
            Err(ParseError::Structural { line_no: 2, depth: 1 })
        );
    }

    #[test]
    fn test_build_tree_empty_block() {
        assert_eq!(build_tree(&Block { lines: Vec::new() }), Ok(None));
    }
}
