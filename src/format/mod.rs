//! Human-readable rendering of import chains.
//!
//! Paths are shortened against the deepest directory shared by every
//! path in the report, so `/home/me/proj/src/a.ts` prints as `./src/a.ts`
//! when every chain lives under `/home/me/proj`.

use std::path::{Component, Path, PathBuf};

use crate::graph::ImportChain;

/// Separator placed between the paths of a rendered chain.
pub const CHAIN_SEPARATOR: &str = " => \n";

/// Formats chain query results as diagnostic note lines.
///
/// # Arguments
///
/// * `chains` - Query results, one per target
/// * `indent` - Prefix for every line of every rendering
/// * `limit` - Maximum number of chain renderings to emit
///
/// # Returns
///
/// One string per emitted note. A chain rendering spans several lines
/// joined with `\n`. A rendering identical to the previously emitted
/// note is skipped. Once `limit` chain renderings have been emitted,
/// nothing more is produced.
///
/// # Example
///
/// ```rust
/// use chainscope::format::format_import_chains;
/// use chainscope::graph::ImportChain;
///
/// let result = ImportChain {
///     target: "/proj/b.js".to_string(),
///     chains: vec![vec![
///         "/proj/entry.js".to_string(),
///         "/proj/a.js".to_string(),
///         "/proj/b.js".to_string(),
///     ]],
///     found: true,
/// };
///
/// let lines = format_import_chains(&[result], "", None);
/// assert_eq!(
///     lines,
///     vec!["note: Import chain:\n    ./entry.js => \n    ./a.js => \n    ./b.js"]
/// );
/// ```
pub fn format_import_chains(
    chains: &[ImportChain],
    indent: &str,
    limit: Option<usize>,
) -> Vec<String> {
    let base = common_base(report_paths(chains));
    let mut lines: Vec<String> = Vec::new();
    let mut rendered = 0usize;

    let limit_reached = |rendered: usize| limit.is_some_and(|max| rendered >= max);

    for result in chains {
        if limit_reached(rendered) {
            break;
        }

        if !result.found || result.chains.is_empty() {
            let line = format!(
                "{indent}note: No import chain found for {}",
                shorten(&result.target, base.as_deref())
            );
            push_unless_repeated(&mut lines, line);
            continue;
        }

        for chain in &result.chains {
            if limit_reached(rendered) {
                break;
            }
            let rendering = render_chain(chain, indent, base.as_deref());
            if push_unless_repeated(&mut lines, rendering) {
                rendered += 1;
            }
        }
    }

    lines
}

/// Renders one chain as a multi-line note.
pub fn render_chain(chain: &[String], indent: &str, base: Option<&Path>) -> String {
    let body = chain
        .iter()
        .map(|path| format!("{indent}    {}", shorten(path, base)))
        .collect::<Vec<_>>()
        .join(CHAIN_SEPARATOR);
    format!("{indent}note: Import chain:\n{body}")
}

fn push_unless_repeated(lines: &mut Vec<String>, line: String) -> bool {
    if lines.last() == Some(&line) {
        return false;
    }
    lines.push(line);
    true
}

/// Every absolute path mentioned by a report: chain members and targets.
pub(crate) fn report_paths(chains: &[ImportChain]) -> Vec<&Path> {
    chains
        .iter()
        .flat_map(|result| {
            result
                .chains
                .iter()
                .flatten()
                .chain(std::iter::once(&result.target))
        })
        .map(Path::new)
        .filter(|path| path.is_absolute())
        .collect()
}

/// Deepest directory containing every path, compared component-wise.
///
/// Returns `None` when the paths share nothing beyond the filesystem
/// root, or when there are no paths.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use chainscope::format::common_base;
///
/// let paths = [Path::new("/proj/src/a.ts"), Path::new("/proj/lib/b.ts")];
/// assert_eq!(common_base(paths), Some(PathBuf::from("/proj")));
///
/// let unrelated = [Path::new("/a/x.js"), Path::new("/b/y.js")];
/// assert_eq!(common_base(unrelated), None);
/// ```
pub fn common_base<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    let mut shared: Option<Vec<Component<'a>>> = None;

    for path in paths {
        let dir: Vec<Component<'a>> = match path.parent() {
            Some(parent) => parent.components().collect(),
            None => Vec::new(),
        };
        shared = Some(match shared {
            None => dir,
            Some(prev) => prev
                .into_iter()
                .zip(dir)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }

    let shared = shared?;
    let has_named = shared.iter().any(|c| matches!(c, Component::Normal(_)));
    if !has_named {
        return None;
    }
    Some(shared.iter().collect())
}

/// Replaces `base` at the start of `path` with `.`.
///
/// Paths outside `base`, or any path when `base` is `None`, are returned
/// unchanged.
pub fn shorten(path: &str, base: Option<&Path>) -> String {
    let Some(base) = base else {
        return path.to_string();
    };
    match Path::new(path).strip_prefix(base) {
        Ok(rest) if !rest.as_os_str().is_empty() => {
            let rest: Vec<_> = rest
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            format!("./{}", rest.join("/"))
        }
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(target: &str, chains: &[&[&str]]) -> ImportChain {
        ImportChain {
            target: target.to_string(),
            chains: chains
                .iter()
                .map(|c| c.iter().map(|p| p.to_string()).collect())
                .collect(),
            found: true,
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let result = found("/proj/b.js", &[&["/proj/entry.js", "/proj/a.js", "/proj/b.js"]]);
        let lines = format_import_chains(&[result], "", None);
        assert_eq!(
            lines,
            vec!["note: Import chain:\n    ./entry.js => \n    ./a.js => \n    ./b.js"]
        );
    }

    #[test]
    fn test_indent_applies_to_every_line() {
        let result = found("/proj/a.js", &[&["/proj/entry.js", "/proj/a.js"]]);
        let lines = format_import_chains(&[result], "  ", None);
        assert_eq!(
            lines,
            vec!["  note: Import chain:\n      ./entry.js => \n      ./a.js"]
        );
    }

    #[test]
    fn test_not_found_line() {
        let missing = ImportChain::not_found("/proj/src/gone.ts");
        let other = found("/proj/src/a.ts", &[&["/proj/src/main.ts", "/proj/src/a.ts"]]);
        let lines = format_import_chains(&[missing, other], "", None);
        assert_eq!(lines[0], "note: No import chain found for ./gone.ts");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_found_without_chains_reports_not_found() {
        let result = found("/proj/x.js", &[]);
        let lines = format_import_chains(&[result], "", None);
        assert_eq!(lines, vec!["note: No import chain found for ./x.js"]);
    }

    #[test]
    fn test_consecutive_duplicates_suppressed() {
        let a = found("/proj/b.js", &[&["/proj/entry.js", "/proj/b.js"]]);
        let b = found("/proj/b.js", &[&["/proj/entry.js", "/proj/b.js"]]);
        let lines = format_import_chains(&[a, b], "", None);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_non_consecutive_duplicates_kept() {
        let a = found("/proj/b.js", &[&["/proj/entry.js", "/proj/b.js"]]);
        let c = found("/proj/c.js", &[&["/proj/entry.js", "/proj/c.js"]]);
        let lines = format_import_chains(&[a.clone(), c, a], "", None);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], lines[2]);
    }

    #[test]
    fn test_limit_counts_chain_renderings() {
        let result = found(
            "/proj/t.js",
            &[
                &["/proj/e1.js", "/proj/t.js"],
                &["/proj/e2.js", "/proj/t.js"],
                &["/proj/e3.js", "/proj/t.js"],
            ],
        );
        let missing = ImportChain::not_found("/proj/nope.js");

        let lines = format_import_chains(&[result.clone(), missing.clone()], "", Some(2));
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.starts_with("note: Import chain:")));

        assert!(format_import_chains(&[result.clone()], "", Some(0)).is_empty());

        let unlimited = format_import_chains(&[result, missing], "", None);
        assert_eq!(unlimited.len(), 4);
    }

    #[test]
    fn test_no_shared_base_keeps_paths() {
        let result = found("/b/y.js", &[&["/a/x.js", "/b/y.js"]]);
        let lines = format_import_chains(&[result], "", None);
        assert_eq!(lines, vec!["note: Import chain:\n    /a/x.js => \n    /b/y.js"]);
    }

    #[test]
    fn test_common_base_nested() {
        let paths = [
            Path::new("/home/me/proj/src/a.ts"),
            Path::new("/home/me/proj/src/ui/b.tsx"),
        ];
        assert_eq!(common_base(paths), Some(PathBuf::from("/home/me/proj/src")));
    }

    #[test]
    fn test_common_base_empty() {
        assert_eq!(common_base(Vec::<&Path>::new()), None);
    }

    #[test]
    fn test_shorten() {
        let base = Path::new("/proj");
        assert_eq!(shorten("/proj/src/a.ts", Some(base)), "./src/a.ts");
        assert_eq!(shorten("/other/a.ts", Some(base)), "/other/a.ts");
        assert_eq!(shorten("react", Some(base)), "react");
        assert_eq!(shorten("/proj/a.ts", None), "/proj/a.ts");
    }
}
