use crate::aggregate::AggregateResult;
use crate::trie::{Trie, TrieNode};
use std::path::Path;
use tracing::{debug, info};

/// Renders per-file token counts as a tree with directory subtotals, one
/// line per entry, headed by the overall count of the bundle.
pub fn render_stats(result: &AggregateResult) -> Vec<String> {
    let mut trie = Trie::new();
    for file in &result.files {
        trie.insert(&file.path, file.token_count);
    }

    let mut lines = vec![format!("Overall ({} tokens)", result.token_count)];
    render_tree(trie.get_root(), "", &mut lines);
    lines
}

/// Logs the statistics tree.
pub fn print_stats(result: &AggregateResult) {
    debug!("Printing statistics for token counts");
    for line in render_stats(result) {
        info!("{}", line);
    }
}

fn render_tree(node: &TrieNode, prefix: &str, lines: &mut Vec<String>) {
    let mut children: Vec<_> = node.children.iter().collect();
    children.sort_by(|a, b| a.0.cmp(b.0));

    for (i, (name, child)) in children.iter().enumerate() {
        let is_last_child = i == children.len() - 1;
        let connector = if is_last_child { "┗━━" } else { "┣━━" };

        match child.token_count {
            Some(tokens) if child.children.is_empty() => {
                lines.push(format!(
                    "{}{} {} {} ({} tokens)",
                    prefix,
                    connector,
                    get_file_icon(Path::new(name.as_str())),
                    name,
                    tokens
                ));
            }
            _ => {
                lines.push(format!(
                    "{}{}📂 {} ({} tokens)",
                    prefix,
                    connector,
                    name,
                    child.calculate_total_tokens()
                ));
                let new_prefix = format!("{}{}    ", prefix, if is_last_child { " " } else { "┃" });
                render_tree(child, &new_prefix, lines);
            }
        }
    }
}

pub fn get_file_icon(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("py") | Some("pyi") => "🐍",
        Some("js") | Some("mjs") | Some("cjs") => "🟨",
        Some("ts") | Some("tsx") => "🔷",
        Some("jsx") => "⚛️",
        Some("html") | Some("htm") => "🌐",
        Some("css") | Some("scss") | Some("sass") => "🎨",
        Some("java") => "☕",
        Some("c") | Some("h") => "🇨",
        Some("cpp") | Some("hpp") | Some("cc") | Some("cxx") => "🇨➕",
        Some("go") => "🐹",
        Some("rb") => "💎",
        Some("php") => "🐘",
        Some("swift") => "🕊️",
        Some("kt") | Some("kts") => "🇰",
        Some("rs") => "🦀",
        Some("json") => "🔖",
        Some("yaml") | Some("yml") => "🗂️",
        Some("xml") => "📰",
        Some("csv") => "📊",
        Some("ini") | Some("conf") | Some("toml") => "⚙️",
        Some("md") | Some("markdown") => "📝",
        Some("sql") => "🗄️",
        _ => "📄",
    }
}
