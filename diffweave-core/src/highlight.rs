//! Context-aware syntax highlighting to per-line HTML.
//!
//! Highlighting each diff line independently gives wrong results for
//! multi-line constructs (string literals, block comments), so the whole
//! file version is tokenized once and the scope stream is split at line
//! boundaries: every scope still open when a line ends is closed to keep
//! the line's markup self-contained, and re-opened at the start of the
//! next line so the construct visually persists.
//!
//! Highlighting is a best-effort enrichment. Any tokenizer failure drops
//! the whole file to escaped plain text and is reported via
//! `tracing::warn!`, never as an error to the caller.

use std::sync::LazyLock;

use syntect::parsing::{
    BasicScopeStackOp, ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet,
};
use tracing::warn;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Eagerly initializes the shared syntax set.
///
/// Compute workers call this once at startup so the first request does not
/// pay the load cost.
pub fn warm() {
    let _ = &*SYNTAXES;
}

fn syntax_for(language: &str) -> &'static SyntaxReference {
    SYNTAXES
        .find_syntax_by_name(language)
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text())
}

/// Escape `& < > " '` for safe embedding in span markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a full file version to one self-contained HTML string per
/// physical line.
///
/// `split('\n')` semantics: a trailing newline yields a preserved empty
/// final line; empty input yields an empty vec.
pub fn render_file(source: &str, language: &str) -> Vec<String> {
    if source.is_empty() {
        return Vec::new();
    }
    let syntax = syntax_for(language);
    match render_lines(source, syntax) {
        Ok(lines) => lines,
        Err(error) => {
            warn!(language, error = %error, "tokenizer failed, falling back to plain text");
            source.split('\n').map(escape_html).collect()
        }
    }
}

/// Highlight a single intra-line segment value in isolation.
///
/// Used for the short mixed-kind segments of modified rows, where
/// cross-line context is unavailable by construction.
pub fn render_snippet(value: &str, language: &str) -> String {
    render_file(value, language).into_iter().next().unwrap_or_default()
}

/// Tokenize `source` and split the scope stream at line boundaries.
///
/// The `open` vec mirrors the scope stack across lines: its contents are
/// re-opened at every line start and closed at every line end, while pushes
/// and pops inside a line are emitted at their exact offsets.
fn render_lines(source: &str, syntax: &SyntaxReference) -> Result<Vec<String>, String> {
    let mut parse_state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut open: Vec<Scope> = Vec::new();
    let mut rendered = Vec::new();

    for line in source.split('\n') {
        let mut html = String::with_capacity(line.len() + 32);
        for scope in &open {
            open_span(*scope, &mut html);
        }

        // The newline-aware grammars require the terminator to be present.
        let with_newline = format!("{line}\n");
        let ops = parse_state
            .parse_line(&with_newline, &SYNTAXES)
            .map_err(|e| e.to_string())?;

        let mut cursor = 0;
        for (offset, op) in &ops {
            let visible = (*offset).min(line.len());
            if visible > cursor {
                html.push_str(&escape_html(&line[cursor..visible]));
                cursor = visible;
            }
            stack
                .apply_with_hook(op, |basic, _| match basic {
                    BasicScopeStackOp::Push(scope) => {
                        open.push(scope);
                        open_span(scope, &mut html);
                    }
                    BasicScopeStackOp::Pop => {
                        open.pop();
                        html.push_str("</span>");
                    }
                })
                .map_err(|e| e.to_string())?;
        }
        if line.len() > cursor {
            html.push_str(&escape_html(&line[cursor..]));
        }

        for _ in &open {
            html.push_str("</span>");
        }
        rendered.push(html);
    }

    Ok(rendered)
}

/// Emit `<span class="…">` with the scope's atoms as space-separated
/// classes (`string.quoted.rust` → `string quoted rust`).
fn open_span(scope: Scope, out: &mut String) {
    out.push_str("<span class=\"");
    let atoms = scope.build_string();
    for (i, atom) in atoms.split('.').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(atom);
    }
    out.push_str("\">");
}
