//! Filename → syntax-name resolution.
//!
//! The table below is the only place extension-to-language knowledge lives.
//! Names refer to grammars in the bundled sublime-syntax set; a name that
//! fails to resolve degrades to plain text inside the highlighter.

/// Lowercase extension → bundled syntax name.
///
/// The bundled set carries no TypeScript grammar, so `ts`/`tsx`/`jsx` ride
/// on the JavaScript one.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("bash", "Bourne Again Shell (bash)"),
    ("bat", "Batch File"),
    ("c", "C"),
    ("cc", "C++"),
    ("cjs", "JavaScript"),
    ("clj", "Clojure"),
    ("cpp", "C++"),
    ("cs", "C#"),
    ("css", "CSS"),
    ("cxx", "C++"),
    ("d", "D"),
    ("diff", "Diff"),
    ("erl", "Erlang"),
    ("go", "Go"),
    ("h", "C"),
    ("hpp", "C++"),
    ("hs", "Haskell"),
    ("htm", "HTML"),
    ("html", "HTML"),
    ("java", "Java"),
    ("js", "JavaScript"),
    ("json", "JSON"),
    ("jsx", "JavaScript"),
    ("lisp", "Lisp"),
    ("lua", "Lua"),
    ("m", "Objective-C"),
    ("markdown", "Markdown"),
    ("md", "Markdown"),
    ("mjs", "JavaScript"),
    ("ml", "OCaml"),
    ("patch", "Diff"),
    ("php", "PHP"),
    ("pl", "Perl"),
    ("py", "Python"),
    ("r", "R"),
    ("rb", "Ruby"),
    ("rs", "Rust"),
    ("scala", "Scala"),
    ("sh", "Bourne Again Shell (bash)"),
    ("sql", "SQL"),
    ("tex", "LaTeX"),
    ("ts", "JavaScript"),
    ("tsx", "JavaScript"),
    ("xml", "XML"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
];

/// Fallback for extensions not in the table, matching the permissive
/// default review UIs expect for unrecognized source files.
const FALLBACK_LANGUAGE: &str = "JavaScript";

/// Resolve a filename to a syntax name via its lowercase extension.
pub fn language_for(filename: &str) -> &'static str {
    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return FALLBACK_LANGUAGE,
    };
    EXTENSION_LANGUAGES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, language)| *language)
        .unwrap_or(FALLBACK_LANGUAGE)
}
