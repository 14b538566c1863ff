//! Content type guessing for stored file bodies.

/// Guess the content type of a file body from its name.
///
/// Bodies are source text, so anything unrecognized is `text/plain`.
pub fn content_type_for(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return "text/plain";
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "scss" | "sass" => "text/x-scss",
        "js" | "mjs" | "cjs" | "jsx" => "application/javascript",
        "ts" | "tsx" => "text/typescript",
        "json" => "application/json",
        "md" | "markdown" => "text/markdown",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "csv" => "text/csv",
        "yaml" | "yml" => "application/yaml",
        "vue" => "text/x-vue",
        "svelte" => "text/x-svelte",
        _ => "text/plain",
    }
}
