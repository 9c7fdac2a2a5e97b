//! Resolved letter text to Typst markup.
//!
//! Every letter shares a fixed visual skeleton: a title block, the body
//! text verbatim, and a footer carrying the generation date stamp and the
//! page number. Body text is escaped character by character so substituted
//! spreadsheet values can never be interpreted as Typst markup.

/// Fixed visual skeleton parameters shared by every letter in a run
#[derive(Debug, Clone)]
pub struct LetterLayout {
    /// Title rendered at the top of each letter
    pub title: String,
    /// Date stamp shown in the footer (computed once per run)
    pub generated_on: String,
}

impl LetterLayout {
    /// Create a layout with the given title and footer date stamp
    pub fn new(title: impl Into<String>, generated_on: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated_on: generated_on.into(),
        }
    }
}

/// One resolved letter body, tagged with its source row
#[derive(Debug, Clone)]
pub struct LetterBody {
    /// Index of the spreadsheet row this letter was generated from
    pub row_index: usize,
    /// Fully resolved body text (post-substitution)
    pub text: String,
}

impl LetterBody {
    /// Create a body for one source row
    pub fn new(row_index: usize, text: impl Into<String>) -> Self {
        Self {
            row_index,
            text: text.into(),
        }
    }
}

/// Build markup for a single letter document
pub fn letter_markup(layout: &LetterLayout, body: &LetterBody) -> String {
    let mut out = preamble(layout);
    out.push_str(&letter_section(layout, body));
    out
}

/// Build markup for one combined multi-page document, with an explicit page
/// break between consecutive letters.
pub fn combined_markup(layout: &LetterLayout, bodies: &[LetterBody]) -> String {
    let mut out = preamble(layout);
    for (idx, body) in bodies.iter().enumerate() {
        if idx > 0 {
            out.push_str("#pagebreak()\n");
        }
        out.push_str(&letter_section(layout, body));
    }
    out
}

/// Escape every Typst-significant character so the text renders literally
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '#' | '$' | '*' | '_' | '`' | '@' | '<' | '>' | '[' | ']' | '=' | '-'
            | '+' | '/' | '~' | '\'' | '"' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Document-wide set rules: page geometry and the footer skeleton
fn preamble(layout: &LetterLayout) -> String {
    format!(
        "#set document(title: \"{title}\")\n\
         #set text(size: 11pt)\n\
         #set page(paper: \"a4\", margin: 2.5cm, footer: context [\n\
         \x20 #set text(size: 9pt, fill: luma(100))\n\
         \x20 Generated on {generated_on}\n\
         \x20 #h(1fr)\n\
         \x20 #counter(page).display(\"1 / 1\", both: true)\n\
         ])\n\n",
        title = escape_string(&layout.title),
        generated_on = escape_text(&layout.generated_on),
    )
}

/// Title block plus escaped body for one letter
fn letter_section(layout: &LetterLayout, body: &LetterBody) -> String {
    let mut out = format!("= {}\n\n", escape_text(&layout.title));
    for line in body.text.lines() {
        if line.trim().is_empty() {
            out.push_str("#parbreak()\n");
        } else {
            out.push_str(&escape_text(line));
            out.push_str(" \\\n");
        }
    }
    out
}

/// Escape a value placed inside a Typst string literal
fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
