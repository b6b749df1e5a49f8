//! Regex tokenizer used by the lighter engines.
//!
//! A `Grammar` is an ordered list of rules. Tokenizing scans left to right
//! and at each position takes the earliest match; ties go to the rule
//! listed first. Text no rule matches is left untokenized.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Token classification, named after the usual highlighter classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    String,
    Number,
    Keyword,
    Boolean,
    Function,
    Operator,
    Punctuation,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Keyword => "keyword",
            TokenKind::Boolean => "boolean",
            TokenKind::Function => "function",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
        }
    }
}

/// A highlighted span, as a byte range into the tokenized text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

#[derive(Debug)]
struct Rule {
    kind: TokenKind,
    regex: Regex,
    /// Highlight only this capture group of a match.
    group: Option<usize>,
}

/// An ordered set of highlighting rules.
#[derive(Debug)]
pub struct Grammar {
    name: &'static str,
    rules: Vec<Rule>,
}

static JAVASCRIPT: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::build(
        "javascript",
        &[
            (TokenKind::Comment, r"//[^\n]*|/\*[\s\S]*?\*/", None),
            (
                TokenKind::String,
                r#""(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'|`(?:\\.|[^`\\])*`"#,
                None,
            ),
            (
                TokenKind::Keyword,
                r"\b(?:as|async|await|break|case|catch|class|const|continue|default|delete|do|else|export|extends|finally|for|from|function|if|import|in|instanceof|let|new|of|return|static|super|switch|this|throw|try|typeof|var|void|while|yield)\b",
                None,
            ),
            (TokenKind::Boolean, r"\b(?:true|false|null|undefined)\b", None),
            (
                TokenKind::Number,
                r"\b(?:0x[\da-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\b",
                None,
            ),
            (TokenKind::Function, r"\b([A-Za-z_$][\w$]*)\s*\(", Some(1)),
            (TokenKind::Operator, r"[-+*/%=!<>&|^~?]+", None),
            (TokenKind::Punctuation, r"[{}\[\];(),.:]", None),
        ],
    )
});

static JSON: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::build(
        "json",
        &[
            (TokenKind::Keyword, r#"("(?:\\.|[^"\\])*")\s*:"#, Some(1)),
            (TokenKind::String, r#""(?:\\.|[^"\\])*""#, None),
            (
                TokenKind::Number,
                r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?",
                None,
            ),
            (TokenKind::Boolean, r"\b(?:true|false|null)\b", None),
            (TokenKind::Punctuation, r"[{}\[\],:]", None),
        ],
    )
});

static PLAIN: LazyLock<Grammar> = LazyLock::new(|| Grammar::build("plain", &[]));

impl Grammar {
    fn build(name: &'static str, rules: &[(TokenKind, &str, Option<usize>)]) -> Self {
        let rules = rules
            .iter()
            .map(|(kind, pattern, group)| Rule {
                kind: *kind,
                regex: Regex::new(pattern).expect("built-in grammar pattern must compile"),
                group: *group,
            })
            .collect();
        Self { name, rules }
    }

    /// JavaScript-like grammar; also used for rule and OML sources.
    pub fn javascript() -> &'static Grammar {
        &JAVASCRIPT
    }

    pub fn json() -> &'static Grammar {
        &JSON
    }

    /// No rules; nothing is highlighted.
    pub fn plain() -> &'static Grammar {
        &PLAIN
    }

    /// Look up a built-in grammar by name.
    pub fn by_name(name: &str) -> Option<&'static Grammar> {
        match name.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Some(Self::javascript()),
            "json" => Some(Self::json()),
            "plain" | "text" | "plaintext" => Some(Self::plain()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            // Earliest match wins; on ties the earlier rule does.
            let mut best: Option<(Range<usize>, Range<usize>, TokenKind)> = None;
            for rule in &self.rules {
                let Some(caps) = rule.regex.captures_at(text, pos) else {
                    continue;
                };
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                if whole.start() == whole.end() {
                    continue;
                }
                let span = match rule.group {
                    Some(group) => match caps.get(group) {
                        Some(m) => m.range(),
                        None => continue,
                    },
                    None => whole.range(),
                };
                let better = match &best {
                    Some((best_whole, _, _)) => whole.start() < best_whole.start,
                    None => true,
                };
                if better {
                    best = Some((whole.range(), span, rule.kind));
                }
            }

            match best {
                Some((whole, span, kind)) => {
                    // Group rules resume after the group so trailing context
                    // (a `(` or `:`) still gets its own token.
                    pos = if span.end > pos { span.end } else { whole.end };
                    tokens.push(Token { kind, range: span });
                }
                None => break,
            }
        }

        tokens
    }
}

/// Render tokens as HTML spans with `token <kind>` classes.
pub fn render_html(text: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(text.len() + tokens.len() * 32);
    let mut pos = 0;
    for token in tokens {
        if token.range.start < pos || token.range.end > text.len() {
            continue;
        }
        escape_into(&mut out, &text[pos..token.range.start]);
        out.push_str("<span class=\"token ");
        out.push_str(token.kind.as_str());
        out.push_str("\">");
        escape_into(&mut out, &text[token.range.clone()]);
        out.push_str("</span>");
        pos = token.range.end;
    }
    escape_into(&mut out, &text[pos..]);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
