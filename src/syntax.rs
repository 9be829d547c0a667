use crossterm::style::Color;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    // Reserved for string literals; the tokenizer never produces it yet.
    #[allow(dead_code)]
    String,
    Keyword,
    Number,
}

impl Highlight {
    pub fn color(self) -> Option<Color> {
        match self {
            Highlight::Normal => None,
            Highlight::Comment => Some(Color::DarkRed),
            Highlight::String => Some(Color::DarkGreen),
            Highlight::Keyword => Some(Color::DarkYellow),
            Highlight::Number => Some(Color::DarkBlue),
        }
    }
}

#[derive(Debug)]
pub struct LanguageProfile {
    pub name: &'static str,
    pub file_types: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub comment: &'static str,
}

impl LanguageProfile {
    fn is_keyword(&self, token: &str) -> bool {
        self.keywords.contains(&token)
    }
}

pub static LANGUAGES: &[LanguageProfile] = &[
    LanguageProfile {
        name: "python",
        file_types: &["py"],
        keywords: &[
            "False", "await", "else", "import", "pass", "None", "break", "except", "in", "raise",
            "True", "class", "finally", "is", "return", "and", "continue", "for", "lambda", "try",
            "as", "def", "from", "nonlocal", "while", "assert", "del", "global", "not", "with",
            "async", "elif", "if", "or", "yield",
        ],
        comment: "#",
    },
    LanguageProfile {
        name: "java",
        file_types: &["java"],
        keywords: &[
            "if", "else", "break", "continue", "while", "do", "for", "double", "long", "int",
            "float", "String", "System", "print", "println", "boolean", "byte", "switch", "case",
            "catch", "throw", "throws", "import", "extends", "class", "public", "return", "try",
            "short", "super", "this", "char",
        ],
        comment: "/",
    },
    LanguageProfile {
        name: "c",
        file_types: &["c", "h"],
        keywords: &[
            "auto", "break", "case", "char", "const", "continue", "default", "do", "double",
            "else", "enum", "extern", "float", "for", "goto", "if", "int", "long", "register",
            "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
            "union", "unsigned", "void", "volatile", "while",
        ],
        comment: "//",
    },
    LanguageProfile {
        name: "rust",
        file_types: &["rs"],
        keywords: &[
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
            "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
            "unsafe", "use", "where", "while",
        ],
        comment: "//",
    },
];

pub fn profile_for(file_type: &str) -> Option<&'static LanguageProfile> {
    LANGUAGES
        .iter()
        .find(|profile| profile.file_types.contains(&file_type))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub highlight: Highlight,
}

/// Byte ranges of the alternating whitespace and non-whitespace runs of `text`.
pub fn tokenize(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            ranges.push(start..idx);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        ranges.push(start..text.len());
    }
    ranges
}

pub fn highlight<'a>(text: &'a str, profile: Option<&LanguageProfile>) -> Vec<Span<'a>> {
    let mut classified = Vec::new();
    match profile {
        None => push_class(&mut classified, 0..text.len(), Highlight::Normal),
        Some(profile) => {
            let mut in_comment = false;
            for range in tokenize(text) {
                let token = &text[range.clone()];
                if in_comment {
                    push_class(&mut classified, range, Highlight::Comment);
                } else if token == profile.comment {
                    in_comment = true;
                    push_class(&mut classified, range, Highlight::Comment);
                } else if profile.is_keyword(token) {
                    push_class(&mut classified, range, Highlight::Keyword);
                } else {
                    for (idx, ch) in token.char_indices() {
                        let at = range.start + idx;
                        let class = if ch.is_ascii_digit() {
                            Highlight::Number
                        } else {
                            Highlight::Normal
                        };
                        push_class(&mut classified, at..at + ch.len_utf8(), class);
                    }
                }
            }
        }
    }

    classified
        .into_iter()
        .map(|(range, highlight)| Span {
            text: &text[range],
            highlight,
        })
        .collect()
}

// Adjacent pieces of the same class merge into one span.
fn push_class(classified: &mut Vec<(Range<usize>, Highlight)>, range: Range<usize>, class: Highlight) {
    if range.is_empty() {
        return;
    }
    if let Some((last, last_class)) = classified.last_mut() {
        if *last_class == class && last.end == range.start {
            last.end = range.end;
            return;
        }
    }
    classified.push((range, class));
}
