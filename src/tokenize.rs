//! Treebank-style English word tokenizer.
//!
//! Splits text into word and punctuation tokens the way Penn Treebank
//! tokenizers do: punctuation becomes its own token, clitics are split
//! (`don't` → `do` `n't`, `she's` → `she` `'s`), double quotes become
//! `` `` `` / `''`, and a handful of fused forms are separated
//! (`cannot` → `can` `not`). Sentence-final periods are split from the
//! preceding word; abbreviation-like tokens (`e.g.`, `u.s.`, initials)
//! keep theirs.
//!
//! Both the normalizer and the shingler tokenize with this function, each
//! over its own representation of the text.

/// Characters that always form a token of their own.
const ALWAYS_SPLIT: &[char] = &[
    ';', '@', '#', '$', '%', '&', '?', '!', '(', ')', '[', ']', '{', '}', '<', '>',
];

/// Tokens that may follow a sentence-final period inside one chunk.
const CLOSING: &[&str] = &[")", "]", "}", ">", "''"];

/// Fused forms split at a fixed offset, matched case-insensitively.
const FUSED: &[(&str, usize)] = &[
    ("cannot", 3),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("wanna", 3),
    ("d'ye", 2),
    ("more'n", 4),
    ("'tis", 2),
    ("'twas", 2),
];

/// Clitic suffixes split from the end of a word.
const CLITICS: &[&str] = &["n't", "'ll", "'re", "'ve", "'s", "'m", "'d"];

/// Tokenize `text` into words and punctuation.
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        tokenize_chunk(chunk, &mut tokens);
    }
    tokens
}

fn tokenize_chunk(chunk: &str, out: &mut Vec<String>) {
    let chars: Vec<char> = chunk.chars().collect();
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '.' && chars[i..].starts_with(&['.', '.', '.']) {
            flush(&mut current, &mut pieces);
            pieces.push("...".to_string());
            i += 3;
            continue;
        }
        match c {
            '"' => {
                let opening = i == 0 || matches!(chars[i - 1], '(' | '[' | '{' | '<');
                flush(&mut current, &mut pieces);
                pieces.push(if opening { "``" } else { "''" }.to_string());
            }
            ',' | ':' => {
                let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if next_is_digit && !current.is_empty() {
                    current.push(c);
                } else {
                    flush(&mut current, &mut pieces);
                    pieces.push(c.to_string());
                }
            }
            c if ALWAYS_SPLIT.contains(&c) => {
                flush(&mut current, &mut pieces);
                pieces.push(c.to_string());
            }
            c => current.push(c),
        }
        i += 1;
    }
    flush(&mut current, &mut pieces);

    split_final_period(&mut pieces);

    for piece in pieces {
        split_clitics(&piece, out);
    }
}

fn flush(current: &mut String, pieces: &mut Vec<String>) {
    if !current.is_empty() {
        pieces.push(std::mem::take(current));
    }
}

/// Split the period off the last word of the chunk unless it looks like
/// an abbreviation.
fn split_final_period(pieces: &mut Vec<String>) {
    let Some(idx) = pieces
        .iter()
        .rposition(|p| !CLOSING.contains(&p.as_str()))
    else {
        return;
    };
    let word = &pieces[idx];
    if word.len() < 2 || !word.ends_with('.') {
        return;
    }
    let stem = &word[..word.len() - 1];
    if stem.contains('.') || is_initial(stem) {
        return;
    }
    let stem = stem.to_string();
    pieces[idx] = stem;
    pieces.insert(idx + 1, ".".to_string());
}

fn is_initial(stem: &str) -> bool {
    let mut chars = stem.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

fn split_clitics(word: &str, out: &mut Vec<String>) {
    let lower = word.to_ascii_lowercase();

    for (form, at) in FUSED {
        if lower == *form {
            out.push(word[..*at].to_string());
            out.push(word[*at..].to_string());
            return;
        }
    }

    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let at = word.len() - clitic.len();
            out.push(word[..at].to_string());
            out.push(word[at..].to_string());
            return;
        }
    }

    // Possessive plural: "students'" → "students" "'"
    if word.len() > 1 && word.ends_with('\'') && !word.ends_with("''") {
        out.push(word[..word.len() - 1].to_string());
        out.push("'".to_string());
        return;
    }

    out.push(word.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        word_tokenize(s)
    }

    #[test]
    fn plain_words() {
        assert_eq!(
            toks("the cat sat on the mat"),
            vec!["the", "cat", "sat", "on", "the", "mat"]
        );
    }

    #[test]
    fn punctuation_is_split() {
        assert_eq!(
            toks("Hello, world! How are you?"),
            vec!["Hello", ",", "world", "!", "How", "are", "you", "?"]
        );
    }

    #[test]
    fn sentence_final_period() {
        assert_eq!(toks("It ended. Then"), vec!["It", "ended", ".", "Then"]);
        assert_eq!(toks("(see above.)"), vec!["(", "see", "above", ".", ")"]);
    }

    #[test]
    fn abbreviations_keep_period() {
        assert_eq!(toks("e.g. the u.s."), vec!["e.g.", "the", "u.s."]);
        assert_eq!(toks("J. Smith"), vec!["J.", "Smith"]);
    }

    #[test]
    fn clitics() {
        assert_eq!(toks("don't"), vec!["do", "n't"]);
        assert_eq!(toks("She's here"), vec!["She", "'s", "here"]);
        assert_eq!(toks("we'll"), vec!["we", "'ll"]);
        assert_eq!(toks("the students'"), vec!["the", "students", "'"]);
    }

    #[test]
    fn fused_forms() {
        assert_eq!(toks("I cannot"), vec!["I", "can", "not"]);
        assert_eq!(toks("gonna wanna"), vec!["gon", "na", "wan", "na"]);
    }

    #[test]
    fn numbers_keep_separators() {
        assert_eq!(toks("1,000 at 10:30"), vec!["1,000", "at", "10:30"]);
        assert_eq!(toks("costs $5"), vec!["costs", "$", "5"]);
    }

    #[test]
    fn quotes_and_ellipsis() {
        assert_eq!(
            toks("\"quoted\" wait..."),
            vec!["``", "quoted", "''", "wait", "..."]
        );
    }

    #[test]
    fn empty_input() {
        assert!(toks("").is_empty());
        assert!(toks("   \n\t ").is_empty());
    }
}
