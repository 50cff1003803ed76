use pgmrun_utils::error::BifError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Word(String),
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

const PUNCTUATION: &[char] = &['{', '}', '[', ']', '(', ')', '|', ',', ';'];

/// Split BIF text into words and punctuation, dropping `//` and `/* */` comments.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, BifError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;
    let mut word = String::new();
    let mut word_line = line;

    let flush = |word: &mut String, word_line: usize, tokens: &mut Vec<Token>| {
        if !word.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Word(std::mem::take(word)),
                line: word_line,
            });
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                flush(&mut word, word_line, &mut tokens);
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                flush(&mut word, word_line, &mut tokens);
                let opened_at = line;
                chars.next();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\n' => line += 1,
                        '*' if chars.peek() == Some(&'/') => {
                            chars.next();
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(BifError::Syntax {
                        line: opened_at,
                        reason: "unterminated block comment".to_string(),
                    });
                }
            }
            c if c.is_whitespace() => {
                flush(&mut word, word_line, &mut tokens);
                if c == '\n' {
                    line += 1;
                }
            }
            c if PUNCTUATION.contains(&c) => {
                flush(&mut word, word_line, &mut tokens);
                tokens.push(Token {
                    kind: TokenKind::Punct(c),
                    line,
                });
            }
            c => {
                if word.is_empty() {
                    word_line = line;
                }
                word.push(c);
            }
        }
    }
    flush(&mut word, word_line, &mut tokens);

    Ok(tokens)
}
