use std::collections::HashMap;
use std::path::Path;

use pgmrun_utils::error::BifError;
use tracing::debug;

use crate::lexer::{Token, TokenKind, tokenize};

/// A discrete variable of the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Position in file order; also the column index in data files
    pub id: usize,
    pub name: String,
    pub states: Vec<String>,
    /// Parent ids, in the order the probability block lists them
    pub parents: Vec<usize>,
    /// Child ids, ascending
    pub children: Vec<usize>,
}

impl Variable {
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.states.len()
    }

    /// A variable with at least one child.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Structure of a Bayesian network read from a BIF file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BifNetwork {
    name: Option<String>,
    variables: Vec<Variable>,
}

impl BifNetwork {
    /// Read and parse a BIF file.
    ///
    /// # Errors
    ///
    /// Returns [`BifError::Io`] if the file cannot be read, or any parse error
    /// from [`BifNetwork::parse`].
    pub fn from_path(path: &Path) -> Result<Self, BifError> {
        let content = std::fs::read_to_string(path).map_err(|source| BifError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let network = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            variables = network.variables.len(),
            "parsed network"
        );
        Ok(network)
    }

    /// Parse BIF text.
    ///
    /// # Errors
    ///
    /// Returns a [`BifError`] for malformed blocks, a state count that does not
    /// match the declared cardinality, duplicate variables, or probability
    /// blocks naming unknown variables.
    pub fn parse(input: &str) -> Result<Self, BifError> {
        let tokens = tokenize(input)?;
        Parser::new(&tokens).parse()
    }

    /// Name from the `network` block, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Variables in file order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Variables with at least one child, in file order. These are the
    /// candidates for hiding as latent variables.
    #[must_use]
    pub fn internals(&self) -> Vec<&Variable> {
        self.variables.iter().filter(|v| v.is_internal()).collect()
    }

    /// Variable names in file order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    /// Number of states of each variable in file order.
    #[must_use]
    pub fn cardinalities(&self) -> Vec<usize> {
        self.variables.iter().map(Variable::cardinality).collect()
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    network: BifNetwork,
    index: HashMap<String, usize>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            network: BifNetwork::default(),
            index: HashMap::new(),
        }
    }

    fn parse(mut self) -> Result<BifNetwork, BifError> {
        let mut relations = Vec::new();

        while let Some(token) = self.next() {
            let line = token.line;
            match &token.kind {
                TokenKind::Word(word) if word == "network" => {
                    self.network.name = Some(self.expect_word()?);
                    self.expect_punct('{')?;
                    self.skip_block()?;
                }
                TokenKind::Word(word) if word == "variable" => self.parse_variable()?,
                TokenKind::Word(word) if word == "probability" => {
                    relations.push(self.parse_probability_header()?);
                    self.expect_punct('{')?;
                    self.skip_block()?;
                }
                other => {
                    return Err(BifError::Syntax {
                        line,
                        reason: format!("unexpected {}", describe(other)),
                    });
                }
            }
        }

        for (child, parents) in relations {
            let child_id = self.lookup(&child)?;
            let mut parent_ids = Vec::with_capacity(parents.len());
            for parent in &parents {
                let parent_id = self.lookup(parent)?;
                parent_ids.push(parent_id);
                let children = &mut self.network.variables[parent_id].children;
                if !children.contains(&child_id) {
                    children.push(child_id);
                }
            }
            self.network.variables[child_id].parents = parent_ids;
        }
        for variable in &mut self.network.variables {
            variable.children.sort_unstable();
        }

        Ok(self.network)
    }

    /// `variable <name> { type discrete [ N ] { s1, s2 }; property ...; }`
    fn parse_variable(&mut self) -> Result<(), BifError> {
        let name_line = self.line();
        let name = self.expect_word()?;
        if self.index.contains_key(&name) {
            return Err(BifError::DuplicateVariable { name });
        }
        self.expect_punct('{')?;

        let mut states = None;
        loop {
            let token = self.next_required("'}' closing variable block")?;
            match &token.kind {
                TokenKind::Punct('}') => break,
                TokenKind::Word(word) if word == "type" => {
                    states = Some(self.parse_type(&name)?);
                }
                // property lines and anything else up to ';'
                _ => self.skip_statement()?,
            }
        }

        let states = states.ok_or_else(|| BifError::Syntax {
            line: name_line,
            reason: format!("variable '{name}' has no type declaration"),
        })?;

        let id = self.network.variables.len();
        self.index.insert(name.clone(), id);
        self.network.variables.push(Variable {
            id,
            name,
            states,
            parents: Vec::new(),
            children: Vec::new(),
        });
        Ok(())
    }

    /// `discrete [ N ] { s1, s2, ... } ;` after the `type` keyword.
    fn parse_type(&mut self, name: &str) -> Result<Vec<String>, BifError> {
        let line = self.line();
        let kind = self.expect_word()?;
        if kind != "discrete" {
            return Err(BifError::Syntax {
                line,
                reason: format!("variable '{name}' has unsupported type '{kind}'"),
            });
        }
        self.expect_punct('[')?;
        let count_line = self.line();
        let declared: usize = self.expect_word()?.parse().map_err(|_| BifError::Syntax {
            line: count_line,
            reason: format!("variable '{name}' has a non-numeric state count"),
        })?;
        self.expect_punct(']')?;
        self.expect_punct('{')?;

        let states = self.word_list('}')?;
        self.expect_punct(';')?;

        if states.len() != declared {
            return Err(BifError::CardinalityMismatch {
                name: name.to_string(),
                declared,
                listed: states.len(),
            });
        }
        Ok(states)
    }

    /// `( child | p1, p2 )` after the `probability` keyword.
    fn parse_probability_header(&mut self) -> Result<(String, Vec<String>), BifError> {
        self.expect_punct('(')?;
        let child = self.expect_word()?;
        let line = self.line();
        let parents = match self.next() {
            Some(Token {
                kind: TokenKind::Punct(')'),
                ..
            }) => Vec::new(),
            Some(Token {
                kind: TokenKind::Punct('|'),
                ..
            }) => self.word_list(')')?,
            _ => {
                return Err(BifError::Syntax {
                    line,
                    reason: format!("expected '|' or ')' after '{child}'"),
                });
            }
        };
        Ok((child, parents))
    }

    /// Comma-separated words up to and including `close`.
    fn word_list(&mut self, close: char) -> Result<Vec<String>, BifError> {
        let mut words = Vec::new();
        loop {
            let token = self.next_required(&format!("'{close}'"))?;
            match &token.kind {
                TokenKind::Punct(c) if *c == close => return Ok(words),
                TokenKind::Punct(',') => {}
                TokenKind::Word(word) => words.push(word.clone()),
                other => {
                    return Err(BifError::Syntax {
                        line: token.line,
                        reason: format!("unexpected {} in list", describe(other)),
                    });
                }
            }
        }
    }

    /// Skip to the `}` matching an already consumed `{`.
    fn skip_block(&mut self) -> Result<(), BifError> {
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next_required("'}'")?;
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip to the next `;`.
    fn skip_statement(&mut self) -> Result<(), BifError> {
        loop {
            if let TokenKind::Punct(';') = self.next_required("';'")?.kind {
                return Ok(());
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<usize, BifError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| BifError::UnknownVariable {
                name: name.to_string(),
            })
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn next_required(&mut self, expected: &str) -> Result<&'a Token, BifError> {
        let line = self.line();
        self.next().ok_or_else(|| BifError::Syntax {
            line,
            reason: format!("unexpected end of file, expected {expected}"),
        })
    }

    fn expect_word(&mut self) -> Result<String, BifError> {
        let token = self.next_required("a name")?;
        match &token.kind {
            TokenKind::Word(word) => Ok(word.clone()),
            other => Err(BifError::Syntax {
                line: token.line,
                reason: format!("expected a name, found {}", describe(other)),
            }),
        }
    }

    fn expect_punct(&mut self, expected: char) -> Result<(), BifError> {
        let token = self.next_required(&format!("'{expected}'"))?;
        match &token.kind {
            TokenKind::Punct(c) if *c == expected => Ok(()),
            other => Err(BifError::Syntax {
                line: token.line,
                reason: format!("expected '{expected}', found {}", describe(other)),
            }),
        }
    }

    /// Line of the next token, or of the last one at end of input.
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Word(word) => format!("'{word}'"),
        TokenKind::Punct(c) => format!("'{c}'"),
    }
}
