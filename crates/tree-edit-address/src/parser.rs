//! Address parser.
//!
//! ```text
//! address := "" | first ( "." key | "[" bracket "]" )*
//! first   := key | "[" bracket "]"
//! bracket := "-"? digits | quoted-string
//! ```

use thiserror::Error;

use crate::types::{Address, Step};
use crate::validate::{validate_address, validate_steps};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Unexpected character {ch:?} at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unexpected end of address")]
    UnexpectedEnd,
    #[error("Empty key at {pos}")]
    EmptyKey { pos: usize },
    #[error("Invalid index")]
    InvalidIndex,
    #[error("Invalid escape sequence")]
    InvalidEscape,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Address too long")]
    AddressTooLong,
    #[error("Too many steps")]
    TooManySteps,
}

/// Address parser.
pub struct AddressParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> AddressParser<'a> {
    /// Parse an address string into a typed [`Address`].
    ///
    /// Both the input and the canonical text of the result must fit in
    /// [`MAX_ADDRESS_LENGTH`](crate::MAX_ADDRESS_LENGTH) bytes, so any parsed
    /// address can be displayed and parsed again.
    pub fn parse(input: &'a str) -> Result<Address, AddressError> {
        validate_address(input)?;
        let mut parser = Self { input, pos: 0 };
        let steps = parser.parse_steps()?;
        validate_steps(&steps)?;
        let address = Address::from_steps(steps);
        validate_address(&address.to_string())?;
        Ok(address)
    }

    fn parse_steps(&mut self) -> Result<Vec<Step>, AddressError> {
        let mut steps = Vec::new();
        if self.is_at_end() {
            return Ok(steps);
        }

        if self.peek() == Some('[') {
            steps.push(self.parse_bracket()?);
        } else {
            steps.push(Step::Key(self.parse_key()?));
        }

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.advance();
                    steps.push(Step::Key(self.parse_key()?));
                }
                '[' => steps.push(self.parse_bracket()?),
                other => {
                    return Err(AddressError::UnexpectedChar { ch: other, pos: self.pos });
                }
            }
        }

        Ok(steps)
    }

    fn parse_key(&mut self) -> Result<String, AddressError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if matches!(c, '.' | '[' | ']') {
                break;
            }
            self.advance();
        }

        if self.pos == start {
            return if self.is_at_end() {
                Err(AddressError::UnexpectedEnd)
            } else {
                Err(AddressError::EmptyKey { pos: start })
            };
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_bracket(&mut self) -> Result<Step, AddressError> {
        self.expect('[')?;
        self.skip_whitespace();

        let step = match self.peek() {
            Some('\'') | Some('"') => Step::Key(self.parse_string()?),
            Some('-') | Some('0'..='9') => Step::Index(self.parse_index()?),
            Some(c) => return Err(AddressError::UnexpectedChar { ch: c, pos: self.pos }),
            None => return Err(AddressError::UnexpectedEnd),
        };

        self.skip_whitespace();
        self.expect(']')?;
        Ok(step)
    }

    fn parse_index(&mut self) -> Result<isize, AddressError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }

        let digits_start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == digits_start {
            return Err(AddressError::InvalidIndex);
        }

        self.input[start..self.pos]
            .parse::<isize>()
            .map_err(|_| AddressError::InvalidIndex)
    }

    fn parse_string(&mut self) -> Result<String, AddressError> {
        let quote = self.peek().ok_or(AddressError::UnexpectedEnd)?;
        self.advance();

        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(AddressError::UnclosedString),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('\\') => result.push('\\'),
                        Some('\'') => result.push('\''),
                        Some('"') => result.push('"'),
                        None => return Err(AddressError::UnclosedString),
                        _ => return Err(AddressError::InvalidEscape),
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), AddressError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(AddressError::UnexpectedChar { ch: c, pos: self.pos }),
            None => Err(AddressError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
