// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Pattern compiler.
//!
//! Compilation runs in two passes. The parser turns the pattern into atoms,
//! one per matched character position, each optionally marked as repeated.
//! The builder then lays out one state per atom:
//!
//! - a plain atom at index `i` gets a transition to `i + 1`;
//! - a repeated atom gets a self-loop, plus a copy of the next state's
//!   transitions so the atom can be skipped;
//! - transitions into a state that can accept without more input carry
//!   [`TransitionAction::KeyCheck`], or [`TransitionAction::PrefixShortcut`]
//!   when a repeated `.` guarantees every continuation matches.

use tracing::debug;

use super::predicate::{CharCategory, CharPredicate};
use super::table::{State, Transition, TransitionAction, TransitionTable};
use super::MatchMode;
use crate::data_structures::lanai_tree::error::{LanaiTreeError, LanaiTreeResult};

/// One matched character position of the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Atom {
    predicate: CharPredicate,
    repeated: bool,
}

impl Atom {
    fn new(predicate: CharPredicate) -> Self {
        Self {
            predicate,
            repeated: false,
        }
    }

    /// `.*`
    fn wildcard_loop() -> Self {
        Self {
            predicate: CharPredicate::Any,
            repeated: true,
        }
    }

    fn is_wildcard_loop(&self) -> bool {
        self.repeated && self.predicate.is_any()
    }
}

/// Compiles `pattern` into a transition table.
///
/// # Errors
///
/// * [`LanaiTreeError::EmptyPattern`] for an empty pattern.
/// * [`LanaiTreeError::PatternSyntax`] with the character position of the
///   first fault.
pub fn compile(pattern: &str, mode: MatchMode) -> LanaiTreeResult<TransitionTable> {
    if pattern.is_empty() {
        return Err(LanaiTreeError::EmptyPattern);
    }

    let atoms = parse(pattern, mode)?;
    let table = build(&atoms);
    debug!(
        pattern = pattern,
        mode = ?mode,
        atoms = atoms.len(),
        transitions = table.states().iter().map(|s| s.transitions().len()).sum::<usize>(),
        "Compiled pattern"
    );
    Ok(table)
}

/// Renders `pattern` in `regex` crate syntax, anchored at both ends.
///
/// The result accepts exactly the keys the compiled table accepts, so it can
/// serve as a full-scan baseline.
pub fn to_regex(pattern: &str, mode: MatchMode) -> LanaiTreeResult<String> {
    if pattern.is_empty() {
        return Err(LanaiTreeError::EmptyPattern);
    }

    let mut regex = String::from("^");
    for atom in parse(pattern, mode)? {
        let item = atom.predicate.to_regex();
        if atom.repeated {
            regex.push_str(&format!("(?:{item})*"));
        } else {
            regex.push_str(&item);
        }
    }
    regex.push('$');
    Ok(regex)
}

fn parse(pattern: &str, mode: MatchMode) -> LanaiTreeResult<Vec<Atom>> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut atoms = Parser::new(&chars).parse()?;
    if mode == MatchMode::Contains {
        wrap_contains(&mut atoms);
    }
    Ok(atoms)
}

/// Surrounds the atoms with `.*` unless they already start or end with one.
fn wrap_contains(atoms: &mut Vec<Atom>) {
    if !atoms.first().is_some_and(Atom::is_wildcard_loop) {
        atoms.insert(0, Atom::wildcard_loop());
    }
    if !atoms.last().is_some_and(Atom::is_wildcard_loop) {
        atoms.push(Atom::wildcard_loop());
    }
}

/// Lays out one state per atom.
fn build(atoms: &[Atom]) -> TransitionTable {
    let len = atoms.len();

    // nullable[i]: atoms i.. can all be skipped, so state i accepts as is.
    // open_tail[i]: additionally one of them is `.*`, so anything that
    // follows is accepted.
    let mut nullable = vec![false; len + 1];
    let mut open_tail = vec![false; len + 1];
    nullable[len] = true;
    for i in (0..len).rev() {
        nullable[i] = atoms[i].repeated && nullable[i + 1];
        open_tail[i] = nullable[i] && (atoms[i].is_wildcard_loop() || open_tail[i + 1]);
    }

    let action_for = |target: usize| {
        if target == len {
            TransitionAction::Advance
        } else if open_tail[target] {
            TransitionAction::PrefixShortcut
        } else if nullable[target] {
            TransitionAction::KeyCheck
        } else {
            TransitionAction::Advance
        }
    };

    let mut states: Vec<Vec<Transition>> = vec![Vec::new(); len];
    for i in (0..len).rev() {
        let atom = &atoms[i];
        let target = if atom.repeated { i } else { i + 1 };
        let mut transitions = vec![Transition::new(
            atom.predicate.clone(),
            target,
            action_for(target),
        )];
        if atom.repeated && i + 1 < len {
            transitions.extend(states[i + 1].iter().cloned());
        }
        states[i] = transitions;
    }

    TransitionTable::new(states.into_iter().map(State::new).collect())
}

/// Splits a pattern into atoms.
struct Parser<'p> {
    chars: &'p [char],
    pos: usize,
    atoms: Vec<Atom>,
}

impl<'p> Parser<'p> {
    fn new(chars: &'p [char]) -> Self {
        Self {
            chars,
            pos: 0,
            atoms: Vec::new(),
        }
    }

    fn parse(mut self) -> LanaiTreeResult<Vec<Atom>> {
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '*' => self.repeat()?,
                '.' => {
                    self.pos += 1;
                    self.atoms.push(Atom::new(CharPredicate::Any));
                }
                '[' => {
                    let predicate = self.class()?;
                    self.atoms.push(Atom::new(predicate));
                }
                '\\' => {
                    let predicate = self.escape()?;
                    self.atoms.push(Atom::new(predicate));
                }
                literal => {
                    self.pos += 1;
                    self.atoms.push(Atom::new(CharPredicate::Exact(literal)));
                }
            }
        }
        Ok(self.atoms)
    }

    fn repeat(&mut self) -> LanaiTreeResult<()> {
        let position = self.pos;
        match self.atoms.last_mut() {
            None => Err(LanaiTreeError::syntax(
                position,
                "repeat operator has nothing to repeat",
            )),
            Some(atom) if atom.repeated => Err(LanaiTreeError::syntax(
                position,
                "repeat operator cannot follow another repeat",
            )),
            Some(atom) => {
                atom.repeated = true;
                self.pos += 1;
                Ok(())
            }
        }
    }

    /// Parses `[...]` starting at the opening bracket.
    ///
    /// A class is either a set of characters or a single range, optionally
    /// negated with a leading `^`. A `-` at either edge is a literal; `\`
    /// makes the next character literal.
    fn class(&mut self) -> LanaiTreeResult<CharPredicate> {
        let open = self.pos;
        let mut pos = open + 1;
        let negated = self.chars.get(pos) == Some(&'^');
        if negated {
            pos += 1;
        }

        let mut members = Vec::new();
        let mut dashes = Vec::new();
        loop {
            match self.chars.get(pos) {
                None => {
                    return Err(LanaiTreeError::syntax(
                        open,
                        "unterminated character class",
                    ))
                }
                Some(']') => break,
                Some('\\') => match self.chars.get(pos + 1) {
                    None => {
                        return Err(LanaiTreeError::syntax(pos, "escape at end of pattern"))
                    }
                    Some(&escaped) => {
                        members.push(escaped);
                        pos += 2;
                    }
                },
                Some('-') => {
                    dashes.push((members.len(), pos));
                    pos += 1;
                }
                Some(&c) => {
                    members.push(c);
                    pos += 1;
                }
            }
        }
        self.pos = pos + 1;

        let mut literal_dash = false;
        let mut range_at = None;
        for (index, position) in dashes {
            if index == 0 || index == members.len() {
                literal_dash = true;
            } else if range_at.is_some() {
                return Err(LanaiTreeError::syntax(
                    position,
                    "character class range has more than two boundary characters",
                ));
            } else {
                range_at = Some(position);
            }
        }

        if let Some(position) = range_at {
            if literal_dash || members.len() != 2 {
                return Err(LanaiTreeError::syntax(
                    position,
                    "character class range has more than two boundary characters",
                ));
            }
            let (lo, hi) = (members[0], members[1]);
            return Ok(if negated {
                CharPredicate::not_range(lo, hi)
            } else {
                CharPredicate::range(lo, hi)
            });
        }

        if literal_dash {
            members.push('-');
        }
        if members.is_empty() {
            return Err(LanaiTreeError::syntax(open, "empty character class"));
        }
        Ok(if negated {
            CharPredicate::none_of(members)
        } else {
            CharPredicate::any_of(members)
        })
    }

    /// Parses an escape sequence starting at the backslash.
    fn escape(&mut self) -> LanaiTreeResult<CharPredicate> {
        let start = self.pos;
        let kind = match self.chars.get(start + 1) {
            Some(&kind) => kind,
            None => return Err(LanaiTreeError::syntax(start, "escape at end of pattern")),
        };

        let exact = |c: char| -> LanaiTreeResult<CharPredicate> { Ok(CharPredicate::Exact(c)) };
        self.pos = start + 2;
        match kind {
            '0'..='7' => self.octal(start + 1),
            'a' => exact('\u{07}'),
            'b' => exact('\u{08}'),
            't' => exact('\t'),
            'r' => exact('\r'),
            'v' => exact('\u{0B}'),
            'f' => exact('\u{0C}'),
            'n' => exact('\n'),
            'e' => exact('\u{1B}'),
            'x' => self.hex(start + 2, 2),
            'u' => self.hex(start + 2, 4),
            'c' => self.control(start + 2),
            'p' | 'P' => self.named_category(start, kind),
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => category(&format!("\\{kind}"), start),
            other => exact(other),
        }
    }

    /// Two or three octal digits starting at `first`.
    fn octal(&mut self, first: usize) -> LanaiTreeResult<CharPredicate> {
        let digits: String = self.chars[first..]
            .iter()
            .take(3)
            .take_while(|c| matches!(c, '0'..='7'))
            .collect();
        if digits.len() < 2 {
            return Err(LanaiTreeError::syntax(first, "malformed octal escape"));
        }

        let code = u32::from_str_radix(&digits, 8)
            .map_err(|_| LanaiTreeError::syntax(first, "malformed octal escape"))?;
        let c = char::from_u32(code)
            .ok_or_else(|| LanaiTreeError::syntax(first, "malformed octal escape"))?;
        self.pos = first + digits.len();
        Ok(CharPredicate::Exact(c))
    }

    /// Exactly `width` hex digits starting at `first`.
    fn hex(&mut self, first: usize, width: usize) -> LanaiTreeResult<CharPredicate> {
        let digits = match self.chars.get(first..first + width) {
            Some(digits) => digits,
            None => {
                return Err(LanaiTreeError::syntax(
                    first,
                    format!("hexadecimal escape needs {width} digits"),
                ))
            }
        };
        if let Some(offset) = digits.iter().position(|c| !c.is_ascii_hexdigit()) {
            return Err(LanaiTreeError::syntax(
                first + offset,
                "invalid hexadecimal digit",
            ));
        }

        let digits: String = digits.iter().collect();
        let c = u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                LanaiTreeError::syntax(first, "hexadecimal escape is not a valid character")
            })?;
        self.pos = first + width;
        Ok(CharPredicate::Exact(c))
    }

    /// `\cX`: the control character for `X`, with `X` at `at`.
    fn control(&mut self, at: usize) -> LanaiTreeResult<CharPredicate> {
        let letter = match self.chars.get(at) {
            Some(&letter) => letter,
            None => {
                return Err(LanaiTreeError::syntax(
                    at - 1,
                    "control escape needs a character",
                ))
            }
        };
        let upper = letter.to_ascii_uppercase();
        if !('@'..='_').contains(&upper) {
            return Err(LanaiTreeError::syntax(at, "invalid control character"));
        }
        self.pos = at + 1;
        // '@'..='_' maps onto 0x00..=0x1F, always a valid char
        Ok(CharPredicate::Exact(char::from(upper as u8 - b'@')))
    }

    /// `\p{Name}` or `\P{Name}` starting at the backslash.
    fn named_category(&mut self, start: usize, kind: char) -> LanaiTreeResult<CharPredicate> {
        let open = start + 2;
        if self.chars.get(open) != Some(&'{') {
            return Err(LanaiTreeError::syntax(
                open.min(self.chars.len()),
                format!("expected '{{' after \\{kind}"),
            ));
        }
        let close = self.chars[open..]
            .iter()
            .position(|&c| c == '}')
            .map(|offset| open + offset)
            .ok_or_else(|| LanaiTreeError::syntax(start, "unterminated character category"))?;

        let name: String = self.chars[open + 1..close].iter().collect();
        if name.is_empty() {
            return Err(LanaiTreeError::syntax(open, "empty character category"));
        }
        self.pos = close + 1;
        category(&format!("\\{kind}{{{name}}}"), start)
    }
}

fn category(class: &str, position: usize) -> LanaiTreeResult<CharPredicate> {
    CharCategory::new(class)
        .map(CharPredicate::Category)
        .map_err(|_| LanaiTreeError::syntax(position, format!("unknown character category {class}")))
}
