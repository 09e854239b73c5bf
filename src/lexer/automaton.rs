//! Table-driven deterministic finite automata used for longest-match scanning.
//!
//! States live in an arena and are addressed by [`StateId`]. Each state owns a
//! fixed row of 128 slots, one per ASCII symbol, so a `(state, symbol)` pair has
//! at most one target. Symbols outside ASCII never have a transition.

use std::fmt;

const ALPHABET: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

type Row = [Option<StateId>; ALPHABET];

/// Incrementally describes an automaton; [`AutomatonBuilder::build`] freezes it.
#[derive(Debug)]
pub struct AutomatonBuilder {
    transitions: Vec<Row>,
    accepting: Vec<bool>,
}

impl AutomatonBuilder {
    /// Creates a builder whose first state, `q0`, is the start state.
    pub fn new(start_accepting: bool) -> Self {
        Self {
            transitions: vec![[None; ALPHABET]],
            accepting: vec![start_accepting],
        }
    }

    pub fn start(&self) -> StateId {
        StateId(0)
    }

    pub fn add_state(&mut self, accepting: bool) -> StateId {
        self.transitions.push([None; ALPHABET]);
        self.accepting.push(accepting);
        StateId(self.accepting.len() - 1)
    }

    /// Adds `from --symbol--> to`, replacing any earlier target for the pair.
    pub fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        assert!(symbol.is_ascii(), "non-ASCII symbol {:?}", symbol);
        assert!(to.0 < self.accepting.len(), "unknown state {}", to);
        self.transitions[from.0][symbol as usize] = Some(to);
    }

    pub fn add_transitions<I>(&mut self, from: StateId, symbols: I, to: StateId)
    where
        I: IntoIterator<Item = char>,
    {
        for symbol in symbols {
            self.add_transition(from, symbol, to);
        }
    }

    pub fn build(self) -> Automaton {
        Automaton {
            transitions: self.transitions,
            accepting: self.accepting,
            start: StateId(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Automaton {
    transitions: Vec<Row>,
    accepting: Vec<bool>,
    start: StateId,
}

impl Automaton {
    /// One or more lowercase ASCII letters.
    pub fn identifier() -> Self {
        let mut b = AutomatonBuilder::new(false);
        let q0 = b.start();
        let q1 = b.add_state(true);
        b.add_transitions(q0, 'a'..='z', q1);
        b.add_transitions(q1, 'a'..='z', q1);
        b.build()
    }

    /// `digits [. digits] [E [+|-] digits]`
    pub fn number() -> Self {
        let mut b = AutomatonBuilder::new(false);
        let q0 = b.start();
        let int_part = b.add_state(true);
        let dot = b.add_state(false);
        let fraction = b.add_state(true);
        let exp_mark = b.add_state(false);
        let exp_sign = b.add_state(false);
        let exp_digits = b.add_state(true);

        b.add_transitions(q0, '0'..='9', int_part);
        b.add_transitions(int_part, '0'..='9', int_part);
        b.add_transitions(dot, '0'..='9', fraction);
        b.add_transitions(fraction, '0'..='9', fraction);
        b.add_transitions(exp_mark, '0'..='9', exp_digits);
        b.add_transitions(exp_sign, '0'..='9', exp_digits);
        b.add_transitions(exp_digits, '0'..='9', exp_digits);

        b.add_transition(int_part, '.', dot);
        b.add_transition(int_part, 'E', exp_mark);
        b.add_transition(fraction, 'E', exp_mark);
        b.add_transitions(exp_mark, ['+', '-'], exp_sign);
        b.build()
    }

    /// A single operator symbol, optionally followed by `=`.
    pub fn operator() -> Self {
        let mut b = AutomatonBuilder::new(false);
        let q0 = b.start();
        let single = b.add_state(true);
        let double = b.add_state(true);
        b.add_transitions(q0, "+-*/%<>=!".chars(), single);
        b.add_transition(single, '=', double);
        b.build()
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting[state.0]
    }

    pub fn next(&self, state: StateId, symbol: char) -> Option<StateId> {
        if !symbol.is_ascii() {
            return None;
        }
        self.transitions[state.0][symbol as usize]
    }

    /// Length of the longest prefix of `input[start..]` that ends in an
    /// accepting state, or 0 when no accepting state is reached.
    ///
    /// Stops at the first symbol without a transition.
    pub fn longest_accepted_len(&self, input: &[char], start: usize) -> usize {
        let Some(rest) = input.get(start..) else {
            return 0;
        };

        let mut state = self.start;
        let mut longest = 0;
        for (consumed, &c) in rest.iter().enumerate() {
            match self.next(state, c) {
                Some(next) => state = next,
                None => break,
            }
            if self.is_accepting(state) {
                longest = consumed + 1;
            }
        }
        longest
    }

    fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting
            .iter()
            .enumerate()
            .filter(|(_, accepting)| **accepting)
            .map(|(i, _)| StateId(i))
    }
}

/// Renders the transition table: state counts, accepting states, and one line
/// per state that has outgoing transitions.
impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = (0..self.state_count())
            .map(|i| StateId(i).to_string())
            .collect::<Vec<_>>();
        let accepting = self
            .accepting_states()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        writeln!(f, "Total States: {}", self.state_count())?;
        writeln!(f, "States: [{}]", states.join(", "))?;
        writeln!(f, "Accepting States: [{}]", accepting.join(", "))?;
        write!(f, "Transitions:")?;
        for (i, row) in self.transitions.iter().enumerate() {
            let edges = row
                .iter()
                .enumerate()
                .filter_map(|(symbol, target)| {
                    target.map(|t| format!("{}: {}", symbol as u8 as char, t))
                })
                .collect::<Vec<_>>();
            if !edges.is_empty() {
                write!(f, "\n  {} -> {{{}}}", StateId(i), edges.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn longest(automaton: &Automaton, s: &str) -> usize {
        automaton.longest_accepted_len(&chars(s), 0)
    }

    #[test]
    fn identifier_accepts_lowercase_runs() {
        let dfa = Automaton::identifier();
        assert_eq!(longest(&dfa, "x"), 1);
        assert_eq!(longest(&dfa, "abc"), 3);
        assert_eq!(longest(&dfa, "abc1"), 3);
    }

    #[test]
    fn identifier_rejects_other_starts() {
        let dfa = Automaton::identifier();
        assert_eq!(longest(&dfa, "1abc"), 0);
        assert_eq!(longest(&dfa, "Abc"), 0);
        assert_eq!(longest(&dfa, "_abc"), 0);
        assert_eq!(longest(&dfa, ""), 0);
    }

    // Identifiers stop at digits and underscores even though prose
    // descriptions of the language allow them.
    #[test]
    fn identifier_stops_at_digit_and_underscore() {
        let dfa = Automaton::identifier();
        assert_eq!(longest(&dfa, "ab_c"), 2);
        assert_eq!(longest(&dfa, "a1"), 1);
    }

    #[test]
    fn number_forms() {
        let dfa = Automaton::number();
        assert_eq!(longest(&dfa, "123"), 3);
        assert_eq!(longest(&dfa, "12.345"), 6);
        assert_eq!(longest(&dfa, "2E10"), 4);
        assert_eq!(longest(&dfa, "1.5E-3"), 6);
        assert_eq!(longest(&dfa, "7E+2;"), 4);
    }

    #[test]
    fn number_does_not_consume_dangling_suffix() {
        let dfa = Automaton::number();
        assert_eq!(longest(&dfa, "2E"), 1);
        assert_eq!(longest(&dfa, "2E+"), 1);
        assert_eq!(longest(&dfa, "3."), 1);
        assert_eq!(longest(&dfa, "3.x"), 1);
        assert_eq!(longest(&dfa, "2e5"), 1);
    }

    #[test]
    fn operator_one_and_two_chars() {
        let dfa = Automaton::operator();
        assert_eq!(longest(&dfa, "="), 1);
        assert_eq!(longest(&dfa, "=="), 2);
        assert_eq!(longest(&dfa, "<=5"), 2);
        assert_eq!(longest(&dfa, "!=="), 2);
        assert_eq!(longest(&dfa, "^"), 0);
    }

    #[test]
    fn respects_start_offset() {
        let dfa = Automaton::identifier();
        let input = chars("12ab;");
        assert_eq!(dfa.longest_accepted_len(&input, 2), 2);
        assert_eq!(dfa.longest_accepted_len(&input, 5), 0);
        assert_eq!(dfa.longest_accepted_len(&input, 99), 0);
    }

    #[test]
    fn accepting_start_counts_as_zero() {
        let mut b = AutomatonBuilder::new(true);
        let q0 = b.start();
        b.add_transition(q0, 'a', q0);
        let dfa = b.build();
        assert_eq!(longest(&dfa, "b"), 0);
        assert_eq!(longest(&dfa, "aab"), 2);
    }

    #[test]
    fn longest_is_monotonic_and_bounded() {
        let samples = ["12.34567E+89", "abcdef", "<=", "9.9.9", "x1y2"];
        let automata = [
            Automaton::identifier(),
            Automaton::number(),
            Automaton::operator(),
        ];
        for dfa in &automata {
            for sample in samples {
                let input = chars(sample);
                for start in 0..=input.len() {
                    let mut previous = 0;
                    for end in start..=input.len() {
                        let len = dfa.longest_accepted_len(&input[..end], start);
                        assert!(len >= previous, "{:?} shrank at {}", sample, end);
                        assert!(len <= end - start);
                        previous = len;
                    }
                }
            }
        }
    }

    #[test]
    fn later_transition_replaces_earlier() {
        let mut b = AutomatonBuilder::new(false);
        let q0 = b.start();
        let q1 = b.add_state(false);
        let q2 = b.add_state(true);
        b.add_transition(q0, 'a', q1);
        b.add_transition(q0, 'a', q2);
        let dfa = b.build();
        assert_eq!(dfa.next(q0, 'a'), Some(q2));
        assert_eq!(longest(&dfa, "a"), 1);
    }

    #[test]
    fn renders_transition_table() {
        let text = Automaton::operator().to_string();
        assert!(text.starts_with("Total States: 3\nStates: [q0, q1, q2]\n"));
        assert!(text.contains("Accepting States: [q1, q2]"));
        assert!(text.contains("  q1 -> {=: q2}"));
        assert!(text.contains("q0 -> {!: q1, %: q1, *: q1, +: q1, -: q1, /: q1, <: q1, =: q1, >: q1}"));
    }
}
