//! Per-block token scheduling.
//!
//! For one block the scheduler lays plain n-grams over the text between
//! dictionary matches, emits each match (or its whole group when expanding)
//! and adds short boundary grams on both sides of a match so phrase queries
//! that cross the match edge still hit. Everything goes into a priority
//! queue and is drained in a fixed order:
//!
//! ```text
//! start asc, end asc, position_increment desc, sequence asc, insertion order
//! ```
//!
//! A popped candidate with increment 0 that repeats the word and span of the
//! last emitted one is dropped.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::analysis::synonym::map::SynonymMatch;
use crate::analysis::token::TokenType;
use crate::analysis::tokenizer::ngram_synonym::segmenter::Block;

/// Sequence of tokens that are not part of a synonym group.
const NO_SEQUENCE: u32 = u32::MAX;

/// A token waiting in the scheduler queue. Offsets are absolute.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub word: String,
    pub start: usize,
    pub end: usize,
    pub position_increment: usize,
    pub sequence: u32,
    pub token_type: TokenType,
    ordinal: u64,
}

impl Candidate {
    /// Whether `self` repeats `previous` at the same position.
    pub fn identical(&self, previous: &Candidate) -> bool {
        self.position_increment == 0
            && self.word == previous.word
            && self.start == previous.start
            && self.end == previous.end
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
            .then(other.position_increment.cmp(&self.position_increment))
            .then(self.sequence.cmp(&other.sequence))
            .then(self.ordinal.cmp(&other.ordinal))
    }
}

/// Builds and drains the candidate queue of one block at a time.
#[derive(Debug)]
pub struct TokenScheduler {
    n: usize,
    expand: bool,
    queue: BinaryHeap<Reverse<Candidate>>,
    last: Option<Candidate>,
    next_ordinal: u64,
}

impl TokenScheduler {
    pub fn new(n: usize, expand: bool) -> Self {
        TokenScheduler {
            n: n.max(1),
            expand,
            queue: BinaryHeap::new(),
            last: None,
            next_ordinal: 0,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn expand(&self) -> bool {
        self.expand
    }

    /// Number of candidates still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop all queued candidates.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.last = None;
        self.next_ordinal = 0;
    }

    /// Queue the candidates of `block`. `matches` must be ordered and
    /// non-overlapping, with offsets relative to the block.
    pub fn schedule(&mut self, block: &Block, matches: &[SynonymMatch<'_>]) {
        self.clear();

        let mut next_start = 0;
        let mut after_synonym_produced = false;

        for (idx, m) in matches.iter().enumerate() {
            self.fill(block, next_start, m.start, after_synonym_produced);

            if self.expand {
                let limit = if idx > 0 { matches[idx - 1].end } else { 0 };
                self.before_match(block, m.start, limit);
            }

            self.emit_match(block, m);

            if self.expand {
                let limit = matches.get(idx + 1).map_or(block.len(), |next| next.start);
                after_synonym_produced = self.after_match(block, m.end, limit);
            }

            next_start = m.end;
        }

        self.fill(block, next_start, block.len(), after_synonym_produced);
    }

    /// Pop the next candidate, skipping repeats of the last emitted one.
    pub fn next_unique(&mut self) -> Option<Candidate> {
        while let Some(Reverse(candidate)) = self.queue.pop() {
            if self
                .last
                .as_ref()
                .is_some_and(|previous| candidate.identical(previous))
            {
                continue;
            }
            self.last = Some(candidate.clone());
            return Some(candidate);
        }
        None
    }

    /// Plain n-grams over `[start, end)`.
    fn fill(&mut self, block: &Block, start: usize, end: usize, after_synonym_produced: bool) {
        if start >= end {
            return;
        }

        let mut increment = if after_synonym_produced { 0 } else { 1 };
        if end - start < self.n {
            self.push(block, start, end, increment, NO_SEQUENCE, TokenType::Gram);
            return;
        }

        for i in start..=end - self.n {
            self.push(block, i, i + self.n, increment, NO_SEQUENCE, TokenType::Gram);
            increment = 1;
        }
    }

    /// Grams ending at a match start, no longer than n - 1 and not reaching
    /// back past `limit`.
    fn before_match(&mut self, block: &Block, match_start: usize, limit: usize) {
        for len in 1..self.n {
            if match_start < limit + len {
                break;
            }
            self.push(
                block,
                match_start - len,
                match_start,
                0,
                NO_SEQUENCE,
                TokenType::Gram,
            );
        }
    }

    /// Grams starting at a match end, no longer than n - 1 and not reaching
    /// past `limit`. Returns whether any were queued.
    fn after_match(&mut self, block: &Block, match_end: usize, limit: usize) -> bool {
        let mut produced = false;
        for len in 1..self.n {
            if match_end + len > limit {
                break;
            }
            let increment = if produced { 0 } else { 1 };
            self.push(
                block,
                match_end,
                match_end + len,
                increment,
                NO_SEQUENCE,
                TokenType::Gram,
            );
            produced = true;
        }
        produced
    }

    fn emit_match(&mut self, block: &Block, m: &SynonymMatch<'_>) {
        if !self.expand {
            let word = m.word.clone();
            self.push_word(block, word, m.start, m.end, 1, 0);
            return;
        }

        for (i, term) in m.group.iter().enumerate() {
            let (increment, sequence) = if *term == m.word {
                (1, 0)
            } else {
                (0, u32::try_from(i + 1).unwrap_or(NO_SEQUENCE - 1))
            };
            self.push_word(block, term.clone(), m.start, m.end, increment, sequence);
        }
    }

    fn push(
        &mut self,
        block: &Block,
        start: usize,
        end: usize,
        position_increment: usize,
        sequence: u32,
        token_type: TokenType,
    ) {
        let word = block.slice(start, end);
        self.enqueue(Candidate {
            word,
            start: block.start_offset + start,
            end: block.start_offset + end,
            position_increment,
            sequence,
            token_type,
            ordinal: 0,
        });
    }

    fn push_word(
        &mut self,
        block: &Block,
        word: String,
        start: usize,
        end: usize,
        position_increment: usize,
        sequence: u32,
    ) {
        self.enqueue(Candidate {
            word,
            start: block.start_offset + start,
            end: block.start_offset + end,
            position_increment,
            sequence,
            token_type: TokenType::Synonym,
            ordinal: 0,
        });
    }

    fn enqueue(&mut self, mut candidate: Candidate) {
        candidate.ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.queue.push(Reverse(candidate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::synonym::map::{SynonymMap, SynonymMapBuilder};

    fn block(text: &str, start_offset: usize) -> Block {
        Block {
            text: text.chars().collect(),
            start_offset,
        }
    }

    fn equivalence(groups: &[&[&str]]) -> SynonymMap {
        let mut builder = SynonymMapBuilder::new(true);
        for group in groups {
            for input in group.iter() {
                for output in group.iter() {
                    builder.add(*input, *output);
                }
            }
        }
        builder.build().unwrap().unwrap()
    }

    fn candidate(start: usize, end: usize, position_increment: usize) -> Candidate {
        Candidate {
            word: "x".to_string(),
            start,
            end,
            position_increment,
            sequence: NO_SEQUENCE,
            token_type: TokenType::Gram,
            ordinal: 0,
        }
    }

    fn drain(scheduler: &mut TokenScheduler) -> String {
        let mut out = Vec::new();
        while let Some(c) = scheduler.next_unique() {
            out.push(format!("{},{},{},{}", c.word, c.start, c.end, c.position_increment));
        }
        out.join("/")
    }

    fn run(text: &str, n: usize, expand: bool, map: Option<&SynonymMap>) -> String {
        let block = block(text, 0);
        let matches = map.map(|m| m.find_matches(&block.text)).unwrap_or_default();
        let mut scheduler = TokenScheduler::new(n, expand);
        scheduler.schedule(&block, &matches);
        drain(&mut scheduler)
    }

    #[test]
    fn test_comparator() {
        let mut scheduler = TokenScheduler::new(2, true);
        for c in [
            candidate(10, 11, 1),
            candidate(9, 11, 0),
            candidate(9, 11, 1),
            candidate(8, 11, 1),
            candidate(7, 11, 1),
            candidate(7, 10, 1),
        ] {
            scheduler.enqueue(c);
        }

        let order: Vec<(usize, usize, usize)> = std::iter::from_fn(|| scheduler.queue.pop())
            .map(|Reverse(c)| (c.start, c.end, c.position_increment))
            .collect();
        assert_eq!(
            order,
            vec![
                (7, 10, 1),
                (7, 11, 1),
                (8, 11, 1),
                (9, 11, 1),
                (9, 11, 0),
                (10, 11, 1)
            ]
        );
    }

    #[test]
    fn test_full_ties_keep_insertion_order() {
        let mut scheduler = TokenScheduler::new(2, true);
        for word in ["first", "second", "third"] {
            let mut c = candidate(0, 1, 0);
            c.word = word.to_string();
            scheduler.enqueue(c);
        }

        assert_eq!(drain(&mut scheduler), "first,0,1,0/second,0,1,0/third,0,1,0");
    }

    #[test]
    fn test_identical() {
        let previous = candidate(0, 1, 1);

        assert!(candidate(0, 1, 0).identical(&previous));
        assert!(!candidate(0, 1, 1).identical(&previous));
        assert!(!candidate(0, 2, 0).identical(&previous));

        let mut other_word = candidate(0, 1, 0);
        other_word.word = "y".to_string();
        assert!(!other_word.identical(&previous));
    }

    #[test]
    fn test_next_unique_only_compares_with_last_emitted() {
        let mut scheduler = TokenScheduler::new(2, true);
        scheduler.enqueue(candidate(0, 1, 1));
        scheduler.enqueue(candidate(0, 1, 0));
        scheduler.enqueue(candidate(0, 1, 0));
        scheduler.enqueue(candidate(1, 2, 1));

        assert_eq!(drain(&mut scheduler), "x,0,1,1/x,1,2,1");
    }

    #[test]
    fn test_plain_ngrams() {
        assert_eq!(run("abcd", 2, true, None), "ab,0,2,1/bc,1,3,1/cd,2,4,1");
        assert_eq!(run("abcd", 4, true, None), "abcd,0,4,1");
        assert_eq!(run("abc", 4, true, None), "abc,0,3,1");
        assert_eq!(run("a", 1, true, None), "a,0,1,1");
    }

    #[test]
    fn test_block_offset_is_applied() {
        let block = block("abc", 10);
        let mut scheduler = TokenScheduler::new(2, true);
        scheduler.schedule(&block, &[]);

        assert_eq!(drain(&mut scheduler), "ab,10,12,1/bc,11,13,1");
    }

    #[test]
    fn test_dedup_without_expand() {
        let map = equivalence(&[&["a", "aa"]]);

        assert_eq!(run("ba", 1, false, Some(&map)), "b,0,1,1/a,1,2,1");
    }

    #[test]
    fn test_boundary_bridging_without_expand() {
        let map = equivalence(&[&["a", "aa"]]);

        assert_eq!(run("dcba", 4, false, Some(&map)), "dcb,0,3,1/a,3,4,1");
    }

    #[test]
    fn test_expand_boundary_grams() {
        let map = equivalence(&[&["a", "aa"], &["b", "bb"]]);

        assert_eq!(
            run("gfedcabcdefga", 4, true, Some(&map)),
            "gfed,0,4,1/fedc,1,5,1/edc,2,5,0/dc,3,5,0/c,4,5,0/a,5,6,1/aa,5,6,0/\
             b,6,7,1/bb,6,7,0/c,7,8,1/cd,7,9,0/cde,7,10,0/cdef,7,11,0/\
             defg,8,12,1/efg,9,12,0/fg,10,12,0/g,11,12,0/a,12,13,1/aa,12,13,0"
        );
    }

    #[test]
    fn test_expansion_symmetry() {
        let map = equivalence(&[&["a", "b", "c"]]);

        assert_eq!(run("a", 1, true, Some(&map)), "a,0,1,1/b,0,1,0/c,0,1,0");
        assert_eq!(run("b", 1, true, Some(&map)), "b,0,1,1/a,0,1,0/c,0,1,0");
    }

    #[test]
    fn test_schedule_clears_previous_block() {
        let mut scheduler = TokenScheduler::new(2, true);
        scheduler.schedule(&block("abcd", 0), &[]);
        assert_eq!(scheduler.pending(), 3);

        scheduler.schedule(&block("xy", 5), &[]);
        assert_eq!(drain(&mut scheduler), "xy,5,7,1");
    }
}
