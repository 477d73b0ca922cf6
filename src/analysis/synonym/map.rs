//! FST-backed synonym map.
//!
//! Keys are the canonical form of every rule input (case folded when the map
//! ignores case). Each key maps to an index into the list of output groups,
//! so the automaton itself stays small and the groups are stored once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use fst::raw::Output;
use fst::{Map, MapBuilder, Streamer};

use crate::analysis::token_filter::lowercase::{fold_case, fold_chars_into};
use crate::error::Result;

/// A dictionary hit inside a block.
///
/// `start` and `end` are code point offsets into the block that was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymMatch<'a> {
    /// First code point of the match
    pub start: usize,
    /// One past the last code point of the match
    pub end: usize,
    /// The matched text, case folded when the map ignores case
    pub word: String,
    /// The group of terms the matched text is equivalent to
    pub group: &'a [String],
}

/// Collects `input -> output` pairs and builds a [`SynonymMap`].
#[derive(Debug, Default)]
pub struct SynonymMapBuilder {
    entries: BTreeMap<String, Vec<String>>,
    ignore_case: bool,
}

impl SynonymMapBuilder {
    pub fn new(ignore_case: bool) -> Self {
        SynonymMapBuilder {
            entries: BTreeMap::new(),
            ignore_case,
        }
    }

    /// Add one mapping. An output already present for `input` is skipped.
    pub fn add<I: Into<String>, O: Into<String>>(&mut self, input: I, output: O) {
        let output = output.into();
        let outputs = self.entries.entry(input.into()).or_default();
        if !outputs.contains(&output) {
            outputs.push(output);
        }
    }

    /// Number of distinct inputs added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the map. Returns `Ok(None)` when nothing was added.
    pub fn build(self) -> Result<Option<SynonymMap>> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        let mut groups = Vec::with_capacity(self.entries.len());
        let mut builder = MapBuilder::memory();
        // BTreeMap iterates in byte order, which is what the FST builder needs.
        for (input, outputs) in self.entries {
            builder.insert(input.as_bytes(), groups.len() as u64)?;
            groups.push(outputs);
        }

        let bytes = builder.into_inner()?;
        let fst = Map::new(Arc::from(bytes))?;

        Ok(Some(SynonymMap {
            fst: Arc::new(fst),
            groups: Arc::new(groups),
            ignore_case: self.ignore_case,
        }))
    }
}

/// Immutable synonym dictionary with longest-match lookup.
#[derive(Clone)]
pub struct SynonymMap {
    /// FST map: canonical input -> index into `groups`
    fst: Arc<Map<Arc<[u8]>>>,
    /// Output groups indexed by FST values
    groups: Arc<Vec<Vec<String>>>,
    ignore_case: bool,
}

impl SynonymMap {
    /// Whether keys were folded and input is folded while matching.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Number of distinct inputs in the map.
    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// Exact lookup of a single term.
    pub fn get(&self, term: &str) -> Option<&[String]> {
        let index = if self.ignore_case {
            self.fst.get(fold_case(term).as_bytes())?
        } else {
            self.fst.get(term.as_bytes())?
        };
        self.groups.get(index as usize).map(Vec::as_slice)
    }

    /// All entries in key order.
    pub fn entries(&self) -> Vec<(String, &[String])> {
        let mut entries = Vec::with_capacity(self.len());
        let mut stream = self.fst.stream();
        while let Some((key, index)) = stream.next() {
            if let Some(group) = self.groups.get(index as usize) {
                entries.push((String::from_utf8_lossy(key).into_owned(), group.as_slice()));
            }
        }
        entries
    }

    /// Longest dictionary entry starting at `text[start]`.
    ///
    /// Returns the exclusive end offset and the entry's group. A match can
    /// only end on a code point boundary of `text`.
    pub fn longest_match(&self, text: &[char], start: usize) -> Option<(usize, &[String])> {
        let fst = self.fst.as_fst();
        let mut node = fst.root();
        let mut output = Output::zero();
        let mut longest = None;
        let mut utf8 = [0u8; 4];

        for (offset, &c) in text.iter().enumerate().skip(start) {
            let mut step = |ch: char| -> bool {
                for &byte in ch.encode_utf8(&mut utf8).as_bytes() {
                    match node.find_input(byte) {
                        Some(i) => {
                            let transition = node.transition(i);
                            output = output.cat(transition.out);
                            node = fst.node(transition.addr);
                        }
                        None => return false,
                    }
                }
                true
            };

            let advanced = if self.ignore_case {
                c.to_lowercase().all(&mut step)
            } else {
                step(c)
            };
            if !advanced {
                break;
            }

            if node.is_final() {
                let index = output.cat(node.final_output()).value();
                longest = Some((offset + 1, index));
            }
        }

        let (end, index) = longest?;
        self.groups
            .get(index as usize)
            .map(|group| (end, group.as_slice()))
    }

    /// Longest entry made of whole leading `words`.
    ///
    /// Words are joined with a single space, the way multi-word rule terms
    /// are stored. Returns the number of words matched and the group.
    pub fn longest_phrase_match<S: AsRef<str>>(&self, words: &[S]) -> Option<(usize, &[String])> {
        let fst = self.fst.as_fst();
        let mut node = fst.root();
        let mut output = Output::zero();
        let mut longest = None;
        let mut utf8 = [0u8; 4];

        for (count, word) in words.iter().enumerate() {
            let mut step = |ch: char| -> bool {
                for &byte in ch.encode_utf8(&mut utf8).as_bytes() {
                    match node.find_input(byte) {
                        Some(i) => {
                            let transition = node.transition(i);
                            output = output.cat(transition.out);
                            node = fst.node(transition.addr);
                        }
                        None => return false,
                    }
                }
                true
            };

            if count > 0 && !step(' ') {
                break;
            }
            let word = word.as_ref();
            let advanced = if self.ignore_case {
                word.chars().flat_map(char::to_lowercase).all(&mut step)
            } else {
                word.chars().all(&mut step)
            };
            if !advanced {
                break;
            }

            if node.is_final() {
                let index = output.cat(node.final_output()).value();
                longest = Some((count + 1, index));
            }
        }

        let (count, index) = longest?;
        self.groups
            .get(index as usize)
            .map(|group| (count, group.as_slice()))
    }

    /// Scan a whole block and collect its non-overlapping longest matches.
    ///
    /// Where nothing matches the scan moves forward by one code point.
    pub fn find_matches(&self, text: &[char]) -> Vec<SynonymMatch<'_>> {
        let mut matches = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let Some((end, group)) = self.longest_match(text, start) else {
                start += 1;
                continue;
            };

            let mut word = String::new();
            if self.ignore_case {
                fold_chars_into(&text[start..end], &mut word);
            } else {
                word.extend(&text[start..end]);
            }

            matches.push(SynonymMatch {
                start,
                end,
                word,
                group,
            });
            start = end;
        }

        matches
    }
}

impl fmt::Debug for SynonymMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynonymMap")
            .field("entries", &self.len())
            .field("groups", &self.groups.len())
            .field("ignore_case", &self.ignore_case)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn build(pairs: &[(&str, &str)], ignore_case: bool) -> SynonymMap {
        let mut builder = SynonymMapBuilder::new(ignore_case);
        for (input, output) in pairs {
            builder.add(*input, *output);
        }
        builder.build().unwrap().unwrap()
    }

    #[test]
    fn test_empty_builder_builds_nothing() {
        let builder = SynonymMapBuilder::new(true);
        assert!(builder.is_empty());
        assert!(builder.build().unwrap().is_none());
    }

    #[test]
    fn test_builder_dedups_outputs() {
        let map = build(&[("a", "a"), ("a", "aa"), ("a", "aa")], false);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").unwrap(), ["a", "aa"]);
    }

    #[test]
    fn test_longest_match_prefers_longer_entry() {
        let map = build(&[("a", "x"), ("ab", "y"), ("abc", "z")], false);
        let text = chars("zabcd");

        let (end, group) = map.longest_match(&text, 1).unwrap();
        assert_eq!(end, 4);
        assert_eq!(group, ["z"]);

        assert!(map.longest_match(&text, 0).is_none());
    }

    #[test]
    fn test_longest_match_falls_back_to_shorter_entry() {
        let map = build(&[("a", "x"), ("abc", "z")], false);
        let text = chars("abd");

        let (end, group) = map.longest_match(&text, 0).unwrap();
        assert_eq!(end, 1);
        assert_eq!(group, ["x"]);
    }

    #[test]
    fn test_longest_match_multibyte() {
        let map = build(&[("東京", "とうきょう")], false);
        let text = chars("の東京都");

        let (end, _) = map.longest_match(&text, 1).unwrap();
        assert_eq!(end, 3);
    }

    #[test]
    fn test_ignore_case_matching() {
        let map = build(&[("abc", "xyz")], true);
        let text = chars("xABCx");

        let matches = map.find_matches(&text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 1);
        assert_eq!(matches[0].end, 4);
        assert_eq!(matches[0].word, "abc");

        assert_eq!(map.get("ABC").unwrap(), ["xyz"]);
    }

    #[test]
    fn test_case_sensitive_matching() {
        let map = build(&[("abc", "xyz")], false);

        assert!(map.find_matches(&chars("ABC")).is_empty());
        assert_eq!(map.find_matches(&chars("abc"))[0].word, "abc");
    }

    #[test]
    fn test_find_matches_is_non_overlapping() {
        let map = build(&[("ab", "x"), ("bc", "y"), ("c", "z")], false);
        let matches = map.find_matches(&chars("abcbc"));

        let spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.start, m.end)).collect();
        assert_eq!(spans, vec![(0, 2), (2, 3), (3, 5)]);
    }

    #[test]
    fn test_longest_phrase_match_stops_on_word_boundaries() {
        let map = build(&[("new", "x"), ("new york", "y"), ("york", "z")], true);

        let (count, group) = map.longest_phrase_match(&["New", "York", "city"]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(group, ["y"]);

        let (count, _) = map.longest_phrase_match(&["new", "yorkshire"]).unwrap();
        assert_eq!(count, 1);

        assert!(map.longest_phrase_match(&["newer"]).is_none());
        assert!(map.longest_phrase_match::<&str>(&[]).is_none());
    }

    #[test]
    fn test_entries_in_key_order() {
        let map = build(&[("b", "bb"), ("a", "aa")], false);
        let keys: Vec<String> = map.entries().into_iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["a", "b"]);
    }
}
