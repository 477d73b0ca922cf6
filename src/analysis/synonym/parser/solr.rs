//! Solr synonym rule grammar.
//!
//! ```text
//! # comment
//! a, b, c          equivalence: with expand every term maps to all terms,
//!                  without expand every term maps to the first one
//! a, b => c, d     explicit: every left term maps to every right term
//! a\,b => c        a backslash escapes the next character
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::synonym::map::SynonymMapBuilder;
use crate::analysis::synonym::parser::{SynonymParser, analyze_term};
use crate::error::{NgramSynonymError, Result};

/// Parser for Solr style synonym files.
pub struct SolrSynonymParser {
    expand: bool,
    analyzer: Arc<dyn Analyzer>,
}

impl SolrSynonymParser {
    pub fn new(expand: bool, analyzer: Arc<dyn Analyzer>) -> Self {
        SolrSynonymParser { expand, analyzer }
    }

    fn analyze_all(&self, terms: &[String], line_no: usize) -> Result<Vec<String>> {
        terms
            .iter()
            .map(|term| {
                analyze_term(self.analyzer.as_ref(), unescape(term).trim()).map_err(|e| {
                    NgramSynonymError::parse(format!("line {line_no}: {e}"))
                })
            })
            .collect()
    }

    fn add_line(&self, line: &str, line_no: usize, builder: &mut SynonymMapBuilder) -> Result<()> {
        let sides = split(line, "=>");

        if sides.len() > 1 {
            if sides.len() != 2 {
                return Err(NgramSynonymError::parse(format!(
                    "line {line_no}: more than one explicit mapping specified on the same line"
                )));
            }
            let inputs = self.analyze_all(&split(&sides[0], ","), line_no)?;
            let outputs = self.analyze_all(&split(&sides[1], ","), line_no)?;
            for input in &inputs {
                for output in &outputs {
                    builder.add(input.as_str(), output.as_str());
                }
            }
            return Ok(());
        }

        let inputs = self.analyze_all(&split(line, ","), line_no)?;
        if self.expand {
            for input in &inputs {
                for output in &inputs {
                    builder.add(input.as_str(), output.as_str());
                }
            }
        } else if let Some(first) = inputs.first() {
            for input in &inputs {
                builder.add(input.as_str(), first.as_str());
            }
        }
        Ok(())
    }
}

impl SynonymParser for SolrSynonymParser {
    fn parse(&self, rules: &str, builder: &mut SynonymMapBuilder) -> Result<()> {
        for (idx, line) in rules.lines().enumerate() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.add_line(line, idx + 1, builder)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "solr"
    }
}

/// Split on `separator`, skipping escaped separators and empty pieces.
///
/// Escapes are kept in the pieces; [`unescape`] removes them.
fn split(s: &str, separator: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut rest = s;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(separator) {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            rest = after;
            continue;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        current.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
        }
        rest = chars.as_str();
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn unescape(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::keyword::KeywordAnalyzer;
    use crate::analysis::synonym::map::SynonymMap;

    fn parse(rules: &str, expand: bool) -> Result<Option<SynonymMap>> {
        let parser = SolrSynonymParser::new(expand, Arc::new(KeywordAnalyzer::with_ignore_case(true)));
        let mut builder = SynonymMapBuilder::new(true);
        parser.parse(rules, &mut builder)?;
        builder.build()
    }

    #[test]
    fn test_equivalence_expand() {
        let map = parse("a, b, c", true).unwrap().unwrap();

        assert_eq!(map.get("a").unwrap(), ["a", "b", "c"]);
        assert_eq!(map.get("b").unwrap(), ["a", "b", "c"]);
        assert_eq!(map.get("c").unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn test_equivalence_without_expand() {
        let map = parse("a,b,c", false).unwrap().unwrap();

        assert_eq!(map.get("a").unwrap(), ["a"]);
        assert_eq!(map.get("b").unwrap(), ["a"]);
        assert_eq!(map.get("c").unwrap(), ["a"]);
    }

    #[test]
    fn test_explicit_mapping() {
        let map = parse("i-pod, i pod => ipod, IPOD2", true).unwrap().unwrap();

        assert_eq!(map.get("i-pod").unwrap(), ["ipod", "ipod2"]);
        assert_eq!(map.get("i pod").unwrap(), ["ipod", "ipod2"]);
        assert!(map.get("ipod").is_none());
    }

    #[test]
    fn test_outputs_accumulate_across_lines() {
        let map = parse("a => b\na => c\na => b", true).unwrap().unwrap();

        assert_eq!(map.get("a").unwrap(), ["b", "c"]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let map = parse("# header\n\nfoo,bar\n#baz,qux", true).unwrap().unwrap();

        assert_eq!(map.len(), 2);
        assert!(map.get("baz").is_none());
    }

    #[test]
    fn test_escaped_separators() {
        let map = parse("a\\,a,b\\=>c", true).unwrap().unwrap();

        assert_eq!(map.get("a,a").unwrap(), ["a,a", "b=>c"]);
    }

    #[test]
    fn test_multiple_explicit_mappings_rejected() {
        let err = parse("a => b => c", true).unwrap_err();

        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_empty_term_rejected() {
        let err = parse("ok,fine\na, ,b", true).unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_split_drops_empty_pieces() {
        assert_eq!(split(",a,,b,", ","), vec!["a", "b"]);
        assert_eq!(split("a\\,b", ","), vec!["a\\,b"]);
        assert_eq!(unescape("a\\,b\\\\"), "a,b\\");
    }
}
