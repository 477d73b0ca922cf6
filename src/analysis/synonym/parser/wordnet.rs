//! WordNet prolog synonym grammar.
//!
//! Each line is one `s/6` fact:
//!
//! ```text
//! s(100001740,1,'entity',n,1,11).
//! ```
//!
//! Consecutive facts with the same synset id form one group. A quote inside
//! a word is written twice (`''`).

use std::sync::Arc;

use regex::Regex;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::synonym::map::SynonymMapBuilder;
use crate::analysis::synonym::parser::{SynonymParser, analyze_term};
use crate::error::{NgramSynonymError, Result};

/// Parser for WordNet `wn_s.pl` style synonym files.
pub struct WordnetSynonymParser {
    expand: bool,
    analyzer: Arc<dyn Analyzer>,
    fact: Regex,
}

impl WordnetSynonymParser {
    pub fn new(expand: bool, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        let fact = Regex::new(r"^s\((?P<synset>\d+),\s*\d+,\s*'(?P<word>.*)',.*\)\.?\s*$")
            .map_err(|e| NgramSynonymError::parse(format!("Invalid WordNet pattern: {e}")))?;

        Ok(WordnetSynonymParser {
            expand,
            analyzer,
            fact,
        })
    }

    fn add_group(&self, group: &[String], builder: &mut SynonymMapBuilder) {
        if group.len() <= 1 {
            return;
        }

        if self.expand {
            for input in group {
                for output in group {
                    builder.add(input.as_str(), output.as_str());
                }
            }
        } else {
            for input in group {
                builder.add(input.as_str(), group[0].as_str());
            }
        }
    }
}

impl SynonymParser for WordnetSynonymParser {
    fn parse(&self, rules: &str, builder: &mut SynonymMapBuilder) -> Result<()> {
        let mut last_synset: Option<&str> = None;
        let mut group: Vec<String> = Vec::new();

        for (idx, line) in rules.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let captures = self.fact.captures(line).ok_or_else(|| {
                NgramSynonymError::parse(format!("line {}: malformed WordNet entry", idx + 1))
            })?;
            let (Some(synset), Some(word)) = (captures.name("synset"), captures.name("word")) else {
                return Err(NgramSynonymError::parse(format!(
                    "line {}: malformed WordNet entry",
                    idx + 1
                )));
            };

            if last_synset != Some(synset.as_str()) {
                self.add_group(&group, builder);
                group.clear();
            }

            let word = word.as_str().replace("''", "'");
            let term = analyze_term(self.analyzer.as_ref(), &word)
                .map_err(|e| NgramSynonymError::parse(format!("line {}: {e}", idx + 1)))?;
            group.push(term);
            last_synset = Some(synset.as_str());
        }
        self.add_group(&group, builder);

        Ok(())
    }

    fn name(&self) -> &'static str {
        "wordnet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::keyword::KeywordAnalyzer;
    use crate::analysis::synonym::map::SynonymMap;

    const RULES: &str = "\
s(100000001,1,'woods',n,1,0).
s(100000001,2,'wood',n,1,0).
s(100000001,3,'forest',n,1,0).
s(100000002,1,'wolfish',n,1,0).
s(100000003,1,'king''s evil',n,1,0).
s(100000003,2,'scrofula',n,1,0).
";

    fn parse(rules: &str, expand: bool) -> Result<Option<SynonymMap>> {
        let parser =
            WordnetSynonymParser::new(expand, Arc::new(KeywordAnalyzer::with_ignore_case(true)))?;
        let mut builder = SynonymMapBuilder::new(true);
        parser.parse(rules, &mut builder)?;
        builder.build()
    }

    #[test]
    fn test_groups_expand() {
        let map = parse(RULES, true).unwrap().unwrap();

        assert_eq!(map.get("wood").unwrap(), ["woods", "wood", "forest"]);
        assert_eq!(map.get("forest").unwrap(), ["woods", "wood", "forest"]);
        assert_eq!(map.get("scrofula").unwrap(), ["king's evil", "scrofula"]);
    }

    #[test]
    fn test_single_member_group_ignored() {
        let map = parse(RULES, true).unwrap().unwrap();

        assert!(map.get("wolfish").is_none());
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_groups_without_expand() {
        let map = parse(RULES, false).unwrap().unwrap();

        assert_eq!(map.get("forest").unwrap(), ["woods"]);
        assert_eq!(map.get("woods").unwrap(), ["woods"]);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse("s(100000001,1,'a',n,1,0).\nnot a fact\n", true).unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }
}
