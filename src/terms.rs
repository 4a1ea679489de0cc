use std::collections::HashMap;

use crate::models::{TermCount, TicketRecord};

pub const DEFAULT_MAX_WORDS: usize = 100;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else",
    "ever", "few", "for", "from", "further", "get", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "of", "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "same", "shall", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Most frequent remark words, highest count first and alphabetical on ties.
pub fn remark_terms(records: &[TicketRecord], max_words: usize) -> Vec<TermCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for remark in records.iter().filter_map(|r| r.remarks.as_deref()) {
        for token in tokenize(remark) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(max_words);
    terms
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphabetic() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .map(|word| word.strip_suffix("'s").unwrap_or(word))
        .filter(|word| word.chars().count() > 1 && !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::ticket;

    fn remark(text: Option<&str>) -> TicketRecord {
        let mut record = ticket("T");
        record.remarks = text.map(str::to_string);
        record
    }

    #[test]
    fn counts_words_without_stopwords() {
        let records = vec![
            remark(Some("The project deadline is too short")),
            remark(Some("Project mentor's feedback was late")),
            remark(None),
        ];

        let terms = remark_terms(&records, DEFAULT_MAX_WORDS);
        assert_eq!(terms[0], TermCount { term: "project".to_string(), count: 2 });
        assert!(terms.iter().any(|t| t.term == "mentor"));
        assert!(!terms.iter().any(|t| t.term == "the" || t.term == "is"));
    }

    #[test]
    fn ties_are_alphabetical_and_truncated() {
        let records = vec![remark(Some("zebra apple mango"))];

        let terms = remark_terms(&records, 2);
        let words: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(words, vec!["apple", "mango"]);
    }

    #[test]
    fn no_remarks_means_no_terms() {
        assert!(remark_terms(&[remark(None)], DEFAULT_MAX_WORDS).is_empty());
        assert!(remark_terms(&[], DEFAULT_MAX_WORDS).is_empty());
    }
}
