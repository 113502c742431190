//! Lexical task detection from free-text user input.

use super::model::{TaskPriority, TaskType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences shorter than this (after trimming) are ignored.
const MIN_SENTENCE_CHARS: usize = 10;

/// Ordered keyword patterns, matched anywhere in the sentence (so "unittests"
/// counts as "test"). The first pattern that matches wins, even when a later
/// one would describe the sentence better.
static PATTERNS: Lazy<Vec<(Regex, TaskType, TaskPriority)>> = Lazy::new(|| {
    [
        (r"implement|create|build|add|write", TaskType::Coding, TaskPriority::High),
        (r"fix|debug|resolve|solve", TaskType::Debugging, TaskPriority::High),
        (r"test|verify|validate|check", TaskType::Testing, TaskPriority::Medium),
        (r"analyze|review|examine|investigate", TaskType::Analysis, TaskPriority::Medium),
        (r"research|find|search|explore", TaskType::Research, TaskPriority::Medium),
        (r"optimize|improve|enhance|refactor", TaskType::Optimization, TaskPriority::Medium),
        (r"document|explain|describe", TaskType::Documentation, TaskPriority::Low),
    ]
    .into_iter()
    .map(|(keywords, task_type, priority)| {
        let pattern = format!(r"(?i)(?:{})", keywords);
        (
            Regex::new(&pattern).expect("task keyword pattern is valid"),
            task_type,
            priority,
        )
    })
    .collect()
});

/// A task suggested by the detector, not yet registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCandidate {
    pub description: String,
    pub task_type: TaskType,
    pub priority: TaskPriority,
}

/// Classifies one sentence by the first matching keyword pattern.
pub fn classify(sentence: &str) -> Option<(TaskType, TaskPriority)> {
    PATTERNS
        .iter()
        .find(|(regex, _, _)| regex.is_match(sentence))
        .map(|(_, task_type, priority)| (*task_type, *priority))
}

/// Splits `input` into sentences and returns one candidate per sentence that
/// matches a keyword pattern. No match yields an empty list.
pub fn detect_tasks(input: &str) -> Vec<TaskCandidate> {
    input
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)
        .filter_map(|sentence| {
            classify(sentence).map(|(task_type, priority)| TaskCandidate {
                description: sentence.to_string(),
                task_type,
                priority,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences_list_order_wins() {
        let candidates = detect_tasks("Please fix the login bug. Also write tests for the parser.");
        assert_eq!(
            candidates,
            vec![
                TaskCandidate {
                    description: "Please fix the login bug".to_string(),
                    task_type: TaskType::Debugging,
                    priority: TaskPriority::High,
                },
                TaskCandidate {
                    description: "Also write tests for the parser".to_string(),
                    task_type: TaskType::Coding,
                    priority: TaskPriority::High,
                },
            ]
        );
    }

    #[test]
    fn test_short_sentences_are_dropped() {
        assert!(detect_tasks("Fix it! Test? Build.").is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(detect_tasks("Good morning, how are you today?").is_empty());
    }

    #[test]
    fn test_case_insensitive_and_each_category() {
        assert_eq!(classify("VERIFY the output"), Some((TaskType::Testing, TaskPriority::Medium)));
        assert_eq!(
            classify("please review my PR"),
            Some((TaskType::Analysis, TaskPriority::Medium))
        );
        assert_eq!(
            classify("explore the codebase"),
            Some((TaskType::Research, TaskPriority::Medium))
        );
        assert_eq!(
            classify("refactor the loop"),
            Some((TaskType::Optimization, TaskPriority::Medium))
        );
        assert_eq!(
            classify("explain this macro"),
            Some((TaskType::Documentation, TaskPriority::Low))
        );
    }

    #[test]
    fn test_keyword_inside_a_word_matches() {
        let candidates = detect_tasks("Run the unittests on CI please");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].task_type, TaskType::Testing);
        assert_eq!(candidates[0].priority, TaskPriority::Medium);

        assert_eq!(
            classify("rebuild the index from scratch"),
            Some((TaskType::Coding, TaskPriority::High))
        );
    }

    #[test]
    fn test_repeated_input_is_not_deduplicated() {
        let candidates = detect_tasks("Refactor the cache layer. Refactor the cache layer.");
        assert_eq!(candidates.len(), 2);
    }
}
