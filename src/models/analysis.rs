//! Analysis result and record models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Window counted as "recent" in [`AnalysisStats`].
const RECENT_WINDOW_DAYS: i64 = 7;
/// Number of most recent analyses sampled for topic frequencies.
const TOPIC_SAMPLE: usize = 10;
/// Number of topics reported in [`AnalysisStats`].
const TOP_TOPICS: usize = 5;

/// Structured analysis returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    /// Topics in the order the provider listed them.
    pub topics: Vec<String>,
    pub insights: Option<String>,
}

/// An analysis handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub document_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(document_id: &str, user_id: &str, result: AnalysisResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            document_id: document_id.to_string(),
            user_id: user_id.to_string(),
            result,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// Aggregate view over a user's analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub total_analyses: usize,
    pub recent_analyses: usize,
    pub most_frequent_topics: Vec<TopicCount>,
}

impl AnalysisStats {
    /// Compute stats as of `now`.
    ///
    /// Topic frequencies come from the ten most recent records; ties keep
    /// the order in which topics were first seen, newest record first.
    pub fn compute(records: &[AnalysisRecord], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        let recent_analyses = records.iter().filter(|r| r.created_at >= cutoff).count();

        let mut newest: Vec<&AnalysisRecord> = records.iter().collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut counts: Vec<TopicCount> = Vec::new();
        for record in newest.into_iter().take(TOPIC_SAMPLE) {
            for topic in &record.result.topics {
                match counts.iter_mut().find(|c| &c.topic == topic) {
                    Some(entry) => entry.count += 1,
                    None => counts.push(TopicCount {
                        topic: topic.clone(),
                        count: 1,
                    }),
                }
            }
        }
        // Stable sort keeps first-seen order among equal counts.
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(TOP_TOPICS);

        Self {
            total_analyses: records.len(),
            recent_analyses,
            most_frequent_topics: counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(topics: &[&str], age_days: i64, now: DateTime<Utc>) -> AnalysisRecord {
        let mut record = AnalysisRecord::new(
            "doc",
            "user",
            AnalysisResult {
                summary: "s".to_string(),
                topics: topics.iter().map(|t| t.to_string()).collect(),
                insights: None,
            },
        );
        record.created_at = now - Duration::days(age_days);
        record
    }

    #[test]
    fn test_stats_counts() {
        let now = Utc::now();
        let records = vec![
            record(&["rust", "pdf"], 1, now),
            record(&["rust", "llm"], 2, now),
            record(&["pdf"], 30, now),
        ];
        let stats = AnalysisStats::compute(&records, now);
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.recent_analyses, 2);
        assert_eq!(stats.most_frequent_topics[0].topic, "rust");
        assert_eq!(stats.most_frequent_topics[0].count, 2);
        assert_eq!(stats.most_frequent_topics[1].topic, "pdf");
        assert_eq!(stats.most_frequent_topics[1].count, 2);
        assert_eq!(stats.most_frequent_topics[2].topic, "llm");
    }

    #[test]
    fn test_stats_sample_limited_to_ten_newest() {
        let now = Utc::now();
        let mut records: Vec<_> = (0..10).map(|i| record(&["fresh"], i, now)).collect();
        records.push(record(&["stale"], 100, now));
        let stats = AnalysisStats::compute(&records, now);
        assert_eq!(stats.most_frequent_topics.len(), 1);
        assert_eq!(stats.most_frequent_topics[0].topic, "fresh");
        assert_eq!(stats.most_frequent_topics[0].count, 10);
    }

    #[test]
    fn test_stats_top_five() {
        let now = Utc::now();
        let records = vec![record(&["a", "b", "c", "d", "e", "f", "g"], 0, now)];
        let stats = AnalysisStats::compute(&records, now);
        let topics: Vec<_> = stats
            .most_frequent_topics
            .iter()
            .map(|t| t.topic.as_str())
            .collect();
        assert_eq!(topics, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_record_serializes_flat() {
        let now = Utc::now();
        let json = serde_json::to_value(record(&["x"], 0, now)).unwrap();
        assert_eq!(json["summary"], "s");
        assert_eq!(json["topics"][0], "x");
        assert!(json["insights"].is_null());
        assert_eq!(json["document_id"], "doc");
    }
}
