//! Rank Statements use case
//!
//! The default statement order does not depend on opinion groups, so it is
//! available for every discussion, including ones too small to cluster.

use super::analyze_discussion::{rank_snapshot, statement_texts};
use crate::ports::snapshot_source::{SnapshotError, VoteSnapshotSource};
use agora_domain::{
    DiscussionId, DiscussionSnapshot, RankedStatement, StatementId, StatementRanker,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Statements of one discussion in default display order
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub discussion_id: DiscussionId,
    pub rankings: Vec<RankedStatement>,
    /// Statement id → text, for display
    pub statement_texts: BTreeMap<StatementId, String>,
}

/// Use case for ranking the statements of one discussion
pub struct RankStatementsUseCase<S: VoteSnapshotSource + 'static> {
    source: Arc<S>,
    ranker: StatementRanker,
}

impl<S: VoteSnapshotSource + 'static> RankStatementsUseCase<S> {
    pub fn new(source: Arc<S>, ranker: StatementRanker) -> Self {
        Self { source, ranker }
    }

    pub async fn execute(
        &self,
        discussion: &DiscussionId,
    ) -> Result<RankingOutcome, SnapshotError> {
        let snapshot = self.source.load_snapshot(discussion).await?;
        Ok(self.rank_loaded(&snapshot))
    }

    /// Rank a snapshot the caller already loaded
    pub fn rank_loaded(&self, snapshot: &DiscussionSnapshot) -> RankingOutcome {
        let rankings = rank_snapshot(&self.ranker, snapshot);
        debug!(
            discussion = %snapshot.discussion_id,
            statements = rankings.len(),
            "Ranked statements"
        );
        RankingOutcome {
            discussion_id: snapshot.discussion_id.clone(),
            rankings,
            statement_texts: statement_texts(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::fixtures::{InMemorySource, too_small};

    #[tokio::test]
    async fn test_ranks_small_discussion() {
        let source = Arc::new(InMemorySource::default().with(too_small("new")));
        let use_case = RankStatementsUseCase::new(source, StatementRanker::default());

        let outcome = use_case.execute(&DiscussionId::new("new")).await.unwrap();
        let rankings = &outcome.rankings;
        let order: Vec<StatementId> = rankings.iter().map(|r| r.statement_id).collect();

        // 1: 2 agree / 1 disagree; 2: 1 disagree; 3: unsure only; 4: no votes
        assert_eq!(
            order,
            vec![StatementId(1), StatementId(2), StatementId(3), StatementId(4)]
        );
        assert!(rankings[0].score > 0.0);
        assert_eq!(rankings[3].score, 0.0);
        assert_eq!(outcome.statement_texts.len(), 4);
    }

    #[test]
    fn test_rank_loaded_skips_source() {
        let source = Arc::new(InMemorySource::default());
        let use_case = RankStatementsUseCase::new(source.clone(), StatementRanker::default());

        let outcome = use_case.rank_loaded(&too_small("new"));

        assert_eq!(outcome.discussion_id, DiscussionId::new("new"));
        assert_eq!(outcome.rankings[0].statement_id, StatementId(1));
        assert_eq!(source.loads(), 0);
    }

    #[tokio::test]
    async fn test_missing_discussion() {
        let use_case =
            RankStatementsUseCase::new(Arc::new(InMemorySource::default()), StatementRanker::default());
        assert!(matches!(
            use_case.execute(&DiscussionId::new("ghost")).await,
            Err(SnapshotError::NotFound(_))
        ));
    }
}
